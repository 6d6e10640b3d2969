//! Type-directed binding of environment variables into nested configuration
//! structs.
//!
//! `#[derive(FromEnv)]` walks a struct's fields depth-first, derives an
//! uppercased lookup key per leaf field (composed with the prefixes of any
//! enclosing nested records), resolves the key against a lookup source — the
//! process environment by default — and converts the text into the field's
//! native type. The first field that fails to convert aborts the walk with
//! the offending key in the error.
//!
//! ```
//! use envbind::FromEnv;
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Default, FromEnv)]
//! struct Database {
//!     #[env(default = "localhost")]
//!     host: String,
//!     #[env(default = "5432")]
//!     port: u16,
//! }
//!
//! #[derive(Debug, Default, FromEnv)]
//! struct Config {
//!     #[env(nested, prefix = "DB")]
//!     database: Database,
//!     #[env(key = "TAGS")]
//!     tags: Vec<String>,
//! }
//!
//! let mut source = HashMap::new();
//! source.insert("DB_PORT".to_string(), "5433".to_string());
//! source.insert("TAGS".to_string(), "a,b,c".to_string());
//!
//! let config = Config::from_source(&source).unwrap();
//! assert_eq!(config.database.host, "localhost");
//! assert_eq!(config.database.port, 5433);
//! assert_eq!(config.tags, vec!["a", "b", "c"]);
//! ```

pub mod bind;
pub mod error;
pub mod field;
pub mod source;
pub mod value;

// Re-export main types
pub use bind::{ParseText, SetText};
pub use error::{BindError, DecodeError};
pub use field::FieldSpec;
pub use source::{load_dotenv, EnvSource, ProcessEnv};
pub use value::FromEnvValue;

// Re-export macro
pub use envbind_macros::FromEnv;

/// Trait implemented by `#[derive(FromEnv)]` for configuration records
pub trait FromEnv {
    /// Walks the record's fields in declaration order, binding each leaf
    /// from `source` under the given key prefix. Fields are written in
    /// place; on error the record keeps every field bound before the
    /// failing one.
    fn bind_from(&mut self, source: &dyn EnvSource, prefix: &str) -> Result<(), BindError>;

    /// Binds every field from the process environment, in place
    fn bind_env(&mut self) -> Result<(), BindError> {
        self.bind_from(&ProcessEnv, "")
    }

    /// Builds a record from the process environment
    fn from_env() -> Result<Self, BindError>
    where
        Self: Default + Sized,
    {
        Self::from_source(&ProcessEnv)
    }

    /// Builds a record from an injected lookup source
    fn from_source(source: &dyn EnvSource) -> Result<Self, BindError>
    where
        Self: Default + Sized,
    {
        let mut record = Self::default();
        record.bind_from(source, "")?;
        Ok(record)
    }
}

// Surface consumed by the code `#[derive(FromEnv)]` generates.
#[doc(hidden)]
pub mod __private {
    pub use crate::bind::{Probe, ViaFromEnvValue, ViaParseText, ViaSetText};
    pub use crate::field::join_prefix;
    pub use crate::value::{decode_map, decode_seq};
}
