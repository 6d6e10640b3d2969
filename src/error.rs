use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while binding a record from the environment
#[derive(Debug)]
pub enum BindError {
    /// A leaf field's resolved text could not be converted to its declared type
    Convert { key: String, source: DecodeError },
    /// A dotenv file could not be loaded into the process environment
    DotEnv {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

impl BindError {
    /// Wraps a decode failure with the lookup key it occurred under
    pub fn conversion(key: impl Into<String>, source: DecodeError) -> Self {
        BindError::Convert {
            key: key.into(),
            source,
        }
    }

    /// The lookup key of the field that failed, if the error came from a field
    pub fn key(&self) -> Option<&str> {
        match self {
            BindError::Convert { key, .. } => Some(key),
            BindError::DotEnv { .. } => None,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Convert { key, source } => {
                writeln!(
                    f,
                    "{}: cannot convert value or missing default",
                    key.magenta().bold()
                )?;
                write!(f, "\tReason: {}", source)
            }
            BindError::DotEnv { path, source } => {
                writeln!(
                    f,
                    "{}: cannot load dotenv file",
                    path.display().to_string().magenta().bold()
                )?;
                write!(f, "\tReason: {}", source)
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::Convert { source, .. } => Some(source),
            BindError::DotEnv { source, .. } => Some(source),
        }
    }
}

/// A single value that could not be decoded, before any lookup key is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Text that is not one of the accepted boolean literals
    Bool { value: String },
    /// Text that does not parse as an integer in any detected base
    Int { value: String },
    /// An integer literal that parses but does not fit the target width
    OutOfRange { value: String, ty: &'static str },
    /// Text that does not parse as a floating point literal
    Float { value: String },
    /// Text that does not parse as a duration with a unit suffix
    Duration { value: String },
    /// A map item without a `key:value` colon separator
    MapItem { item: String },
    /// A failure reported by a custom ParseText or SetText implementation
    Custom { message: String },
}

impl DecodeError {
    pub fn custom(message: impl Into<String>) -> Self {
        DecodeError::Custom {
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Bool { value } => write!(f, "invalid boolean literal '{}'", value),
            DecodeError::Int { value } => write!(f, "invalid integer literal '{}'", value),
            DecodeError::OutOfRange { value, ty } => {
                write!(f, "integer '{}' out of range for {}", value, ty)
            }
            DecodeError::Float { value } => write!(f, "invalid float literal '{}'", value),
            DecodeError::Duration { value } => write!(f, "invalid duration '{}'", value),
            DecodeError::MapItem { item } => write!(f, "invalid map item '{}'", item),
            DecodeError::Custom { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for DecodeError {}
