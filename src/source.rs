use std::collections::HashMap;
use std::env;
use std::path::Path;

use crate::error::BindError;

/// Read-only key-value store queried for a field's textual value.
///
/// The process environment is the production source; a `HashMap` works as a
/// hermetic source in tests.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Loads `KEY=VALUE` lines from a dotenv file into the process environment.
///
/// Comment lines starting with `#` and blank lines are skipped, surrounding
/// whitespace is trimmed and one layer of matching quotes is stripped from
/// values. Existing variables are overwritten. A malformed line aborts the
/// load with an error; nothing is retried.
pub fn load_dotenv(path: impl AsRef<Path>) -> Result<(), BindError> {
    let path = path.as_ref();
    dotenvy::from_path_override(path).map_err(|source| BindError::DotEnv {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source_hit_and_miss() {
        let mut source = HashMap::new();
        source.insert("PORT".to_string(), "5432".to_string());

        assert_eq!(EnvSource::get(&source, "PORT"), Some("5432".to_string()));
        assert_eq!(EnvSource::get(&source, "HOST"), None);
    }

    #[test]
    fn test_process_env_source() {
        env::set_var("ENVBIND_SOURCE_TEST_VAR", "present");

        assert_eq!(
            ProcessEnv.get("ENVBIND_SOURCE_TEST_VAR"),
            Some("present".to_string())
        );
        assert_eq!(ProcessEnv.get("ENVBIND_SOURCE_TEST_MISSING"), None);
    }
}
