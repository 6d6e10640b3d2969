use crate::source::EnvSource;

/// Item separator used by sequence and map fields without an override
pub const DEFAULT_SEPARATOR: &str = ",";

/// Declarative metadata attached to a leaf field at schema-registration time.
///
/// Built by `#[derive(FromEnv)]` from the field's `#[env(...)]` attribute and
/// its declared name. Recomputed on every traversal, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Uppercased lookup name, joined onto the ancestor prefix at bind time
    pub name: &'static str,
    /// Default literal used verbatim when the key is absent from the source
    pub default: Option<&'static str>,
    /// Separator for sequence items and map pairs
    pub separator: &'static str,
}

impl FieldSpec {
    /// Computes the field's lookup key under `prefix` and resolves its raw
    /// text: the source value if present, else the default literal, else the
    /// empty string (which fails conversion for non-string leaf types).
    pub fn resolve(&self, source: &dyn EnvSource, prefix: &str) -> (String, String) {
        let key = join_prefix(prefix, self.name);
        let raw = match source.get(&key) {
            Some(value) => value,
            None => self.default.unwrap_or("").to_string(),
        };
        (key, raw)
    }
}

/// Joins two key-prefix segments with an underscore; an empty side degrades
/// to the other.
pub fn join_prefix(parent: &str, current: &str) -> String {
    if parent.is_empty() {
        current.to_string()
    } else if current.is_empty() {
        parent.to_string()
    } else {
        format!("{}_{}", parent, current)
    }
}
