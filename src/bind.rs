use std::marker::PhantomData;

use crate::error::DecodeError;
use crate::value::FromEnvValue;

/// Custom text decoding for a field's type.
///
/// Takes precedence over every built-in kind and over [`SetText`]. Implement
/// it for types that own their textual representation:
///
/// ```
/// use envbind::ParseText;
///
/// enum Level { Info, Debug }
///
/// impl ParseText for Level {
///     fn parse_text(raw: &str) -> Result<Self, String> {
///         match raw {
///             "info" => Ok(Level::Info),
///             "debug" => Ok(Level::Debug),
///             other => Err(format!("unknown level '{}'", other)),
///         }
///     }
/// }
/// ```
pub trait ParseText: Sized {
    fn parse_text(raw: &str) -> Result<Self, String>;
}

/// Custom in-place setter for a field's type, consulted after [`ParseText`]
/// and before the built-in kinds. The receiver starts from `Default`.
pub trait SetText {
    fn set_text(&mut self, raw: &str) -> Result<(), String>;
}

/// Probe value through which generated code picks a field's conversion path.
///
/// Method resolution on `(&&&Probe::<T>::new()).bind(..)` walks the reference
/// levels outside-in, so the first capability `T` actually implements wins:
/// [`ParseText`], then [`SetText`], then [`FromEnvValue`]. A type with none
/// of the three fails to compile at the call site.
pub struct Probe<T>(PhantomData<T>);

impl<T> Probe<T> {
    pub fn new() -> Self {
        Probe(PhantomData)
    }
}

impl<T> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub trait ViaParseText {
    type Out;
    fn bind(&self, raw: &str, separator: &str) -> Result<Self::Out, DecodeError>;
}

impl<T: ParseText> ViaParseText for &&Probe<T> {
    type Out = T;

    fn bind(&self, raw: &str, _separator: &str) -> Result<T, DecodeError> {
        T::parse_text(raw).map_err(DecodeError::custom)
    }
}

pub trait ViaSetText {
    type Out;
    fn bind(&self, raw: &str, separator: &str) -> Result<Self::Out, DecodeError>;
}

impl<T: SetText + Default> ViaSetText for &Probe<T> {
    type Out = T;

    fn bind(&self, raw: &str, _separator: &str) -> Result<T, DecodeError> {
        let mut value = T::default();
        value.set_text(raw).map_err(DecodeError::custom)?;
        Ok(value)
    }
}

pub trait ViaFromEnvValue {
    type Out;
    fn bind(&self, raw: &str, separator: &str) -> Result<Self::Out, DecodeError>;
}

impl<T: FromEnvValue> ViaFromEnvValue for Probe<T> {
    type Out = T;

    fn bind(&self, raw: &str, separator: &str) -> Result<T, DecodeError> {
        T::from_env_value(raw, separator)
    }
}
