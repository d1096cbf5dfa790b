use std::{
    error::Error,
    fmt::{self, Display},
    num::ParseFloatError,
};

/// Error type for binding operations.
#[derive(Debug)]
pub struct BindError {
    kind: BindErrorKind,
}

impl BindError {
    /// Returns a reference to the error kind for detailed error inspection.
    pub fn kind(&self) -> &BindErrorKind {
        &self.kind
    }
}

impl Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = &self.kind;
        write!(f, "{kind}")
    }
}

impl Error for BindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            BindErrorKind::Conversion { cause, .. } => cause.source(),
            _ => None,
        }
    }
}

impl<K: Into<BindErrorKind>> From<K> for BindError {
    fn from(value: K) -> Self {
        let kind = value.into();
        BindError { kind }
    }
}

/// Detailed classification of binding errors.
#[derive(Debug)]
#[non_exhaustive]
pub enum BindErrorKind {
    /// A path segment does not name any member of the record it is resolved against.
    FieldNotFound(String),
    /// The addressed member exists but cannot be assigned.
    Unwritable(String),
    /// The source value could not be coerced into the member's type.
    Conversion {
        /// Text form of the offending source value.
        value: String,
        /// Name of the destination type.
        target: &'static str,
        /// The underlying parse failure.
        cause: ConversionCause,
    },
    /// The destination type has no coercion rule.
    UnsupportedType(&'static str),
    /// The leading path segment is not in the allow-list.
    AccessDenied(String),
    /// An allow-list call was made without any allowed keys.
    NoAccessKeys,
    /// The walk reached something that is not a record or map before the end of the path.
    InvalidPath(String),
}

impl Display for BindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindErrorKind::FieldNotFound(name) => write!(f, "field '{name}' not found"),
            BindErrorKind::Unwritable(name) => write!(f, "cannot set field '{name}'"),
            BindErrorKind::Conversion {
                value,
                target,
                cause,
            } => write!(f, "cannot convert '{value}' to {target}: {cause}"),
            BindErrorKind::UnsupportedType(ty) => write!(f, "unsupported type: {ty}"),
            BindErrorKind::AccessDenied(key) => {
                write!(f, "parameter '{key}' is not accessible to set")
            }
            BindErrorKind::NoAccessKeys => write!(f, "no access keys were given"),
            BindErrorKind::InvalidPath(at) => write!(
                f,
                "invalid path: encountered a non-map value at '{at}' before reaching the end of the path"
            ),
        }
    }
}

/// Why a coercion failed.
#[derive(Debug)]
#[non_exhaustive]
pub enum ConversionCause {
    /// The text is not a floating point number.
    Float(ParseFloatError),
    /// The text is not one of the accepted boolean literals.
    Bool,
    /// The text is not a JSON array of the expected element type.
    Json(serde_json::Error),
}

impl ConversionCause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConversionCause::Float(e) => Some(e),
            ConversionCause::Bool => None,
            ConversionCause::Json(e) => Some(e),
        }
    }
}

impl Display for ConversionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionCause::Float(e) => write!(f, "{e}"),
            ConversionCause::Bool => write!(f, "invalid syntax"),
            ConversionCause::Json(e) => write!(f, "{e}"),
        }
    }
}

impl From<ParseFloatError> for ConversionCause {
    fn from(value: ParseFloatError) -> Self {
        Self::Float(value)
    }
}

impl From<serde_json::Error> for ConversionCause {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_names_value_and_target() {
        let cause = "abc".parse::<f64>().unwrap_err();
        let err = BindError::from(BindErrorKind::Conversion {
            value: "abc".into(),
            target: "i32",
            cause: cause.into(),
        });

        let msg = err.to_string();
        assert!(msg.contains("'abc'"), "{msg}");
        assert!(msg.contains("i32"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn bool_conversion_has_no_source() {
        let err = BindError::from(BindErrorKind::Conversion {
            value: "yes".into(),
            target: "bool",
            cause: ConversionCause::Bool,
        });
        assert!(err.source().is_none());
    }
}
