//! Coercion of source values into the kind a leaf slot expects.

use crate::{BindErrorKind, LeafKind, Result, Value, error::ConversionCause};

/// Convert `source` into a value that a slot of kind `target` accepts.
///
/// A source whose variant already matches the slot passes through untouched.
/// Everything else goes through the source's text form.
pub fn coerce(source: Value, target: LeafKind) -> Result<Value> {
    match (&source, target) {
        (Value::Bool(_), LeafKind::Bool)
        | (Value::Int(_), LeafKind::I64)
        | (Value::Float(_), LeafKind::F64)
        | (Value::String(_), LeafKind::String)
        | (Value::List(_), LeafKind::ValueList) => Ok(source),
        _ => coerce_str(&source.to_text(), target),
    }
}

/// Parse `text` into a value that a slot of kind `target` accepts.
pub fn coerce_str(text: &str, target: LeafKind) -> Result<Value> {
    log::trace!("Coercing {text:?} to {}", target.name());

    let fail = |cause: ConversionCause| BindErrorKind::Conversion {
        value: text.to_owned(),
        target: target.name(),
        cause,
    };

    match target {
        LeafKind::String => Ok(Value::String(text.to_owned())),
        kind if kind.is_integer() => {
            if let Ok(exact) = text.parse::<i64>() {
                return Ok(Value::Int(exact));
            }
            let parsed: f64 = text.parse().map_err(|e| fail(ConversionCause::from(e)))?;
            let truncated = parsed.trunc();
            // Outside the i64 range the float is kept; the slot narrows it.
            if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(Value::Int(truncated as i64))
            } else {
                Ok(Value::Float(truncated))
            }
        }
        kind if kind.is_float() => {
            let parsed: f64 = text.parse().map_err(|e| fail(ConversionCause::from(e)))?;
            Ok(Value::Float(parsed))
        }
        LeafKind::Bool => parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| fail(ConversionCause::Bool).into()),
        LeafKind::StringList => {
            let items: Vec<String> =
                serde_json::from_str(text).map_err(|e| fail(ConversionCause::from(e)))?;
            Ok(Value::List(items.into_iter().map(Value::String).collect()))
        }
        LeafKind::ValueList => {
            let items: Vec<serde_json::Value> =
                serde_json::from_str(text).map_err(|e| fail(ConversionCause::from(e)))?;
            Ok(Value::List(items.into_iter().map(Value::from).collect()))
        }
        other => Err(BindErrorKind::UnsupportedType(other.name()).into()),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
