//! Literal-path helpers over nested [`Map`]s.

use std::collections::BTreeMap;

use crate::{BindErrorKind, Map, Result, Value};

/// Look up the value at `path` inside nested maps.
///
/// Fails with [`BindErrorKind::FieldNotFound`] for a missing key and with
/// [`BindErrorKind::InvalidPath`] when a non-map value is reached before the
/// end of the path. An empty path is an invalid path.
///
/// ```
/// use flatbind::{Map, Value};
///
/// let mut map = Map::new();
/// flatbind::set_into_nested_map(&mut map, &["server", "port"], Value::Int(8080));
///
/// let port = flatbind::get_from_nested_map(&map, &["server", "port"]).unwrap();
/// assert_eq!(port, &Value::Int(8080));
/// ```
pub fn get_from_nested_map<'m>(map: &'m Map, path: &[&str]) -> Result<&'m Value> {
    let Some((first, rest)) = path.split_first() else {
        return Err(BindErrorKind::InvalidPath(String::new()).into());
    };

    let mut current = map
        .get(*first)
        .ok_or_else(|| BindErrorKind::FieldNotFound((*first).to_owned()))?;

    for (depth, &segment) in rest.iter().enumerate() {
        let Value::Map(inner) = current else {
            return Err(BindErrorKind::InvalidPath(path[depth].to_owned()).into());
        };
        current = inner
            .get(segment)
            .ok_or_else(|| BindErrorKind::FieldNotFound(segment.to_owned()))?;
    }

    Ok(current)
}

/// Store `value` at `path`, creating or replacing intermediate maps.
///
/// An empty path leaves `map` unchanged.
pub fn set_into_nested_map(map: &mut Map, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = map;
    for &segment in parents {
        let slot = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Map(Map::new()));
        if !matches!(slot, Value::Map(_)) {
            *slot = Value::Map(Map::new());
        }
        let Value::Map(inner) = slot else {
            return;
        };
        current = inner;
    }

    current.insert((*last).to_owned(), value);
}

/// Convert the top level of a dynamic map into strings.
///
/// Strings are kept verbatim, numbers and booleans use their text form, and
/// lists become JSON text. Null and nested map values are dropped.
pub fn stringify_map(map: &Map) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(key, value)| match value {
            Value::Null | Value::Map(_) => None,
            other => Some((key.clone(), other.to_text())),
        })
        .collect()
}
