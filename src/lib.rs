#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate self as flatbind;

use std::collections::BTreeMap;

mod binder;
mod coerce;
mod error;
mod flatten;
mod map;
mod path;
mod populate;
mod reflect;
mod resolve;
mod value;

pub use binder::Binder;
pub use coerce::{coerce, coerce_str};
pub use error::{BindError, BindErrorKind, ConversionCause};
pub use flatbind_derive::Record;
pub use flatten::ListFormat;
pub use map::{get_from_nested_map, set_into_nested_map, stringify_map};
pub use path::split_path;
pub use reflect::{Field, FieldFlags, Leaf, LeafKind, Record, Reflect, ReflectMut, ReflectRef};
pub use resolve::NamingStrategy;
pub use value::{Map, Value};

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

/// Populate `dest` from a string map, matching members by declared name.
///
/// Keys are split on `.`. With a non-empty `escape_prefix`, only keys that
/// start with the prefix's segments (and go past it) are used, with the prefix
/// removed; the rest are skipped. Stops at the first error, keeping earlier
/// writes.
///
/// ```
/// use flatbind::Record;
///
/// #[derive(Record, Default)]
/// struct Feature {
///     enabled: bool,
///     weight: i32,
/// }
///
/// let mut feature = Feature::default();
/// flatbind::populate_from_string_map(
///     &mut feature,
///     [("app.feature.enabled", "true"), ("other.weight", "9"), ("app.feature.weight", "-2.2")],
///     "app.feature",
/// )
/// .unwrap();
///
/// assert!(feature.enabled);
/// assert_eq!(feature.weight, -2);
/// ```
pub fn populate_from_string_map<R, I, K, V>(dest: &mut R, source: I, escape_prefix: &str) -> Result<()>
where
    R: Reflect,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Binder::new()
        .with_naming(NamingStrategy::ByMemberName)
        .populate_strings(dest, source, escape_prefix)
}

/// Populate `dest` from a dynamic map, matching members by tag.
///
/// Every key's first segment must be in `allow_list`; this is checked for all
/// keys before anything is written. An empty `allow_list` is an error.
pub fn populate_from_any_map<R, I, K, V>(dest: &mut R, source: I, allow_list: &[&str]) -> Result<()>
where
    R: Reflect,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    Binder::new().populate_values(dest, source, allow_list)
}

/// [`populate_from_any_map`] for a string map.
pub fn populate_from_string_map_with_access<R, I, K, V>(
    dest: &mut R,
    source: I,
    allow_list: &[&str],
) -> Result<()>
where
    R: Reflect,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Binder::new().populate_strings_with_access(dest, source, allow_list)
}

/// Read the member at the `.`-separated `path`, matching by declared name.
pub fn get_field_value<R: Reflect>(record: &R, path: &str) -> Result<Value> {
    Binder::new()
        .with_naming(NamingStrategy::ByMemberName)
        .get(record, path)
}

/// Flatten `record` into a map from `.`-joined tag paths to text.
///
/// Keys use tags, so feeding the result to [`populate_from_string_map`], which
/// matches member names, fails for members whose tag differs from their name.
/// Use one [`Binder`] for both directions to round-trip such records.
///
/// # Panics
///
/// Panics if `record` is neither a record nor a present reference to one.
pub fn flatten_to_string_map<R: Reflect>(record: &R) -> BTreeMap<String, String> {
    Binder::new().flatten(record)
}

/// Convert `record` into a nested [`Value::Map`] keyed by tag.
pub fn to_value<R: Reflect>(record: &R) -> Value {
    Binder::new().to_value(record)
}
