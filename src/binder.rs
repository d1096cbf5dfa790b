use std::collections::BTreeMap;

use crate::{
    ListFormat, NamingStrategy, Reflect, Result, Value,
    flatten::{Flattener, reflect_to_value},
    populate::{populate_allowed, populate_escaped},
    resolve::resolve_ref,
};

/// Options shared by every binding operation.
///
/// The crate-level functions are shorthands for preset binders; build one
/// directly to use another delimiter, naming strategy or list format.
///
/// ```
/// use flatbind::{Binder, Record};
///
/// #[derive(Record, Default)]
/// struct Limits {
///     #[bind(tag = "max_conn")]
///     max_connections: u32,
/// }
///
/// let binder = Binder::new().with_delimiter(":");
/// let mut limits = Limits::default();
/// binder
///     .populate_values(&mut limits, [("max_conn", "64")], &["max_conn"])
///     .unwrap();
/// assert_eq!(limits.max_connections, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binder {
    delimiter: String,
    naming: NamingStrategy,
    list_format: ListFormat,
}

impl Default for Binder {
    fn default() -> Self {
        Self {
            delimiter: ".".to_owned(),
            naming: NamingStrategy::default(),
            list_format: ListFormat::default(),
        }
    }
}

impl Binder {
    /// A binder with the `.` delimiter, tag naming and JSON lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `delimiter` to split and join paths.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Match path segments against members with `naming`.
    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Render list leaves with `list_format` when flattening.
    pub fn with_list_format(mut self, list_format: ListFormat) -> Self {
        self.list_format = list_format;
        self
    }

    /// The path delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The naming strategy.
    pub fn naming(&self) -> NamingStrategy {
        self.naming
    }

    /// The list format used by flatten.
    pub fn list_format(&self) -> ListFormat {
        self.list_format
    }

    /// Split `text` on this binder's delimiter.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        crate::split_path(text, &self.delimiter)
    }

    /// Populate `dest` from string entries under `escape_prefix`.
    ///
    /// Entries outside the prefix are skipped and the prefix is stripped from
    /// the rest; an empty prefix keeps every entry. Stops at the first error,
    /// keeping earlier writes.
    pub fn populate_strings<R, I, K, V>(
        &self,
        dest: &mut R,
        source: I,
        escape_prefix: &str,
    ) -> Result<()>
    where
        R: Reflect,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        populate_escaped(dest, source, escape_prefix, &self.delimiter, self.naming)
    }

    /// Populate `dest` from dynamic entries whose first segment is in `allow_list`.
    ///
    /// Fails with [`NoAccessKeys`](crate::BindErrorKind::NoAccessKeys) for an
    /// empty allow-list and with [`AccessDenied`](crate::BindErrorKind::AccessDenied)
    /// before any write when a key is not allowed.
    pub fn populate_values<R, I, K, V>(
        &self,
        dest: &mut R,
        source: I,
        allow_list: &[&str],
    ) -> Result<()>
    where
        R: Reflect,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let entries = source
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_owned(), value.into()));
        populate_allowed(dest, entries, allow_list, &self.delimiter, self.naming)
    }

    /// Like [`Binder::populate_values`], with every value taken as a string.
    pub fn populate_strings_with_access<R, I, K, V>(
        &self,
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
        let entries = source
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_owned(), Value::from(value.as_ref())));
        populate_allowed(dest, entries, allow_list, &self.delimiter, self.naming)
    }

    /// Read the member at `path` as a dynamic value.
    pub fn get<R: Reflect>(&self, record: &R, path: &str) -> Result<Value> {
        let segments = self.split(path);
        let slot = resolve_ref(record, &segments, self.naming)?;
        Ok(reflect_to_value(slot, self.naming))
    }

    /// Flatten `record` into a map from joined paths to text.
    ///
    /// # Panics
    ///
    /// Panics if `record` is neither a record nor a present reference to one.
    pub fn flatten<R: Reflect>(&self, record: &R) -> BTreeMap<String, String> {
        Flattener {
            delimiter: &self.delimiter,
            naming: self.naming,
            list_format: self.list_format,
        }
        .flatten(record)
    }

    /// Convert `record` into a nested [`Value::Map`].
    pub fn to_value<R: Reflect>(&self, record: &R) -> Value {
        reflect_to_value(record, self.naming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let binder = Binder::default();
        assert_eq!(binder.delimiter(), ".");
        assert_eq!(binder.naming(), NamingStrategy::ByTag);
        assert_eq!(binder.list_format(), ListFormat::Json);
        assert_eq!(binder, Binder::new());
    }

    #[test]
    fn split_uses_configured_delimiter() {
        let binder = Binder::new().with_delimiter(":");
        assert_eq!(binder.split("a:b.c"), ["a", "b.c"]);
    }
}
