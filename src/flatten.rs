//! Rendering records back into flat string maps.

use std::collections::BTreeMap;

use crate::{
    LeafKind, Map, NamingStrategy, Record, Reflect, ReflectRef, Value, resolve::record_ref,
};

/// How list leaves are rendered by flatten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    /// JSON array text, e.g. `["a","b"]`. Parsed back by populate.
    #[default]
    Json,
    /// Space separated quoted items, e.g. `["a" "b"]`. Output only.
    Quoted,
}

impl ListFormat {
    fn render(self, items: &[Value]) -> String {
        match self {
            ListFormat::Json => Value::List(items.to_vec()).to_text(),
            ListFormat::Quoted => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => format!("{s:?}"),
                        other => other.to_text(),
                    })
                    .collect();
                format!("[{}]", items.join(" "))
            }
        }
    }
}

pub(crate) struct Flattener<'d> {
    pub delimiter: &'d str,
    pub naming: NamingStrategy,
    pub list_format: ListFormat,
}

impl Flattener<'_> {
    /// Flatten `value`, which must be a record or a present reference to one.
    ///
    /// # Panics
    ///
    /// Panics on anything else, including an absent reference.
    pub fn flatten(&self, value: &dyn Reflect) -> BTreeMap<String, String> {
        log::trace!("Entering `flatten` for {}", value.type_name());

        let Some(record) = record_ref(value) else {
            panic!(
                "flatten only accepts records or references to records; got {}",
                value.type_name()
            );
        };

        let mut out = BTreeMap::new();
        self.walk_record(record, None, &mut out);
        out
    }

    fn join(&self, prefix: Option<&str>, name: &str) -> String {
        match prefix {
            Some(prefix) => format!("{prefix}{}{name}", self.delimiter),
            None => name.to_owned(),
        }
    }

    fn walk_record(
        &self,
        record: &dyn Record,
        prefix: Option<&str>,
        out: &mut BTreeMap<String, String>,
    ) {
        for (index, field) in record.fields().iter().enumerate() {
            let Some(member) = record.field(index) else {
                continue;
            };

            if field.is_embedded() {
                if let Some(inner) = record_ref(member) {
                    self.walk_record(inner, prefix, out);
                    continue;
                }
            }

            let key = self.join(prefix, field.name_for(self.naming));
            self.walk_member(member, key, out);
        }
    }

    fn walk_member(&self, member: &dyn Reflect, key: String, out: &mut BTreeMap<String, String>) {
        match member.reflect_ref() {
            ReflectRef::Record(record) => self.walk_record(record, Some(&key), out),
            ReflectRef::Reference(None) => {}
            ReflectRef::Reference(Some(inner)) => self.walk_member(inner, key, out),
            ReflectRef::Dynamic(value) => self.walk_value(value, key, out),
            ReflectRef::Leaf(leaf) => {
                let text = match leaf.kind() {
                    LeafKind::StringList | LeafKind::ValueList => match leaf.to_value() {
                        Value::List(items) => self.list_format.render(&items),
                        other => other.to_text(),
                    },
                    kind @ (LeafKind::F32 | LeafKind::F64 | LeafKind::Other(_)) => {
                        log::warn!("Flattening `{key}` of type {} as text", kind.name());
                        leaf.render()
                    }
                    _ => leaf.render(),
                };
                out.insert(key, text);
            }
        }
    }

    fn walk_value(&self, value: &Value, key: String, out: &mut BTreeMap<String, String>) {
        match value {
            Value::Null => {}
            Value::Map(map) => {
                for (name, inner) in map {
                    self.walk_value(inner, self.join(Some(&key), name), out);
                }
            }
            Value::List(items) => {
                out.insert(key, self.list_format.render(items));
            }
            scalar => {
                out.insert(key, scalar.to_text());
            }
        }
    }
}

/// Convert `record` into a nested [`Value::Map`], keyed by `naming`.
///
/// Embedded members are merged into their parent; absent references become
/// [`Value::Null`].
pub(crate) fn record_to_value(record: &dyn Record, naming: NamingStrategy) -> Value {
    let mut map = Map::new();
    merge_record(record, naming, &mut map);
    Value::Map(map)
}

fn merge_record(record: &dyn Record, naming: NamingStrategy, map: &mut Map) {
    for (index, field) in record.fields().iter().enumerate() {
        let Some(member) = record.field(index) else {
            continue;
        };
        if field.is_embedded() {
            if let Some(inner) = record_ref(member) {
                merge_record(inner, naming, map);
                continue;
            }
        }
        map.insert(
            field.name_for(naming).to_owned(),
            reflect_to_value(member, naming),
        );
    }
}

pub(crate) fn reflect_to_value(value: &dyn Reflect, naming: NamingStrategy) -> Value {
    match value.reflect_ref() {
        ReflectRef::Record(record) => record_to_value(record, naming),
        ReflectRef::Reference(None) => Value::Null,
        ReflectRef::Reference(Some(inner)) => reflect_to_value(inner, naming),
        ReflectRef::Dynamic(value) => value.clone(),
        ReflectRef::Leaf(leaf) => leaf.to_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_lists_escape_strings() {
        let items = vec![Value::from("a"), Value::from("say \"hi\""), Value::Int(3)];
        assert_eq!(
            ListFormat::Quoted.render(&items),
            r#"["a" "say \"hi\"" 3]"#
        );
        assert_eq!(
            ListFormat::Json.render(&items),
            r#"["a","say \"hi\"",3]"#
        );
    }

    #[test]
    fn empty_lists() {
        assert_eq!(ListFormat::Quoted.render(&[]), "[]");
        assert_eq!(ListFormat::Json.render(&[]), "[]");
    }
}
