//! Writing flat map entries into records.

use crate::{
    BindErrorKind, NamingStrategy, Reflect, ReflectMut, Result, Value, coerce::coerce,
    path::has_escape_prefix, resolve::resolve_mut,
};

/// Resolve `segments` under `dest` and store `value` there.
pub(crate) fn write_entry(
    dest: &mut dyn Reflect,
    segments: &[&str],
    value: Value,
    naming: NamingStrategy,
) -> Result<()> {
    let last = segments.last().copied().unwrap_or_default();
    let slot = resolve_mut(dest, segments, naming)?;
    assign(slot, value, last)
}

fn assign(slot: &mut dyn Reflect, value: Value, name: &str) -> Result<()> {
    let type_name = slot.type_name();
    match slot.reflect_mut() {
        ReflectMut::Leaf(leaf) => {
            let coerced = coerce(value, leaf.kind())?;
            leaf.assign(coerced).map_err(|rejected| {
                log::debug!("`{name}` rejected a {} value", rejected.kind_name());
                BindErrorKind::UnsupportedType(type_name).into()
            })
        }
        ReflectMut::Dynamic(slot) => {
            *slot = value;
            Ok(())
        }
        ReflectMut::Reference(Some(inner)) => {
            let type_name = inner.type_name();
            match inner.reflect_mut() {
                ReflectMut::Leaf(leaf) => {
                    let coerced = coerce(value, leaf.kind())?;
                    leaf.assign(coerced)
                        .map_err(|_| BindErrorKind::UnsupportedType(type_name).into())
                }
                ReflectMut::Dynamic(slot) => {
                    *slot = value;
                    Ok(())
                }
                _ => Err(BindErrorKind::UnsupportedType(type_name).into()),
            }
        }
        ReflectMut::Reference(None) => {
            log::debug!("`{name}` is an absent reference");
            Err(BindErrorKind::Unwritable(name.to_owned()).into())
        }
        ReflectMut::Record(_) => Err(BindErrorKind::UnsupportedType(type_name).into()),
    }
}

/// Populate `dest` from string entries, keeping only keys under `escape`.
///
/// Keys are split on `delimiter`. Entries that do not start with the escape
/// prefix are skipped; the prefix is removed from the rest. Stops at the
/// first failing entry, keeping earlier writes.
pub(crate) fn populate_escaped<I, K, V>(
    dest: &mut dyn Reflect,
    source: I,
    escape: &str,
    delimiter: &str,
    naming: NamingStrategy,
) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    log::trace!("Entering `populate_escaped` with escape prefix {escape:?}");

    let escape: Vec<&str> = if escape.is_empty() {
        Vec::new()
    } else {
        crate::split_path(escape, delimiter)
    };

    for (key, text) in source {
        let key = key.as_ref();
        let segments = crate::split_path(key, delimiter);
        if !has_escape_prefix(&segments, &escape) {
            log::debug!("Skipping `{key}`: outside escape prefix");
            continue;
        }
        write_entry(
            dest,
            &segments[escape.len()..],
            Value::String(text.as_ref().to_owned()),
            naming,
        )?;
    }

    Ok(())
}

/// Populate `dest` from dynamic entries whose first segment is allow-listed.
///
/// Every key is checked before anything is written, so a rejected key leaves
/// `dest` untouched.
pub(crate) fn populate_allowed<I>(
    dest: &mut dyn Reflect,
    source: I,
    allow_list: &[&str],
    delimiter: &str,
    naming: NamingStrategy,
) -> Result<()>
where
    I: IntoIterator<Item = (String, Value)>,
{
    log::trace!("Entering `populate_allowed` with allow-list {allow_list:?}");

    if allow_list.is_empty() {
        return Err(BindErrorKind::NoAccessKeys.into());
    }

    let entries: Vec<(String, Value)> = source.into_iter().collect();

    for (key, _) in &entries {
        let first = crate::split_path(key, delimiter)
            .first()
            .copied()
            .unwrap_or_default();
        if !allow_list.contains(&first) {
            log::debug!("Rejecting `{key}`: `{first}` is not allow-listed");
            return Err(BindErrorKind::AccessDenied(first.to_owned()).into());
        }
    }

    for (key, value) in entries {
        let segments = crate::split_path(&key, delimiter);
        write_entry(dest, &segments, value, naming)?;
    }

    Ok(())
}
