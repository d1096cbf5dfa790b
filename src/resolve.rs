//! Field resolution: turning path segments into a member slot.
//!
//! Resolution happens in two passes. [`plan`] walks the record immutably and
//! records, for every segment, the member indices that lead to it (more than
//! one index when the member is found inside embedded records). The mutable
//! walk then replays those indices, so it never has to search while holding a
//! mutable borrow.

use crate::{BindErrorKind, Field, Record, Reflect, ReflectMut, ReflectRef, Result};

/// How a path segment is matched against a record member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// Match the member's tag, falling back to its declared name.
    #[default]
    ByTag,
    /// Match the member's declared name only.
    ByMemberName,
}

/// Member indices leading to every segment of a path.
#[derive(Debug)]
pub(crate) struct Resolution {
    routes: Vec<Vec<usize>>,
    field: &'static Field,
}

/// View `value` as a record, dereferencing at most one present reference.
pub(crate) fn record_ref(value: &dyn Reflect) -> Option<&dyn Record> {
    match value.reflect_ref() {
        ReflectRef::Record(record) => Some(record),
        ReflectRef::Reference(Some(inner)) => match inner.reflect_ref() {
            ReflectRef::Record(record) => Some(record),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn record_mut(value: &mut dyn Reflect) -> Option<&mut dyn Record> {
    match value.reflect_mut() {
        ReflectMut::Record(record) => Some(record),
        ReflectMut::Reference(Some(inner)) => match inner.reflect_mut() {
            ReflectMut::Record(record) => Some(record),
            _ => None,
        },
        _ => None,
    }
}

/// Find the member named `segment`.
///
/// Members are visited in declaration order; an embedded record is searched
/// depth-first at the point where it is declared. The first match wins.
pub(crate) fn locate(
    record: &dyn Record,
    segment: &str,
    naming: NamingStrategy,
) -> Option<(Vec<usize>, &'static Field)> {
    for (index, field) in record.fields().iter().enumerate() {
        if field.name_for(naming) == segment {
            return Some((vec![index], field));
        }
        if !field.is_embedded() {
            continue;
        }
        let Some(inner) = record.field(index).and_then(record_ref) else {
            continue;
        };
        if let Some((mut route, found)) = locate(inner, segment, naming) {
            route.insert(0, index);
            return Some((route, found));
        }
    }

    None
}

fn member_ref<'a>(record: &'a dyn Record, route: &[usize]) -> Option<&'a dyn Reflect> {
    let (&last, init) = route.split_last()?;
    let mut record = record;
    for &index in init {
        record = record_ref(record.field(index)?)?;
    }
    record.field(last)
}

fn member_mut<'a>(record: &'a mut dyn Record, route: &[usize]) -> Option<&'a mut dyn Reflect> {
    let (&last, init) = route.split_last()?;
    let mut record = record;
    for &index in init {
        record = record_mut(record.field_mut(index)?)?;
    }
    record.field_mut(last)
}

/// Work out which members `segments` address, without touching anything.
pub(crate) fn plan(
    root: &dyn Reflect,
    segments: &[&str],
    naming: NamingStrategy,
) -> Result<Resolution> {
    log::trace!("Entering `plan` for {segments:?}");

    let Some((last, parents)) = segments.split_last() else {
        return Err(BindErrorKind::FieldNotFound(String::new()).into());
    };

    let mut record = record_ref(root)
        .ok_or_else(|| BindErrorKind::InvalidPath(root.type_name().to_owned()))?;
    let mut routes = Vec::with_capacity(segments.len());

    for &segment in parents {
        let (route, _) = locate(record, segment, naming)
            .ok_or_else(|| BindErrorKind::FieldNotFound(segment.to_owned()))?;
        log::trace!("Segment `{segment}` resolved through {route:?}");

        let member = member_ref(record, &route)
            .ok_or_else(|| BindErrorKind::FieldNotFound(segment.to_owned()))?;
        record = record_ref(member).ok_or_else(|| {
            log::debug!("Segment `{segment}` is a {} and not a record", member.type_name());
            BindErrorKind::InvalidPath(segment.to_owned())
        })?;
        routes.push(route);
    }

    let (route, field) = locate(record, last, naming)
        .ok_or_else(|| BindErrorKind::FieldNotFound((*last).to_owned()))?;
    log::trace!("Leaf `{last}` resolved through {route:?}");
    routes.push(route);

    Ok(Resolution { routes, field })
}

/// The member slot `segments` address, for reading.
pub(crate) fn resolve_ref<'a>(
    root: &'a dyn Reflect,
    segments: &[&str],
    naming: NamingStrategy,
) -> Result<&'a dyn Reflect> {
    let resolution = plan(root, segments, naming)?;

    let mut current = root;
    for route in &resolution.routes {
        current = record_ref(current)
            .and_then(|record| member_ref(record, route))
            .ok_or_else(|| BindErrorKind::FieldNotFound(resolution.field.name.to_owned()))?;
    }
    Ok(current)
}

/// The member slot `segments` address, for writing.
///
/// Read-only members fail with [`BindErrorKind::Unwritable`].
pub(crate) fn resolve_mut<'a>(
    root: &'a mut dyn Reflect,
    segments: &[&str],
    naming: NamingStrategy,
) -> Result<&'a mut dyn Reflect> {
    let resolution = plan(&*root, segments, naming)?;
    let last = segments.last().copied().unwrap_or_default();

    if resolution.field.is_readonly() {
        log::debug!("Member `{}` is read-only", resolution.field.name);
        return Err(BindErrorKind::Unwritable(last.to_owned()).into());
    }

    let mut current = root;
    for route in &resolution.routes {
        current = record_mut(current)
            .and_then(|record| member_mut(record, route))
            .ok_or_else(|| BindErrorKind::FieldNotFound(last.to_owned()))?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(crate::Record, Default)]
    struct Inner {
        #[bind(tag = "depth")]
        level: i32,
    }

    #[derive(crate::Record, Default)]
    struct Base {
        shared: bool,
        #[bind(embed)]
        inner: Inner,
    }

    #[derive(crate::Record, Default)]
    struct Outer {
        #[bind(embed)]
        base: Base,
        shared: bool,
        child: Option<Inner>,
        #[bind(readonly)]
        locked: String,
    }

    #[test]
    fn first_match_in_declaration_order_wins() {
        let outer = Outer::default();
        let (route, field) = locate(&outer, "shared", NamingStrategy::ByMemberName).unwrap();
        assert_eq!(route, vec![0, 0]);
        assert_eq!(field.name, "shared");
    }

    #[test]
    fn embedded_search_is_depth_first() {
        let outer = Outer::default();
        let (route, _) = locate(&outer, "depth", NamingStrategy::ByTag).unwrap();
        assert_eq!(route, vec![0, 1, 0]);
        assert!(locate(&outer, "depth", NamingStrategy::ByMemberName).is_none());
        assert!(locate(&outer, "level", NamingStrategy::ByMemberName).is_some());
    }

    #[test]
    fn absent_reference_is_an_invalid_path() {
        let mut outer = Outer::default();
        let err = resolve_mut(&mut outer, &["child", "level"], NamingStrategy::ByMemberName)
            .err()
            .unwrap();
        assert!(matches!(err.kind(), BindErrorKind::InvalidPath(seg) if seg == "child"));
    }

    #[test]
    fn present_reference_is_followed() {
        let mut outer = Outer {
            child: Some(Inner::default()),
            ..Default::default()
        };
        assert!(resolve_mut(&mut outer, &["child", "level"], NamingStrategy::ByMemberName).is_ok());
    }

    #[test]
    fn readonly_member_is_unwritable_but_readable() {
        let mut outer = Outer::default();
        let err = resolve_mut(&mut outer, &["locked"], NamingStrategy::ByMemberName)
            .err()
            .unwrap();
        assert!(matches!(err.kind(), BindErrorKind::Unwritable(_)));
        assert!(resolve_ref(&outer, &["locked"], NamingStrategy::ByMemberName).is_ok());
    }

    #[test]
    fn scalar_in_the_middle_is_an_invalid_path() {
        let outer = Outer::default();
        let err = resolve_ref(&outer, &["shared", "x"], NamingStrategy::ByMemberName)
            .err()
            .unwrap();
        assert!(matches!(err.kind(), BindErrorKind::InvalidPath(seg) if seg == "shared"));
    }
}
