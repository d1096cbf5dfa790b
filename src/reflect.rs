//! Runtime shape information for bindable types.
//!
//! Structs opt in with `#[derive(Record)]`. The derive emits a static
//! [`Field`] table and index based member access; everything else in the
//! crate walks values through [`Reflect`] alone.

use bitflags::bitflags;

use crate::{NamingStrategy, Value};

bitflags! {
    /// Per-member flags set by `#[bind(...)]` attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u32 {
        /// The member is anonymous; its fields are promoted into the parent.
        const EMBEDDED = 1 << 0;
        /// The member may be read but not assigned.
        const READONLY = 1 << 1;
    }
}

/// Static description of one record member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Declared member name.
    pub name: &'static str,
    /// External tag, if any.
    pub tag: Option<&'static str>,
    /// Attribute flags.
    pub flags: FieldFlags,
}

impl Field {
    /// The tag when present, otherwise the member name.
    pub fn tag_name(&self) -> &'static str {
        self.tag.unwrap_or(self.name)
    }

    /// The name this member answers to under `naming`.
    pub fn name_for(&self, naming: NamingStrategy) -> &'static str {
        match naming {
            NamingStrategy::ByTag => self.tag_name(),
            NamingStrategy::ByMemberName => self.name,
        }
    }

    /// Whether the member is embedded.
    pub fn is_embedded(&self) -> bool {
        self.flags.contains(FieldFlags::EMBEDDED)
    }

    /// Whether the member is read-only.
    pub fn is_readonly(&self) -> bool {
        self.flags.contains(FieldFlags::READONLY)
    }
}

/// A struct with a static, ordered member table.
///
/// Usually implemented through `#[derive(Record)]`.
pub trait Record {
    /// Member descriptions in declaration order.
    fn fields(&self) -> &'static [Field];

    /// The member at `index` in [`Record::fields`].
    fn field(&self, index: usize) -> Option<&dyn Reflect>;

    /// Mutable access to the member at `index` in [`Record::fields`].
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// A value whose shape can be inspected at runtime.
pub trait Reflect {
    /// Name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Borrow the value as one of the shapes the binder understands.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Mutably borrow the value as one of the shapes the binder understands.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

/// Shared view of a reflected value.
pub enum ReflectRef<'a> {
    /// A nested record.
    Record(&'a dyn Record),
    /// An optional indirection; `None` when absent.
    Reference(Option<&'a dyn Reflect>),
    /// A dynamically typed value.
    Dynamic(&'a Value),
    /// A scalar or list.
    Leaf(&'a dyn Leaf),
}

/// Exclusive view of a reflected value.
pub enum ReflectMut<'a> {
    /// A nested record.
    Record(&'a mut dyn Record),
    /// An optional indirection; `None` when absent.
    Reference(Option<&'a mut dyn Reflect>),
    /// A dynamically typed value.
    Dynamic(&'a mut Value),
    /// A scalar or list.
    Leaf(&'a mut dyn Leaf),
}

/// Kind of a leaf slot, used to pick a coercion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LeafKind {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
    /// `Vec<String>`
    StringList,
    /// `Vec<Value>`
    ValueList,
    /// A type that can be rendered but not assigned from text.
    Other(&'static str),
}

impl LeafKind {
    /// Whether this is one of the integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            LeafKind::I8
                | LeafKind::I16
                | LeafKind::I32
                | LeafKind::I64
                | LeafKind::Isize
                | LeafKind::U8
                | LeafKind::U16
                | LeafKind::U32
                | LeafKind::U64
                | LeafKind::Usize
        )
    }

    /// Whether this is one of the float kinds.
    pub fn is_float(self) -> bool {
        matches!(self, LeafKind::F32 | LeafKind::F64)
    }

    /// Type name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            LeafKind::Bool => "bool",
            LeafKind::I8 => "i8",
            LeafKind::I16 => "i16",
            LeafKind::I32 => "i32",
            LeafKind::I64 => "i64",
            LeafKind::Isize => "isize",
            LeafKind::U8 => "u8",
            LeafKind::U16 => "u16",
            LeafKind::U32 => "u32",
            LeafKind::U64 => "u64",
            LeafKind::Usize => "usize",
            LeafKind::F32 => "f32",
            LeafKind::F64 => "f64",
            LeafKind::String => "String",
            LeafKind::StringList => "Vec<String>",
            LeafKind::ValueList => "Vec<Value>",
            LeafKind::Other(name) => name,
        }
    }
}

/// A terminal slot: scalar, string or list.
pub trait Leaf {
    /// Which coercion rule applies to this slot.
    fn kind(&self) -> LeafKind;

    /// The current contents as a dynamic value.
    fn to_value(&self) -> Value;

    /// The current contents in text form.
    fn render(&self) -> String;

    /// Store an already coerced value. Hands the value back when its variant
    /// does not fit the slot.
    fn assign(&mut self, value: Value) -> Result<(), Value>;
}

macro_rules! leaf_reflect {
    ($ty:ty) => {
        impl Reflect for $ty {
            fn type_name(&self) -> &'static str {
                core::any::type_name::<$ty>()
            }

            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Leaf(self)
            }

            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Leaf(self)
            }
        }
    };
}

macro_rules! int_leaf {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> LeafKind {
                    LeafKind::$kind
                }

                #[allow(clippy::useless_conversion)]
                fn to_value(&self) -> Value {
                    i64::try_from(*self)
                        .map(Value::Int)
                        .unwrap_or_else(|_| Value::Float(*self as f64))
                }

                fn render(&self) -> String {
                    self.to_string()
                }

                #[allow(clippy::unnecessary_cast)]
                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    match value {
                        Value::Int(n) => {
                            let (min, max) = (<$ty>::MIN as i128, <$ty>::MAX as i128);
                            *self = i128::from(n).clamp(min, max) as $ty
                        }
                        Value::Float(x) => *self = x as $ty,
                        other => return Err(other),
                    }
                    Ok(())
                }
            }

            leaf_reflect!($ty);
        )*
    };
}

int_leaf! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

macro_rules! float_leaf {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> LeafKind {
                    LeafKind::$kind
                }

                #[allow(clippy::unnecessary_cast)]
                fn to_value(&self) -> Value {
                    Value::Float(*self as f64)
                }

                fn render(&self) -> String {
                    self.to_string()
                }

                #[allow(clippy::unnecessary_cast)]
                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    match value {
                        Value::Float(x) => *self = x as $ty,
                        Value::Int(n) => *self = n as $ty,
                        other => return Err(other),
                    }
                    Ok(())
                }
            }

            leaf_reflect!($ty);
        )*
    };
}

float_leaf! {
    f32 => F32,
    f64 => F64,
}

impl Leaf for bool {
    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            other => Err(other),
        }
    }
}

leaf_reflect!(bool);

impl Leaf for String {
    fn kind(&self) -> LeafKind {
        LeafKind::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::String(s) => {
                *self = s;
                Ok(())
            }
            other => Err(other),
        }
    }
}

leaf_reflect!(String);

impl Leaf for Vec<String> {
    fn kind(&self) -> LeafKind {
        LeafKind::StringList
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Value::from).collect())
    }

    fn render(&self) -> String {
        self.to_value().to_text()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        let Value::List(items) = value else {
            return Err(value);
        };
        if !items.iter().all(|item| matches!(item, Value::String(_))) {
            return Err(Value::List(items));
        }
        *self = items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        Ok(())
    }
}

leaf_reflect!(Vec<String>);

impl Leaf for Vec<Value> {
    fn kind(&self) -> LeafKind {
        LeafKind::ValueList
    }

    fn to_value(&self) -> Value {
        Value::List(self.clone())
    }

    fn render(&self) -> String {
        self.to_value().to_text()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::List(items) => {
                *self = items;
                Ok(())
            }
            other => Err(other),
        }
    }
}

leaf_reflect!(Vec<Value>);

// Renderable but never assignable.
macro_rules! opaque_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> LeafKind {
                    LeafKind::Other(core::any::type_name::<$ty>())
                }

                fn to_value(&self) -> Value {
                    Value::String(self.to_string())
                }

                fn render(&self) -> String {
                    self.to_string()
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    Err(value)
                }
            }

            leaf_reflect!($ty);
        )*
    };
}

opaque_leaf!(char, i128, u128);

impl Reflect for Value {
    fn type_name(&self) -> &'static str {
        "flatbind::Value"
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Dynamic(self)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Reference(self.as_ref().map(|inner| inner as &dyn Reflect))
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Reference(self.as_mut().map(|inner| inner as &mut dyn Reflect))
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        (**self).reflect_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_assignment_truncates_and_saturates() {
        let mut n = 0i32;
        n.assign(Value::Float(-2.7)).unwrap();
        assert_eq!(n, -2);

        let mut small = 0u8;
        small.assign(Value::Int(300)).unwrap();
        assert_eq!(small, u8::MAX);
        small.assign(Value::Int(-1)).unwrap();
        assert_eq!(small, 0);

        let mut wide = 0u64;
        wide.assign(Value::Float(1e19)).unwrap();
        assert_eq!(wide, 10_000_000_000_000_000_000);
        wide.assign(Value::Float(1e30)).unwrap();
        assert_eq!(wide, u64::MAX);
    }

    #[test]
    fn wide_unsigned_values_read_as_floats() {
        assert_eq!(u64::MAX.to_value(), Value::Float(u64::MAX as f64));
        assert_eq!((i64::MAX as u64).to_value(), Value::Int(i64::MAX));
        assert_eq!(i64::MIN.to_value(), Value::Int(i64::MIN));
    }

    #[test]
    fn mismatched_variant_is_handed_back() {
        let mut flag = false;
        let rejected = flag.assign(Value::from("true")).unwrap_err();
        assert_eq!(rejected, Value::from("true"));
        assert!(!flag);
    }

    #[test]
    fn string_list_rejects_mixed_items() {
        let mut list = vec!["keep".to_owned()];
        let mixed = Value::List(vec![Value::from("a"), Value::Int(1)]);
        assert!(list.assign(mixed).is_err());
        assert_eq!(list, vec!["keep".to_owned()]);
    }

    #[test]
    fn option_is_a_reference() {
        let absent: Option<i32> = None;
        assert!(matches!(absent.reflect_ref(), ReflectRef::Reference(None)));

        let present = Some(5i32);
        let ReflectRef::Reference(Some(inner)) = present.reflect_ref() else {
            panic!("expected a present reference");
        };
        let ReflectRef::Leaf(leaf) = inner.reflect_ref() else {
            panic!("expected a leaf");
        };
        assert_eq!(leaf.render(), "5");
    }

    #[test]
    fn opaque_leaves_render_but_refuse_assignment() {
        let mut c = 'x';
        assert_eq!(c.kind(), LeafKind::Other("char"));
        assert_eq!(c.render(), "x");
        assert!(c.assign(Value::from("y")).is_err());
    }
}
