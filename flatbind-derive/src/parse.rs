//! Attribute parsing for the `Record` derive.

use darling::{FromDeriveInput, FromField, ast};
use syn::{Generics, Ident};

/// Parsed struct-level input.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(bind), supports(struct_named))]
pub struct RecordInput {
    pub ident: Ident,
    pub generics: Generics,
    pub data: ast::Data<(), FieldInput>,
}

impl RecordInput {
    /// Fields that take part in binding, in declaration order.
    pub fn bound_fields(&self) -> Vec<&FieldInput> {
        self.data
            .as_ref()
            .take_struct()
            .map(|s| s.fields.into_iter().filter(|f| !f.skip).collect())
            .unwrap_or_default()
    }
}

/// Parsed `#[bind(...)]` field options.
#[derive(Debug, FromField)]
#[darling(attributes(bind))]
pub struct FieldInput {
    pub ident: Option<Ident>,

    /// External name, used instead of the member name by tag-based lookups.
    #[darling(default)]
    pub tag: Option<String>,

    /// Anonymous member whose fields are promoted into the parent.
    #[darling(default)]
    pub embed: bool,

    /// Member that may be read but not assigned.
    #[darling(default)]
    pub readonly: bool,

    #[darling(default)]
    pub skip: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn parses_field_options() {
        let input: syn::DeriveInput = parse_quote! {
            struct Settings {
                #[bind(tag = "field0")]
                flag: bool,
                #[bind(embed)]
                base: Base,
                #[bind(readonly)]
                secret: String,
                #[bind(skip)]
                cache: Vec<u8>,
            }
        };

        let parsed = RecordInput::from_derive_input(&input).unwrap();
        let fields = parsed.bound_fields();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].tag.as_deref(), Some("field0"));
        assert!(fields[1].embed);
        assert!(fields[2].readonly);
    }

    #[test]
    fn rejects_tuple_structs() {
        let input: syn::DeriveInput = parse_quote! {
            struct Pair(u8, u8);
        };

        assert!(RecordInput::from_derive_input(&input).is_err());
    }
}
