use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, GenericParam, parse_quote};

use crate::parse::{FieldInput, RecordInput};

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let input = RecordInput::from_derive_input(input)?;
    let ident = &input.ident;
    let fields = input.bound_fields();

    let mut generics = input.generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::flatbind::Reflect));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let table = fields.iter().map(|f| field_entry(f));
    let members: Vec<_> = fields.iter().map(|f| f.ident.as_ref()).collect();
    let indices: Vec<usize> = (0..members.len()).collect();

    Ok(quote! {
        impl #impl_generics ::flatbind::Record for #ident #ty_generics #where_clause {
            fn fields(&self) -> &'static [::flatbind::Field] {
                const FIELDS: &[::flatbind::Field] = &[#(#table),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn ::flatbind::Reflect> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#members),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn ::flatbind::Reflect> {
                match index {
                    #(#indices => ::core::option::Option::Some(&mut self.#members),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::flatbind::Reflect for #ident #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                ::core::any::type_name::<Self>()
            }

            fn reflect_ref(&self) -> ::flatbind::ReflectRef<'_> {
                ::flatbind::ReflectRef::Record(self)
            }

            fn reflect_mut(&mut self) -> ::flatbind::ReflectMut<'_> {
                ::flatbind::ReflectMut::Record(self)
            }
        }
    })
}

fn field_entry(field: &FieldInput) -> TokenStream {
    let name = field
        .ident
        .as_ref()
        .map(|ident| ident.to_string().trim_start_matches("r#").to_owned())
        .unwrap_or_default();
    let tag = match &field.tag {
        Some(tag) => quote!(::core::option::Option::Some(#tag)),
        None => quote!(::core::option::Option::None),
    };

    let mut bits = Vec::new();
    if field.embed {
        bits.push(quote!(::flatbind::FieldFlags::EMBEDDED.bits()));
    }
    if field.readonly {
        bits.push(quote!(::flatbind::FieldFlags::READONLY.bits()));
    }

    quote! {
        ::flatbind::Field {
            name: #name,
            tag: #tag,
            flags: ::flatbind::FieldFlags::from_bits_retain(0 #(| #bits)*),
        }
    }
}
