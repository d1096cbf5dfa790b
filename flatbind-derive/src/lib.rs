//! Derive macro for the `flatbind::Record` trait.
//!
//! The macro generates a static field table and index-based field access so
//! that `flatbind` can walk a struct without runtime introspection.
//!
//! ```ignore
//! use flatbind::Record;
//!
//! #[derive(Record, Default)]
//! struct Server {
//!     #[bind(tag = "host_name")]
//!     host: String,
//!     port: u16,
//!     #[bind(embed)]
//!     limits: Limits,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod codegen;
mod parse;

/// Derive `flatbind::Record` (and `flatbind::Reflect`) for a struct with named fields.
///
/// # Field attributes
///
/// - `#[bind(tag = "name")]`: external name used by tag-based resolution and flattening
/// - `#[bind(embed)]`: promote the member's fields into the parent namespace
/// - `#[bind(readonly)]`: the member can be read and flattened but never assigned
/// - `#[bind(skip)]`: the member is invisible to flatbind (its type needs no `Reflect` impl)
#[proc_macro_derive(Record, attributes(bind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
