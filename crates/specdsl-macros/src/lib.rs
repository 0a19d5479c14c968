//! Proc macros for Specdsl.
//!
//! # Available Macros
//!
//! - [`Entity`] - Generate typed field tokens and the record accessor

mod entity;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Entity` trait and one field token per field.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom attribute name in paths and sorts |
/// | `relation` | The field holds related entities (`Option<E>`, `Box<E>`, `Vec<E>`) and can be joined |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field constants typed by the declared field type (e.g.,
///    `Actor::BIRTH_YEAR: Field<Actor, Option<u16>>`)
/// 2. Implementation of `Entity::field_value()`, reading scalar fields
///    through `ToValue` and relation fields through `Relation`
///
/// # Example
///
/// ```ignore
/// use specdsl::{Entity, Repository, SpecificationExecutor};
///
/// #[derive(Entity)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Entity)]
/// struct Actor {
///     first_name: String,
///
///     #[field(rename = "born")]
///     birth_year: Option<u16>,
///
///     #[field(relation)]
///     address: Option<Address>,
///
///     #[field(skip)]
///     cache: Vec<u8>,
/// }
///
/// let spec = Actor::BORN.lt(1950u16);
/// let city = specdsl::where_fn(|root, cb| {
///     cb.equal(&root.join(Actor::ADDRESS).get(Address::CITY), "Oslo")
/// });
/// ```
///
/// # Enum Fields
///
/// Enum fields need `Discriminant` and `impl_enum_attribute!`:
///
/// ```ignore
/// use specdsl::Discriminant;
///
/// #[derive(Clone, Copy)]
/// enum Status { Pending, Done }
///
/// impl Discriminant for Status {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Status::Pending => 0,
///             Status::Done => 1,
///         }
///     }
/// }
///
/// specdsl::impl_enum_attribute!(Status);
/// ```
#[proc_macro_derive(Entity, attributes(field))]
pub fn entity_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::entity_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
