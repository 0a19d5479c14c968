//! Typed field tokens and the record access trait.
//!
//! A [`Field<T, R>`] names one attribute of record type `T` whose declared
//! type is `R`. It is the compile-time checked stand-in for a string field
//! name: the only way to get one for a record is the associated constant
//! generated by `#[derive(Entity)]` (or a hand-written `Field::new`), so a
//! query cannot mention a field the record does not have.

use std::fmt;
use std::marker::PhantomData;

use crate::value::Value;

/// Trait for records that can be queried.
///
/// This trait is typically derived using `#[derive(Entity)]`, which also
/// generates one [`Field`] constant per queryable field.
///
/// # Derive Usage
///
/// ```
/// use specdsl::{Entity, Field};
///
/// #[derive(Entity)]
/// struct Actor {
///     first_name: String,
///     birth_year: Option<u16>,
/// }
///
/// let field: Field<Actor, Option<u16>> = Actor::BIRTH_YEAR;
/// assert_eq!(field.name(), "birth_year");
/// ```
///
/// # Manual Implementation
///
/// ```
/// use specdsl::{Entity, Field, ToValue, Value};
///
/// struct Actor {
///     first_name: String,
/// }
///
/// impl Actor {
///     const FIRST_NAME: Field<Actor, String> = Field::new("first_name");
/// }
///
/// impl Entity for Actor {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "first_name" => self.first_name.to_value(),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Entity {
    /// Returns the value of a field for predicate evaluation and sorting.
    ///
    /// Unknown fields return [`Value::None`].
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl<E: Entity + ?Sized> Entity for Box<E> {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl<E: Entity + ?Sized> Entity for &E {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

/// A compile-time reference to attribute `name` of record type `T`,
/// declared with Rust type `R`.
///
/// `R` keeps the declared type, including `Option` for nullable attributes,
/// `Vec` for collections and the related record type for relations. The
/// operators available on a field are chosen from `R` through the
/// [`Attribute`](crate::Attribute), [`CollectionAttribute`](crate::CollectionAttribute)
/// and [`Relation`](crate::Relation) traits.
pub struct Field<T, R> {
    name: &'static str,
    _marker: PhantomData<fn(&T) -> R>,
}

impl<T, R> Field<T, R> {
    /// Creates a field token for the attribute with the given name.
    pub const fn new(name: &'static str) -> Self {
        Field {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the attribute name used in paths and sort orders.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, R> Clone for Field<T, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, R> Copy for Field<T, R> {}

impl<T, R> PartialEq for Field<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T, R> Eq for Field<T, R> {}

impl<T, R> fmt::Debug for Field<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

impl<T, R> fmt::Display for Field<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
