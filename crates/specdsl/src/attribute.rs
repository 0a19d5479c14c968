//! Traits mapping declared field types to operand and runtime value types.
//!
//! A field's declared type decides which operators its [`Field`](crate::Field)
//! token offers:
//!
//! | Trait | Implemented for | Unlocks |
//! |-------|-----------------|---------|
//! | [`Attribute`] | scalars and `Option<scalar>` | equality, ordering, membership, like, booleans |
//! | [`Numeric`] | numeric operand types | `lt`, `le`, `gt`, `ge` |
//! | [`CollectionAttribute`] | `Vec<scalar>` | `is_empty`, `is_member` |
//! | [`Relation`] | `Option<E>`, `Box<E>`, `Vec<E>` of entities | joins |
//!
//! [`ToValue`] is the runtime side: it turns a field into the [`Value`]
//! an executor reads.

use crate::field::Entity;
use crate::literal::Literal;
use crate::value::{Number, Timestamp, Value};

/// A scalar attribute type, possibly nullable.
///
/// `Value` is the non-null operand type accepted by predicates on fields of
/// this type, so a field declared `Option<String>` is compared against
/// `String` values.
pub trait Attribute {
    /// Operand type used when comparing against this attribute.
    type Value: Into<Literal>;
}

/// Marker for operand types accepted by the numeric comparison shorthands.
pub trait Numeric {}

/// A collection-valued attribute.
pub trait CollectionAttribute {
    /// Operand type of a single element.
    type Element: Into<Literal>;
}

/// An attribute holding one or more related records.
///
/// Relations are traversed by joins. `Option<E>` and `Box<E>` are to-one,
/// `Vec<E>` is to-many.
pub trait Relation {
    /// The related record type.
    type Target: Entity;

    /// Returns the related record(s) as a runtime value.
    fn related_value(&self) -> Value<'_>;
}

/// Converts a field into the runtime [`Value`] read by executors.
pub trait ToValue {
    /// Returns this field's runtime value.
    fn to_value(&self) -> Value<'_>;
}

/// Helper trait for converting enum types to discriminant values.
///
/// Implement this for an enum and register it with
/// [`impl_enum_attribute!`](crate::impl_enum_attribute) to use it as a field
/// type.
///
/// ```
/// use specdsl::Discriminant;
///
/// #[derive(Clone, Copy)]
/// enum Genre {
///     Drama,
///     Comedy,
/// }
///
/// impl Discriminant for Genre {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Genre::Drama => 0,
///             Genre::Comedy => 1,
///         }
///     }
/// }
///
/// specdsl::impl_enum_attribute!(Genre);
/// ```
pub trait Discriminant {
    /// Returns a stable discriminant for this variant.
    ///
    /// Use explicit values rather than relying on declaration order so
    /// stored queries keep their meaning.
    fn discriminant(&self) -> u32;
}

/// Registers enum types implementing [`Discriminant`] as field types.
///
/// Generates the [`Attribute`], [`ToValue`] and `From<_> for Literal`
/// implementations.
#[macro_export]
macro_rules! impl_enum_attribute {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::Attribute for $t {
                type Value = $t;
            }

            impl ::core::convert::From<$t> for $crate::Literal {
                fn from(value: $t) -> Self {
                    $crate::Literal::Enum($crate::Discriminant::discriminant(&value))
                }
            }

            impl $crate::ToValue for $t {
                fn to_value(&self) -> $crate::Value<'_> {
                    $crate::Value::Enum($crate::Discriminant::discriminant(self))
                }
            }
        )+
    };
}

macro_rules! scalar_attribute {
    ($($t:ty),*) => {
        $(
            impl Attribute for $t {
                type Value = $t;
            }
        )*
    };
}

scalar_attribute!(
    String, bool, Timestamp, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);

macro_rules! numeric {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {}

            impl ToValue for $t {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<A: Attribute> Attribute for Option<A> {
    type Value = A::Value;
}

impl<A: Attribute> CollectionAttribute for Vec<A> {
    type Element = A::Value;
}

impl<E: Entity> Relation for Option<E> {
    type Target = E;

    fn related_value(&self) -> Value<'_> {
        match self {
            Some(related) => Value::Entity(related),
            None => Value::None,
        }
    }
}

impl<E: Entity> Relation for Box<E> {
    type Target = E;

    fn related_value(&self) -> Value<'_> {
        Value::Entity(&**self)
    }
}

impl<E: Entity> Relation for Vec<E> {
    type Target = E;

    fn related_value(&self) -> Value<'_> {
        Value::List(self.iter().map(|related| Value::Entity(related)).collect())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl<V: ToValue + ?Sized> ToValue for &V {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<V: ToValue> ToValue for Option<V> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

impl<V: ToValue> ToValue for Vec<V> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Genre {
        Drama,
        Comedy,
    }

    impl Discriminant for Genre {
        fn discriminant(&self) -> u32 {
            match self {
                Genre::Drama => 10,
                Genre::Comedy => 20,
            }
        }
    }

    crate::impl_enum_attribute!(Genre);

    struct Studio;

    impl Entity for Studio {
        fn field_value(&self, _field: &str) -> Value<'_> {
            Value::None
        }
    }

    fn operand<A: Attribute>(value: A::Value) -> Literal {
        value.into()
    }

    #[test]
    fn nullable_attribute_compares_against_inner_type() {
        assert_eq!(
            operand::<Option<String>>("1930".to_string()),
            Literal::String("1930".to_string())
        );
        assert_eq!(operand::<Option<u16>>(7), Literal::Number(Number::U64(7)));
    }

    #[test]
    fn enum_attribute_uses_discriminant() {
        assert_eq!(operand::<Genre>(Genre::Comedy), Literal::Enum(20));
        assert_eq!(Genre::Drama.to_value(), Value::Enum(10));
        assert_eq!(Some(Genre::Comedy).to_value(), Value::Enum(20));
    }

    #[test]
    fn to_value_for_containers() {
        let year: Option<u16> = None;
        assert_eq!(year.to_value(), Value::None);

        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            tags.to_value(),
            Value::List(vec![Value::String("a"), Value::String("b")])
        );
    }

    #[test]
    fn relations_expose_entities() {
        let none: Option<Studio> = None;
        assert!(none.related_value().is_none());
        assert!(Some(Studio).related_value().is_entity());
        assert!(Box::new(Studio).related_value().is_entity());

        match vec![Studio, Studio].related_value() {
            Value::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }
}
