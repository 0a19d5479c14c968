//! Owned operand values stored inside predicates.

use std::fmt;

use crate::value::{Number, Timestamp, Value};

/// Owned value for storage in a predicate.
///
/// Unlike [`Value`], which borrows from a record, `Literal` owns its data
/// so it can live inside a [`Specification`](crate::Specification) that
/// outlives the values the caller passed in.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
}

impl Literal {
    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Number(_) => "number",
            Literal::Timestamp(_) => "timestamp",
            Literal::Enum(_) => "enum",
            Literal::Bool(_) => "bool",
        }
    }

    /// Borrows this literal as a runtime [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Literal::String(s) => Value::String(s),
            Literal::Number(n) => Value::Number(*n),
            Literal::Timestamp(t) => Value::Timestamp(*t),
            Literal::Enum(d) => Value::Enum(*d),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Timestamp(t) => write!(f, "{{ts {}}}", t.as_millis()),
            Literal::Enum(d) => write!(f, "#{d}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Literal::Number(n)
    }
}

impl From<Timestamp> for Literal {
    fn from(t: Timestamp) -> Self {
        Literal::Timestamp(t)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

macro_rules! literal_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Literal {
                fn from(n: $t) -> Self {
                    Literal::Number(Number::from(n))
                }
            }
        )*
    };
}

literal_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_conversions() {
        assert_eq!(Literal::from("tom"), Literal::String("tom".to_string()));
        assert_eq!(Literal::from(1930u16), Literal::Number(Number::U64(1930)));
        assert_eq!(Literal::from(-3i8), Literal::Number(Number::I64(-3)));
        assert_eq!(Literal::from(true), Literal::Bool(true));
        assert_eq!(
            Literal::from(Timestamp(5)),
            Literal::Timestamp(Timestamp(5))
        );
    }

    #[test]
    fn literal_display_quotes_strings() {
        assert_eq!(Literal::from("O'Hara").to_string(), "'O''Hara'");
        assert_eq!(Literal::from(42i32).to_string(), "42");
        assert_eq!(Literal::Enum(3).to_string(), "#3");
    }

    #[test]
    fn literal_as_value() {
        let lit = Literal::from("abc");
        assert_eq!(lit.as_value(), Value::String("abc"));
        assert_eq!(Literal::from(false).as_value(), Value::Bool(false));
    }
}
