//! The predicate tree produced by the [`CriteriaBuilder`](crate::CriteriaBuilder).
//!
//! A [`Predicate`] is an immutable boolean condition over one record. It is
//! plain data: executors interpret it, and `Display` renders it as a
//! JPQL-like expression for logs and error messages.

use std::fmt;

use crate::literal::Literal;
use crate::op::Op;
use crate::path::PathExpr;

/// A boolean condition over a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All operands hold. Empty = always true.
    Conjunction(Vec<Predicate>),
    /// At least one operand holds. Empty = always false.
    Disjunction(Vec<Predicate>),
    /// Logical complement.
    Not(Box<Predicate>),
    /// Attribute compared with a literal.
    Compare {
        path: PathExpr,
        op: Op,
        value: Literal,
    },
    /// Attribute compared with another attribute.
    CompareTo {
        path: PathExpr,
        op: Op,
        other: PathExpr,
    },
    /// Attribute within an inclusive range.
    Between {
        path: PathExpr,
        low: Literal,
        high: Literal,
    },
    /// Attribute equal to one of the values. Never built with no values.
    In { path: PathExpr, values: Vec<Literal> },
    /// Attribute is null.
    IsNull(PathExpr),
    /// Attribute is not null.
    IsNotNull(PathExpr),
    /// Boolean attribute is true.
    IsTrue(PathExpr),
    /// Boolean attribute is false.
    IsFalse(PathExpr),
    /// String attribute matches a LIKE pattern.
    Like {
        path: PathExpr,
        pattern: String,
        escape: Option<char>,
    },
    /// Collection attribute has no elements.
    IsEmpty(PathExpr),
    /// Collection attribute has at least one element.
    IsNotEmpty(PathExpr),
    /// Collection attribute contains the element.
    IsMember { path: PathExpr, element: Literal },
}

impl Predicate {
    /// The predicate that matches every record.
    pub fn conjunction() -> Self {
        Predicate::Conjunction(Vec::new())
    }

    /// The predicate that matches no record.
    pub fn disjunction() -> Self {
        Predicate::Disjunction(Vec::new())
    }

    /// Returns `true` for an empty conjunction.
    pub fn is_always_true(&self) -> bool {
        matches!(self, Predicate::Conjunction(ps) if ps.is_empty())
    }

    /// Returns `true` for an empty disjunction.
    pub fn is_always_false(&self) -> bool {
        matches!(self, Predicate::Disjunction(ps) if ps.is_empty())
    }

    /// Returns the logical complement of this predicate.
    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        self.negate()
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], sep: &str) -> fmt::Result {
    if let [single] = parts {
        return write!(f, "{single}");
    }
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{part}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Conjunction(parts) if parts.is_empty() => f.write_str("true"),
            Predicate::Conjunction(parts) => write_joined(f, parts, "and"),
            Predicate::Disjunction(parts) if parts.is_empty() => f.write_str("false"),
            Predicate::Disjunction(parts) => write_joined(f, parts, "or"),
            Predicate::Not(inner) => write!(f, "not ({inner})"),
            Predicate::Compare { path, op, value } => write!(f, "{path} {op} {value}"),
            Predicate::CompareTo { path, op, other } => write!(f, "{path} {op} {other}"),
            Predicate::Between { path, low, high } => {
                write!(f, "{path} between {low} and {high}")
            }
            Predicate::In { path, values } => {
                write!(f, "{path} in (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Predicate::IsNull(path) => write!(f, "{path} is null"),
            Predicate::IsNotNull(path) => write!(f, "{path} is not null"),
            Predicate::IsTrue(path) => write!(f, "{path} is true"),
            Predicate::IsFalse(path) => write!(f, "{path} is false"),
            Predicate::Like {
                path,
                pattern,
                escape,
            } => {
                write!(f, "{path} like {}", Literal::String(pattern.clone()))?;
                match escape {
                    Some(c) => write!(f, " escape '{c}'"),
                    None => Ok(()),
                }
            }
            Predicate::IsEmpty(path) => write!(f, "{path} is empty"),
            Predicate::IsNotEmpty(path) => write!(f, "{path} is not empty"),
            Predicate::IsMember { path, element } => write!(f, "{element} member of {path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &'static str) -> PathExpr {
        PathExpr::root().attribute(name)
    }

    #[test]
    fn identities() {
        assert!(Predicate::conjunction().is_always_true());
        assert!(Predicate::disjunction().is_always_false());
        assert!(!Predicate::IsNull(path("a")).is_always_true());
    }

    #[test]
    fn display_atomic() {
        let p = Predicate::Compare {
            path: path("first_name"),
            op: Op::Eq,
            value: Literal::from("Tom"),
        };
        assert_eq!(p.to_string(), "first_name = 'Tom'");

        let p = Predicate::In {
            path: path("birth_year"),
            values: vec![Literal::from(1930), Literal::from(1964)],
        };
        assert_eq!(p.to_string(), "birth_year in (1930, 1964)");

        let p = Predicate::Like {
            path: path("last_name"),
            pattern: "50!%%".to_string(),
            escape: Some('!'),
        };
        assert_eq!(p.to_string(), "last_name like '50!%%' escape '!'");
    }

    #[test]
    fn display_composite() {
        let p = Predicate::Conjunction(vec![
            Predicate::IsNotNull(path("a")),
            Predicate::Disjunction(vec![
                Predicate::IsTrue(path("b")),
                !Predicate::IsEmpty(path("c")),
            ]),
        ]);
        assert_eq!(
            p.to_string(),
            "(a is not null and (b is true or not (c is empty)))"
        );
        assert_eq!(Predicate::conjunction().to_string(), "true");
        assert_eq!(Predicate::disjunction().to_string(), "false");
    }
}
