//! Specification shorthands on field tokens.
//!
//! Every method here wraps one [`CriteriaBuilder`] operator into a
//! [`Specification`] over the field's record type, so filters can be written
//! without spelling out the root and builder:
//!
//! ```
//! use specdsl::{Entity, Specification};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     first_name: String,
//!     birth_year: Option<u16>,
//! }
//!
//! let spec: Specification<Actor> =
//!     Actor::FIRST_NAME.equal("Tom") & Actor::BIRTH_YEAR.lt(1960u16);
//! assert_eq!(
//!     spec.predicate().unwrap().to_string(),
//!     "(first_name = 'Tom' and birth_year < 1960)"
//! );
//! ```
//!
//! Operand values are converted to literals when the specification is
//! created, not each time it is evaluated.

use crate::attribute::{Attribute, CollectionAttribute, Numeric};
use crate::criteria::{literal, CriteriaBuilder};
use crate::field::Field;
use crate::literal::Literal;
use crate::op::Op;
use crate::path::Path;
use crate::predicate::Predicate;
use crate::specification::Specification;

impl<T: 'static, R: 'static> Field<T, R> {
    fn spec<F>(self, build: F) -> Specification<T>
    where
        F: Fn(&CriteriaBuilder, &Path<R>) -> Predicate + Send + Sync + 'static,
    {
        Specification::from_fn(move |root, cb| build(cb, &root.get(self)))
    }

    fn compare_spec(self, op: Op, value: Literal) -> Specification<T> {
        self.spec(move |cb, path| cb.compare(path, op, value.clone()))
    }

    /// Records where the field is null.
    pub fn is_null(self) -> Specification<T> {
        self.spec(|cb, path| cb.is_null(path))
    }

    /// Records where the field is not null.
    pub fn is_not_null(self) -> Specification<T> {
        self.spec(|cb, path| cb.is_not_null(path))
    }
}

impl<T: 'static, R: Attribute + 'static> Field<T, R> {
    /// Records where the field equals `value`.
    pub fn equal(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Eq, literal::<R>(value))
    }

    /// Records where the field differs from `value`.
    pub fn not_equal(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Ne, literal::<R>(value))
    }

    /// Records where the field equals one of `values`.
    ///
    /// An empty `values` gives the unrestricted specification.
    pub fn is_in<V: Into<R::Value>>(self, values: impl IntoIterator<Item = V>) -> Specification<T> {
        let values: Vec<Literal> = values.into_iter().map(literal::<R>).collect();
        if values.is_empty() {
            return Specification::unrestricted();
        }
        self.spec(move |cb, path| cb.in_list(path, values.clone()))
    }

    /// Records where the field equals none of `values`.
    ///
    /// An empty `values` also gives the unrestricted specification, so this
    /// is not the complement of [`is_in`](Self::is_in) in that case.
    pub fn is_not_in<V: Into<R::Value>>(
        self,
        values: impl IntoIterator<Item = V>,
    ) -> Specification<T> {
        let values: Vec<Literal> = values.into_iter().map(literal::<R>).collect();
        if values.is_empty() {
            return Specification::unrestricted();
        }
        self.spec(move |cb, path| cb.not(cb.in_list(path, values.clone())))
    }
}

impl<T: 'static, R> Field<T, R>
where
    R: Attribute + 'static,
    R::Value: PartialOrd,
{
    /// Records where the field is less than `value`.
    pub fn less_than(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Lt, literal::<R>(value))
    }

    /// Records where the field is at most `value`.
    pub fn less_than_or_equal_to(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Le, literal::<R>(value))
    }

    /// Records where the field is greater than `value`.
    pub fn greater_than(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Gt, literal::<R>(value))
    }

    /// Records where the field is at least `value`.
    pub fn greater_than_or_equal_to(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Ge, literal::<R>(value))
    }

    /// Records where the field lies between `low` and `high`, inclusive.
    pub fn between(self, low: impl Into<R::Value>, high: impl Into<R::Value>) -> Specification<T> {
        let (low, high) = (literal::<R>(low), literal::<R>(high));
        self.spec(move |cb, path| cb.between_literals(path, low.clone(), high.clone()))
    }
}

impl<T: 'static, R> Field<T, R>
where
    R: Attribute + 'static,
    R::Value: Numeric,
{
    /// Numeric `<`.
    pub fn lt(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Lt, literal::<R>(value))
    }

    /// Numeric `<=`.
    pub fn le(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Le, literal::<R>(value))
    }

    /// Numeric `>`.
    pub fn gt(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Gt, literal::<R>(value))
    }

    /// Numeric `>=`.
    pub fn ge(self, value: impl Into<R::Value>) -> Specification<T> {
        self.compare_spec(Op::Ge, literal::<R>(value))
    }
}

impl<T: 'static, R: Attribute<Value = bool> + 'static> Field<T, R> {
    /// Records where the flag is set.
    pub fn is_true(self) -> Specification<T> {
        self.spec(|cb, path| cb.is_true(path))
    }

    /// Records where the flag is cleared.
    pub fn is_false(self) -> Specification<T> {
        self.spec(|cb, path| cb.is_false(path))
    }
}

impl<T: 'static, R: Attribute<Value = String> + 'static> Field<T, R> {
    /// Records where the field matches a LIKE pattern.
    pub fn like(self, pattern: impl Into<String>) -> Specification<T> {
        let pattern = pattern.into();
        self.spec(move |cb, path| cb.like(path, pattern.as_str()))
    }

    /// Records where the field matches a LIKE pattern using `escape_char`.
    pub fn like_escaped(self, pattern: impl Into<String>, escape_char: char) -> Specification<T> {
        let pattern = pattern.into();
        self.spec(move |cb, path| cb.like_escaped(path, pattern.as_str(), escape_char))
    }

    /// Records where the field does not match a LIKE pattern.
    pub fn not_like(self, pattern: impl Into<String>) -> Specification<T> {
        let pattern = pattern.into();
        self.spec(move |cb, path| cb.not_like(path, pattern.as_str()))
    }

    /// Records where the field does not match a LIKE pattern using
    /// `escape_char`.
    pub fn not_like_escaped(
        self,
        pattern: impl Into<String>,
        escape_char: char,
    ) -> Specification<T> {
        let pattern = pattern.into();
        self.spec(move |cb, path| cb.not_like_escaped(path, pattern.as_str(), escape_char))
    }
}

impl<T: 'static, R: CollectionAttribute + 'static> Field<T, R> {
    /// Records whose collection has no elements.
    pub fn is_empty(self) -> Specification<T> {
        self.spec(|cb, path| cb.is_empty(path))
    }

    /// Records whose collection has at least one element.
    pub fn is_not_empty(self) -> Specification<T> {
        self.spec(|cb, path| cb.is_not_empty(path))
    }

    /// Records whose collection contains `element`.
    pub fn is_member(self, element: impl Into<R::Element>) -> Specification<T> {
        let element: R::Element = element.into();
        let element: Literal = element.into();
        self.spec(move |cb, path| cb.member_of(path, element.clone()))
    }

    /// Records whose collection does not contain `element`.
    pub fn is_not_member(self, element: impl Into<R::Element>) -> Specification<T> {
        let element: R::Element = element.into();
        let element: Literal = element.into();
        self.spec(move |cb, path| cb.not(cb.member_of(path, element.clone())))
    }
}
