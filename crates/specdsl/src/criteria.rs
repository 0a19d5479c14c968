//! Atomic predicate construction.
//!
//! [`CriteriaBuilder`] is the explicit context every predicate is built
//! through. Each method is pure: it takes a typed [`Path`] plus operands and
//! returns one [`Predicate`]. The operand types are checked against the
//! path's declared type at compile time, so a `Path<Option<u16>>` only
//! accepts `u16` operands and `like` only exists for string paths.
//!
//! The same operators are also available on [`Path`] itself, taking the
//! builder as an argument:
//!
//! ```
//! use specdsl::{CriteriaBuilder, Entity, Root};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     last_name: String,
//!     birth_year: Option<u16>,
//! }
//!
//! let cb = CriteriaBuilder::new();
//! let root = Root::<Actor>::new();
//!
//! let predicate = cb.and([
//!     root.get(Actor::LAST_NAME).like(&cb, "C%"),
//!     cb.less_than(&root.get(Actor::BIRTH_YEAR), 1950u16),
//! ]);
//! assert_eq!(
//!     predicate.to_string(),
//!     "(last_name like 'C%' and birth_year < 1950)"
//! );
//! ```

use crate::attribute::{Attribute, CollectionAttribute, Numeric};
use crate::literal::Literal;
use crate::op::Op;
use crate::path::Path;
use crate::predicate::Predicate;

pub(crate) fn literal<R: Attribute>(value: impl Into<R::Value>) -> Literal {
    let value: R::Value = value.into();
    value.into()
}

/// Explicit context for building predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaBuilder {
    _private: (),
}

impl CriteriaBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        CriteriaBuilder::default()
    }

    // ========================================================================
    // Combination
    // ========================================================================

    /// The predicate that matches every record.
    pub fn conjunction(&self) -> Predicate {
        Predicate::conjunction()
    }

    /// The predicate that matches no record.
    pub fn disjunction(&self) -> Predicate {
        Predicate::disjunction()
    }

    /// Combines predicates with AND. No predicates yields the conjunction.
    ///
    /// Nested conjunctions are flattened.
    pub fn and(&self, predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        let mut parts = Vec::new();
        for predicate in predicates {
            match predicate {
                Predicate::Conjunction(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        Predicate::Conjunction(parts)
    }

    /// Combines predicates with OR. No predicates yields the disjunction.
    ///
    /// Nested disjunctions are flattened.
    pub fn or(&self, predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        let mut parts = Vec::new();
        for predicate in predicates {
            match predicate {
                Predicate::Disjunction(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        Predicate::Disjunction(parts)
    }

    /// Negates a predicate.
    pub fn not(&self, predicate: Predicate) -> Predicate {
        predicate.negate()
    }

    /// Combines the present predicates with AND, skipping absent ones.
    pub fn and_not_null(
        &self,
        predicates: impl IntoIterator<Item = Option<Predicate>>,
    ) -> Predicate {
        self.and(predicates.into_iter().flatten())
    }

    /// Combines the present predicates with OR, skipping absent ones.
    ///
    /// With nothing present this is the disjunction, like [`or`](Self::or).
    pub fn or_not_null(
        &self,
        predicates: impl IntoIterator<Item = Option<Predicate>>,
    ) -> Predicate {
        self.or(predicates.into_iter().flatten())
    }

    // ========================================================================
    // Equality
    // ========================================================================

    /// `path = value`
    pub fn equal<R: Attribute>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate {
        self.compare(path, Op::Eq, literal::<R>(value))
    }

    /// `path <> value`
    pub fn not_equal<R: Attribute>(
        &self,
        path: &Path<R>,
        value: impl Into<R::Value>,
    ) -> Predicate {
        self.compare(path, Op::Ne, literal::<R>(value))
    }

    /// `path = other`
    pub fn equal_to<R, S>(&self, path: &Path<R>, other: &Path<S>) -> Predicate
    where
        R: Attribute,
        S: Attribute<Value = R::Value>,
    {
        self.compare_to(path, Op::Eq, other)
    }

    /// `path <> other`
    pub fn not_equal_to<R, S>(&self, path: &Path<R>, other: &Path<S>) -> Predicate
    where
        R: Attribute,
        S: Attribute<Value = R::Value>,
    {
        self.compare_to(path, Op::Ne, other)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// `path < value`
    pub fn less_than<R>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate
    where
        R: Attribute,
        R::Value: PartialOrd,
    {
        self.compare(path, Op::Lt, literal::<R>(value))
    }

    /// `path <= value`
    pub fn less_than_or_equal_to<R>(
        &self,
        path: &Path<R>,
        value: impl Into<R::Value>,
    ) -> Predicate
    where
        R: Attribute,
        R::Value: PartialOrd,
    {
        self.compare(path, Op::Le, literal::<R>(value))
    }

    /// `path > value`
    pub fn greater_than<R>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate
    where
        R: Attribute,
        R::Value: PartialOrd,
    {
        self.compare(path, Op::Gt, literal::<R>(value))
    }

    /// `path >= value`
    pub fn greater_than_or_equal_to<R>(
        &self,
        path: &Path<R>,
        value: impl Into<R::Value>,
    ) -> Predicate
    where
        R: Attribute,
        R::Value: PartialOrd,
    {
        self.compare(path, Op::Ge, literal::<R>(value))
    }

    /// `path between low and high`, both bounds inclusive.
    pub fn between<R>(
        &self,
        path: &Path<R>,
        low: impl Into<R::Value>,
        high: impl Into<R::Value>,
    ) -> Predicate
    where
        R: Attribute,
        R::Value: PartialOrd,
    {
        self.between_literals(path, literal::<R>(low), literal::<R>(high))
    }

    /// Numeric `path < value`.
    pub fn lt<R>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate
    where
        R: Attribute,
        R::Value: Numeric,
    {
        self.compare(path, Op::Lt, literal::<R>(value))
    }

    /// Numeric `path <= value`.
    pub fn le<R>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate
    where
        R: Attribute,
        R::Value: Numeric,
    {
        self.compare(path, Op::Le, literal::<R>(value))
    }

    /// Numeric `path > value`.
    pub fn gt<R>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate
    where
        R: Attribute,
        R::Value: Numeric,
    {
        self.compare(path, Op::Gt, literal::<R>(value))
    }

    /// Numeric `path >= value`.
    pub fn ge<R>(&self, path: &Path<R>, value: impl Into<R::Value>) -> Predicate
    where
        R: Attribute,
        R::Value: Numeric,
    {
        self.compare(path, Op::Ge, literal::<R>(value))
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// `path in (values...)`.
    ///
    /// With no values this returns the conjunction instead: an empty `in`
    /// list can never match, which is never what a caller filtering by
    /// "any of these" wants.
    pub fn is_in<R, V>(&self, path: &Path<R>, values: impl IntoIterator<Item = V>) -> Predicate
    where
        R: Attribute,
        V: Into<R::Value>,
    {
        self.in_list(path, values.into_iter().map(literal::<R>).collect())
    }

    /// `path not in (values...)`.
    ///
    /// With no values this also returns the conjunction, so `is_in` and
    /// `is_not_in` are not complements for an empty list.
    pub fn is_not_in<R, V>(
        &self,
        path: &Path<R>,
        values: impl IntoIterator<Item = V>,
    ) -> Predicate
    where
        R: Attribute,
        V: Into<R::Value>,
    {
        match self.is_in(path, values) {
            p if p.is_always_true() => p,
            p => p.negate(),
        }
    }

    // ========================================================================
    // Nulls and booleans
    // ========================================================================

    /// `path is null`
    pub fn is_null<R>(&self, path: &Path<R>) -> Predicate {
        Predicate::IsNull(path.expr().clone())
    }

    /// `path is not null`
    pub fn is_not_null<R>(&self, path: &Path<R>) -> Predicate {
        Predicate::IsNotNull(path.expr().clone())
    }

    /// `path is true`
    pub fn is_true<R: Attribute<Value = bool>>(&self, path: &Path<R>) -> Predicate {
        Predicate::IsTrue(path.expr().clone())
    }

    /// `path is false`
    pub fn is_false<R: Attribute<Value = bool>>(&self, path: &Path<R>) -> Predicate {
        Predicate::IsFalse(path.expr().clone())
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// `path like pattern`
    ///
    /// The pattern is passed through untouched; `%` and `_` are interpreted
    /// by the executor.
    pub fn like<R: Attribute<Value = String>>(
        &self,
        path: &Path<R>,
        pattern: impl Into<String>,
    ) -> Predicate {
        Predicate::Like {
            path: path.expr().clone(),
            pattern: pattern.into(),
            escape: None,
        }
    }

    /// `path like pattern escape escape_char`
    pub fn like_escaped<R: Attribute<Value = String>>(
        &self,
        path: &Path<R>,
        pattern: impl Into<String>,
        escape_char: char,
    ) -> Predicate {
        Predicate::Like {
            path: path.expr().clone(),
            pattern: pattern.into(),
            escape: Some(escape_char),
        }
    }

    /// `path not like pattern`
    pub fn not_like<R: Attribute<Value = String>>(
        &self,
        path: &Path<R>,
        pattern: impl Into<String>,
    ) -> Predicate {
        self.like(path, pattern).negate()
    }

    /// `path not like pattern escape escape_char`
    pub fn not_like_escaped<R: Attribute<Value = String>>(
        &self,
        path: &Path<R>,
        pattern: impl Into<String>,
        escape_char: char,
    ) -> Predicate {
        self.like_escaped(path, pattern, escape_char).negate()
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// `path is empty`
    pub fn is_empty<R: CollectionAttribute>(&self, path: &Path<R>) -> Predicate {
        Predicate::IsEmpty(path.expr().clone())
    }

    /// `path is not empty`
    pub fn is_not_empty<R: CollectionAttribute>(&self, path: &Path<R>) -> Predicate {
        Predicate::IsNotEmpty(path.expr().clone())
    }

    /// `element member of path`
    pub fn is_member<R: CollectionAttribute>(
        &self,
        element: impl Into<R::Element>,
        path: &Path<R>,
    ) -> Predicate {
        let element: R::Element = element.into();
        self.member_of(path, element.into())
    }

    /// `element not member of path`
    pub fn is_not_member<R: CollectionAttribute>(
        &self,
        element: impl Into<R::Element>,
        path: &Path<R>,
    ) -> Predicate {
        self.is_member(element, path).negate()
    }

    pub(crate) fn in_list<R>(&self, path: &Path<R>, values: Vec<Literal>) -> Predicate {
        if values.is_empty() {
            return self.conjunction();
        }
        Predicate::In {
            path: path.expr().clone(),
            values,
        }
    }

    pub(crate) fn between_literals<R>(&self, path: &Path<R>, low: Literal, high: Literal) -> Predicate {
        Predicate::Between {
            path: path.expr().clone(),
            low,
            high,
        }
    }

    pub(crate) fn member_of<R>(&self, path: &Path<R>, element: Literal) -> Predicate {
        Predicate::IsMember {
            path: path.expr().clone(),
            element,
        }
    }

    pub(crate) fn compare<R>(&self, path: &Path<R>, op: Op, value: Literal) -> Predicate {
        Predicate::Compare {
            path: path.expr().clone(),
            op,
            value,
        }
    }

    fn compare_to<R, S>(&self, path: &Path<R>, op: Op, other: &Path<S>) -> Predicate {
        Predicate::CompareTo {
            path: path.expr().clone(),
            op,
            other: other.expr().clone(),
        }
    }
}

// ============================================================================
// Path-first operators
// ============================================================================

impl<R: Attribute> Path<R> {
    /// `self = value`
    pub fn equal(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.equal(self, value)
    }

    /// `self = other`
    pub fn equal_to<S>(&self, cb: &CriteriaBuilder, other: &Path<S>) -> Predicate
    where
        S: Attribute<Value = R::Value>,
    {
        cb.equal_to(self, other)
    }

    /// `self <> value`
    pub fn not_equal(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.not_equal(self, value)
    }

    /// `self <> other`
    pub fn not_equal_to<S>(&self, cb: &CriteriaBuilder, other: &Path<S>) -> Predicate
    where
        S: Attribute<Value = R::Value>,
    {
        cb.not_equal_to(self, other)
    }

    /// `self in (values...)`, the conjunction when `values` is empty.
    pub fn is_in<V: Into<R::Value>>(
        &self,
        cb: &CriteriaBuilder,
        values: impl IntoIterator<Item = V>,
    ) -> Predicate {
        cb.is_in(self, values)
    }

    /// `self not in (values...)`, the conjunction when `values` is empty.
    pub fn is_not_in<V: Into<R::Value>>(
        &self,
        cb: &CriteriaBuilder,
        values: impl IntoIterator<Item = V>,
    ) -> Predicate {
        cb.is_not_in(self, values)
    }
}

impl<R> Path<R>
where
    R: Attribute,
    R::Value: PartialOrd,
{
    /// `self < value`
    pub fn less_than(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.less_than(self, value)
    }

    /// `self <= value`
    pub fn less_than_or_equal_to(
        &self,
        cb: &CriteriaBuilder,
        value: impl Into<R::Value>,
    ) -> Predicate {
        cb.less_than_or_equal_to(self, value)
    }

    /// `self > value`
    pub fn greater_than(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.greater_than(self, value)
    }

    /// `self >= value`
    pub fn greater_than_or_equal_to(
        &self,
        cb: &CriteriaBuilder,
        value: impl Into<R::Value>,
    ) -> Predicate {
        cb.greater_than_or_equal_to(self, value)
    }

    /// `self between low and high`
    pub fn between(
        &self,
        cb: &CriteriaBuilder,
        low: impl Into<R::Value>,
        high: impl Into<R::Value>,
    ) -> Predicate {
        cb.between(self, low, high)
    }
}

impl<R> Path<R>
where
    R: Attribute,
    R::Value: Numeric,
{
    /// Numeric `self < value`.
    pub fn lt(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.lt(self, value)
    }

    /// Numeric `self <= value`.
    pub fn le(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.le(self, value)
    }

    /// Numeric `self > value`.
    pub fn gt(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.gt(self, value)
    }

    /// Numeric `self >= value`.
    pub fn ge(&self, cb: &CriteriaBuilder, value: impl Into<R::Value>) -> Predicate {
        cb.ge(self, value)
    }
}

impl<R: Attribute<Value = bool>> Path<R> {
    /// `self is true`
    pub fn is_true(&self, cb: &CriteriaBuilder) -> Predicate {
        cb.is_true(self)
    }

    /// `self is false`
    pub fn is_false(&self, cb: &CriteriaBuilder) -> Predicate {
        cb.is_false(self)
    }
}

impl<R: Attribute<Value = String>> Path<R> {
    /// `self like pattern`
    pub fn like(&self, cb: &CriteriaBuilder, pattern: impl Into<String>) -> Predicate {
        cb.like(self, pattern)
    }

    /// `self like pattern escape escape_char`
    pub fn like_escaped(
        &self,
        cb: &CriteriaBuilder,
        pattern: impl Into<String>,
        escape_char: char,
    ) -> Predicate {
        cb.like_escaped(self, pattern, escape_char)
    }

    /// `self not like pattern`
    pub fn not_like(&self, cb: &CriteriaBuilder, pattern: impl Into<String>) -> Predicate {
        cb.not_like(self, pattern)
    }

    /// `self not like pattern escape escape_char`
    pub fn not_like_escaped(
        &self,
        cb: &CriteriaBuilder,
        pattern: impl Into<String>,
        escape_char: char,
    ) -> Predicate {
        cb.not_like_escaped(self, pattern, escape_char)
    }
}

impl<R> Path<R> {
    /// `self is null`
    pub fn is_null(&self, cb: &CriteriaBuilder) -> Predicate {
        cb.is_null(self)
    }

    /// `self is not null`
    pub fn is_not_null(&self, cb: &CriteriaBuilder) -> Predicate {
        cb.is_not_null(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::path::Root;

    struct Actor;

    const FIRST_NAME: Field<Actor, String> = Field::new("first_name");
    const LAST_NAME: Field<Actor, String> = Field::new("last_name");
    const BIRTH_YEAR: Field<Actor, Option<u16>> = Field::new("birth_year");
    const RETIRED: Field<Actor, bool> = Field::new("retired");
    const NICKNAMES: Field<Actor, Vec<String>> = Field::new("nicknames");

    #[test]
    fn empty_combinations_use_identities() {
        let cb = CriteriaBuilder::new();
        assert!(cb.and(Vec::new()).is_always_true());
        assert!(cb.or(Vec::new()).is_always_false());
        assert!(cb.and_not_null([None, None]).is_always_true());
        assert!(cb.or_not_null([None]).is_always_false());
    }

    #[test]
    fn not_null_combinators_skip_absent() {
        let cb = CriteriaBuilder::new();
        let root = Root::<Actor>::new();
        let tom = cb.equal(&root.get(FIRST_NAME), "Tom");

        let p = cb.and_not_null([None, Some(tom.clone()), None]);
        assert_eq!(p, Predicate::Conjunction(vec![tom.clone()]));

        let p = cb.or_not_null([Some(tom.clone()), None]);
        assert_eq!(p, Predicate::Disjunction(vec![tom]));
    }

    #[test]
    fn and_flattens_nested_conjunctions() {
        let cb = CriteriaBuilder::new();
        let root = Root::<Actor>::new();
        let a = cb.is_null(&root.get(BIRTH_YEAR));
        let b = cb.is_true(&root.get(RETIRED));
        let c = cb.like(&root.get(LAST_NAME), "%s");

        let nested = cb.and([cb.and([a.clone(), b.clone()]), c.clone()]);
        assert_eq!(nested, Predicate::Conjunction(vec![a, b, c]));
    }

    #[test]
    fn empty_membership_degrades_to_conjunction() {
        let cb = CriteriaBuilder::new();
        let path = Root::<Actor>::new().get(FIRST_NAME);

        assert!(cb.is_in(&path, Vec::<String>::new()).is_always_true());
        assert!(cb.is_not_in(&path, Vec::<&str>::new()).is_always_true());
    }

    #[test]
    fn membership_with_values() {
        let cb = CriteriaBuilder::new();
        let path = Root::<Actor>::new().get(BIRTH_YEAR);

        let p = cb.is_in(&path, [1930u16, 1964]);
        assert_eq!(p.to_string(), "birth_year in (1930, 1964)");

        let p = cb.is_not_in(&path, [1930u16]);
        assert_eq!(p.to_string(), "not (birth_year in (1930))");
    }

    #[test]
    fn operand_types_follow_declared_type() {
        let cb = CriteriaBuilder::new();
        let root = Root::<Actor>::new();

        assert_eq!(
            cb.between(&root.get(BIRTH_YEAR), 1930u16, 1950u16).to_string(),
            "birth_year between 1930 and 1950"
        );
        assert_eq!(
            cb.ge(&root.get(BIRTH_YEAR), 1930u16).to_string(),
            "birth_year >= 1930"
        );
        assert_eq!(
            cb.not_equal_to(&root.get(FIRST_NAME), &root.get(LAST_NAME))
                .to_string(),
            "first_name <> last_name"
        );
    }

    #[test]
    fn string_and_collection_operators() {
        let cb = CriteriaBuilder::new();
        let root = Root::<Actor>::new();

        assert_eq!(
            cb.not_like_escaped(&root.get(LAST_NAME), "a\\_%", '\\')
                .to_string(),
            "not (last_name like 'a\\_%' escape '\\')"
        );
        assert_eq!(
            cb.is_member("Duke", &root.get(NICKNAMES)).to_string(),
            "'Duke' member of nicknames"
        );
        assert_eq!(
            cb.is_not_empty(&root.get(NICKNAMES)).to_string(),
            "nicknames is not empty"
        );
    }

    #[test]
    fn path_first_operators_match_builder() {
        let cb = CriteriaBuilder::new();
        let root = Root::<Actor>::new();
        let year = root.get(BIRTH_YEAR);

        assert_eq!(year.lt(&cb, 1950u16), cb.lt(&year, 1950u16));
        assert_eq!(year.is_not_null(&cb), cb.is_not_null(&year));
        assert_eq!(
            root.get(RETIRED).is_false(&cb),
            cb.is_false(&root.get(RETIRED))
        );
        assert_eq!(
            root.get(FIRST_NAME).is_in(&cb, ["Tom"]),
            cb.is_in(&root.get(FIRST_NAME), ["Tom"])
        );
    }
}
