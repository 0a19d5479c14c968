//! Deferred, composable predicates.
//!
//! A [`Specification<T>`] is a recipe for a predicate over records of type
//! `T`: given the query [`Root`] and a [`CriteriaBuilder`] it yields a
//! [`Predicate`], or nothing when it does not restrict the query at all.
//!
//! # Combination Semantics
//!
//! ```text
//! a AND b = a ∧ b      when both restrict
//!         = a | b      when only one restricts
//!         = nothing    when neither restricts
//! (OR is the same with ∨)
//!
//! NOT a   = ¬a         when a restricts
//!         = false      when a does not restrict
//! ```
//!
//! The free functions [`and`] and [`or`] fold a sequence of optional
//! specifications starting from the unrestricted specification, skipping
//! absent entries. This makes conditional filters a one-liner:
//!
//! ```
//! use specdsl::{and, Entity, Specification};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! fn search(first: Option<&str>, last: Option<&str>) -> Specification<Actor> {
//!     and([
//!         first.map(|f| Actor::FIRST_NAME.equal(f)),
//!         last.map(|l| Actor::LAST_NAME.equal(l)),
//!     ])
//! }
//!
//! assert_eq!(search(None, None).predicate(), None);
//! assert_eq!(
//!     search(Some("Tom"), None).predicate().unwrap().to_string(),
//!     "first_name = 'Tom'"
//! );
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use crate::criteria::CriteriaBuilder;
use crate::path::Root;
use crate::predicate::Predicate;

type SpecFn<T> = dyn Fn(&Root<T>, &CriteriaBuilder) -> Option<Predicate> + Send + Sync;

/// A deferred predicate over records of type `T`.
pub struct Specification<T> {
    inner: Arc<SpecFn<T>>,
}

impl<T: 'static> Specification<T> {
    /// Creates a specification from a closure building a predicate.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Root<T>, &CriteriaBuilder) -> Predicate + Send + Sync + 'static,
    {
        Specification::from_optional_fn(move |root, cb| Some(f(root, cb)))
    }

    /// Creates a specification from a closure that may decline to restrict.
    pub fn from_optional_fn<F>(f: F) -> Self
    where
        F: Fn(&Root<T>, &CriteriaBuilder) -> Option<Predicate> + Send + Sync + 'static,
    {
        Specification { inner: Arc::new(f) }
    }

    /// The specification that does not restrict the query.
    pub fn unrestricted() -> Self {
        Specification::from_optional_fn(|_, _| None)
    }

    /// Builds the predicate, or `None` if this specification does not
    /// restrict the query.
    pub fn to_predicate(&self, root: &Root<T>, cb: &CriteriaBuilder) -> Option<Predicate> {
        (self.inner)(root, cb)
    }

    /// Builds the predicate against a fresh root and builder.
    pub fn predicate(&self) -> Option<Predicate> {
        self.to_predicate(&Root::new(), &CriteriaBuilder::new())
    }

    /// Both specifications must hold.
    pub fn and(self, other: Specification<T>) -> Self {
        Specification::composed(self, other, |cb, l, r| cb.and([l, r]))
    }

    /// At least one specification must hold.
    pub fn or(self, other: Specification<T>) -> Self {
        Specification::composed(self, other, |cb, l, r| cb.or([l, r]))
    }

    /// The complement of this specification.
    ///
    /// The complement of a specification that does not restrict is the
    /// disjunction, matching nothing.
    pub fn negate(self) -> Self {
        Specification::from_fn(move |root, cb| match self.to_predicate(root, cb) {
            Some(predicate) => cb.not(predicate),
            None => cb.disjunction(),
        })
    }

    fn composed(
        lhs: Specification<T>,
        rhs: Specification<T>,
        combiner: fn(&CriteriaBuilder, Predicate, Predicate) -> Predicate,
    ) -> Self {
        Specification::from_optional_fn(move |root, cb| {
            match (lhs.to_predicate(root, cb), rhs.to_predicate(root, cb)) {
                (Some(l), Some(r)) => Some(combiner(cb, l, r)),
                (l, None) => l,
                (None, r) => r,
            }
        })
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Specification {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Specification<T> {
    fn default() -> Self {
        Specification::unrestricted()
    }
}

impl<T: 'static> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.predicate() {
            Some(predicate) => write!(f, "Specification({predicate})"),
            None => f.write_str("Specification(unrestricted)"),
        }
    }
}

impl<T: 'static> BitAnd for Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Specification<T>) -> Specification<T> {
        self.and(rhs)
    }
}

impl<T: 'static> BitOr for Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Specification<T>) -> Specification<T> {
        self.or(rhs)
    }
}

impl<T: 'static> Not for Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Specification<T> {
        self.negate()
    }
}

/// Creates a specification from a closure building a predicate.
pub fn where_fn<T: 'static, F>(f: F) -> Specification<T>
where
    F: Fn(&Root<T>, &CriteriaBuilder) -> Predicate + Send + Sync + 'static,
{
    Specification::from_fn(f)
}

/// The specification that does not restrict the query.
pub fn empty_specification<T: 'static>() -> Specification<T> {
    Specification::unrestricted()
}

/// Folds the present specifications with AND.
///
/// Absent entries are skipped. No present entries yields the unrestricted
/// specification.
pub fn and<T, S>(specs: impl IntoIterator<Item = S>) -> Specification<T>
where
    T: 'static,
    S: Into<Option<Specification<T>>>,
{
    combine(specs, Specification::and)
}

/// Folds the present specifications with OR.
///
/// Absent entries are skipped. No present entries yields the unrestricted
/// specification (not the disjunction), so an empty OR matches everything.
pub fn or<T, S>(specs: impl IntoIterator<Item = S>) -> Specification<T>
where
    T: 'static,
    S: Into<Option<Specification<T>>>,
{
    combine(specs, Specification::or)
}

/// Folds the present specifications with `operation`, starting from the
/// unrestricted specification.
pub fn combine<T, S>(
    specs: impl IntoIterator<Item = S>,
    operation: impl Fn(Specification<T>, Specification<T>) -> Specification<T>,
) -> Specification<T>
where
    T: 'static,
    S: Into<Option<Specification<T>>>,
{
    specs
        .into_iter()
        .filter_map(Into::<Option<Specification<T>>>::into)
        .fold(Specification::unrestricted(), operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    struct Actor;

    const FIRST_NAME: Field<Actor, String> = Field::new("first_name");
    const LAST_NAME: Field<Actor, String> = Field::new("last_name");
    const BIRTH_YEAR: Field<Actor, Option<u16>> = Field::new("birth_year");

    fn first(name: &'static str) -> Specification<Actor> {
        where_fn(move |root, cb| cb.equal(&root.get(FIRST_NAME), name))
    }

    fn rendered(spec: &Specification<Actor>) -> String {
        spec.predicate()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    }

    #[test]
    fn unrestricted_has_no_predicate() {
        assert_eq!(empty_specification::<Actor>().predicate(), None);
        assert_eq!(Specification::<Actor>::default().predicate(), None);
    }

    #[test]
    fn composition_skips_unrestricted_side() {
        let spec = first("Tom").and(Specification::unrestricted());
        assert_eq!(rendered(&spec), "first_name = 'Tom'");

        let spec = Specification::unrestricted().or(first("Tom"));
        assert_eq!(rendered(&spec), "first_name = 'Tom'");

        let spec = Specification::<Actor>::unrestricted() & Specification::unrestricted();
        assert_eq!(spec.predicate(), None);
    }

    #[test]
    fn operators_combine() {
        let spec = first("Tom") | first("Sean");
        assert_eq!(rendered(&spec), "(first_name = 'Tom' or first_name = 'Sean')");

        let spec = first("Tom") & !first("Sean");
        assert_eq!(
            rendered(&spec),
            "(first_name = 'Tom' and not (first_name = 'Sean'))"
        );
    }

    #[test]
    fn negating_unrestricted_matches_nothing() {
        let spec = !Specification::<Actor>::unrestricted();
        assert_eq!(spec.predicate(), Some(Predicate::disjunction()));
    }

    #[test]
    fn fold_skips_absent_entries() {
        let spec = and([Some(first("Tom")), None, Some(first("Sean"))]);
        assert_eq!(
            rendered(&spec),
            "(first_name = 'Tom' and first_name = 'Sean')"
        );

        let spec = or([None, Some(first("Tom"))]);
        assert_eq!(rendered(&spec), "first_name = 'Tom'");
    }

    #[test]
    fn empty_folds_are_unrestricted() {
        assert_eq!(and(Vec::<Specification<Actor>>::new()).predicate(), None);
        assert_eq!(or(Vec::<Specification<Actor>>::new()).predicate(), None);
        assert_eq!(
            or([None::<Specification<Actor>>, None]).predicate(),
            None
        );
    }

    #[test]
    fn three_way_and_flattens() {
        let spec = and([
            first("Tom"),
            where_fn(|root, cb| cb.like(&root.get(LAST_NAME), "H%")),
            where_fn(|root, cb| cb.less_than(&root.get(BIRTH_YEAR), 1960u16)),
        ]);
        assert_eq!(
            rendered(&spec),
            "(first_name = 'Tom' and last_name like 'H%' and birth_year < 1960)"
        );
    }

    #[test]
    fn clone_shares_recipe() {
        let spec = first("Tom");
        let copy = spec.clone();
        assert_eq!(spec.predicate(), copy.predicate());
        assert_eq!(
            format!("{copy:?}"),
            "Specification(first_name = 'Tom')"
        );
    }
}
