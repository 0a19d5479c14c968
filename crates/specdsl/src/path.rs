//! Query roots, joins and attribute paths.
//!
//! [`Root<T>`] is the starting point for a query over records of type `T`.
//! Getting a field from it yields a typed [`Path<R>`]; joining a relation
//! yields a [`Join<E>`] over the related record type. Every path carries an
//! untyped [`PathExpr`], which is what ends up inside a
//! [`Predicate`](crate::Predicate).

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::attribute::Relation;
use crate::field::Field;

/// How a relation segment of a path is joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    /// Records without a related record are dropped.
    #[default]
    Inner,
    /// Records without a related record are kept; the related attributes
    /// read as null.
    Left,
    /// Related records without an owning record are kept. Seen from the
    /// owning records this drops the ones without a related record, like an
    /// inner join.
    Right,
}

impl JoinType {
    /// Returns the display name of this join type.
    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
        }
    }

    /// Returns `true` if an owning record without a related record is kept.
    pub fn keeps_missing(self) -> bool {
        matches!(self, JoinType::Left)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a path: an attribute name, plus the join used to cross it
/// when it leads to a related record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Attribute name.
    pub name: &'static str,
    /// Join used to traverse this attribute, if it is a relation.
    pub join: Option<JoinType>,
}

/// Untyped attribute path, from the query root to an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathExpr {
    segments: Vec<Segment>,
}

impl PathExpr {
    /// The empty path, denoting the root record itself.
    pub fn root() -> Self {
        PathExpr::default()
    }

    /// Returns a new path extended with an attribute.
    pub fn attribute(&self, name: &'static str) -> Self {
        self.push(Segment { name, join: None })
    }

    /// Returns a new path extended with a joined relation.
    pub fn joined(&self, name: &'static str, join: JoinType) -> Self {
        self.push(Segment {
            name,
            join: Some(join),
        })
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        PathExpr { segments }
    }

    /// Returns the segments of this path, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.name)?;
        }
        Ok(())
    }
}

/// The root of a query over records of type `T`.
pub struct Root<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> Root<T> {
    /// Creates the query root.
    pub fn new() -> Self {
        Root {
            _marker: PhantomData,
        }
    }

    /// Resolves a field of the root record into a path.
    pub fn get<R>(&self, field: Field<T, R>) -> Path<R> {
        Path::from_expr(PathExpr::root().attribute(field.name()))
    }

    /// Joins a relation with inner join semantics.
    pub fn join<R: Relation>(&self, field: Field<T, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Inner)
    }

    /// Joins a relation with inner join semantics.
    pub fn inner_join<R: Relation>(&self, field: Field<T, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Inner)
    }

    /// Joins a relation with left join semantics.
    pub fn left_join<R: Relation>(&self, field: Field<T, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Left)
    }

    /// Joins a relation with right join semantics.
    pub fn right_join<R: Relation>(&self, field: Field<T, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Right)
    }

    /// Joins a relation with the given join type.
    pub fn join_with<R: Relation>(&self, field: Field<T, R>, join: JoinType) -> Join<R::Target> {
        Join::from_expr(PathExpr::root().joined(field.name(), join))
    }
}

impl<T> Default for Root<T> {
    fn default() -> Self {
        Root::new()
    }
}

impl<T> Clone for Root<T> {
    fn clone(&self) -> Self {
        Root::new()
    }
}

impl<T> fmt::Debug for Root<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Root")
    }
}

/// A joined relation whose target records have type `E`.
pub struct Join<E> {
    expr: PathExpr,
    _marker: PhantomData<fn(&E)>,
}

impl<E> Join<E> {
    fn from_expr(expr: PathExpr) -> Self {
        Join {
            expr,
            _marker: PhantomData,
        }
    }

    /// Resolves a field of the joined record into a path.
    pub fn get<R>(&self, field: Field<E, R>) -> Path<R> {
        Path::from_expr(self.expr.attribute(field.name()))
    }

    /// Joins a relation of the joined record with inner join semantics.
    pub fn join<R: Relation>(&self, field: Field<E, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Inner)
    }

    /// Joins a relation of the joined record with inner join semantics.
    pub fn inner_join<R: Relation>(&self, field: Field<E, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Inner)
    }

    /// Joins a relation of the joined record with left join semantics.
    pub fn left_join<R: Relation>(&self, field: Field<E, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Left)
    }

    /// Joins a relation of the joined record with right join semantics.
    pub fn right_join<R: Relation>(&self, field: Field<E, R>) -> Join<R::Target> {
        self.join_with(field, JoinType::Right)
    }

    /// Joins a relation of the joined record with the given join type.
    pub fn join_with<R: Relation>(&self, field: Field<E, R>, join: JoinType) -> Join<R::Target> {
        Join::from_expr(self.expr.joined(field.name(), join))
    }

    /// Returns the untyped path to the joined relation.
    pub fn expr(&self) -> &PathExpr {
        &self.expr
    }
}

impl<E> Clone for Join<E> {
    fn clone(&self) -> Self {
        Join::from_expr(self.expr.clone())
    }
}

impl<E> fmt::Debug for Join<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Join").field(&self.expr).finish()
    }
}

/// A typed path to an attribute whose declared type is `R`.
pub struct Path<R> {
    expr: PathExpr,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Path<R> {
    pub(crate) fn from_expr(expr: PathExpr) -> Self {
        Path {
            expr,
            _marker: PhantomData,
        }
    }

    /// Returns the untyped path.
    pub fn expr(&self) -> &PathExpr {
        &self.expr
    }

    /// Navigates through a to-one relation to one of its fields.
    ///
    /// The relation is crossed with an implicit inner join, so records
    /// whose relation is missing never satisfy predicates on the result.
    pub fn get<S>(&self, field: Field<R::Target, S>) -> Path<S>
    where
        R: Relation,
    {
        let mut segments = self.expr.segments().to_vec();
        if let Some(last) = segments.last_mut() {
            last.join.get_or_insert(JoinType::Inner);
        }
        let parent = PathExpr { segments };
        Path::from_expr(parent.attribute(field.name()))
    }
}

impl<R> Clone for Path<R> {
    fn clone(&self) -> Self {
        Path::from_expr(self.expr.clone())
    }
}

impl<R> PartialEq for Path<R> {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl<R> fmt::Debug for Path<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path").field(&self.expr).finish()
    }
}

impl<R> fmt::Display for Path<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Entity;
    use crate::value::Value;

    struct Address;
    struct Film;
    struct Actor;

    impl Entity for Address {
        fn field_value(&self, _field: &str) -> Value<'_> {
            Value::None
        }
    }

    impl Entity for Film {
        fn field_value(&self, _field: &str) -> Value<'_> {
            Value::None
        }
    }

    const ADDRESS: Field<Actor, Option<Address>> = Field::new("address");
    const FILMS: Field<Actor, Vec<Film>> = Field::new("films");
    const NAME: Field<Actor, String> = Field::new("name");
    const CITY: Field<Address, String> = Field::new("city");
    const TITLE: Field<Film, String> = Field::new("title");

    #[test]
    fn root_get_resolves_field_name() {
        let root = Root::<Actor>::new();
        assert_eq!(root.get(NAME).to_string(), "name");
        assert!(PathExpr::root().is_root());
    }

    #[test]
    fn joins_record_join_type() {
        let root = Root::<Actor>::new();

        let inner = root.join(ADDRESS).get(CITY);
        assert_eq!(inner.to_string(), "address.city");
        assert_eq!(inner.expr().segments()[0].join, Some(JoinType::Inner));
        assert_eq!(inner.expr().segments()[1].join, None);

        let left = root.left_join(FILMS).get(TITLE);
        assert_eq!(left.expr().segments()[0].join, Some(JoinType::Left));

        let right = root.right_join(ADDRESS);
        assert_eq!(right.expr().segments()[0].join, Some(JoinType::Right));
        assert_eq!(
            root.inner_join(ADDRESS).expr(),
            root.join(ADDRESS).expr()
        );
    }

    #[test]
    fn path_get_navigates_with_implicit_inner_join() {
        let root = Root::<Actor>::new();
        let city = root.get(ADDRESS).get(CITY);
        assert_eq!(city.to_string(), "address.city");
        assert_eq!(city, root.join(ADDRESS).get(CITY));
    }

    #[test]
    fn join_type_keeps_missing() {
        assert!(!JoinType::Inner.keeps_missing());
        assert!(JoinType::Left.keeps_missing());
        assert!(!JoinType::Right.keeps_missing());
        assert_eq!(JoinType::Left.to_string(), "left");
    }
}
