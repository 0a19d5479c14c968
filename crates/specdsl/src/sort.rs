//! Sort DSL.
//!
//! A [`Sort`] is an ordered list of [`Order`]s: the first order is the primary
//! sort key, later ones break ties. Field tokens convert straight into orders
//! and sorts, and [`and_then`](Sort::and_then) appends with left-to-right
//! precedence:
//!
//! ```
//! use specdsl::{Entity, Sort};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     first_name: String,
//!     birth_year: Option<u16>,
//! }
//!
//! let sort: Sort = Actor::BIRTH_YEAR.asc().and_then(Actor::FIRST_NAME.desc());
//! assert_eq!(sort.to_string(), "birth_year asc, first_name desc");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::path::Path;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    /// Returns `true` if this is ascending order.
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_descending(self) -> bool {
        matches!(self, Direction::Desc)
    }

    /// Returns the opposite direction.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where null values go in a sorted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullHandling {
    /// Leave it to the executor's native null ordering.
    #[default]
    Native,
    /// Nulls before all values, regardless of direction.
    NullsFirst,
    /// Nulls after all values, regardless of direction.
    NullsLast,
}

/// One sort key: a property, a direction and the null and case policies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Dotted property path.
    pub property: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
    /// Compare strings case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
    /// Null placement.
    #[serde(default)]
    pub null_handling: NullHandling,
}

impl Order {
    /// Creates an ascending order with native null handling.
    pub fn by(property: impl Into<String>) -> Self {
        Order::new(Direction::Asc, property)
    }

    /// Creates an ascending order.
    pub fn asc(property: impl Into<String>) -> Self {
        Order::new(Direction::Asc, property)
    }

    /// Creates a descending order.
    pub fn desc(property: impl Into<String>) -> Self {
        Order::new(Direction::Desc, property)
    }

    /// Creates an order with the given direction.
    pub fn new(direction: Direction, property: impl Into<String>) -> Self {
        Order {
            property: property.into(),
            direction,
            ignore_case: false,
            null_handling: NullHandling::Native,
        }
    }

    /// Returns this order with case-insensitive comparison.
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Returns this order with nulls placed first.
    pub fn nulls_first(self) -> Self {
        self.with_null_handling(NullHandling::NullsFirst)
    }

    /// Returns this order with nulls placed last.
    pub fn nulls_last(self) -> Self {
        self.with_null_handling(NullHandling::NullsLast)
    }

    /// Returns this order with native null placement.
    pub fn nulls_native(self) -> Self {
        self.with_null_handling(NullHandling::Native)
    }

    /// Returns this order with the given null handling.
    pub fn with_null_handling(mut self, null_handling: NullHandling) -> Self {
        self.null_handling = null_handling;
        self
    }

    /// Returns this order with the given direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns this order for another property, keeping the policies.
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    /// Returns `true` if this order is ascending.
    pub fn is_ascending(&self) -> bool {
        self.direction.is_ascending()
    }

    /// Returns a sort by this order, then `other`.
    pub fn and_then(self, other: impl Into<Sort>) -> Sort {
        Sort::from(self).and(other)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.direction)?;
        if self.ignore_case {
            f.write_str(" ignore case")?;
        }
        match self.null_handling {
            NullHandling::Native => Ok(()),
            NullHandling::NullsFirst => f.write_str(" nulls first"),
            NullHandling::NullsLast => f.write_str(" nulls last"),
        }
    }
}

/// An ordered list of sort keys.
///
/// Orders are kept exactly as given: concatenation neither merges nor
/// deduplicates properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// Creates a sort from orders, field tokens or paths.
    pub fn by<O: Into<Order>>(orders: impl IntoIterator<Item = O>) -> Self {
        Sort {
            orders: orders.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an ascending sort over property names.
    pub fn by_properties<S: Into<String>>(properties: impl IntoIterator<Item = S>) -> Self {
        Sort::by(properties.into_iter().map(Order::by))
    }

    /// The sort with no orders.
    pub fn unsorted() -> Self {
        Sort::default()
    }

    /// Returns `true` if this sort has at least one order.
    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    /// Returns `true` if this sort has no orders.
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the orders, primary key first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Iterates over the orders, primary key first.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Returns the first order on `property`, if any.
    pub fn order_for(&self, property: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.property == property)
    }

    /// Appends `other`'s orders after this sort's.
    pub fn and(mut self, other: impl Into<Sort>) -> Self {
        self.orders.extend(other.into().orders);
        self
    }

    /// Appends `other` after this sort. Same as [`and`](Self::and).
    pub fn and_then(self, other: impl Into<Sort>) -> Self {
        self.and(other)
    }

    /// Returns this sort with every order ascending.
    pub fn ascending(self) -> Self {
        self.map_directions(|_| Direction::Asc)
    }

    /// Returns this sort with every order descending.
    pub fn descending(self) -> Self {
        self.map_directions(|_| Direction::Desc)
    }

    /// Returns this sort with every direction flipped.
    pub fn reverse(self) -> Self {
        self.map_directions(Direction::reverse)
    }

    fn map_directions(self, f: impl Fn(Direction) -> Direction) -> Self {
        Sort {
            orders: self
                .orders
                .into_iter()
                .map(|order| {
                    let direction = f(order.direction);
                    order.with_direction(direction)
                })
                .collect(),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.orders.is_empty() {
            return f.write_str("unsorted");
        }
        for (i, order) in self.orders.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{order}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Sort {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

impl IntoIterator for Sort {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.into_iter()
    }
}

impl From<Order> for Sort {
    fn from(order: Order) -> Self {
        Sort {
            orders: vec![order],
        }
    }
}

impl<T, R> From<Field<T, R>> for Order {
    fn from(field: Field<T, R>) -> Self {
        Order::by(field.name())
    }
}

impl<T, R> From<Field<T, R>> for Sort {
    fn from(field: Field<T, R>) -> Self {
        Sort::from(Order::from(field))
    }
}

impl<R> From<&Path<R>> for Order {
    fn from(path: &Path<R>) -> Self {
        Order::by(path.to_string())
    }
}

impl<R> From<Path<R>> for Order {
    fn from(path: Path<R>) -> Self {
        Order::from(&path)
    }
}

impl<R> From<Path<R>> for Sort {
    fn from(path: Path<R>) -> Self {
        Sort::from(Order::from(&path))
    }
}

impl<O: Into<Order>, const N: usize> From<[O; N]> for Sort {
    fn from(orders: [O; N]) -> Self {
        Sort::by(orders)
    }
}

impl<O: Into<Order>> From<Vec<O>> for Sort {
    fn from(orders: Vec<O>) -> Self {
        Sort::by(orders)
    }
}

macro_rules! sort_from_tuple {
    ($($value:ident: $ty:ident),+) => {
        impl<$($ty: Into<Order>),+> From<($($ty,)+)> for Sort {
            fn from(($($value,)+): ($($ty,)+)) -> Self {
                Sort {
                    orders: vec![$($value.into()),+],
                }
            }
        }
    };
}

sort_from_tuple!(a: A, b: B);
sort_from_tuple!(a: A, b: B, c: C);
sort_from_tuple!(a: A, b: B, c: C, d: D);
sort_from_tuple!(a: A, b: B, c: C, d: D, e: E);
sort_from_tuple!(a: A, b: B, c: C, d: D, e: E, f: F);

/// Creates a sort from orders, field tokens or paths.
///
/// Arrays and vectors need one element type. Tokens of different value
/// types go in a tuple, primary key first:
///
/// ```
/// use specdsl::{sorted_by, Entity};
///
/// #[derive(Entity)]
/// struct Actor {
///     first_name: String,
///     birth_year: Option<u16>,
/// }
///
/// let sort = sorted_by((Actor::FIRST_NAME, Actor::BIRTH_YEAR.desc()));
/// assert_eq!(sort.to_string(), "first_name asc, birth_year desc");
///
/// let same = Actor::FIRST_NAME.and_then(Actor::BIRTH_YEAR.desc());
/// assert_eq!(sort, same);
/// ```
pub fn sorted_by(orders: impl Into<Sort>) -> Sort {
    orders.into()
}

/// The sort with no orders.
pub fn unsorted() -> Sort {
    Sort::unsorted()
}

macro_rules! order_shorthands {
    ($($(#[$doc:meta])* $name:ident => $make:expr;)*) => {
        impl<T, R> Field<T, R> {
            $(
                $(#[$doc])*
                pub fn $name(self) -> Order {
                    let make: fn(Order) -> Order = $make;
                    make(Order::from(self))
                }
            )*

            /// A sort by this field ascending, then `other`.
            pub fn and_then(self, other: impl Into<Sort>) -> Sort {
                Sort::from(self).and(other)
            }
        }

        impl<R> Path<R> {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Order {
                    let make: fn(Order) -> Order = $make;
                    make(Order::from(self))
                }
            )*

            /// A sort by this path ascending, then `other`.
            pub fn and_then(&self, other: impl Into<Sort>) -> Sort {
                Sort::from(Order::from(self)).and(other)
            }
        }
    };
}

order_shorthands! {
    /// Ascending order on this attribute.
    asc => |order| order;
    /// Ascending order on this attribute.
    ascending => |order| order;
    /// Descending order on this attribute.
    desc => |order| order.with_direction(Direction::Desc);
    /// Descending order on this attribute.
    descending => |order| order.with_direction(Direction::Desc);
    /// Ascending, case-insensitive order on this attribute.
    ignore_case => Order::ignore_case;
    /// Ascending order on this attribute with nulls first.
    nulls_first => Order::nulls_first;
    /// Ascending order on this attribute with nulls last.
    nulls_last => Order::nulls_last;
    /// Ascending order on this attribute with native null placement.
    nulls_native => Order::nulls_native;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Root;

    struct Actor;

    const FIRST_NAME: Field<Actor, String> = Field::new("first_name");
    const LAST_NAME: Field<Actor, String> = Field::new("last_name");
    const BIRTH_YEAR: Field<Actor, Option<u16>> = Field::new("birth_year");

    #[test]
    fn field_shorthands() {
        assert_eq!(FIRST_NAME.asc(), Order::asc("first_name"));
        assert_eq!(FIRST_NAME.ascending(), FIRST_NAME.asc());
        assert_eq!(FIRST_NAME.desc(), Order::desc("first_name"));
        assert_eq!(FIRST_NAME.descending(), FIRST_NAME.desc());
        assert!(FIRST_NAME.ignore_case().ignore_case);
        assert_eq!(
            BIRTH_YEAR.nulls_first().null_handling,
            NullHandling::NullsFirst
        );
        assert_eq!(BIRTH_YEAR.nulls_last().null_handling, NullHandling::NullsLast);
        assert_eq!(BIRTH_YEAR.nulls_native().null_handling, NullHandling::Native);
        assert!(BIRTH_YEAR.nulls_last().is_ascending());
    }

    #[test]
    fn and_then_combinations() {
        let expected = Sort::by([Order::asc("birth_year"), Order::asc("first_name")]);

        assert_eq!(BIRTH_YEAR.and_then(FIRST_NAME), expected);
        assert_eq!(BIRTH_YEAR.and_then(FIRST_NAME.asc()), expected);
        assert_eq!(BIRTH_YEAR.asc().and_then(FIRST_NAME), expected);
        assert_eq!(BIRTH_YEAR.asc().and_then(FIRST_NAME.asc()), expected);
        assert_eq!(Sort::from(BIRTH_YEAR).and_then(FIRST_NAME), expected);
        assert_eq!(
            Sort::from(BIRTH_YEAR).and_then(Sort::from(FIRST_NAME)),
            expected
        );
    }

    #[test]
    fn concatenation_keeps_duplicates() {
        let sort = FIRST_NAME.asc().and_then(FIRST_NAME.desc());
        assert_eq!(sort.orders().len(), 2);
        assert_eq!(sort.order_for("first_name"), Some(&Order::asc("first_name")));
    }

    #[test]
    fn concatenation_is_associative() {
        let a = Sort::from(FIRST_NAME);
        let b = Sort::from(LAST_NAME.desc());
        let c = Sort::from(BIRTH_YEAR.nulls_first());

        let left = a.clone().and(b.clone()).and(c.clone());
        let right = a.and(b.and(c));
        assert_eq!(left, right);
        assert_eq!(
            left.to_string(),
            "first_name asc, last_name desc, birth_year asc nulls first"
        );
    }

    #[test]
    fn direction_transforms() {
        let sort = FIRST_NAME.asc().and_then(LAST_NAME.desc());
        assert!(sort.clone().ascending().iter().all(Order::is_ascending));
        assert!(sort.clone().descending().iter().all(|o| !o.is_ascending()));
        assert_eq!(
            sort.reverse(),
            FIRST_NAME.desc().and_then(LAST_NAME.asc())
        );
    }

    #[test]
    fn unsorted_and_properties() {
        assert!(unsorted().is_unsorted());
        assert!(!unsorted().is_sorted());
        assert_eq!(unsorted().to_string(), "unsorted");
        assert_eq!(
            Sort::by_properties(["first_name", "last_name"]),
            sorted_by([FIRST_NAME, LAST_NAME])
        );
    }

    #[test]
    fn tuples_mix_value_types() {
        let sort = sorted_by((FIRST_NAME, BIRTH_YEAR.desc(), Order::asc("last_name")));
        assert_eq!(
            sort,
            Sort::by([
                Order::asc("first_name"),
                Order::desc("birth_year"),
                Order::asc("last_name"),
            ])
        );
        assert_eq!(sorted_by(vec![BIRTH_YEAR]), Sort::from(BIRTH_YEAR));
        assert_eq!(sorted_by(FIRST_NAME.desc()), Sort::from(Order::desc("first_name")));
    }

    #[test]
    fn paths_convert_to_dotted_orders() {
        struct Address;
        impl crate::field::Entity for Address {
            fn field_value(&self, _field: &str) -> crate::value::Value<'_> {
                crate::value::Value::None
            }
        }
        const ADDRESS: Field<Actor, Option<Address>> = Field::new("address");
        const CITY: Field<Address, String> = Field::new("city");

        let root = Root::<Actor>::new();
        let city = root.get(ADDRESS).get(CITY);
        assert_eq!(city.desc(), Order::desc("address.city"));
        assert_eq!(Sort::from(city).to_string(), "address.city asc");
    }

    #[test]
    fn serde_shape() {
        let sort = BIRTH_YEAR.desc().nulls_last().and_then(FIRST_NAME);
        let json = serde_json::to_string(&sort).unwrap();
        assert_eq!(
            json,
            r#"[{"property":"birth_year","direction":"desc","ignore_case":false,"null_handling":"nulls_last"},{"property":"first_name","direction":"asc","ignore_case":false,"null_handling":"native"}]"#
        );
        let back: Sort = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sort);

        let order: Order = serde_json::from_str(r#"{"property":"last_name"}"#).unwrap();
        assert_eq!(order, Order::by("last_name"));
    }
}
