//! Record comparison for sorted results.
//!
//! [`compare_by_sort`] orders two records by each [`Order`] of a [`Sort`] in
//! turn. Properties are dotted paths resolved with left-join semantics: a
//! missing relation anywhere along the path reads as null.

use std::cmp::Ordering;

use crate::config::NullPlacement;
use crate::field::Entity;
use crate::sort::{Direction, NullHandling, Order, Sort};
use crate::value::Value;

/// Applies a direction to an ordering.
pub fn apply_direction(direction: Direction, ordering: Ordering) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

/// Reads a dotted property from a record.
///
/// Every segment but the last must name a to-one relation; anything else
/// along the way (a missing relation, a to-many relation, a scalar) yields
/// [`Value::None`].
pub fn resolve_property<'a, E: Entity + ?Sized>(record: &'a E, property: &str) -> Value<'a> {
    let mut names = property.split('.');
    let Some(first) = names.next() else {
        return Value::None;
    };
    let mut value = record.field_value(first);
    for name in names {
        value = match value {
            Value::Entity(related) => related.field_value(name),
            _ => return Value::None,
        };
    }
    value
}

/// Compares two non-null values of the same type.
///
/// Returns `None` if the types don't match or comparison is not possible
/// (NaN, entities, lists).
pub fn compare_values(a: &Value<'_>, b: &Value<'_>, ignore_case: bool) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) if ignore_case => {
            Some(a.to_lowercase().cmp(&b.to_lowercase()))
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Fixed rank of each value type, used when sorting mixed types.
fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::Timestamp(_) => 2,
        Value::Enum(_) => 3,
        Value::String(_) => 4,
        Value::List(_) => 5,
        Value::Entity(_) => 6,
        Value::None => 7,
    }
}

/// Total ordering of two non-null values for sorting.
///
/// Unlike [`compare_values`], never gives up: NaN sorts above every other
/// number, values of different types are ranked by type, and lists or
/// related records compare equal among themselves.
pub fn sort_values(a: &Value<'_>, b: &Value<'_>, ignore_case: bool) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        _ => compare_values(a, b, ignore_case)
            .unwrap_or_else(|| type_rank(a).cmp(&type_rank(b))),
    }
}

/// Compares two property values under one order, placing nulls per the
/// order's null handling.
pub fn compare_by_order(
    order: &Order,
    a: &Value<'_>,
    b: &Value<'_>,
    native_nulls: NullPlacement,
) -> Ordering {
    let null_first = match order.null_handling {
        NullHandling::NullsFirst => Some(true),
        NullHandling::NullsLast => Some(false),
        NullHandling::Native => None,
    };
    match (a.is_none(), b.is_none()) {
        (true, true) => Ordering::Equal,
        (false, false) => apply_direction(order.direction, sort_values(a, b, order.ignore_case)),
        (a_null, _) => {
            // Ordering of a null `a` against a present `b`.
            let null_vs_value = match null_first {
                Some(true) => Ordering::Less,
                Some(false) => Ordering::Greater,
                None => {
                    let native = match native_nulls {
                        NullPlacement::High => Ordering::Greater,
                        NullPlacement::Low => Ordering::Less,
                    };
                    apply_direction(order.direction, native)
                }
            };
            if a_null {
                null_vs_value
            } else {
                null_vs_value.reverse()
            }
        }
    }
}

/// Compares two records using every order of a sort.
///
/// The first order is the primary key, the next breaks ties, and so on.
/// If all orders compare equal, returns `Equal`, so a stable sort keeps
/// insertion order.
pub fn compare_by_sort<E: Entity + ?Sized>(
    a: &E,
    b: &E,
    sort: &Sort,
    native_nulls: NullPlacement,
) -> Ordering {
    for order in sort {
        let val_a = resolve_property(a, &order.property);
        let val_b = resolve_property(b, &order.property);

        let ordering = compare_by_order(order, &val_a, &val_b, native_nulls);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
