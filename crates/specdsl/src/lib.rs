//! Specdsl - typed predicates, specifications, sorts and pages.
//!
//! Specdsl builds query conditions from compile-time checked field tokens
//! instead of string field names. It provides:
//!
//! - Field tokens generated by `#[derive(Entity)]`, one per field
//! - An explicit [`CriteriaBuilder`] producing [`Predicate`] trees
//! - Deferred, composable [`Specification`]s with AND / OR / NOT
//! - A sort and page DSL: [`Order`], [`Sort`], [`PageRequest`], [`Page`]
//! - An in-memory [`SpecificationExecutor`] with SQL null semantics
//!
//! # Quick Start
//!
//! ```rust
//! use specdsl::{and, paged, Entity, Repository, SpecificationExecutor};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     first_name: String,
//!     last_name: String,
//!     birth_year: Option<u16>,
//! }
//!
//! let mut actors = Repository::new();
//! for (first, last, year) in [
//!     ("Clint", "Eastwood", 1930),
//!     ("Sean", "Connery", 1930),
//!     ("Tom", "Hanks", 1956),
//! ] {
//!     actors.save(Actor {
//!         first_name: first.into(),
//!         last_name: last.into(),
//!         birth_year: Some(year),
//!     });
//! }
//!
//! // Absent filters are skipped rather than matching nothing.
//! let last_name: Option<&str> = None;
//! let spec = and([
//!     Some(Actor::BIRTH_YEAR.lt(1950u16)),
//!     last_name.map(|name| Actor::LAST_NAME.equal(name)),
//! ]);
//!
//! let request = paged(0, 10)?
//!     .sorted_by(Actor::BIRTH_YEAR.asc().and_then(Actor::FIRST_NAME.desc()));
//! let page = actors.find_page(&spec, request)?;
//!
//! let names: Vec<_> = page.iter().map(|a| a.first_name.as_str()).collect();
//! assert_eq!(names, ["Sean", "Clint"]);
//! # Ok::<(), specdsl::SpecError>(())
//! ```
//!
//! # Combination Semantics
//!
//! Two layers combine conditions, with different identities:
//!
//! | Layer | Empty AND | Empty OR | Absent operand |
//! |-------|-----------|----------|----------------|
//! | [`CriteriaBuilder`] | always true | always false | skipped by `and_not_null` / `or_not_null` |
//! | [`Specification`] | unrestricted | unrestricted | skipped |
//!
//! `is_in` and `is_not_in` with no values are both unrestricted, so they
//! are not complements of each other for an empty list, while
//! `!field.is_in([])` matches nothing.
//!
//! # Field Types and Operators
//!
//! | Declared type | Operators |
//! |---------------|-----------|
//! | any | `is_null`, `is_not_null` |
//! | scalar or `Option<scalar>` | `equal`, `not_equal`, `is_in`, `is_not_in` |
//! | ordered scalar | `less_than`, `greater_than`, `between`, ... |
//! | numeric | `lt`, `le`, `gt`, `ge` |
//! | `bool` | `is_true`, `is_false` |
//! | `String` | `like`, `not_like`, `like_escaped`, `not_like_escaped` |
//! | `Vec<scalar>` | `is_empty`, `is_not_empty`, `is_member`, `is_not_member` |
//! | `Option<E>`, `Box<E>`, `Vec<E>` of entities | `join`, `left_join`, `right_join` |

mod attribute;
mod config;
mod criteria;
mod dsl;
mod error;
mod eval;
mod field;
mod literal;
mod op;
mod ordering;
mod page;
mod path;
mod predicate;
mod repository;
mod sort;
mod specification;
mod value;

// Re-export public API
pub use attribute::{Attribute, CollectionAttribute, Discriminant, Numeric, Relation, ToValue};
pub use config::{NullPlacement, RepositoryConfig, DEFAULT_MAX_PAGE_SIZE};
pub use criteria::CriteriaBuilder;
pub use error::{Result, SpecError};
pub use eval::{like_to_regex, Matcher};
pub use field::{Entity, Field};
pub use literal::Literal;
pub use op::Op;
pub use ordering::{compare_by_sort, compare_values, resolve_property, sort_values};
pub use page::{limit, paged, unpaged, Page, PageRequest, Pageable};
pub use path::{Join, JoinType, Path, PathExpr, Root, Segment};
pub use predicate::Predicate;
pub use repository::{Repository, SpecificationExecutor};
pub use sort::{sorted_by, unsorted, Direction, NullHandling, Order, Sort};
pub use specification::{and, combine, empty_specification, or, where_fn, Specification};
pub use value::{Number, Timestamp, Value};

/// Derive macro generating field tokens and the [`Entity`] accessor.
pub use specdsl_macros::Entity;
