//! In-memory predicate evaluation.
//!
//! A [`Matcher`] is a [`Predicate`] compiled for repeated evaluation against
//! records: LIKE patterns become regexes once, and the inner joins the
//! predicate relies on are collected up front.
//!
//! Evaluation follows SQL semantics:
//!
//! - Three-valued logic. Any comparison involving null is *unknown*; `not`
//!   of unknown is unknown, and a record is kept only when the whole
//!   predicate is definitely true.
//! - Joins. A record missing a relation joined with an inner (or right)
//!   join is excluded, wherever the join appears in the predicate. Through
//!   a left join the missing relation's attributes read as null.
//! - To-many relations. An atomic predicate over attributes reached through
//!   a collection holds when it holds for at least one related record.

use std::cmp::Ordering;
use std::mem;

use regex::Regex;

use crate::error::{Result, SpecError};
use crate::field::Entity;
use crate::literal::Literal;
use crate::op::Op;
use crate::ordering::compare_values;
use crate::path::{JoinType, PathExpr, Segment};
use crate::predicate::Predicate;
use crate::value::Value;

/// Three-valued truth: `None` is unknown.
type Truth = Option<bool>;

#[derive(Debug)]
enum Node {
    All(Vec<Node>),
    Any(Vec<Node>),
    Not(Box<Node>),
    Compare {
        path: PathExpr,
        op: Op,
        value: Literal,
    },
    CompareTo {
        path: PathExpr,
        op: Op,
        other: PathExpr,
    },
    Between {
        path: PathExpr,
        low: Literal,
        high: Literal,
    },
    In {
        path: PathExpr,
        values: Vec<Literal>,
    },
    IsNull(PathExpr),
    IsNotNull(PathExpr),
    Bool {
        path: PathExpr,
        expected: bool,
    },
    Like {
        path: PathExpr,
        regex: Regex,
    },
    Empty {
        path: PathExpr,
        expected: bool,
    },
    Member {
        path: PathExpr,
        element: Literal,
    },
}

/// A predicate compiled for evaluation against records.
#[derive(Debug)]
pub struct Matcher {
    root: Node,
    required_joins: Vec<Vec<Segment>>,
}

impl Matcher {
    /// Compiles a predicate.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidLikePattern`] for a LIKE pattern ending in
    /// an unescaped escape character.
    pub fn compile(predicate: &Predicate) -> Result<Self> {
        let mut required_joins = Vec::new();
        let root = compile_node(predicate, &mut required_joins)?;
        Ok(Matcher {
            root,
            required_joins,
        })
    }

    /// A matcher that accepts every record.
    pub fn accept_all() -> Self {
        Matcher {
            root: Node::All(Vec::new()),
            required_joins: Vec::new(),
        }
    }

    /// Returns `true` if the predicate is definitely true for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::TypeMismatch`] when a record value and an
    /// operand have different types.
    pub fn matches<E: Entity + ?Sized>(&self, record: &E) -> Result<bool> {
        let joined = self
            .required_joins
            .iter()
            .all(|relation| has_related(record, relation));
        if !joined {
            return Ok(false);
        }
        Ok(eval(&self.root, record)? == Some(true))
    }
}

fn compile_node(predicate: &Predicate, joins: &mut Vec<Vec<Segment>>) -> Result<Node> {
    let node = match predicate {
        Predicate::Conjunction(parts) => Node::All(
            parts
                .iter()
                .map(|p| compile_node(p, joins))
                .collect::<Result<_>>()?,
        ),
        Predicate::Disjunction(parts) => Node::Any(
            parts
                .iter()
                .map(|p| compile_node(p, joins))
                .collect::<Result<_>>()?,
        ),
        Predicate::Not(inner) => Node::Not(Box::new(compile_node(inner, joins)?)),
        Predicate::Compare { path: p, op, value } => Node::Compare {
            path: track(p, joins),
            op: *op,
            value: value.clone(),
        },
        Predicate::CompareTo { path: p, op, other } => {
            let lhs = track(p, joins);
            Node::CompareTo {
                path: lhs,
                op: *op,
                other: track(other, joins),
            }
        }
        Predicate::Between { path: p, low, high } => Node::Between {
            path: track(p, joins),
            low: low.clone(),
            high: high.clone(),
        },
        Predicate::In { path: p, values } => Node::In {
            path: track(p, joins),
            values: values.clone(),
        },
        Predicate::IsNull(p) => Node::IsNull(track(p, joins)),
        Predicate::IsNotNull(p) => Node::IsNotNull(track(p, joins)),
        Predicate::IsTrue(p) => Node::Bool {
            path: track(p, joins),
            expected: true,
        },
        Predicate::IsFalse(p) => Node::Bool {
            path: track(p, joins),
            expected: false,
        },
        Predicate::Like {
            path: p,
            pattern,
            escape,
        } => Node::Like {
            path: track(p, joins),
            regex: like_to_regex(pattern, *escape)?,
        },
        Predicate::IsEmpty(p) => Node::Empty {
            path: track(p, joins),
            expected: true,
        },
        Predicate::IsNotEmpty(p) => Node::Empty {
            path: track(p, joins),
            expected: false,
        },
        Predicate::IsMember { path: p, element } => Node::Member {
            path: track(p, joins),
            element: element.clone(),
        },
    };
    Ok(node)
}

fn track(expr: &PathExpr, joins: &mut Vec<Vec<Segment>>) -> PathExpr {
    collect_joins(expr, joins);
    expr.clone()
}

/// Records every relation prefix of `expr` crossed with a dropping join.
fn collect_joins(expr: &PathExpr, joins: &mut Vec<Vec<Segment>>) {
    let segments = expr.segments();
    for (i, segment) in segments.iter().enumerate() {
        let drops_missing = matches!(segment.join, Some(JoinType::Inner | JoinType::Right));
        if drops_missing {
            let relation = segments[..=i].to_vec();
            if !joins.contains(&relation) {
                joins.push(relation);
            }
        }
    }
}

/// Translates a LIKE pattern into an anchored regex.
///
/// `%` matches any run of characters, `_` exactly one, and the escape
/// character makes the next character literal.
pub fn like_to_regex(pattern: &str, escape: Option<char>) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if Some(c) == escape {
            let Some(literal) = chars.next() else {
                return Err(SpecError::InvalidLikePattern {
                    pattern: pattern.to_string(),
                    escape: c,
                });
            };
            source.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4])));
            continue;
        }
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');
    Ok(Regex::new(&source)?)
}

/// Resolves a path against a record, returning one value per joined row.
///
/// Relations are expanded segment by segment: a to-one relation yields its
/// record, a to-many relation every element. A missing relation yields a
/// null under a left join and no rows otherwise.
fn resolve<'a, E: Entity + ?Sized>(record: &'a E, segments: &[Segment]) -> Vec<Value<'a>> {
    let Some((first, rest)) = segments.split_first() else {
        return Vec::new();
    };
    let mut values = vec![record.field_value(first.name)];
    let mut crossing = first.join;
    for segment in rest {
        let keeps_missing = crossing.is_some_and(JoinType::keeps_missing);
        let mut next = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::Entity(related) => next.push(related.field_value(segment.name)),
                Value::List(items) if items.is_empty() => {
                    if keeps_missing {
                        next.push(Value::None);
                    }
                }
                Value::List(items) => next.extend(items.into_iter().map(|item| match item {
                    Value::Entity(related) => related.field_value(segment.name),
                    _ => Value::None,
                })),
                _ => {
                    if keeps_missing {
                        next.push(Value::None);
                    }
                }
            }
        }
        values = next;
        crossing = segment.join;
    }
    values
}

fn has_related<E: Entity + ?Sized>(record: &E, relation: &[Segment]) -> bool {
    resolve(record, relation).iter().any(|value| match value {
        Value::Entity(_) => true,
        Value::List(items) => !items.is_empty(),
        _ => false,
    })
}

fn eval<E: Entity + ?Sized>(node: &Node, record: &E) -> Result<Truth> {
    match node {
        Node::All(parts) => {
            let mut unknown = false;
            for part in parts {
                match eval(part, record)? {
                    Some(false) => return Ok(Some(false)),
                    None => unknown = true,
                    Some(true) => {}
                }
            }
            Ok(if unknown { None } else { Some(true) })
        }
        Node::Any(parts) => {
            let mut unknown = false;
            for part in parts {
                match eval(part, record)? {
                    Some(true) => return Ok(Some(true)),
                    None => unknown = true,
                    Some(false) => {}
                }
            }
            Ok(if unknown { None } else { Some(false) })
        }
        Node::Not(inner) => Ok(eval(inner, record)?.map(|truth| !truth)),
        Node::Compare { path, op, value } => exists(record, path, |v| {
            Ok(compare(path, v, &value.as_value())?.map(|ord| op.eval_ordering(ord)))
        }),
        Node::CompareTo { path, op, other } => {
            let rhs = resolve(record, other.segments());
            exists(record, path, |v| {
                any(rhs.iter().map(|o| {
                    Ok(compare(path, v, o)?.map(|ord| op.eval_ordering(ord)))
                }))
            })
        }
        Node::Between { path, low, high } => exists(record, path, |v| {
            let above = compare(path, v, &low.as_value())?.map(|ord| ord != Ordering::Less);
            let below = compare(path, v, &high.as_value())?.map(|ord| ord != Ordering::Greater);
            Ok(and(above, below))
        }),
        Node::In { path, values } => exists(record, path, |v| {
            any(values.iter().map(|candidate| {
                Ok(compare(path, v, &candidate.as_value())?.map(|ord| ord == Ordering::Equal))
            }))
        }),
        Node::IsNull(path) => exists(record, path, |v| Ok(Some(v.is_none()))),
        Node::IsNotNull(path) => exists(record, path, |v| Ok(Some(!v.is_none()))),
        Node::Bool { path, expected } => exists(record, path, |v| {
            let flag = Value::Bool(*expected);
            Ok(compare(path, v, &flag)?.map(|ord| ord == Ordering::Equal))
        }),
        Node::Like { path, regex } => exists(record, path, |v| match v {
            Value::None => Ok(None),
            Value::String(s) => Ok(Some(regex.is_match(s))),
            other => Err(mismatch(path, "string", other)),
        }),
        Node::Empty { path, expected } => exists(record, path, |v| match v {
            Value::None => Ok(Some(*expected)),
            Value::List(items) => Ok(Some(items.is_empty() == *expected)),
            other => Err(mismatch(path, "list", other)),
        }),
        Node::Member { path, element } => exists(record, path, |v| match v {
            Value::None => Ok(Some(false)),
            Value::List(items) => {
                let element = element.as_value();
                any(items.iter().map(|item| {
                    Ok(compare(path, item, &element)?.map(|ord| ord == Ordering::Equal))
                }))
            }
            other => Err(mismatch(path, "list", other)),
        }),
    }
}

/// Evaluates an atomic test for every row a path resolves to; true if any
/// row satisfies it.
fn exists<E, F>(record: &E, path: &PathExpr, test: F) -> Result<Truth>
where
    E: Entity + ?Sized,
    F: Fn(&Value<'_>) -> Result<Truth>,
{
    any(resolve(record, path.segments()).iter().map(test))
}

fn any(results: impl Iterator<Item = Result<Truth>>) -> Result<Truth> {
    let mut unknown = false;
    for result in results {
        match result? {
            Some(true) => return Ok(Some(true)),
            None => unknown = true,
            Some(false) => {}
        }
    }
    Ok(if unknown { None } else { Some(false) })
}

fn and(a: Truth, b: Truth) -> Truth {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

/// Compares a record value with an operand; unknown when either is null.
fn compare(path: &PathExpr, value: &Value<'_>, operand: &Value<'_>) -> Result<Option<Ordering>> {
    if value.is_none() || operand.is_none() {
        return Ok(None);
    }
    if mem::discriminant(value) != mem::discriminant(operand) {
        return Err(mismatch(path, operand.type_name(), value));
    }
    Ok(compare_values(value, operand, false))
}

fn mismatch(path: &PathExpr, expected: &'static str, actual: &Value<'_>) -> SpecError {
    SpecError::TypeMismatch {
        path: path.to_string(),
        expected,
        actual: actual.type_name(),
    }
}
