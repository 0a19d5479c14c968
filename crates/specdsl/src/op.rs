//! Comparison operators for atomic predicates.

use std::cmp::Ordering;

/// Binary comparison operator.
///
/// - **Equality**: `Eq`, `Ne` - valid for every operand type
/// - **Ordering**: `Lt`, `Le`, `Gt`, `Ge` - require an ordered operand type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl Op {
    /// Returns `true` for `Eq` and `Ne`.
    pub fn is_equality(self) -> bool {
        matches!(self, Op::Eq | Op::Ne)
    }

    /// Evaluates the operator given the ordering of field against operand.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
        }
    }

    /// Returns the operator with its operands swapped (`a < b` ⇔ `b > a`).
    pub fn flip(self) -> Op {
        match self {
            Op::Lt => Op::Gt,
            Op::Le => Op::Ge,
            Op::Gt => Op::Lt,
            Op::Ge => Op::Le,
            other => other,
        }
    }

    /// Returns the operator symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_eval_ordering() {
        assert!(Op::Eq.eval_ordering(Ordering::Equal));
        assert!(!Op::Eq.eval_ordering(Ordering::Less));

        assert!(!Op::Ne.eval_ordering(Ordering::Equal));
        assert!(Op::Ne.eval_ordering(Ordering::Greater));

        assert!(Op::Gt.eval_ordering(Ordering::Greater));
        assert!(!Op::Gt.eval_ordering(Ordering::Equal));

        assert!(Op::Ge.eval_ordering(Ordering::Equal));
        assert!(!Op::Ge.eval_ordering(Ordering::Less));

        assert!(Op::Lt.eval_ordering(Ordering::Less));
        assert!(!Op::Lt.eval_ordering(Ordering::Equal));

        assert!(Op::Le.eval_ordering(Ordering::Equal));
        assert!(!Op::Le.eval_ordering(Ordering::Greater));
    }

    #[test]
    fn op_flip() {
        assert_eq!(Op::Lt.flip(), Op::Gt);
        assert_eq!(Op::Ge.flip(), Op::Le);
        assert_eq!(Op::Eq.flip(), Op::Eq);
        assert!(Op::Ne.is_equality());
        assert!(!Op::Le.is_equality());
    }

    #[test]
    fn op_display() {
        assert_eq!(Op::Ne.to_string(), "<>");
        assert_eq!(Op::Ge.to_string(), ">=");
    }
}
