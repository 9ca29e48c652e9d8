// src/expression.rs

use std::cmp::Ordering;
use std::fmt;

use crate::state::ValueSnapshot;
use crate::value::{Address, Value};

/// Comparison operator inside an expression atom.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Comparator {
    fn admits(&self, ordering: Ordering) -> bool {
        match self {
            Comparator::Equal => ordering == Ordering::Equal,
            Comparator::NotEqual => ordering != Ordering::Equal,
            Comparator::Less => ordering == Ordering::Less,
            Comparator::LessEqual => ordering != Ordering::Greater,
            Comparator::Greater => ordering == Ordering::Greater,
            Comparator::GreaterEqual => ordering != Ordering::Less,
        }
    }
}

/// Why an evaluation could not produce a truth value.
///
/// The scheduler maps any fault to `false` for the tick and logs it, so the
/// fail-closed policy is explicit rather than hidden in a catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprFault {
    /// The snapshot holds no value for the address.
    UnknownAddress(Address),
    /// The two operands have kinds that do not compare.
    Incomparable(Address),
}

impl fmt::Display for ExprFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprFault::UnknownAddress(a) => write!(f, "no value for {a}"),
            ExprFault::Incomparable(a) => write!(f, "incomparable operands at {a}"),
        }
    }
}

/// A boolean trigger predicate over live parameter values.
///
/// Expressions:
/// - are immutable once built (the editor rebuilds and swaps whole trees)
/// - evaluate without side effects: same snapshot, same result
/// - `True` is the default trigger for syncs with no condition
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    True,
    Atom {
        address: Address,
        comparator: Comparator,
        operand: Value,
    },
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn atom(
        address: impl Into<Address>,
        comparator: Comparator,
        operand: impl Into<Value>,
    ) -> Self {
        Expression::Atom {
            address: address.into(),
            comparator,
            operand: operand.into(),
        }
    }

    pub fn and(a: Expression, b: Expression) -> Self {
        Expression::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Expression, b: Expression) -> Self {
        Expression::Or(Box::new(a), Box::new(b))
    }

    pub fn not(e: Expression) -> Self {
        Expression::Not(Box::new(e))
    }

    /// Evaluate against a snapshot.
    ///
    /// Short-circuits like the boolean connectives it models: a fault in a
    /// branch that cannot affect the outcome is not reported.
    pub fn evaluate(&self, snapshot: &ValueSnapshot) -> Result<bool, ExprFault> {
        match self {
            Expression::True => Ok(true),

            Expression::Atom {
                address,
                comparator,
                operand,
            } => {
                let current = snapshot
                    .get(address)
                    .ok_or_else(|| ExprFault::UnknownAddress(address.clone()))?;
                match current.partial_compare(operand) {
                    Some(ordering) => Ok(comparator.admits(ordering)),
                    None => Err(ExprFault::Incomparable(address.clone())),
                }
            }

            Expression::Not(inner) => Ok(!inner.evaluate(snapshot)?),

            Expression::And(a, b) => {
                if !a.evaluate(snapshot)? {
                    Ok(false)
                } else {
                    b.evaluate(snapshot)
                }
            }

            Expression::Or(a, b) => {
                if a.evaluate(snapshot)? {
                    Ok(true)
                } else {
                    b.evaluate(snapshot)
                }
            }
        }
    }

    /// Collect every address the expression reads.
    ///
    /// Used by syncs to subscribe to value changes while pending.
    pub fn addresses(&self, out: &mut Vec<Address>) {
        match self {
            Expression::True => {}
            Expression::Atom { address, .. } => {
                if !out.contains(address) {
                    out.push(address.clone());
                }
            }
            Expression::Not(inner) => inner.addresses(out),
            Expression::And(a, b) | Expression::Or(a, b) => {
                a.addresses(out);
                b.addresses(out);
            }
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        Expression::True
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ValueSnapshot {
        let mut s = ValueSnapshot::new();
        s.set(Address::new("dev:/gain"), Value::Float(0.5));
        s.set(Address::new("dev:/mode"), Value::Int(3));
        s.set(Address::new("dev:/armed"), Value::Bool(true));
        s
    }

    #[test]
    fn always_true_sentinel() {
        assert_eq!(Expression::True.evaluate(&snapshot()), Ok(true));
    }

    #[test]
    fn comparisons() {
        let s = snapshot();
        let gt = Expression::atom("dev:/gain", Comparator::Greater, 0.25);
        let le = Expression::atom("dev:/mode", Comparator::LessEqual, 3i64);
        assert_eq!(gt.evaluate(&s), Ok(true));
        assert_eq!(le.evaluate(&s), Ok(true));
    }

    #[test]
    fn connectives_short_circuit() {
        let s = snapshot();
        // Right branch would fault on the unknown address, but the left
        // branch already decides the result.
        let e = Expression::or(
            Expression::atom("dev:/armed", Comparator::Equal, true),
            Expression::atom("dev:/missing", Comparator::Equal, 1i64),
        );
        assert_eq!(e.evaluate(&s), Ok(true));
    }

    #[test]
    fn mismatched_types_fault() {
        let s = snapshot();
        let e = Expression::atom("dev:/armed", Comparator::Less, 4i64);
        assert_eq!(
            e.evaluate(&s),
            Err(ExprFault::Incomparable(Address::new("dev:/armed")))
        );
    }

    #[test]
    fn unknown_address_faults() {
        let e = Expression::atom("dev:/nowhere", Comparator::Equal, 0i64);
        assert!(matches!(
            e.evaluate(&snapshot()),
            Err(ExprFault::UnknownAddress(_))
        ));
    }

    #[test]
    fn address_collection_deduplicates() {
        let e = Expression::and(
            Expression::atom("dev:/gain", Comparator::Greater, 0.0),
            Expression::or(
                Expression::atom("dev:/gain", Comparator::Less, 1.0),
                Expression::atom("dev:/mode", Comparator::Equal, 1i64),
            ),
        );
        let mut out = Vec::new();
        e.addresses(&mut out);
        assert_eq!(out.len(), 2);
    }
}
