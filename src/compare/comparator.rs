//! Value comparator
//!
//! `compare(left, operator, right)` evaluates one predicate. A type
//! mismatch inside a family is an error, never a silent `false`.

use crate::compare::coerce::{is_instant, to_instant, to_numeric, values_equal};
use crate::compare::pattern::like_pattern;
use crate::condition::{CompareOp, Operator};
use crate::error::{Result, RuleError};
use crate::subject::AttributeValue;

/// Compare `left` against `right` with `operator`
///
/// `right` is `None` when the predicate carries no value; only the null
/// check family accepts that.
pub fn compare(
    left: &AttributeValue,
    operator: Operator,
    right: Option<&AttributeValue>,
) -> Result<bool> {
    let name = operator.as_str();
    let operand = || right.ok_or(RuleError::MissingValue(name));

    match operator {
        Operator::Null { negated } => Ok(left.is_zero() != negated),
        Operator::Compare(op) => compare_ordering(left, op, operand()?),
        Operator::Contains { negated } => Ok(compare_contains(left, operand()?, name)? != negated),
        Operator::InSet { negated } => Ok(compare_in_set(left, operand()?, name)? != negated),
        Operator::Like { negated } => Ok(compare_like(left, operand()?, name)? != negated),
    }
}

/// Ordering/equality: numeric first, then dates, then plain strings
pub fn compare_ordering(
    left: &AttributeValue,
    op: CompareOp,
    right: &AttributeValue,
) -> Result<bool> {
    if let (Some(l), Some(r)) = (to_numeric(left), to_numeric(right)) {
        if let Some(ordering) = l.compare(r) {
            return Ok(op.accepts(ordering));
        }
    }

    if is_instant(left) || is_instant(right) {
        return compare_dates(left, op, right);
    }

    if let (AttributeValue::String(l), AttributeValue::String(r)) = (left, right) {
        return Ok(op.apply(l.as_str(), r.as_str()));
    }

    Err(RuleError::Incomparable {
        left: format!("{} {}", left.type_name(), left),
        operator: op.as_str(),
        right: format!("{} {}", right.type_name(), right),
    })
}

/// Compare two date-like values as instants (before / after / equal)
pub fn compare_dates(left: &AttributeValue, op: CompareOp, right: &AttributeValue) -> Result<bool> {
    let l = to_instant(left)?;
    let r = to_instant(right)?;
    Ok(op.accepts(l.cmp(&r)))
}

/// Case-insensitive substring test
fn compare_contains(
    left: &AttributeValue,
    right: &AttributeValue,
    operator: &'static str,
) -> Result<bool> {
    match (left, right) {
        (AttributeValue::String(haystack), AttributeValue::String(needle)) => Ok(haystack
            .to_lowercase()
            .contains(&needle.to_lowercase())),
        _ => Err(RuleError::TypeMismatch {
            operator,
            expected: "string operands",
        }),
    }
}

/// Membership of `left` (or any element of a list-valued `left`) in `right`
fn compare_in_set(
    left: &AttributeValue,
    right: &AttributeValue,
    operator: &'static str,
) -> Result<bool> {
    let AttributeValue::List(set) = right else {
        return Err(RuleError::TypeMismatch {
            operator,
            expected: "a list value",
        });
    };

    let is_member = |value: &AttributeValue| set.iter().any(|candidate| values_equal(value, candidate));

    Ok(match left {
        AttributeValue::List(values) => values.iter().any(is_member),
        value => is_member(value),
    })
}

/// Whole-string, case-insensitive match where `%` is a wildcard
fn compare_like(
    left: &AttributeValue,
    right: &AttributeValue,
    operator: &'static str,
) -> Result<bool> {
    match (left, right) {
        (AttributeValue::String(text), AttributeValue::String(pattern)) => {
            Ok(like_pattern(pattern)?.is_match(text))
        }
        _ => Err(RuleError::TypeMismatch {
            operator,
            expected: "string operands",
        }),
    }
}
