//! Subselect evaluation
//!
//! A subselect node filters the items in scope down to those matching all
//! of its children, then checks its own predicate against the matching
//! items' target field (usually `qty`).

use crate::compare::{compare, to_number};
use crate::condition::ast::{ConditionNode, Predicate, SubselectStrategy};
use crate::condition::evaluator::Validator;
use crate::error::{Result, RuleError};
use crate::subject::{resolve, AttributeValue, Cart, Item};
use tracing::trace;

pub(crate) fn evaluate_subset(
    validator: &Validator,
    predicate: &Predicate,
    strategy: SubselectStrategy,
    children: &[ConditionNode],
    cart: &Cart,
    items: &[Item],
) -> Result<bool> {
    let right = predicate.operand();
    let mut total = 0.0;

    for item in items {
        if !item_matches(validator, children, cart, item)? {
            continue;
        }

        let value = resolve(item, &predicate.attribute)?;
        trace!(sku = %item.sku, value = %value, "subselect item matched");

        match strategy {
            SubselectStrategy::PerItem => {
                if !compare(&value, predicate.operator, right.as_ref())? {
                    return Ok(false);
                }
            }
            SubselectStrategy::Sum => {
                total += to_number(&value).ok_or(RuleError::TypeMismatch {
                    operator: predicate.operator.as_str(),
                    expected: "a numeric item attribute to sum",
                })?;
            }
        }
    }

    match strategy {
        SubselectStrategy::PerItem => Ok(true),
        SubselectStrategy::Sum => compare(
            &AttributeValue::Float(total),
            predicate.operator,
            right.as_ref(),
        ),
    }
}

/// True when every child holds with item predicates scoped to `item` alone
fn item_matches(
    validator: &Validator,
    children: &[ConditionNode],
    cart: &Cart,
    item: &Item,
) -> Result<bool> {
    let scope = std::slice::from_ref(item);
    for child in children {
        if !validator.evaluate(child, cart, scope)? {
            return Ok(false);
        }
    }
    Ok(true)
}
