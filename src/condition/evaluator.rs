//! Condition tree evaluator

use crate::compare::compare;
use crate::condition::ast::{Aggregator, ConditionNode, NodeKind, Predicate, RecordScope};
use crate::condition::parser::parse;
use crate::condition::subselect::evaluate_subset;
use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::subject::{resolve, resolve_address, Cart, Item};
use tracing::debug;

/// Evaluates condition trees against carts
///
/// Holds only configuration, so one validator can serve any number of
/// concurrent evaluations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Decide whether `cart` satisfies the rule rooted at `node`
    ///
    /// Returns the first error met in depth-first, left-to-right order.
    pub fn validate(&self, node: &ConditionNode, cart: &Cart) -> Result<bool> {
        self.evaluate(node, cart, &cart.items)
    }

    /// Evaluate `node` with item predicates ranging over `items`
    ///
    /// `items` is the whole cart at the top level and a single item while a
    /// subselect tests which items match.
    pub(crate) fn evaluate(&self, node: &ConditionNode, cart: &Cart, items: &[Item]) -> Result<bool> {
        if !node.children.is_empty() && !self.evaluate_children(node, cart, items)? {
            debug!(kind = node.kind.name(), "children aggregate failed");
            return Ok(false);
        }

        let (result, attribute) = match &node.kind {
            NodeKind::Combine { .. } => (true, None),
            NodeKind::Record { scope, predicate } => (
                self.evaluate_record(*scope, predicate, cart, items)?,
                Some(predicate.attribute.as_str()),
            ),
            NodeKind::Subset {
                predicate,
                strategy,
            } => {
                let strategy = strategy.unwrap_or(self.config.subselect_strategy);
                (
                    evaluate_subset(self, predicate, strategy, &node.children, cart, items)?,
                    Some(predicate.attribute.as_str()),
                )
            }
        };

        debug!(kind = node.kind.name(), attribute, result, "condition evaluated");
        Ok(result)
    }

    fn evaluate_children(&self, node: &ConditionNode, cart: &Cart, items: &[Item]) -> Result<bool> {
        let expected = node.expected_child_result();

        match node.aggregator {
            Aggregator::All => {
                for child in &node.children {
                    if self.evaluate(child, cart, items)? != expected {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Aggregator::Any => {
                for child in &node.children {
                    if self.evaluate(child, cart, items)? == expected {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn evaluate_record(
        &self,
        scope: RecordScope,
        predicate: &Predicate,
        cart: &Cart,
        items: &[Item],
    ) -> Result<bool> {
        let right = predicate.operand();
        let attribute = predicate.attribute.as_str();

        let left = match scope {
            RecordScope::Item => {
                for item in items {
                    let left = resolve(item, attribute)?;
                    if compare(&left, predicate.operator, right.as_ref())? {
                        return Ok(true);
                    }
                }
                return Ok(false);
            }
            RecordScope::ShippingAddress => resolve_address(&cart.shipping_address, cart, attribute)?,
            RecordScope::BillingAddress => resolve_address(&cart.billing_address, cart, attribute)?,
            RecordScope::Customer => resolve(&cart.customer, attribute)?,
        };

        compare(&left, predicate.operator, right.as_ref())
    }
}

/// Validate `cart` against `node` with the default configuration
pub fn validate(node: &ConditionNode, cart: &Cart) -> Result<bool> {
    Validator::default().validate(node, cart)
}

/// Parse a JSON rule document and validate `cart` against it
pub fn validate_json(document: &str, cart: &Cart) -> Result<bool> {
    let node = parse(document)?;
    validate(&node, cart)
}
