//! Property tests for condition module
//!
//! Aggregator semantics, existential item matching, subselect strategies
//! and agreement between parsed documents, built trees and the cache.

use proptest::prelude::*;
use serde_json::json;

use crate::condition::ast::{Aggregator, ConditionNode, RecordScope, SubselectStrategy};
use crate::condition::cache::check_rule;
use crate::condition::evaluator::{validate, Validator};
use crate::condition::parser::parse_value;
use crate::config::ValidatorConfig;
use crate::subject::{Cart, Customer, Item};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Generate an aggregator
fn aggregator_strategy() -> impl Strategy<Value = Aggregator> {
    prop_oneof![Just(Aggregator::All), Just(Aggregator::Any)]
}

/// Generate a comparison operator name
fn comparison_operator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(">"),
        Just("<"),
        Just(">="),
        Just("<="),
        Just("=="),
        Just("!="),
    ]
}

/// Generate (sku number, quantity, category) triples for cart items
fn items_strategy() -> impl Strategy<Value = Vec<(u8, i64, i64)>> {
    prop::collection::vec((0..10u8, 1..=5i64, 1..=3i64), 0..=6)
}

fn build_cart(group_id: i64, items: &[(u8, i64, i64)]) -> Cart {
    Cart {
        items: items
            .iter()
            .map(|(sku, qty, category)| {
                let mut item = Item::new(&format!("SKU{}", sku), *qty, 10.0);
                item.category_ids.insert(*category);
                item
            })
            .collect(),
        customer: Customer {
            group_id,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn group_leaf(target: i64) -> ConditionNode {
    ConditionNode::record(
        RecordScope::Customer,
        "group_id",
        "==".parse().unwrap(),
        target,
    )
}

fn numeric_holds(op: &str, left: i64, right: i64) -> bool {
    match op {
        ">" => left > right,
        "<" => left < right,
        ">=" => left >= right,
        "<=" => left <= right,
        "==" => left == right,
        _ => left != right,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// ALL holds iff every child holds, ANY iff at least one does
    #[test]
    fn prop_aggregator_evaluation(
        aggregator in aggregator_strategy(),
        group_id in 0..=4i64,
        targets in prop::collection::vec(0..=4i64, 1..=6)
    ) {
        let node = ConditionNode::combine(
            aggregator,
            targets.iter().map(|t| group_leaf(*t)).collect(),
        );
        let cart = build_cart(group_id, &[]);

        let expected = match aggregator {
            Aggregator::All => targets.iter().all(|t| *t == group_id),
            Aggregator::Any => targets.iter().any(|t| *t == group_id),
        };
        prop_assert_eq!(validate(&node, &cart).unwrap(), expected);
    }

    /// An item predicate holds iff at least one item satisfies it
    #[test]
    fn prop_item_predicate_is_existential(
        items in items_strategy(),
        wanted in 0..10u8
    ) {
        let node = ConditionNode::record(
            RecordScope::Item,
            "sku",
            "==".parse().unwrap(),
            format!("SKU{}", wanted).as_str(),
        );
        let cart = build_cart(0, &items);

        let expected = items.iter().any(|(sku, _, _)| *sku == wanted);
        prop_assert_eq!(validate(&node, &cart).unwrap(), expected);
    }

    /// Numeric comparisons agree with integer arithmetic
    #[test]
    fn prop_comparison_operators(
        op in comparison_operator_strategy(),
        orders in 0..=20i64,
        threshold in 0..=20i64
    ) {
        let doc = json!({
            "type": "customer",
            "attribute": "orders_count",
            "operator": op,
            "value": threshold.to_string()
        });
        let node = parse_value(doc).unwrap();
        let cart = Cart {
            customer: Customer { orders_count: orders, ..Default::default() },
            ..Default::default()
        };

        prop_assert_eq!(validate(&node, &cart).unwrap(), numeric_holds(op, orders, threshold));
    }

    /// Per-item checks each matching item, sum checks their total
    #[test]
    fn prop_subselect_strategies(
        items in items_strategy(),
        category in 1..=3i64,
        threshold in 1..=12i64
    ) {
        let node = ConditionNode::subset(
            "qty",
            ">=".parse().unwrap(),
            threshold,
            vec![ConditionNode::record(
                RecordScope::Item,
                "category_ids",
                "()".parse().unwrap(),
                vec![category],
            )],
        );
        let cart = build_cart(0, &items);

        let matching: Vec<i64> = items
            .iter()
            .filter(|(_, _, c)| *c == category)
            .map(|(_, qty, _)| *qty)
            .collect();
        let any_match = !matching.is_empty();

        let per_item = Validator::new(ValidatorConfig { subselect_strategy: SubselectStrategy::PerItem });
        let sum = Validator::new(ValidatorConfig { subselect_strategy: SubselectStrategy::Sum });

        prop_assert_eq!(
            per_item.validate(&node, &cart).unwrap(),
            any_match && matching.iter().all(|qty| *qty >= threshold)
        );
        prop_assert_eq!(
            sum.validate(&node, &cart).unwrap(),
            any_match && matching.iter().sum::<i64>() >= threshold
        );
    }

    /// A parsed document, the equivalent built tree and the cached path agree
    #[test]
    fn prop_parsed_built_and_cached_agree(
        aggregator in aggregator_strategy(),
        group_id in 0..=4i64,
        targets in prop::collection::vec(0..=4i64, 0..=4)
    ) {
        let doc = json!({
            "type": "combine",
            "aggregator": if aggregator == Aggregator::All { "all" } else { "any" },
            "conditions": targets
                .iter()
                .map(|t| json!({
                    "type": "customer",
                    "attribute": "group_id",
                    "operator": "==",
                    "value": t.to_string()
                }))
                .collect::<Vec<_>>()
        });
        let built = ConditionNode::combine(
            aggregator,
            targets.iter().map(|t| group_leaf(*t)).collect(),
        );
        let cart = build_cart(group_id, &[]);

        let parsed = parse_value(doc.clone()).unwrap();
        let expected = validate(&built, &cart).unwrap();

        prop_assert_eq!(validate(&parsed, &cart).unwrap(), expected);
        prop_assert_eq!(
            check_rule(&Validator::default(), &doc.to_string(), &cart).unwrap(),
            expected
        );
    }
}
