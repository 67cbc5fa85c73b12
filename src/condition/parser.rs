//! Rule document parser
//!
//! Turns a JSON condition document into a [`ConditionNode`] tree. Every
//! tag, operator, aggregator and strategy string is checked here, so an
//! unknown operator anywhere in the document is reported before any part
//! of the tree is evaluated.

use crate::condition::ast::{
    Aggregator, ConditionNode, ConditionValue, NodeKind, Operator, Predicate, RecordScope,
    SubselectStrategy,
};
use crate::error::{Result, RuleError};
use serde::Deserialize;

/// A condition node exactly as it appears in a rule document
#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    #[serde(rename = "type", alias = "kind")]
    pub condition_type: String,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Option<ConditionValue>,
    #[serde(default)]
    pub aggregator: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub conditions: Option<Vec<RawCondition>>,
}

enum Tag {
    Combine,
    Record(RecordScope),
    Subset,
}

/// Parse a JSON rule document into a condition tree
pub fn parse(document: &str) -> Result<ConditionNode> {
    let raw: RawCondition = serde_json::from_str(document)?;
    ConditionNode::try_from(raw)
}

/// Parse an already decoded JSON value into a condition tree
pub fn parse_value(document: serde_json::Value) -> Result<ConditionNode> {
    let raw: RawCondition = serde_json::from_value(document)?;
    ConditionNode::try_from(raw)
}

impl TryFrom<RawCondition> for ConditionNode {
    type Error = RuleError;

    fn try_from(raw: RawCondition) -> Result<Self> {
        let tag = classify(&raw.condition_type)?;

        let aggregator = match raw.aggregator.as_deref().map(str::trim) {
            None | Some("") => Aggregator::All,
            Some(name) => name.parse()?,
        };

        let kind = match tag {
            Tag::Combine => NodeKind::Combine {
                expected: combine_expectation(raw.value.as_ref())?,
            },
            Tag::Record(scope) => NodeKind::Record {
                scope,
                predicate: predicate(&raw)?,
            },
            Tag::Subset => NodeKind::Subset {
                predicate: predicate(&raw)?,
                strategy: raw
                    .strategy
                    .as_deref()
                    .map(str::parse::<SubselectStrategy>)
                    .transpose()?,
            },
        };

        let children = raw
            .conditions
            .unwrap_or_default()
            .into_iter()
            .map(ConditionNode::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(ConditionNode {
            kind,
            aggregator,
            children,
        })
    }
}

/// Map a type tag to a node kind
///
/// Accepts namespaced class names (`Magento\SalesRule\Model\Rule\Condition\Product`)
/// by their last segment, and short names (`product`, `subselect`, ...).
fn classify(condition_type: &str) -> Result<Tag> {
    let normalized = condition_type.trim().to_ascii_lowercase().replace('\\', "/");
    let last = normalized.rsplit('/').next().unwrap_or_default();

    let tag = match last {
        "combine" => Tag::Combine,
        "product" | "item" => Tag::Record(RecordScope::Item),
        "subselect" | "product_subselect" => Tag::Subset,
        "address" | "shipping_address" => Tag::Record(RecordScope::ShippingAddress),
        "billing_address" => Tag::Record(RecordScope::BillingAddress),
        "customer" => Tag::Record(RecordScope::Customer),
        _ => return Err(RuleError::UnknownConditionType(condition_type.to_string())),
    };
    Ok(tag)
}

fn predicate(raw: &RawCondition) -> Result<Predicate> {
    let attribute = raw
        .attribute
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| {
            RuleError::DeserializationError(format!(
                "{} condition requires an attribute",
                raw.condition_type
            ))
        })?;

    let operator: Operator = raw
        .operator
        .as_deref()
        .ok_or_else(|| {
            RuleError::DeserializationError(format!(
                "{} condition requires an operator",
                raw.condition_type
            ))
        })?
        .parse()?;

    Ok(Predicate::new(attribute, operator, raw.value.clone()))
}

/// A combine node's value picks "ALL/ANY of these are TRUE" (1) or "FALSE" (0)
fn combine_expectation(value: Option<&ConditionValue>) -> Result<bool> {
    match value {
        None => Ok(true),
        Some(ConditionValue::Bool(b)) => Ok(*b),
        Some(ConditionValue::Integer(i)) => Ok(*i != 0),
        Some(ConditionValue::Float(f)) => Ok(*f != 0.0),
        Some(ConditionValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(RuleError::DeserializationError(format!(
                "combine value must be 1 or 0, got {:?}",
                other
            ))),
        },
        Some(ConditionValue::Array(_)) => Err(RuleError::DeserializationError(
            "combine value must be 1 or 0, got a list".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ast::CompareOp;

    const COMBINE: &str = r"Magento\\SalesRule\\Model\\Rule\\Condition\\Combine";
    const PRODUCT: &str = r"Magento\\SalesRule\\Model\\Rule\\Condition\\Product";
    const SUBSELECT: &str = r"Magento\\SalesRule\\Model\\Rule\\Condition\\Product\\Subselect";

    #[test]
    fn test_parse_namespaced_document() {
        let doc = format!(
            r#"{{
                "type": "{COMBINE}",
                "attribute": null,
                "operator": null,
                "value": "1",
                "is_value_processed": null,
                "aggregator": "all",
                "conditions": [
                    {{
                        "type": "{SUBSELECT}",
                        "attribute": "qty",
                        "operator": "==",
                        "value": "1",
                        "aggregator": "all",
                        "conditions": [
                            {{
                                "type": "{PRODUCT}",
                                "attribute": "sku",
                                "operator": "==",
                                "value": "1012096",
                                "is_value_processed": false,
                                "attribute_scope": null
                            }}
                        ]
                    }}
                ]
            }}"#
        );

        let tree = parse(&doc).unwrap();
        assert_eq!(tree.kind, NodeKind::Combine { expected: true });
        assert_eq!(tree.aggregator, Aggregator::All);
        assert_eq!(tree.children.len(), 1);

        let subselect = &tree.children[0];
        match &subselect.kind {
            NodeKind::Subset { predicate, strategy } => {
                assert_eq!(predicate.attribute, "qty");
                assert_eq!(predicate.operator, Operator::Compare(CompareOp::Equal));
                assert_eq!(predicate.value, Some(ConditionValue::String("1".to_string())));
                assert_eq!(*strategy, None);
            }
            other => panic!("Expected subselect, got {:?}", other),
        }

        match &subselect.children[0].kind {
            NodeKind::Record { scope, predicate } => {
                assert_eq!(*scope, RecordScope::Item);
                assert_eq!(predicate.attribute, "sku");
            }
            other => panic!("Expected item predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_short_names() {
        let cases = [
            ("product", "item"),
            ("item", "item"),
            ("address", "shipping_address"),
            ("shipping_address", "shipping_address"),
            ("billing_address", "billing_address"),
            ("customer", "customer"),
            ("subselect", "subselect"),
        ];

        for (tag, expected) in cases {
            let doc = format!(
                r#"{{"kind": "{tag}", "attribute": "x", "operator": "==", "value": 1}}"#
            );
            let node = parse(&doc).unwrap();
            assert_eq!(node.kind.name(), expected, "Failed for: {}", tag);
        }
    }

    #[test]
    fn test_parse_value_shapes() {
        let node = parse(r#"{"type": "product", "attribute": "category_ids", "operator": "()", "value": ["2", 3, 4.5]}"#)
            .unwrap();
        match node.kind {
            NodeKind::Record { predicate, .. } => assert_eq!(
                predicate.value,
                Some(ConditionValue::Array(vec![
                    ConditionValue::String("2".to_string()),
                    ConditionValue::Integer(3),
                    ConditionValue::Float(4.5),
                ]))
            ),
            other => panic!("Expected item predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_operator_anywhere_fails() {
        let doc = r#"{
            "type": "combine",
            "aggregator": "any",
            "conditions": [
                {"type": "customer", "attribute": "group_id", "operator": "==", "value": "2"},
                {"type": "customer", "attribute": "email", "operator": "~=", "value": "x"}
            ]
        }"#;
        assert_eq!(parse(doc), Err(RuleError::UnknownOperator("~=".to_string())));
    }

    #[test]
    fn test_unknown_aggregator() {
        let doc = r#"{"type": "combine", "aggregator": "most", "conditions": []}"#;
        assert_eq!(parse(doc), Err(RuleError::UnknownAggregator("most".to_string())));
    }

    #[test]
    fn test_missing_aggregator_defaults_to_all() {
        let doc = r#"{"type": "subselect", "attribute": "qty", "operator": ">=", "value": "3",
                      "conditions": [{"type": "product", "attribute": "sku", "operator": "==", "value": "A"}]}"#;
        assert_eq!(parse(doc).unwrap().aggregator, Aggregator::All);
    }

    #[test]
    fn test_unknown_condition_type() {
        let doc = r#"{"type": "Magento\\SalesRule\\Model\\Rule\\Condition\\Product\\Found"}"#;
        assert!(matches!(parse(doc), Err(RuleError::UnknownConditionType(_))));
    }

    #[test]
    fn test_combine_expectation() {
        let falsy = parse(r#"{"type": "combine", "value": "0"}"#).unwrap();
        assert_eq!(falsy.kind, NodeKind::Combine { expected: false });

        let truthy = parse(r#"{"type": "combine", "value": true}"#).unwrap();
        assert_eq!(truthy.kind, NodeKind::Combine { expected: true });

        assert!(parse(r#"{"type": "combine", "value": "maybe"}"#).is_err());
    }

    #[test]
    fn test_strategy_field() {
        let doc = r#"{"type": "subselect", "attribute": "qty", "operator": ">=", "value": 3, "strategy": "sum"}"#;
        match parse(doc).unwrap().kind {
            NodeKind::Subset { strategy, .. } => assert_eq!(strategy, Some(SubselectStrategy::Sum)),
            other => panic!("Expected subselect, got {:?}", other),
        }

        let bad = r#"{"type": "subselect", "attribute": "qty", "operator": ">=", "value": 3, "strategy": "avg"}"#;
        assert_eq!(parse(bad), Err(RuleError::UnknownStrategy("avg".to_string())));
    }

    #[test]
    fn test_predicate_requires_attribute_and_operator() {
        assert!(matches!(
            parse(r#"{"type": "customer", "operator": "==", "value": 1}"#),
            Err(RuleError::DeserializationError(_))
        ));
        assert!(matches!(
            parse(r#"{"type": "customer", "attribute": "group_id", "value": 1}"#),
            Err(RuleError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse("{not json"), Err(RuleError::DeserializationError(_))));
    }
}
