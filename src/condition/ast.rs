//! Condition tree types

use crate::error::{Result, RuleError};
use crate::subject::AttributeValue;
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A node of a condition tree
///
/// Built once (usually by [`parse`](crate::condition::parse)) and evaluated
/// any number of times. Holds no evaluation state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub kind: NodeKind,
    pub aggregator: Aggregator,
    pub children: Vec<ConditionNode>,
}

/// What a node checks on its own, independent of its children
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure aggregator. `expected` is the result each child is held to:
    /// "if ALL of these conditions are TRUE" or "... are FALSE".
    Combine { expected: bool },
    /// Predicate over one record type
    Record {
        scope: RecordScope,
        predicate: Predicate,
    },
    /// Predicate over the items matching the node's children
    Subset {
        predicate: Predicate,
        strategy: Option<SubselectStrategy>,
    },
}

/// Record type a [`NodeKind::Record`] predicate reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// Line items, existential: one matching item is enough
    Item,
    ShippingAddress,
    BillingAddress,
    Customer,
}

/// A leaf `(attribute, operator, value)` check
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub attribute: String,
    pub operator: Operator,
    pub value: Option<ConditionValue>,
}

/// Combinator applied to a node's child results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregator {
    #[default]
    All,
    Any,
}

/// How a subselect turns the matching items into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubselectStrategy {
    /// Every matching item's own value must satisfy the comparison
    #[default]
    #[serde(alias = "per-item")]
    PerItem,
    /// The summed value of all matching items is compared once
    #[serde(alias = "sum-matching", alias = "sum_matching")]
    Sum,
}

/// Ordering and equality operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (==)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,
}

/// Comparison operators, grouped by family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// ==, !=, >, >=, <, <=
    Compare(CompareOp),
    /// Substring test ({}) and its negation (!{})
    Contains { negated: bool },
    /// Set membership (()) and its negation (!())
    InSet { negated: bool },
    /// Zero-value test (null) and its negation (notnull)
    Null { negated: bool },
    /// Wildcard pattern (like) and its negation (nlike)
    Like { negated: bool },
}

/// Right-hand operand of a predicate
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<ConditionValue>),
}

impl ConditionNode {
    /// Combine node expecting its children to be true
    pub fn combine(aggregator: Aggregator, children: Vec<ConditionNode>) -> Self {
        Self {
            kind: NodeKind::Combine { expected: true },
            aggregator,
            children,
        }
    }

    /// Leaf predicate over one record type
    pub fn record(
        scope: RecordScope,
        attribute: &str,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            kind: NodeKind::Record {
                scope,
                predicate: Predicate::new(attribute, operator, Some(value.into())),
            },
            aggregator: Aggregator::All,
            children: Vec::new(),
        }
    }

    /// Subselect over the items matching every child
    pub fn subset(
        attribute: &str,
        operator: Operator,
        value: impl Into<ConditionValue>,
        children: Vec<ConditionNode>,
    ) -> Self {
        Self {
            kind: NodeKind::Subset {
                predicate: Predicate::new(attribute, operator, Some(value.into())),
                strategy: None,
            },
            aggregator: Aggregator::All,
            children,
        }
    }

    /// Pin the subselect strategy; no effect on other node kinds
    pub fn with_strategy(mut self, strategy: SubselectStrategy) -> Self {
        if let NodeKind::Subset { strategy: s, .. } = &mut self.kind {
            *s = Some(strategy);
        }
        self
    }

    /// Result each child must produce to count towards the aggregator
    pub fn expected_child_result(&self) -> bool {
        match self.kind {
            NodeKind::Combine { expected } => expected,
            _ => true,
        }
    }
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Combine { .. } => "combine",
            NodeKind::Record { scope, .. } => scope.name(),
            NodeKind::Subset { .. } => "subselect",
        }
    }
}

impl RecordScope {
    pub fn name(self) -> &'static str {
        match self {
            RecordScope::Item => "item",
            RecordScope::ShippingAddress => "shipping_address",
            RecordScope::BillingAddress => "billing_address",
            RecordScope::Customer => "customer",
        }
    }
}

impl Predicate {
    pub fn new(attribute: &str, operator: Operator, value: Option<ConditionValue>) -> Self {
        Self {
            attribute: attribute.to_string(),
            operator,
            value,
        }
    }

    /// The right operand in the form the comparator works on
    pub fn operand(&self) -> Option<AttributeValue> {
        self.value.as_ref().map(AttributeValue::from)
    }
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
        }
    }

    /// Apply the operator to two comparable values
    #[inline]
    pub fn apply<T: PartialOrd + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            CompareOp::Equal => left == right,
            CompareOp::NotEqual => left != right,
            CompareOp::Greater => left > right,
            CompareOp::GreaterEqual => left >= right,
            CompareOp::Less => left < right,
            CompareOp::LessEqual => left <= right,
        }
    }

    /// Interpret an already computed ordering
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::GreaterEqual => ordering != Ordering::Less,
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessEqual => ordering != Ordering::Greater,
        }
    }
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Compare(op) => op.as_str(),
            Operator::Contains { negated: false } => "{}",
            Operator::Contains { negated: true } => "!{}",
            Operator::InSet { negated: false } => "()",
            Operator::InSet { negated: true } => "!()",
            Operator::Null { negated: false } => "null",
            Operator::Null { negated: true } => "notnull",
            Operator::Like { negated: false } => "like",
            Operator::Like { negated: true } => "nlike",
        }
    }
}

impl FromStr for Operator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim() {
            "==" => Operator::Compare(CompareOp::Equal),
            "!=" => Operator::Compare(CompareOp::NotEqual),
            ">" => Operator::Compare(CompareOp::Greater),
            ">=" => Operator::Compare(CompareOp::GreaterEqual),
            "<" => Operator::Compare(CompareOp::Less),
            "<=" => Operator::Compare(CompareOp::LessEqual),
            "{}" => Operator::Contains { negated: false },
            "!{}" => Operator::Contains { negated: true },
            "()" => Operator::InSet { negated: false },
            "!()" => Operator::InSet { negated: true },
            "null" => Operator::Null { negated: false },
            "notnull" => Operator::Null { negated: true },
            "like" => Operator::Like { negated: false },
            "nlike" => Operator::Like { negated: true },
            other => return Err(RuleError::UnknownOperator(other.to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Aggregator::All),
            "any" => Ok(Aggregator::Any),
            _ => Err(RuleError::UnknownAggregator(s.to_string())),
        }
    }
}

impl FromStr for SubselectStrategy {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_item" | "per-item" => Ok(SubselectStrategy::PerItem),
            "sum" | "sum_matching" | "sum-matching" => Ok(SubselectStrategy::Sum),
            _ => Err(RuleError::UnknownStrategy(s.to_string())),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::String(s.to_string())
    }
}

impl From<i64> for ConditionValue {
    fn from(i: i64) -> Self {
        ConditionValue::Integer(i)
    }
}

impl From<f64> for ConditionValue {
    fn from(f: f64) -> Self {
        ConditionValue::Float(f)
    }
}

impl From<bool> for ConditionValue {
    fn from(b: bool) -> Self {
        ConditionValue::Bool(b)
    }
}

impl<T: Into<ConditionValue>> From<Vec<T>> for ConditionValue {
    fn from(values: Vec<T>) -> Self {
        ConditionValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<&ConditionValue> for AttributeValue {
    fn from(value: &ConditionValue) -> Self {
        match value {
            ConditionValue::Bool(b) => AttributeValue::Bool(*b),
            ConditionValue::Integer(i) => AttributeValue::Integer(*i),
            ConditionValue::Float(f) => AttributeValue::Float(*f),
            ConditionValue::String(s) => AttributeValue::String(s.clone()),
            ConditionValue::Array(arr) => {
                AttributeValue::List(arr.iter().map(AttributeValue::from).collect())
            }
        }
    }
}
