//! Cart line item

use crate::subject::resolver::AttributeSource;
use crate::subject::value::AttributeValue;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

/// A product line in the cart
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Item {
    pub sku: String,
    pub name: String,
    #[serde(alias = "qty")]
    pub quantity: i64,
    pub price: f64,
    pub final_price: f64,
    pub special_price: f64,
    pub weight: f64,
    pub category_ids: BTreeSet<i64>,
    pub attributes: HashMap<String, serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create an item with the fields most rules look at
    pub fn new(sku: &str, quantity: i64, price: f64) -> Self {
        Self {
            sku: sku.to_string(),
            quantity,
            price,
            ..Default::default()
        }
    }

    /// Line total, using the final price when one is set
    pub fn row_total(&self) -> f64 {
        let unit = if self.final_price > 0.0 {
            self.final_price
        } else {
            self.price
        };
        unit * self.quantity as f64
    }

    fn category_list(&self) -> AttributeValue {
        AttributeValue::List(
            self.category_ids
                .iter()
                .map(|id| AttributeValue::Integer(*id))
                .collect(),
        )
    }
}

impl AttributeSource for Item {
    fn known_attribute(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "sku" => self.sku.as_str().into(),
            "name" => self.name.as_str().into(),
            "price" | "base_price" => self.price.into(),
            "final_price" => self.final_price.into(),
            "special_price" => self.special_price.into(),
            "quantity" | "qty" => self.quantity.into(),
            "weight" => self.weight.into(),
            "category_ids" => self.category_list(),
            "row_total" | "base_row_total" => self.row_total().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn free_form(&self) -> Option<&HashMap<String, serde_json::Value>> {
        Some(&self.attributes)
    }

    fn structural_field(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "sku" => self.sku.as_str().into(),
            "name" => self.name.as_str().into(),
            "quantity" => self.quantity.into(),
            "price" => self.price.into(),
            "finalprice" => self.final_price.into(),
            "specialprice" => self.special_price.into(),
            "weight" => self.weight.into(),
            "categoryids" => self.category_list(),
            "createdat" => self.created_at.into(),
            "updatedat" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}
