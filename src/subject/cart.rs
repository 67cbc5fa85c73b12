//! Cart (the evaluation subject)

use crate::subject::address::Address;
use crate::subject::customer::Customer;
use crate::subject::item::Item;
use crate::subject::resolver::AttributeSource;
use crate::subject::value::AttributeValue;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A shopping cart with its items, addresses and customer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Cart {
    pub items: Vec<Item>,
    pub subtotal: f64,
    pub grand_total: f64,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub customer: Customer,
    pub coupon_code: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Sum of item quantities
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of item weights, counting each unit
    pub fn total_weight(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.weight * item.quantity as f64)
            .sum()
    }
}

impl AttributeSource for Cart {
    fn known_attribute(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "subtotal" | "base_subtotal" => self.subtotal.into(),
            "grand_total" | "base_grand_total" => self.grand_total.into(),
            "coupon_code" => self.coupon_code.as_str().into(),
            "created_at" => self.created_at.into(),
            "items_count" => (self.items.len() as i64).into(),
            "total_qty" | "total_quantity" => self.total_quantity().into(),
            "weight" => self.total_weight().into(),
            _ => return None,
        };
        Some(value)
    }

    fn structural_field(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "subtotal" => self.subtotal.into(),
            "grandtotal" => self.grand_total.into(),
            "couponcode" => self.coupon_code.as_str().into(),
            "createdat" => self.created_at.into(),
            _ => return None,
        };
        Some(value)
    }
}
