//! Customer record

use crate::subject::address::Address;
use crate::subject::resolver::AttributeSource;
use crate::subject::value::AttributeValue;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// The customer who owns the cart
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: i64,
    pub group_id: i64,
    pub email: String,
    #[serde(alias = "firstname")]
    pub first_name: String,
    #[serde(alias = "lastname")]
    pub last_name: String,
    pub gender: String,
    #[serde(alias = "dob")]
    pub date_of_birth: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(alias = "orders")]
    pub orders_count: i64,
    pub total_spent: f64,
    pub average_order_amount: f64,
    pub addresses: Vec<Address>,
    pub is_subscribed: bool,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl AttributeSource for Customer {
    fn known_attribute(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "id" | "customer_id" => self.id.into(),
            "group_id" => self.group_id.into(),
            "email" => self.email.as_str().into(),
            "firstname" => self.first_name.as_str().into(),
            "lastname" => self.last_name.as_str().into(),
            "gender" => self.gender.as_str().into(),
            "dob" => self.date_of_birth.into(),
            "created_at" => self.created_at.into(),
            "last_login_at" => self.last_login_at.into(),
            "orders_count" => self.orders_count.into(),
            "total_spent" => self.total_spent.into(),
            "average_order_amount" => self.average_order_amount.into(),
            "is_subscribed" => self.is_subscribed.into(),
            _ => return None,
        };
        Some(value)
    }

    fn free_form(&self) -> Option<&HashMap<String, serde_json::Value>> {
        Some(&self.attributes)
    }

    fn structural_field(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "id" => self.id.into(),
            "groupid" => self.group_id.into(),
            "email" => self.email.as_str().into(),
            "firstname" => self.first_name.as_str().into(),
            "lastname" => self.last_name.as_str().into(),
            "gender" => self.gender.as_str().into(),
            "dateofbirth" => self.date_of_birth.into(),
            "createdat" => self.created_at.into(),
            "lastloginat" => self.last_login_at.into(),
            "orders" | "orderscount" => self.orders_count.into(),
            "totalspent" => self.total_spent.into(),
            "averageorderamount" => self.average_order_amount.into(),
            "issubscribed" => self.is_subscribed.into(),
            _ => return None,
        };
        Some(value)
    }
}
