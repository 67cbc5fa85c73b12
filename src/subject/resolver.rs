//! Attribute resolution over subject records
//!
//! Every record exposes two fixed tables: the rule attribute codes rules are
//! written against (`final_price`, `group_id`, ...) and its own field names
//! (`FinalPrice`, `GroupID`, ...). Lookup order is attribute code, free-form
//! attributes, then field name.

use crate::error::{Result, RuleError};
use crate::subject::address::Address;
use crate::subject::cart::Cart;
use crate::subject::value::AttributeValue;
use std::collections::HashMap;

/// A record a rule attribute can be read from
pub trait AttributeSource {
    /// Look up a rule attribute code; `key` is already lowercased
    fn known_attribute(&self, key: &str) -> Option<AttributeValue>;

    /// Free-form attribute map, for records that carry one
    fn free_form(&self) -> Option<&HashMap<String, serde_json::Value>> {
        None
    }

    /// Look up a field by name; `key` is lowercased with underscores removed
    fn structural_field(&self, key: &str) -> Option<AttributeValue>;
}

/// Resolve `attribute` on `record`, case-insensitively
pub fn resolve<R: AttributeSource + ?Sized>(record: &R, attribute: &str) -> Result<AttributeValue> {
    lookup(record, attribute).ok_or_else(|| RuleError::AttributeNotFound(attribute.to_string()))
}

/// Resolve an address-scoped attribute, falling back to cart totals
///
/// Address conditions also cover the cart totals (`base_subtotal`,
/// `total_qty`, `weight`, ...).
pub fn resolve_address(address: &Address, cart: &Cart, attribute: &str) -> Result<AttributeValue> {
    lookup(address, attribute)
        .or_else(|| lookup(cart, attribute))
        .ok_or_else(|| RuleError::AttributeNotFound(attribute.to_string()))
}

fn lookup<R: AttributeSource + ?Sized>(record: &R, attribute: &str) -> Option<AttributeValue> {
    let key = attribute.trim().to_ascii_lowercase();

    if let Some(value) = record.known_attribute(&key) {
        return Some(value);
    }

    if let Some(map) = record.free_form() {
        let found = map.get(attribute).or_else(|| {
            map.iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(attribute.trim()))
                .map(|(_, value)| value)
        });
        if let Some(value) = found {
            return Some(AttributeValue::from(value));
        }
    }

    let field: String = key.chars().filter(|c| *c != '_').collect();
    record.structural_field(&field)
}
