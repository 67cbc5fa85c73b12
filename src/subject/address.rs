//! Shipping and billing addresses

use crate::subject::resolver::AttributeSource;
use crate::subject::value::AttributeValue;
use serde::Deserialize;

/// A postal address attached to the cart or the customer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(alias = "country_id")]
    pub country: String,
    pub region: String,
    pub region_id: i64,
    pub city: String,
    #[serde(alias = "postcode")]
    pub postal_code: String,
    pub street: Vec<String>,
    pub telephone: String,
    pub company: String,
    #[serde(alias = "firstname")]
    pub first_name: String,
    #[serde(alias = "lastname")]
    pub last_name: String,
    pub email: String,
}

impl AttributeSource for Address {
    fn known_attribute(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "country" | "country_id" => self.country.as_str().into(),
            "region" => self.region.as_str().into(),
            "region_id" => self.region_id.into(),
            "city" => self.city.as_str().into(),
            "postcode" | "postal_code" => self.postal_code.as_str().into(),
            "street" => self.street.as_slice().into(),
            "telephone" => self.telephone.as_str().into(),
            "company" => self.company.as_str().into(),
            "firstname" => self.first_name.as_str().into(),
            "lastname" => self.last_name.as_str().into(),
            "email" => self.email.as_str().into(),
            _ => return None,
        };
        Some(value)
    }

    fn structural_field(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "country" => self.country.as_str().into(),
            "region" => self.region.as_str().into(),
            "regionid" => self.region_id.into(),
            "city" => self.city.as_str().into(),
            "postalcode" => self.postal_code.as_str().into(),
            "street" => self.street.as_slice().into(),
            "telephone" => self.telephone.as_str().into(),
            "company" => self.company.as_str().into(),
            "firstname" => self.first_name.as_str().into(),
            "lastname" => self.last_name.as_str().into(),
            "email" => self.email.as_str().into(),
            _ => return None,
        };
        Some(value)
    }
}
