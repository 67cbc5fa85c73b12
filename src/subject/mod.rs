//! Subject records rules are evaluated against
//!
//! A [`Cart`] bundles the line items, the shipping and billing addresses,
//! the customer and the cart totals. Records are borrowed for one
//! evaluation and never mutated.

mod address;
mod cart;
mod customer;
mod item;
pub mod resolver;
mod value;

pub use address::*;
pub use cart::*;
pub use customer::*;
pub use item::*;
pub use resolver::{resolve, resolve_address, AttributeSource};
pub use value::*;
