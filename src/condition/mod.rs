//! Condition parsing and evaluation module
//!
//! This module parses JSON rule documents into condition trees and
//! evaluates them against a [`Cart`](crate::subject::Cart).

mod ast;
pub mod cache;
mod evaluator;
pub mod parser;
mod subselect;

#[cfg(test)]
mod property_tests;

pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
