//! Sales Rule Core - condition evaluator for shopping cart rules
//!
//! Parses JSON rule documents into condition trees and decides whether a
//! cart (items, addresses, customer and totals) satisfies them. Python
//! bindings via PyO3 are available behind the `python` feature.

pub mod compare;
pub mod condition;
pub mod config;
pub mod error;
pub mod subject;

pub use crate::condition::{validate, validate_json, ConditionNode, Validator};
pub use crate::config::ValidatorConfig;
pub use crate::error::{Result, RuleError};
pub use crate::subject::{Address, Cart, Customer, Item};

#[cfg(feature = "python")]
mod python {
    use crate::condition::{check_rule, SubselectStrategy, Validator};
    use crate::config::ValidatorConfig;
    use crate::error::RuleError;
    use crate::subject::Cart;
    use once_cell::sync::OnceCell;
    use parking_lot::RwLock;
    use pyo3::prelude::*;
    use std::sync::Arc;

    // ============================================================================
    // Cached Validator
    // ============================================================================

    /// Global validator, configured by `init_config`
    static CACHED_VALIDATOR: OnceCell<Arc<RwLock<Validator>>> = OnceCell::new();

    // ============================================================================
    // Helper Functions
    // ============================================================================

    /// The configured validator, or the default one before `init_config`
    fn current_validator() -> Validator {
        CACHED_VALIDATOR
            .get()
            .map(|validator| *validator.read())
            .unwrap_or_default()
    }

    fn run(validator: &Validator, rule_json: &str, cart_json: &str) -> PyResult<bool> {
        let cart: Cart = serde_json::from_str(cart_json).map_err(RuleError::from)?;
        Ok(check_rule(validator, rule_json, &cart)?)
    }

    // ============================================================================
    // Python Functions
    // ============================================================================

    /// Configure the process-wide validator
    ///
    /// # Arguments
    /// * `subselect_strategy` - "per_item" (default) or "sum"
    #[pyfunction]
    #[pyo3(signature = (subselect_strategy=None))]
    fn init_config(subselect_strategy: Option<&str>) -> PyResult<()> {
        let subselect_strategy = match subselect_strategy {
            Some(name) => name.parse::<SubselectStrategy>()?,
            None => SubselectStrategy::default(),
        };
        let validator = Validator::new(ValidatorConfig { subselect_strategy });

        // If already initialized, update the validator
        if let Some(existing) = CACHED_VALIDATOR.get() {
            *existing.write() = validator;
        } else {
            let _ = CACHED_VALIDATOR.set(Arc::new(RwLock::new(validator)));
        }

        Ok(())
    }

    /// Check if config is initialized
    #[pyfunction]
    fn is_config_initialized() -> bool {
        CACHED_VALIDATOR.get().is_some()
    }

    /// Validate a cart against a rule
    ///
    /// # Arguments
    /// * `rule_json` - Rule condition document
    /// * `cart_json` - Cart with items, addresses and customer
    ///
    /// # Raises
    /// KeyError for unknown attributes, ValueError for any other rule error
    #[pyfunction]
    fn validate(rule_json: &str, cart_json: &str) -> PyResult<bool> {
        run(&current_validator(), rule_json, cart_json)
    }

    /// Validate a cart against a rule without blocking the event loop
    ///
    /// # Example (Python)
    /// ```python
    /// ok = await validate_async(rule_json, cart_json)
    /// ```
    #[pyfunction]
    fn validate_async<'py>(
        py: Python<'py>,
        rule_json: String,
        cart_json: String,
    ) -> PyResult<Bound<'py, PyAny>> {
        let validator = current_validator();

        pyo3_async_runtimes::tokio::future_into_py(py, async move {
            tokio::task::spawn_blocking(move || run(&validator, &rule_json, &cart_json))
                .await
                .map_err(|e| {
                    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                        "Validation task panicked: {}",
                        e
                    ))
                })?
        })
    }

    // ============================================================================
    // Python Module Definition
    // ============================================================================

    #[pymodule]
    fn sales_rule_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(init_config, m)?)?;
        m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
        m.add_function(wrap_pyfunction!(validate, m)?)?;
        m.add_function(wrap_pyfunction!(validate_async, m)?)?;
        Ok(())
    }
}
