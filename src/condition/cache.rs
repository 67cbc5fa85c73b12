//! Rule document cache - parsed trees keyed by document text
//!
//! The cache is bounded: once it holds [`MAX_CACHED_RULES`] documents it is
//! emptied before the next insert, so callers passing arbitrary JSON (the
//! Python binding) cannot grow it without limit.

use crate::condition::ast::ConditionNode;
use crate::condition::evaluator::Validator;
use crate::condition::parser;
use crate::error::Result;
use crate::subject::Cart;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// Most rule documents kept at once
pub const MAX_CACHED_RULES: usize = 1024;

/// Global rule cache with fast hashing (ahash)
static RULE_CACHE: Lazy<RwLock<AHashMap<String, Arc<ConditionNode>>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(256);
    RwLock::new(map)
});

/// Insert into a size-bounded memo map, returning the value now stored
///
/// A full map is cleared first. Concurrent inserts of the same key keep the
/// first value.
pub(crate) fn insert_bounded<V: Clone>(
    cache: &mut AHashMap<String, V>,
    key: &str,
    value: V,
    capacity: usize,
) -> V {
    if let Some(existing) = cache.get(key) {
        return existing.clone();
    }
    if cache.len() >= capacity {
        debug!(capacity, "memo cache full, clearing");
        cache.clear();
    }
    cache.insert(key.to_string(), value.clone());
    value
}

/// Get or parse a rule document, using cache for repeated documents
///
/// Documents that fail to parse are not cached.
#[inline]
pub fn get_or_parse(document: &str) -> Result<Arc<ConditionNode>> {
    // Fast path: check read lock first
    {
        let cache = RULE_CACHE.read();
        if let Some(node) = cache.get(document) {
            return Ok(Arc::clone(node));
        }
    }

    // Slow path: parse and cache
    let node = Arc::new(parser::parse(document)?);
    trace!(len = document.len(), "rule document parsed");

    let mut cache = RULE_CACHE.write();
    Ok(insert_bounded(&mut cache, document, node, MAX_CACHED_RULES))
}

/// Check a cart against a rule document, using the cached tree
///
/// A blank document is a rule without conditions and always holds.
#[inline]
pub fn check_rule(validator: &Validator, document: &str, cart: &Cart) -> Result<bool> {
    if document.trim().is_empty() {
        return Ok(true);
    }

    let node = get_or_parse(document)?;
    validator.validate(&node, cart)
}

/// Clear the rule cache
pub fn clear_cache() {
    RULE_CACHE.write().clear();
}

/// Number of cached rule documents
pub fn cache_size() -> usize {
    RULE_CACHE.read().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::subject::Customer;
    use parking_lot::Mutex;

    /// Serializes the tests that inspect or clear the shared cache
    static CACHE_GUARD: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn cart(group_id: i64) -> Cart {
        Cart {
            customer: Customer {
                group_id,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_hit() {
        let _guard = CACHE_GUARD.lock();
        let doc = r#"{"type": "customer", "attribute": "group_id", "operator": "==", "value": "7"}"#;
        let validator = Validator::default();

        assert!(check_rule(&validator, doc, &cart(7)).unwrap());
        assert!(!check_rule(&validator, doc, &cart(8)).unwrap());

        let first = get_or_parse(doc).unwrap();
        let second = get_or_parse(doc).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache_size() >= 1);
    }

    #[test]
    fn test_empty_document() {
        let validator = Validator::default();
        assert!(check_rule(&validator, "", &Cart::default()).unwrap());
        assert!(check_rule(&validator, "  \n", &Cart::default()).unwrap());
    }

    #[test]
    fn test_parse_errors_are_returned() {
        let doc = r#"{"type": "customer", "attribute": "group_id", "operator": "~~", "value": "1"}"#;
        assert_eq!(
            get_or_parse(doc).unwrap_err(),
            RuleError::UnknownOperator("~~".to_string())
        );
    }

    #[test]
    fn test_clear_cache() {
        let _guard = CACHE_GUARD.lock();
        let doc = r#"{"type": "combine", "aggregator": "any", "conditions": []}"#;

        let before = get_or_parse(doc).unwrap();
        clear_cache();
        let after = get_or_parse(doc).unwrap();

        // Reparsed into a fresh tree with the same shape
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }

    #[test]
    fn test_insert_bounded_clears_when_full() {
        let mut cache = AHashMap::new();
        assert_eq!(insert_bounded(&mut cache, "a", 1, 2), 1);
        assert_eq!(insert_bounded(&mut cache, "b", 2, 2), 2);
        assert_eq!(cache.len(), 2);

        // Existing keys are returned without growing the map
        assert_eq!(insert_bounded(&mut cache, "a", 10, 2), 1);
        assert_eq!(cache.len(), 2);

        assert_eq!(insert_bounded(&mut cache, "c", 3, 2), 3);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c"), Some(&3));
    }
}
