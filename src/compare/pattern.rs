//! `like` pattern compilation, memoised by pattern text

use crate::condition::cache::insert_bounded;
use crate::error::{Result, RuleError};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};

const MAX_CACHED_PATTERNS: usize = 1024;

/// Compiled `like` patterns with fast hashing (ahash)
static PATTERN_CACHE: Lazy<RwLock<AHashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(AHashMap::with_capacity(64)));

/// Anchored, case-insensitive regex for a `like` pattern
///
/// `%` matches any run of characters; everything else is literal. An item
/// predicate tested over many items compiles its pattern once.
pub fn like_pattern(pattern: &str) -> Result<Regex> {
    if let Some(regex) = PATTERN_CACHE.read().get(pattern) {
        return Ok(regex.clone());
    }

    let regex = compile(pattern)?;
    let mut cache = PATTERN_CACHE.write();
    Ok(insert_bounded(&mut cache, pattern, regex, MAX_CACHED_PATTERNS))
}

fn compile(pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('%')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    RegexBuilder::new(&format!("^{}$", body))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| RuleError::InvalidPattern(e.to_string()))
}
