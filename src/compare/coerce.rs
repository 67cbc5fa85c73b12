//! Operand coercion for comparisons

use crate::error::{Result, RuleError};
use crate::subject::AttributeValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

/// A numeric operand, kept as an integer whenever the source is integral
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i128),
    Float(f64),
}

impl Numeric {
    /// Total order between two numerics; integers compare exactly
    pub fn compare(self, other: Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Integer(l), Numeric::Integer(r)) => Some(l.cmp(&r)),
            (Numeric::Integer(i), Numeric::Float(f)) => compare_int_float(i, f),
            (Numeric::Float(f), Numeric::Integer(i)) => {
                compare_int_float(i, f).map(Ordering::reverse)
            }
            (Numeric::Float(l), Numeric::Float(r)) => l.partial_cmp(&r),
        }
    }
}

fn compare_int_float(i: i128, f: f64) -> Option<Ordering> {
    // Integral floats inside the i128 range compare without rounding the integer
    if f.fract() == 0.0 && f >= i128::MIN as f64 && f < i128::MAX as f64 {
        Some(i.cmp(&(f as i128)))
    } else {
        (i as f64).partial_cmp(&f)
    }
}

/// Exact numeric view of a value
///
/// Integers, booleans, instants and integral strings stay integers, so
/// values past 2^53 (long numeric SKUs, large ids) never collapse together.
pub fn to_numeric(value: &AttributeValue) -> Option<Numeric> {
    match value {
        AttributeValue::Integer(i) => Some(Numeric::Integer(i128::from(*i))),
        AttributeValue::Float(f) => Some(Numeric::Float(*f)).filter(|_| f.is_finite()),
        AttributeValue::Bool(b) => Some(Numeric::Integer(i128::from(*b))),
        AttributeValue::String(s) => {
            let s = s.trim();
            s.parse::<i128>().map(Numeric::Integer).ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Numeric::Float)
            })
        }
        AttributeValue::Instant(t) => Some(Numeric::Integer(i128::from(t.timestamp()))),
        AttributeValue::Null | AttributeValue::List(_) => None,
    }
}

/// Floating point view of a value, used where values are summed: numbers, numeric strings, booleans as 0/1,
/// instants as epoch seconds
pub fn to_number(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Integer(i) => Some(*i as f64),
        AttributeValue::Float(f) => Some(*f).filter(|f| f.is_finite()),
        AttributeValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        AttributeValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        AttributeValue::Instant(t) => Some(t.timestamp() as f64),
        AttributeValue::Null | AttributeValue::List(_) => None,
    }
}

/// Instant view of a value
///
/// Accepts native instants, RFC 3339, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`, and epoch seconds.
pub fn to_instant(value: &AttributeValue) -> Result<DateTime<Utc>> {
    let parsed = match value {
        AttributeValue::Instant(t) => Some(*t),
        AttributeValue::Integer(secs) => DateTime::from_timestamp(*secs, 0),
        AttributeValue::Float(secs) if secs.is_finite() => from_epoch_float(*secs),
        AttributeValue::String(s) => parse_instant(s.trim()),
        _ => None,
    };
    parsed.ok_or_else(|| RuleError::InvalidDateFormat(value.to_string()))
}

/// True when a value is a native instant
pub fn is_instant(value: &AttributeValue) -> bool {
    matches!(value, AttributeValue::Instant(_))
}

/// Value equality used by set membership
///
/// Numbers compare numerically after coercion (so `2` equals `"2"`), other
/// scalars by value, lists element-wise.
pub fn values_equal(left: &AttributeValue, right: &AttributeValue) -> bool {
    match (left, right) {
        (AttributeValue::List(l), AttributeValue::List(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        (AttributeValue::List(_), _) | (_, AttributeValue::List(_)) => false,
        (AttributeValue::Null, AttributeValue::Null) => true,
        _ => match (to_numeric(left), to_numeric(right)) {
            (Some(l), Some(r)) => l.compare(r) == Some(Ordering::Equal),
            _ => match (left, right) {
                (AttributeValue::String(l), AttributeValue::String(r)) => l == r,
                (AttributeValue::Instant(l), AttributeValue::Instant(r)) => l == r,
                _ => false,
            },
        },
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(from_epoch_float)
}

fn from_epoch_float(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
