//! Concrete index key for JSON-shaped documents
//!
//! Keys are totally ordered: Bool < number < Date < String < Tuple.
//! Numbers form one domain: `Int` and `Float` compare numerically, and
//! integral floats within i64 range are stored as `Int`, so `10` and
//! `10.0` are the same key.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// 2^63 as f64; i64 covers `[-2^63, 2^63)`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Index key representing one extracted datum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Non-integral or out-of-range float (stored as order-preserving bits)
    Float(u64),
    /// Timestamp value
    Date(DateTime<Utc>),
    /// String value
    String(String),
    /// Composite value, compared element by element
    Tuple(Vec<IndexKey>),
}

impl IndexKey {
    pub fn from_bool(v: bool) -> Self {
        IndexKey::Bool(v)
    }

    pub fn from_int(v: i64) -> Self {
        IndexKey::Int(v)
    }

    /// Create a key from a float.
    ///
    /// Integral values that fit in i64 become `Int`. Otherwise the bit
    /// pattern is remapped so that unsigned comparison of the stored
    /// bits matches numeric ordering.
    pub fn from_float(v: f64) -> Self {
        if v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v) {
            return IndexKey::Int(v as i64);
        }
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        IndexKey::Float(ordered)
    }

    pub fn from_datetime(v: DateTime<Utc>) -> Self {
        IndexKey::Date(v)
    }

    pub fn from_string(v: impl Into<String>) -> Self {
        IndexKey::String(v.into())
    }

    pub fn from_tuple(parts: Vec<IndexKey>) -> Self {
        IndexKey::Tuple(parts)
    }

    /// Recover the float value of a `Float` key.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            IndexKey::Float(ordered) => Some(float_from_ordered(*ordered)),
            _ => None,
        }
    }

    /// Create a key from a JSON value.
    ///
    /// Returns `None` for null, objects, and arrays holding anything
    /// that is not itself indexable. `None` is the "no datum" marker.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(IndexKey::from_bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(IndexKey::from_int(i))
                } else {
                    n.as_f64().map(IndexKey::from_float)
                }
            }
            Value::String(s) => Some(IndexKey::from_string(s.as_str())),
            Value::Array(items) => items
                .iter()
                .map(IndexKey::from_json)
                .collect::<Option<Vec<_>>>()
                .map(IndexKey::Tuple),
            Value::Null | Value::Object(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            IndexKey::Bool(_) => 0,
            IndexKey::Int(_) | IndexKey::Float(_) => 1,
            IndexKey::Date(_) => 2,
            IndexKey::String(_) => 3,
            IndexKey::Tuple(_) => 4,
        }
    }
}

fn float_from_ordered(ordered: u64) -> f64 {
    let bits = if (ordered >> 63) == 1 {
        ordered ^ (1 << 63)
    } else {
        !ordered
    };
    f64::from_bits(bits)
}

/// Compare an integer with a normalized float.
///
/// A normalized float is never equal to an i64, so a tie after rounding
/// the integer can only be against 2^63, which is larger.
fn cmp_int_float(i: i64, ordered: u64) -> Ordering {
    match (i as f64).total_cmp(&float_from_ordered(ordered)) {
        Ordering::Equal => Ordering::Less,
        other => other,
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Bool(a), IndexKey::Bool(b)) => a.cmp(b),
            (IndexKey::Int(a), IndexKey::Int(b)) => a.cmp(b),
            (IndexKey::Float(a), IndexKey::Float(b)) => a.cmp(b),
            (IndexKey::Int(a), IndexKey::Float(b)) => cmp_int_float(*a, *b),
            (IndexKey::Float(a), IndexKey::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (IndexKey::Date(a), IndexKey::Date(b)) => a.cmp(b),
            (IndexKey::String(a), IndexKey::String(b)) => a.cmp(b),
            (IndexKey::Tuple(a), IndexKey::Tuple(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Bool(b) => write!(f, "{}", b),
            IndexKey::Int(i) => write!(f, "{}", i),
            IndexKey::Float(_) => write!(f, "{}", self.as_float().unwrap_or(f64::NAN)),
            IndexKey::Date(d) => write!(f, "{}", d.to_rfc3339()),
            IndexKey::String(s) => write!(f, "{:?}", s),
            IndexKey::Tuple(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_key_ordering_across_variants() {
        let keys = vec![
            IndexKey::from_bool(false),
            IndexKey::from_bool(true),
            IndexKey::from_int(-100),
            IndexKey::from_float(-1.5),
            IndexKey::from_float(2.25),
            IndexKey::from_int(100),
            IndexKey::from_datetime(Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()),
            IndexKey::from_string("aaa"),
            IndexKey::from_string("zzz"),
            IndexKey::from_tuple(vec![IndexKey::from_int(1)]),
        ];

        for i in 1..keys.len() {
            assert!(keys[i - 1] < keys[i], "{} should sort before {}", keys[i - 1], keys[i]);
        }
    }

    #[test]
    fn test_float_ordering_and_roundtrip() {
        let values = [-1e9, -0.5, 0.0, 0.5, 3.0, 1e12];
        let keys: Vec<_> = values.iter().map(|v| IndexKey::from_float(*v)).collect();

        for i in 1..keys.len() {
            assert!(keys[i - 1] < keys[i]);
        }
        assert_eq!(IndexKey::from_float(-0.5).as_float(), Some(-0.5));
        assert_eq!(IndexKey::from_int(3).as_float(), None);
    }

    #[test]
    fn test_numbers_compare_across_int_and_float() {
        assert_eq!(IndexKey::from_float(10.0), IndexKey::from_int(10));
        assert_eq!(IndexKey::from_float(-0.0), IndexKey::from_int(0));
        assert_eq!(IndexKey::from_json(&json!(10.0)), Some(IndexKey::from_int(10)));

        assert!(IndexKey::from_int(15) > IndexKey::from_float(12.5));
        assert!(IndexKey::from_float(2.5) < IndexKey::from_int(5));
        assert!(IndexKey::from_int(i64::MAX) < IndexKey::from_float(1e19));
        assert!(IndexKey::from_float(-1e19) < IndexKey::from_int(i64::MIN));
        assert_eq!(
            IndexKey::from_float(2.5).cmp(&IndexKey::from_int(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_tuple_ordering_is_lexicographic() {
        let a = IndexKey::from_tuple(vec![IndexKey::from_string("x"), IndexKey::from_int(1)]);
        let b = IndexKey::from_tuple(vec![IndexKey::from_string("x"), IndexKey::from_int(2)]);
        let c = IndexKey::from_tuple(vec![IndexKey::from_string("y")]);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(IndexKey::from_json(&json!(true)), Some(IndexKey::Bool(true)));
        assert_eq!(IndexKey::from_json(&json!(42)), Some(IndexKey::Int(42)));
        assert_eq!(IndexKey::from_json(&json!(1.5)), Some(IndexKey::from_float(1.5)));
        assert_eq!(
            IndexKey::from_json(&json!("hello")),
            Some(IndexKey::String("hello".to_string()))
        );
        assert_eq!(
            IndexKey::from_json(&json!(["a", 1])),
            Some(IndexKey::Tuple(vec![IndexKey::from_string("a"), IndexKey::from_int(1)]))
        );
        assert_eq!(IndexKey::from_json(&json!(null)), None);
        assert_eq!(IndexKey::from_json(&json!({"a": 1})), None);
        assert_eq!(IndexKey::from_json(&json!([1, {"a": 1}])), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexKey::from_string("a").to_string(), "\"a\"");
        assert_eq!(
            IndexKey::from_tuple(vec![IndexKey::from_int(1), IndexKey::from_bool(false)]).to_string(),
            "(1, false)"
        );
    }
}
