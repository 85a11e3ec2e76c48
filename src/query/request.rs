//! Query records and their parsing from JSON requests
//!
//! A request is a JSON object. The entry under the index id is either a
//! plain value, an array of values, or a record object:
//!
//! ```json
//! {"price": {"query": [10, 20], "range": "min:max"}}
//! {"color": ["red", "blue"], "color_operator": "and"}
//! {"size": 5, "size_usage": "range:min"}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::index::IndexKey;

use super::errors::{QueryError, QueryResult};

/// How multiple target values combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Union of the values' document sets
    #[default]
    Or,
    /// Intersection of the values' document sets
    And,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "or" => Ok(Operator::Or),
            "and" => Ok(Operator::And),
            _ => Err(QueryError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which ends of a range scan are bounded by the record's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDirective {
    /// Lower bound only: the smallest value
    Min,
    /// Upper bound only: the largest value
    Max,
    /// Both bounds
    MinMax,
}

impl RangeDirective {
    pub fn has_min(&self) -> bool {
        matches!(self, RangeDirective::Min | RangeDirective::MinMax)
    }

    pub fn has_max(&self) -> bool {
        matches!(self, RangeDirective::Max | RangeDirective::MinMax)
    }

    /// Parse from `:`-separated `min` / `max` tokens.
    fn from_tokens<'a>(raw: &str, tokens: impl Iterator<Item = &'a str>) -> QueryResult<Self> {
        let mut min = false;
        let mut max = false;
        for token in tokens {
            match token.trim().to_ascii_lowercase().as_str() {
                "min" => min = true,
                "max" => max = true,
                "" => {}
                _ => return Err(QueryError::MalformedRange(raw.to_string())),
            }
        }

        match (min, max) {
            (true, true) => Ok(RangeDirective::MinMax),
            (true, false) => Ok(RangeDirective::Min),
            (false, true) => Ok(RangeDirective::Max),
            (false, false) => Err(QueryError::MalformedRange(raw.to_string())),
        }
    }

    /// Parse a `range` directive: `min`, `max`, or `min:max`.
    pub fn parse_range(raw: &str) -> QueryResult<Self> {
        Self::from_tokens(raw, raw.split(':'))
    }

    /// Parse a `usage` directive: `range:min`, `range:max`, `range:min:max`.
    pub fn parse_usage(raw: &str) -> QueryResult<Self> {
        let mut parts = raw.split(':');
        match parts.next().map(|h| h.trim().to_ascii_lowercase()) {
            Some(head) if head == "range" => Self::from_tokens(raw, parts),
            _ => Err(QueryError::MalformedRange(raw.to_string())),
        }
    }
}

/// A query against one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord<K> {
    /// Target values
    pub values: Vec<K>,
    /// Combining operator; `None` uses the index default
    pub operator: Option<Operator>,
    /// Range scan bounded by the smallest and/or largest value
    pub range: Option<RangeDirective>,
    /// Field names reported back with the result
    pub fields: Vec<String>,
}

impl<K> Default for QueryRecord<K> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            operator: None,
            range: None,
            fields: Vec::new(),
        }
    }
}

impl<K: Ord> QueryRecord<K> {
    /// Exact-match query for the given values.
    pub fn exact(values: impl IntoIterator<Item = K>) -> Self {
        Self {
            values: values.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Range query between two inclusive bounds.
    pub fn between(min: K, max: K) -> Self {
        Self {
            values: vec![min, max],
            range: Some(RangeDirective::MinMax),
            ..Self::default()
        }
    }

    /// Range query with only a lower bound.
    pub fn at_least(min: K) -> Self {
        Self {
            values: vec![min],
            range: Some(RangeDirective::Min),
            ..Self::default()
        }
    }

    /// Range query with only an upper bound.
    pub fn at_most(max: K) -> Self {
        Self {
            values: vec![max],
            range: Some(RangeDirective::Max),
            ..Self::default()
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// True when neither values nor a range were given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.range.is_none()
    }

    /// Range bounds implied by the directive.
    ///
    /// Returns `None` for exact-match records.
    pub fn bounds(&self) -> QueryResult<Option<(Option<&K>, Option<&K>)>> {
        let Some(directive) = self.range else {
            return Ok(None);
        };
        if self.values.is_empty() {
            return Err(QueryError::MalformedRange(
                "range directive without bound values".to_string(),
            ));
        }

        let lo = if directive.has_min() {
            self.values.iter().min()
        } else {
            None
        };
        let hi = if directive.has_max() {
            self.values.iter().max()
        } else {
            None
        };
        Ok(Some((lo, hi)))
    }
}

impl QueryRecord<IndexKey> {
    /// Extract this index's query from a request object.
    ///
    /// Returns `Ok(None)` when the request does not address `index_id`:
    /// the key is absent, `null`, or blank, or it carries neither values
    /// nor a range. Operator and range are validated only after that.
    pub fn from_request(request: &Value, index_id: &str) -> QueryResult<Option<Self>> {
        let Some(map) = request.as_object() else {
            return Err(QueryError::MalformedRequest(
                "request must be a JSON object".to_string(),
            ));
        };

        let Some(param) = map.get(index_id) else {
            return Ok(None);
        };

        let (values, mut directives) = match param {
            Value::Object(fields) => (
                query_values(fields.get("query"))?,
                Directives {
                    operator: fields.get("operator"),
                    range: fields.get("range"),
                    usage: fields.get("usage"),
                },
            ),
            other => (query_values(Some(other))?, Directives::default()),
        };

        if let Some(op) = map.get(&format!("{}_operator", index_id)) {
            directives.operator = Some(op);
        }
        if let Some(usage) = map.get(&format!("{}_usage", index_id)) {
            directives.usage = Some(usage);
        }

        if values.is_empty() && !directives.has_range() {
            return Ok(None);
        }

        Ok(Some(Self {
            values,
            operator: directives.operator()?,
            range: directives.range()?,
            fields: Vec::new(),
        }))
    }
}

/// Raw directive fields, parsed once the request is known to address
/// the index.
#[derive(Debug, Default)]
struct Directives<'a> {
    operator: Option<&'a Value>,
    range: Option<&'a Value>,
    usage: Option<&'a Value>,
}

impl Directives<'_> {
    fn has_range(&self) -> bool {
        self.range.is_some() || self.usage.is_some()
    }

    fn operator(&self) -> QueryResult<Option<Operator>> {
        self.operator
            .map(|op| string_field(op, "operator")?.parse::<Operator>())
            .transpose()
    }

    /// `usage` wins over `range` when both are given.
    fn range(&self) -> QueryResult<Option<RangeDirective>> {
        let mut directive = self
            .range
            .map(|range| RangeDirective::parse_range(string_field(range, "range")?))
            .transpose()?;
        if let Some(usage) = self.usage {
            directive = Some(RangeDirective::parse_usage(string_field(usage, "usage")?)?);
        }
        Ok(directive)
    }
}

/// Values of a request entry. Absent, `null`, and whitespace-only
/// strings carry no values.
fn query_values(value: Option<&Value>) -> QueryResult<Vec<IndexKey>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(other) => keys_from_json(other),
    }
}

fn keys_from_json(value: &Value) -> QueryResult<Vec<IndexKey>> {
    let unsupported = |v: &Value| QueryError::UnsupportedValue(v.to_string());
    match value {
        // A bare array lists alternative values, not a single tuple.
        Value::Array(items) => items
            .iter()
            .map(|item| IndexKey::from_json(item).ok_or_else(|| unsupported(item)))
            .collect(),
        other => IndexKey::from_json(other)
            .map(|k| vec![k])
            .ok_or_else(|| unsupported(other)),
    }
}

fn string_field<'a>(value: &'a Value, name: &str) -> QueryResult<&'a str> {
    value.as_str().ok_or_else(|| {
        QueryError::MalformedRequest(format!("{} must be a string, got {}", name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(s: &str) -> IndexKey {
        IndexKey::from_string(s)
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("or".parse::<Operator>(), Ok(Operator::Or));
        assert_eq!(" AND ".parse::<Operator>(), Ok(Operator::And));
        assert_eq!(
            "xor".parse::<Operator>(),
            Err(QueryError::UnknownOperator("xor".to_string()))
        );
    }

    #[test]
    fn test_range_directive_parse() {
        assert_eq!(RangeDirective::parse_range("min"), Ok(RangeDirective::Min));
        assert_eq!(RangeDirective::parse_range("max"), Ok(RangeDirective::Max));
        assert_eq!(RangeDirective::parse_range("min:max"), Ok(RangeDirective::MinMax));
        assert_eq!(RangeDirective::parse_range("max:min"), Ok(RangeDirective::MinMax));
        assert!(RangeDirective::parse_range("between").is_err());
        assert!(RangeDirective::parse_range("").is_err());

        assert_eq!(RangeDirective::parse_usage("range:min:max"), Ok(RangeDirective::MinMax));
        assert_eq!(RangeDirective::parse_usage("Range:max"), Ok(RangeDirective::Max));
        assert!(RangeDirective::parse_usage("sort:min").is_err());
        assert!(RangeDirective::parse_usage("range").is_err());
    }

    #[test]
    fn test_bounds_pick_min_and_max_values() {
        let record = QueryRecord {
            values: vec![15, 6, 12],
            range: Some(RangeDirective::MinMax),
            ..QueryRecord::default()
        };
        assert_eq!(record.bounds(), Ok(Some((Some(&6), Some(&15)))));

        let record = QueryRecord::at_least(6);
        assert_eq!(record.bounds(), Ok(Some((Some(&6), None))));

        let record = QueryRecord::exact(vec![1, 2]);
        assert_eq!(record.bounds(), Ok(None));
    }

    #[test]
    fn test_range_without_values_is_malformed() {
        let record: QueryRecord<i64> = QueryRecord {
            range: Some(RangeDirective::Min),
            ..QueryRecord::default()
        };
        assert!(matches!(record.bounds(), Err(QueryError::MalformedRange(_))));
    }

    #[test]
    fn test_request_not_addressing_index() {
        let request = json!({"size": 3});
        assert_eq!(QueryRecord::from_request(&request, "color"), Ok(None));
        assert_eq!(QueryRecord::from_request(&json!({"color": ""}), "color"), Ok(None));
        assert_eq!(QueryRecord::from_request(&json!({"color": null}), "color"), Ok(None));
        assert_eq!(QueryRecord::from_request(&json!({"color": []}), "color"), Ok(None));
        assert_eq!(QueryRecord::from_request(&json!({"color": "   "}), "color"), Ok(None));

        for request in [
            json!({"color": {"operator": "xor"}}),
            json!({"color": [], "color_operator": "xor"}),
            json!({"color": "", "color_operator": "xor"}),
        ] {
            assert_eq!(QueryRecord::from_request(&request, "color"), Ok(None));
        }
    }

    #[test]
    fn test_request_scalar_and_sequence() {
        let record = QueryRecord::from_request(&json!({"color": "red"}), "color")
            .unwrap()
            .unwrap();
        assert_eq!(record.values, vec![key("red")]);
        assert_eq!(record.operator, None);

        let record = QueryRecord::from_request(&json!({"color": ["red", "blue"]}), "color")
            .unwrap()
            .unwrap();
        assert_eq!(record.values, vec![key("red"), key("blue")]);
    }

    #[test]
    fn test_request_record_form() {
        let request = json!({
            "price": {"query": [10, 20], "range": "min:max", "operator": "and"}
        });
        let record = QueryRecord::from_request(&request, "price").unwrap().unwrap();
        assert_eq!(record.values, vec![IndexKey::from_int(10), IndexKey::from_int(20)]);
        assert_eq!(record.range, Some(RangeDirective::MinMax));
        assert_eq!(record.operator, Some(Operator::And));
    }

    #[test]
    fn test_request_sibling_overrides() {
        let request = json!({
            "size": [5, 9],
            "size_operator": "and",
            "size_usage": "range:max"
        });
        let record = QueryRecord::from_request(&request, "size").unwrap().unwrap();
        assert_eq!(record.operator, Some(Operator::And));
        assert_eq!(record.range, Some(RangeDirective::Max));
    }

    #[test]
    fn test_request_validation_errors() {
        let bad_op = json!({"color": {"query": "red", "operator": "xor"}});
        assert!(matches!(
            QueryRecord::from_request(&bad_op, "color"),
            Err(QueryError::UnknownOperator(_))
        ));

        let bad_range = json!({"color": {"query": "red", "range": "around"}});
        assert!(matches!(
            QueryRecord::from_request(&bad_range, "color"),
            Err(QueryError::MalformedRange(_))
        ));

        let bad_value = json!({"color": [{"nested": true}]});
        assert!(matches!(
            QueryRecord::from_request(&bad_value, "color"),
            Err(QueryError::UnsupportedValue(_))
        ));

        assert!(matches!(
            QueryRecord::from_request(&json!(["color"]), "color"),
            Err(QueryError::MalformedRequest(_))
        ));
    }
}
