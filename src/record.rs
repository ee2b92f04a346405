use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Keys probed, in order, for the nested metric container of a record.
pub const METRIC_CONTAINER_KEYS: &[&str] = &["metrics", "metric", "insights"];

/// One advertising entity as received from upstream. No fixed schema; the
/// map is shared immutably so scored entries can point back at it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Arc<Map<String, Value>>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(Arc::new(fields))
    }

    /// Non-object values become an empty record rather than an error.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::new(fields),
            _ => Self::default(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn metric_container(&self) -> Option<&Map<String, Value>> {
        METRIC_CONTAINER_KEYS
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_object))
    }

    pub fn source(&self) -> MetricSource<'_> {
        MetricSource {
            container: self.metric_container(),
            record: self.fields(),
        }
    }

    /// First candidate key holding a non-empty string or a number.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(number)) => number.as_f64().map_or(false, |n| n != 0.0),
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
            Some(Value::Null) | None => false,
        }
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Where a metric alias is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Key inside the nested metric container.
    Metric(&'static str),
    /// Key on the record itself.
    Record(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct MetricSource<'a> {
    container: Option<&'a Map<String, Value>>,
    record: &'a Map<String, Value>,
}

impl<'a> MetricSource<'a> {
    pub fn lookup(&self, field: Field) -> Option<&'a Value> {
        match field {
            Field::Metric(key) => self.container.and_then(|container| container.get(key)),
            Field::Record(key) => self.record.get(key),
        }
    }

    pub fn metric(&self, key: &'static str) -> Option<&'a Value> {
        self.lookup(Field::Metric(key))
    }

    /// Walks the alias list and returns the first finite, non-zero value.
    pub fn first_nonzero(&self, fields: &[Field]) -> Option<f64> {
        fields
            .iter()
            .filter_map(|field| self.lookup(*field).and_then(to_number))
            .find(|value| *value != 0.0)
    }

    pub fn first_nonzero_or(&self, fields: &[Field], fallback: f64) -> f64 {
        self.first_nonzero(fields).unwrap_or(fallback)
    }
}

/// Loose numeric coercion. Strings are parsed, booleans map to 1/0, and
/// anything non-finite is rejected.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(flag) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

pub fn number_or(value: Option<&Value>, fallback: f64) -> f64 {
    value.and_then(to_number).unwrap_or(fallback)
}

/// Division that yields the fallback instead of NaN or infinity.
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return fallback;
    }
    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        fallback
    }
}

/// Percent change from `previous` to `current`; 0 when there is no baseline.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    safe_divide(current - previous, previous, 0.0) * 100.0
}
