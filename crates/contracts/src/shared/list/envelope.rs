use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix of aggregate columns computed by the backend over the whole filtered set
pub const AGGREGATE_PREFIX: &str = "sum_";

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,

    /// Total number of rows matching the filter, across all pages
    #[serde(default)]
    pub count: u64,

    /// Everything else the endpoint returned (aggregates, cursors)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
            extra: BTreeMap::new(),
        }
    }
}

impl<T> ListEnvelope<T> {
    /// Read the `sum_<name>` aggregate as a number
    pub fn aggregate(&self, name: &str) -> Option<f64> {
        self.extra
            .get(&format!("{}{}", AGGREGATE_PREFIX, name))
            .and_then(Value::as_f64)
    }

    /// All `sum_*` aggregates, keyed by name without the prefix
    pub fn aggregates(&self) -> BTreeMap<&str, f64> {
        self.extra
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(AGGREGATE_PREFIX)?;
                Some((name, value.as_f64()?))
            })
            .collect()
    }
}

/// Item count of an untyped list payload.
///
/// Reads `count`, then the older `total_count` field, and falls back to 0.
pub fn item_count(payload: &Value) -> u64 {
    payload
        .get("count")
        .or_else(|| payload.get("total_count"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
