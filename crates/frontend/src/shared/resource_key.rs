//! Canonical cache keys for list and detail requests
//!
//! A key is the request path plus its query string with parameters sorted by
//! name, so the same logical request always produces the same key.

use std::collections::BTreeMap;
use std::fmt;

use crate::shared::filter::{Filter, FilterValue};

/// Canonical identifier of one cacheable GET request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Wrap a path that needs no query parameters, e.g. a detail endpoint
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Serialize `params` onto `base_url`.
///
/// A query already present in `base_url` is merged in, so the result does
/// not depend on which parameters were written into the path. Explicit
/// params override the base query and a `None` value removes the name
/// entirely. When a name repeats, the last occurrence wins. Dates are
/// rendered by `FilterValue::to_query_value`, which applies the
/// `_start`/`_end` convention.
pub fn build_resource_key<I, K>(base_url: &str, params: I) -> ResourceKey
where
    I: IntoIterator<Item = (K, Option<FilterValue>)>,
    K: Into<String>,
{
    let (path, mut query) = split_query(base_url);
    for (key, value) in params {
        let key = key.into();
        match value {
            Some(value) => {
                let rendered = value.to_query_value(&key);
                query.insert(key, rendered);
            }
            None => {
                query.remove(&key);
            }
        }
    }

    if query.is_empty() {
        return ResourceKey(path.to_string());
    }

    let query_string = serde_qs::to_string(&query).unwrap_or_else(|e| {
        log::error!("Failed to encode query for {}: {}", base_url, e);
        String::new()
    });
    ResourceKey(format!("{}?{}", path, query_string))
}

fn split_query(base_url: &str) -> (&str, BTreeMap<String, String>) {
    let Some((path, query)) = base_url.split_once('?') else {
        return (base_url, BTreeMap::new());
    };

    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match (decode_component(key), decode_component(value)) {
                (Some(key), Some(value)) => Some((key, value)),
                _ => {
                    log::warn!("Dropping undecodable query pair {:?} of {}", pair, base_url);
                    None
                }
            }
        })
        .collect();
    (path, params)
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Key of the list request described by `filter`
pub fn filter_resource_key(base_url: &str, filter: &Filter) -> ResourceKey {
    build_resource_key(base_url, filter.query_params())
}
