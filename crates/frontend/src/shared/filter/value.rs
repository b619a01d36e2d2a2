use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fmt;

use crate::shared::date_utils::{format_query_date, format_query_datetime};

/// Query parameter names of the paging fields
pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Value of one domain filter field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FilterValue {
    /// Query-string rendering; dates follow the `_start`/`_end` key convention
    pub fn to_query_value(&self, key: &str) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => format_query_date(key, *d),
            Self::DateTime(dt) => format_query_datetime(key, *dt),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d),
            Self::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// Zero-based pagination seen by the pager, derived from `Filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Number of pages for `total` rows; at least 1
    pub fn page_count(&self, total: u64) -> u32 {
        let size = u64::from(self.page_size.max(1));
        total.div_ceil(size).max(1).min(u64::from(u32::MAX)) as u32
    }
}

/// Query state of one list view
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub(super) page: u32,
    pub(super) page_size: u32,
    pub(super) values: BTreeMap<String, FilterValue>,
}

impl Filter {
    /// Filter on the first page with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            values: BTreeMap::new(),
        }
    }

    /// Static default for a domain field, used when the view is created
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn values(&self) -> &BTreeMap<String, FilterValue> {
        &self.values
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page_index: self.page.saturating_sub(1),
            page_size: self.page_size,
        }
    }

    /// Same domain fields, different page window
    pub fn for_page(&self, page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            values: self.values.clone(),
        }
    }

    /// Query parameters for the resource key, paging fields included
    pub fn query_params(&self) -> BTreeMap<String, Option<FilterValue>> {
        let mut params: BTreeMap<String, Option<FilterValue>> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), Some(value.clone())))
            .collect();
        params.insert(PAGE_PARAM.to_string(), Some(FilterValue::from(self.page)));
        params.insert(
            PAGE_SIZE_PARAM.to_string(),
            Some(FilterValue::from(self.page_size)),
        );
        params
    }
}
