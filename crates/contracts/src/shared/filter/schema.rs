use super::field_kind::FilterFieldKind;
use std::collections::BTreeMap;

pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "pageSize";
pub const SEARCH_KEY: &str = "search";
pub const ACTION_KEY: &str = "action";

/// Field name -> kind registry for one list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSchema {
    fields: BTreeMap<String, FilterFieldKind>,
}

impl FilterSchema {
    /// Empty registry; every key is rejected until registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the fields every paginated list shares:
    /// `page`, `pageSize`, `search` and `action`
    pub fn with_paging() -> Self {
        Self::new()
            .field(PAGE_KEY, FilterFieldKind::Page)
            .field(PAGE_SIZE_KEY, FilterFieldKind::PageSize)
            .field(SEARCH_KEY, FilterFieldKind::Search)
            .field(ACTION_KEY, FilterFieldKind::Event)
    }

    pub fn field(mut self, name: impl Into<String>, kind: FilterFieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn fields<I, S>(mut self, names: I, kind: FilterFieldKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.fields.insert(name.into(), kind);
        }
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<FilterFieldKind> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FilterFieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
