//! Filtered list controller
//!
//! Owns a view's filter, derives its pagination and resource key, and feeds
//! widget changes through `set_filter_value`. The Leptos hook binds the key
//! to a fetch binding so every filter change re-triggers the request.

use contracts::shared::filter::FilterSchema;
use leptos::prelude::*;
use std::sync::Arc;

use crate::shared::fetch::{use_resource, ResourceHandle};
use crate::shared::filter::{set_filter_value, Filter, FilterInput, Pagination};
use crate::shared::resource_key::{filter_resource_key, ResourceKey};

#[derive(Debug, Clone, PartialEq)]
pub struct ListController {
    base_url: String,
    schema: Arc<FilterSchema>,
    filter: Filter,
}

impl ListController {
    pub fn new(base_url: impl Into<String>, schema: FilterSchema, defaults: Filter) -> Self {
        Self {
            base_url: base_url.into(),
            schema: Arc::new(schema),
            filter: defaults,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    pub fn pagination(&self) -> Pagination {
        self.filter.pagination()
    }

    pub fn resource_key(&self) -> ResourceKey {
        filter_resource_key(&self.base_url, &self.filter)
    }

    /// Apply a widget change; true when the filter actually changed
    pub fn apply(&mut self, key: &str, input: FilterInput) -> bool {
        let next = set_filter_value(&self.filter, &self.schema, key, input);
        if next == self.filter {
            return false;
        }
        self.filter = next;
        true
    }
}

/// Reactive list state returned by `use_filtered_list`
#[derive(Clone, Copy)]
pub struct FilteredList {
    pub controller: RwSignal<ListController>,
    pub pagination: Memo<Pagination>,
    pub resource: ResourceHandle,
}

impl FilteredList {
    pub fn filter(&self) -> Filter {
        self.controller.with(|c| c.filter().clone())
    }

    pub fn set_value(&self, key: &str, input: FilterInput) {
        self.controller.maybe_update(|c| c.apply(key, input));
    }

    /// Change handler for filter widgets and `PaginationControls`
    pub fn on_change(&self) -> Callback<(String, FilterInput)> {
        let list = *self;
        Callback::new(move |(key, input): (String, FilterInput)| list.set_value(&key, input))
    }

    /// Pages available for the current item count
    pub fn page_count(&self) -> u32 {
        let total = self.resource.item_count();
        self.pagination.get().page_count(total)
    }
}

/// Controller for a list view backed by `base_url`
pub fn use_filtered_list(
    base_url: impl Into<String>,
    schema: FilterSchema,
    defaults: Filter,
) -> FilteredList {
    let controller = RwSignal::new(ListController::new(base_url, schema, defaults));
    let pagination = Memo::new(move |_| controller.with(ListController::pagination));
    let key = Memo::new(move |_| controller.with(ListController::resource_key));
    let resource = use_resource(Signal::derive(move || Some(key.get())));

    FilteredList {
        controller,
        pagination,
        resource,
    }
}
