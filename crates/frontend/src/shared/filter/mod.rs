//! Per-view filter state and its reducer
//!
//! A `Filter` always carries `page` (1-based) and `page_size`; everything
//! else is a domain field registered in the view's `FilterSchema`.

mod phone;
mod reducer;
mod value;

pub use phone::normalize_phone;
pub use reducer::{set_filter_value, FilterInput};
pub use value::{Filter, FilterValue, Pagination, PAGE_PARAM, PAGE_SIZE_PARAM};
