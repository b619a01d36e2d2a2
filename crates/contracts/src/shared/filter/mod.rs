//! Declarative description of the filter fields a list view accepts
//!
//! Each list view registers its fields once; the frontend reducer dispatches
//! on the registered kind instead of matching field names.
//!
//! ```rust,ignore
//! use contracts::shared::filter::{FilterFieldKind, FilterSchema};
//!
//! let schema = FilterSchema::with_paging()
//!     .field("status", FilterFieldKind::Enum)
//!     .field("created_start", FilterFieldKind::Date);
//! ```

mod field_kind;
mod schema;

pub use field_kind::FilterFieldKind;
pub use schema::{FilterSchema, ACTION_KEY, PAGE_KEY, PAGE_SIZE_KEY, SEARCH_KEY};
