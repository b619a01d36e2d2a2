//! Paginated list envelope returned by every list endpoint
//!
//! ```json
//! { "results": [...], "count": 250, "sum_total": 1250.5 }
//! ```

mod envelope;

pub use envelope::{item_count, ListEnvelope, AGGREGATE_PREFIX};
