//! Bulk print: fetch every page of a filtered list into memory, then reveal
//! the print view.

mod accumulator;
mod driver;
mod hooks;

pub use accumulator::{PrintAccumulator, PrintError, PrintState};
pub use driver::{accumulate_pages, PrintOutcome};
pub use hooks::{use_bulk_print, BulkPrint, PrintView};
