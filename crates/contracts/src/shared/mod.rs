pub mod api_error;
pub mod filter;
pub mod list;
