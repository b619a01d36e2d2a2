pub mod api_utils;
pub mod components;
pub mod config;
pub mod date_utils;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod http;
pub mod icons;
pub mod list_controller;
pub mod navigation;
pub mod notify;
pub mod print;
pub mod resource_key;

#[cfg(test)]
mod test_support;
