//! API utilities for frontend-backend communication
//!
//! Helpers for building absolute API URLs from the client configuration.

use crate::shared::config::ClientConfig;

/// Backend origin derived from the window location
///
/// Uses the current protocol and hostname with the configured backend port.
///
/// # Returns
/// - API base URL like "http://localhost:3000"
/// - Empty string if window is not available
pub fn api_base(port: u16) -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, port)
}

/// Build a full API URL from a path
///
/// Absolute URLs are returned unchanged. Otherwise `api.base_url` is used
/// when configured, else the window origin with `api.backend_port`.
///
/// # Example
/// ```rust,ignore
/// let url = api_url(&config, "/api/orders/123");
/// ```
pub fn api_url(config: &ClientConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = match &config.api.base_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => api_base(config.api.backend_port),
    };
    format!("{}{}", base, path)
}
