//! JSON REST client
//!
//! `ApiClient` is an explicit value (configuration, transport, optional
//! bearer token) handed to every call site. The token is attached by the
//! pure `authorize` step; nothing mutates shared default headers.

mod client;
mod request;
mod transport;

pub use client::{error_from_response, ApiClient, Transport};
pub use request::{authorize, ApiRequest, ApiResponse, Method};
pub use transport::GlooTransport;
