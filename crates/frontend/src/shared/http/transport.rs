use async_trait::async_trait;
use futures::future::{self, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;

use super::client::Transport;
use super::request::{ApiRequest, ApiResponse, Method};
use crate::shared::config::ClientConfig;
use crate::shared::error::ApiError;

/// Browser `fetch` transport with a per-request timeout
#[derive(Debug, Clone)]
pub struct GlooTransport {
    timeout_ms: u64,
}

impl GlooTransport {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api.timeout_ms)
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let millis = u32::try_from(self.timeout_ms).unwrap_or(u32::MAX);
        let exchange = Box::pin(exchange(request));
        let timer = Box::pin(TimeoutFuture::new(millis));

        match future::select(exchange, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(ApiError::Timeout(self.timeout_ms)),
        }
    }
}

async fn exchange(request: ApiRequest) -> Result<ApiResponse, ApiError> {
    let mut builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
        Method::Patch => Request::patch(&request.url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let prepared = match request.body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Network(format!("Failed to build request: {}", e)))?;

    let response = prepared
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(ApiResponse { status, body })
}
