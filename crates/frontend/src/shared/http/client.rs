use async_trait::async_trait;
use contracts::shared::api_error::ApiErrorEnvelope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

use super::request::{authorize, ApiRequest, ApiResponse, Method};
use crate::shared::api_utils::api_url;
use crate::shared::config::ClientConfig;
use crate::shared::error::ApiError;
use crate::shared::fetch::Fetcher;
use crate::shared::resource_key::ResourceKey;

/// Executes one HTTP exchange
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    config: Rc<ClientConfig>,
    transport: Rc<dyn Transport>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: Rc<ClientConfig>, transport: Rc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            token: None,
        }
    }

    /// Same client, authenticated with `token`
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        api_url(&self.config, path)
    }

    /// Send a request and map non-2xx responses to `ApiError`
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<ApiResponse, ApiError> {
        let mut request = ApiRequest::new(method, self.url(path));
        if let Some(body) = body {
            request = request.with_json_body(body);
        }
        let request = authorize(request, self.token.as_deref());

        log::debug!("{} {}", request.method, request.url);
        let response = self.transport.send(request).await?;
        if !response.ok() {
            let error = error_from_response(&response, path);
            log::warn!("{} {} failed: {}", method, path, error);
            return Err(error);
        }
        Ok(response)
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.send(Method::Get, path, None).await?;
        decode(&response)
    }

    /// Create a record
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(Method::Post, path, Some(encode(body)?)).await?;
        decode(&response)
    }

    /// Partially update a record
    pub async fn patch_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(Method::Patch, path, Some(encode(body)?)).await?;
        decode(&response)
    }
}

#[async_trait(?Send)]
impl Fetcher for ApiClient {
    async fn fetch(&self, key: &ResourceKey) -> Result<Value, ApiError> {
        self.get_json(key.as_str()).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<R: DeserializeOwned>(response: &ApiResponse) -> Result<R, ApiError> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Build the error for a non-2xx response.
///
/// The message comes from the error envelope (`message`, then `detail`);
/// bodies without one fall back to the status code.
pub fn error_from_response(response: &ApiResponse, path: &str) -> ApiError {
    let envelope = ApiErrorEnvelope::parse(&response.body).unwrap_or_default();
    let message = envelope.user_message().map(str::to_string);

    match response.status {
        404 => ApiError::NotFound(message.unwrap_or_else(|| format!("{} not found", path))),
        400 | 422 if envelope.has_field_errors() => ApiError::Validation {
            message: message.unwrap_or_else(|| "Please correct the highlighted fields".to_string()),
            fields: envelope.errors,
        },
        status => ApiError::Status {
            status,
            message: message.unwrap_or_else(|| format!("HTTP error: {}", status)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeTransport {
        sent: RefCell<Vec<ApiRequest>>,
        replies: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    }

    impl FakeTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
            self
        }
    }

    #[async_trait(?Send)]
    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.sent.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ApiError::Network("no reply queued".into())))
        }
    }

    fn client(transport: Rc<FakeTransport>) -> ApiClient {
        let mut config = ClientConfig::default();
        config.api.base_url = Some("http://api.test".into());
        ApiClient::new(Rc::new(config), transport)
    }

    #[test]
    fn test_get_attaches_token_and_decodes() {
        let transport = Rc::new(FakeTransport::default().reply(200, r#"{"results":[],"count":3}"#));
        let api = client(transport.clone()).with_token(Some("t0k".into()));

        let body: Value = block_on(api.get_json("/api/orders?page=1")).unwrap();
        assert_eq!(body, json!({"results": [], "count": 3}));

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].url, "http://api.test/api/orders?page=1");
        assert_eq!(sent[0].header("Authorization"), Some("Bearer t0k"));
    }

    #[test]
    fn test_post_and_patch_send_json() {
        let transport = Rc::new(
            FakeTransport::default()
                .reply(201, r#"{"id":9}"#)
                .reply(204, ""),
        );
        let api = client(transport.clone());

        let created: Value = block_on(api.post_json("/api/tags", &json!({"name": "vip"}))).unwrap();
        assert_eq!(created["id"], 9);
        let patched: Option<Value> =
            block_on(api.patch_json("/api/tags/9", &json!({"name": "VIP"}))).unwrap();
        assert!(patched.is_none());

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"name":"vip"}"#));
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
        assert_eq!(sent[1].method, Method::Patch);
        assert!(sent[1].header("Authorization").is_none());
    }

    #[test]
    fn test_error_message_from_envelope() {
        let transport = Rc::new(FakeTransport::default().reply(409, r#"{"message":"Order is locked"}"#));
        let err = block_on(client(transport).get_json::<Value>("/api/orders/1")).unwrap_err();
        assert_eq!(
            err,
            ApiError::Status { status: 409, message: "Order is locked".into() }
        );
    }

    #[test]
    fn test_error_without_envelope() {
        let transport = Rc::new(FakeTransport::default().reply(502, "<html>Bad gateway</html>"));
        let err = block_on(client(transport).get_json::<Value>("/api/orders")).unwrap_err();
        assert_eq!(err.user_message(), "HTTP error: 502");
    }

    #[test]
    fn test_not_found_and_validation() {
        let not_found = error_from_response(
            &ApiResponse { status: 404, body: String::new() },
            "/api/orders/77",
        );
        assert_eq!(not_found, ApiError::NotFound("/api/orders/77 not found".into()));

        let invalid = error_from_response(
            &ApiResponse {
                status: 422,
                body: r#"{"errors":{"phone":["Invalid phone"]}}"#.into(),
            },
            "/api/customers",
        );
        assert_eq!(invalid.field_messages("phone"), ["Invalid phone".to_string()]);
    }

    #[test]
    fn test_transport_failure_propagates() {
        let transport = Rc::new(FakeTransport::default());
        let err = block_on(client(transport).get_json::<Value>("/api/orders")).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_fetcher_uses_resource_key_path() {
        let transport = Rc::new(FakeTransport::default().reply(200, r#"{"count":1}"#));
        let api = client(transport.clone());
        let value = block_on(api.fetch(&ResourceKey::new("/api/customers?page=1"))).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(transport.sent.borrow()[0].url, "http://api.test/api/customers?page=1");
    }
}
