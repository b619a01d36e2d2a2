use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        })
    }
}

/// Request as handed to a `Transport`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn with_json_body(mut self, body: String) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Attach the bearer token, replacing any existing `Authorization` header
pub fn authorize(mut request: ApiRequest, token: Option<&str>) -> ApiRequest {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return request;
    };
    request
        .headers
        .retain(|(key, _)| !key.eq_ignore_ascii_case("authorization"));
    request
        .headers
        .push(("Authorization".to_string(), format!("Bearer {}", token)));
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_adds_bearer() {
        let request = authorize(ApiRequest::new(Method::Get, "/api/orders"), Some("abc"));
        assert_eq!(request.header("authorization"), Some("Bearer abc"));
        assert_eq!(request.header("Accept"), Some("application/json"));
    }

    #[test]
    fn test_authorize_replaces_previous_token() {
        let first = authorize(ApiRequest::new(Method::Get, "/api/orders"), Some("old"));
        let second = authorize(first, Some("new"));
        let auth: Vec<_> = second
            .headers
            .iter()
            .filter(|(k, _)| k == "Authorization")
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(second.header("Authorization"), Some("Bearer new"));
    }

    #[test]
    fn test_authorize_without_token_is_identity() {
        let request = ApiRequest::new(Method::Post, "/api/tags").with_json_body("{}".into());
        assert_eq!(authorize(request.clone(), None), request);
        assert_eq!(authorize(request.clone(), Some("")), request);
    }
}
