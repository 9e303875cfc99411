//! Data-driven description of one API call and the response it produced.

use crate::error::{HvcaError, HvcaResult};
use reqwest::{Method, StatusCode, header::HeaderMap};
use serde::Serialize;

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/login";

/// Whether an operation needs a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// The login call itself; sent without a token and never re-authenticated
    Login,
    /// Any other call
    Authenticated,
}

/// One logical API call: method, path, query and an optional JSON body.
///
/// The body is serialized when the operation is built, so an operation
/// either carries a body or it does not.
#[derive(Debug, Clone)]
pub struct Operation {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    kind: OperationKind,
}

impl Operation {
    /// Create an authenticated operation.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            kind: OperationKind::Authenticated,
        }
    }

    /// `GET path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH path`.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// The login operation for the given request body.
    ///
    /// # Errors
    ///
    /// Returns [`HvcaError::Encode`] if the body cannot be serialized.
    pub fn login<B: Serialize + ?Sized>(body: &B) -> HvcaResult<Self> {
        let mut op = Self::post(LOGIN_PATH).with_json(body)?;
        op.kind = OperationKind::Login;
        Ok(op)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HvcaError::Encode`] if the body cannot be serialized.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> HvcaResult<Self> {
        self.body = Some(serde_json::to_vec(body).map_err(HvcaError::Encode)?);
        Ok(self)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    #[must_use]
    pub fn with_optional_query<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Serialized body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Login or authenticated.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// True for the login operation.
    #[must_use]
    pub fn is_login(&self) -> bool {
        self.kind == OperationKind::Login
    }

    /// Reject operations the executor cannot send.
    ///
    /// # Errors
    ///
    /// Returns [`HvcaError::InvalidOperation`] for an empty path on a
    /// non-login operation.
    pub fn validate(&self) -> HvcaResult<()> {
        if self.path.is_empty() && !self.is_login() {
            return Err(HvcaError::invalid_operation(format!(
                "{} with empty path",
                self.method
            )));
        }
        Ok(())
    }
}

/// A fully read HTTP response.
///
/// The body is drained before a `Reply` exists, so holding one never pins a
/// pooled connection.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Complete response body
    pub body: Vec<u8>,
}

impl Reply {
    /// Header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// MIME essence of the `Content-Type` header, lower-cased, without
    /// parameters such as `charset`.
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        self.header(reqwest::header::CONTENT_TYPE.as_str())
            .and_then(|ct| ct.split(';').next())
            .map(|essence| essence.trim().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{CONTENT_TYPE, HeaderValue};

    #[test]
    fn test_builder() {
        let op = Operation::get("/stats/issued")
            .with_query("page", 2)
            .with_optional_query("per_page", Some(50))
            .with_optional_query::<i64>("from", None);

        assert_eq!(op.method(), Method::GET);
        assert_eq!(op.path(), "/stats/issued");
        assert_eq!(
            op.query(),
            &[
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "50".to_string()),
            ]
        );
        assert!(op.body().is_none());
        assert!(!op.is_login());
    }

    #[test]
    fn test_login_operation() {
        let op = Operation::login(&serde_json::json!({"api_key": "k"})).unwrap();
        assert!(op.is_login());
        assert_eq!(op.path(), LOGIN_PATH);
        assert_eq!(op.method(), Method::POST);
        assert_eq!(op.body(), Some(br#"{"api_key":"k"}"#.as_slice()));
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = Operation::get("").validate().unwrap_err();
        assert!(matches!(err, HvcaError::InvalidOperation(_)));
        assert!(Operation::get("/trustchain").validate().is_ok());
    }

    #[test]
    fn test_unserializable_body_is_encode_error() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "x");
        let err = Operation::post("/x").with_json(&map).unwrap_err();
        assert!(matches!(err, HvcaError::Encode(_)));
    }

    #[test]
    fn test_content_type_essence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        let reply = Reply {
            status: StatusCode::OK,
            headers,
            body: Vec::new(),
        };
        assert_eq!(reply.content_type().as_deref(), Some("application/json"));
    }
}
