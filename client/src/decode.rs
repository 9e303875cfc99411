//! Pure functions mapping a fully read [`Reply`] into typed values.

use crate::{
    error::{ApiError, HvcaError, HvcaResult},
    operation::Reply,
};
use serde::{Deserialize, de::DeserializeOwned};

/// Content type of successful JSON responses.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of HVCA error responses.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Header carrying the total number of results of a paginated listing.
pub const TOTAL_COUNT_HEADER: &str = "total-count";

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
}

#[derive(Deserialize)]
struct Counter {
    value: i64,
}

#[derive(Deserialize)]
struct Problem {
    description: String,
}

/// Decode a JSON body after checking the content type.
///
/// # Errors
///
/// Returns [`HvcaError::UnexpectedContentType`] when the response is not
/// `application/json`, or [`HvcaError::Decode`] when the body does not match `T`.
pub fn json<T: DeserializeOwned>(reply: &Reply) -> HvcaResult<T> {
    let found = reply.content_type();
    if found.as_deref() != Some(JSON_CONTENT_TYPE) {
        return Err(HvcaError::UnexpectedContentType {
            expected: JSON_CONTENT_TYPE,
            found,
        });
    }
    serde_json::from_slice(&reply.body).map_err(HvcaError::Decode)
}

/// Decode a `{"value": N}` counter.
///
/// # Errors
///
/// See [`json`].
pub fn value(reply: &Reply) -> HvcaResult<i64> {
    json::<Counter>(reply).map(|c| c.value)
}

/// Decode a bare JSON array of strings.
///
/// # Errors
///
/// See [`json`].
pub fn strings(reply: &Reply) -> HvcaResult<Vec<String>> {
    json(reply)
}

/// Decode a JSON array plus its `Total-Count` header.
///
/// # Errors
///
/// Returns [`HvcaError::TotalCount`] when the header is missing or not a
/// non-negative integer, otherwise see [`json`].
pub fn page<T: DeserializeOwned>(reply: &Reply) -> HvcaResult<Page<T>> {
    let total = total_count(reply)?;
    let items = json(reply)?;
    Ok(Page { items, total })
}

/// Parse the `Total-Count` header.
///
/// # Errors
///
/// Returns [`HvcaError::TotalCount`] when the header is missing or malformed.
pub fn total_count(reply: &Reply) -> HvcaResult<u64> {
    let raw = reply
        .header(TOTAL_COUNT_HEADER)
        .ok_or_else(|| HvcaError::TotalCount("missing".to_string()))?;
    raw.trim()
        .parse()
        .map_err(|e| HvcaError::TotalCount(format!("{raw:?}: {e}")))
}

/// Identifier of a created resource: the last path segment of `Location`.
///
/// # Errors
///
/// Returns [`HvcaError::Location`] when the header is missing or has no
/// non-empty final segment.
pub fn location_id(reply: &Reply) -> HvcaResult<String> {
    let raw = reply
        .header(reqwest::header::LOCATION.as_str())
        .ok_or_else(|| HvcaError::Location("missing".to_string()))?;
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(HvcaError::Location(format!("no identifier in {raw:?}"))),
    }
}

/// Build the API error for a non-success response.
///
/// Only `application/problem+json` bodies are parsed; anything else becomes
/// an "unknown API error" carrying the status.
#[must_use]
pub fn api_error(reply: &Reply) -> ApiError {
    let status = reply.status.as_u16();
    if reply.content_type().as_deref() != Some(PROBLEM_CONTENT_TYPE) {
        return ApiError::unknown(status);
    }
    serde_json::from_slice::<Problem>(&reply.body)
        .map_or_else(|_| ApiError::unknown(status), |p| ApiError::new(status, p.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNKNOWN_API_ERROR;
    use reqwest::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderMap, HeaderValue},
    };

    fn reply(status: u16, content_type: Option<&'static str>, body: &str) -> Reply {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        Reply {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: body.as_bytes().to_vec(),
        }
    }

    fn with_header(mut reply: Reply, name: &'static str, value: &'static str) -> Reply {
        reply.headers.insert(name, HeaderValue::from_static(value));
        reply
    }

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Meta {
        serial_number: String,
        not_before: i64,
        not_after: i64,
    }

    #[test]
    fn test_value() {
        let r = reply(200, Some("application/json"), r#"{"value":42}"#);
        assert_eq!(value(&r).unwrap(), 42);
    }

    #[test]
    fn test_value_with_charset() {
        let r = reply(200, Some("application/json; charset=utf-8"), r#"{"value":7}"#);
        assert_eq!(value(&r).unwrap(), 7);
    }

    #[test]
    fn test_wrong_content_type_is_fatal() {
        let r = reply(200, Some("text/html"), r#"{"value":42}"#);
        let err = value(&r).unwrap_err();
        assert!(matches!(
            err,
            HvcaError::UnexpectedContentType { found: Some(ref ct), .. } if ct == "text/html"
        ));
    }

    #[test]
    fn test_bad_body_is_decode_error() {
        let r = reply(200, Some("application/json"), r#"{"value":"many"}"#);
        assert!(matches!(value(&r).unwrap_err(), HvcaError::Decode(_)));
    }

    #[test]
    fn test_strings() {
        let r = reply(200, Some("application/json"), r#"["a","b"]"#);
        assert_eq!(strings(&r).unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_page_round_trip() {
        let r = with_header(
            reply(
                200,
                Some("application/json"),
                r#"[{"serial_number":"1","not_before":1,"not_after":2}]"#,
            ),
            "total-count",
            "1",
        );

        let page: Page<Meta> = page(&r).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(
            page.items,
            vec![Meta {
                serial_number: "1".to_string(),
                not_before: 1,
                not_after: 2,
            }]
        );
    }

    #[test]
    fn test_page_non_integer_total_count() {
        let r = with_header(reply(200, Some("application/json"), "[]"), "total-count", "lots");
        assert!(matches!(page::<Meta>(&r).unwrap_err(), HvcaError::TotalCount(_)));
    }

    #[test]
    fn test_page_missing_total_count() {
        let r = reply(200, Some("application/json"), "[]");
        assert!(matches!(page::<Meta>(&r).unwrap_err(), HvcaError::TotalCount(_)));
    }

    #[test]
    fn test_page_bad_body_with_good_header() {
        let r = with_header(reply(200, Some("application/json"), "{}"), "total-count", "3");
        assert!(matches!(page::<Meta>(&r).unwrap_err(), HvcaError::Decode(_)));
    }

    #[test]
    fn test_location_id() {
        let r = with_header(
            reply(201, None, ""),
            "location",
            "https://emea.api.hvca.globalsign.com:8443/v2/certificates/7A3B9C",
        );
        assert_eq!(location_id(&r).unwrap(), "7A3B9C");
    }

    #[test]
    fn test_location_id_relative_with_trailing_slash() {
        let r = with_header(reply(201, None, ""), "location", "/claims/domains/abc123/");
        assert_eq!(location_id(&r).unwrap(), "abc123");
    }

    #[test]
    fn test_location_missing() {
        let r = reply(201, None, "");
        assert!(matches!(location_id(&r).unwrap_err(), HvcaError::Location(_)));
    }

    #[test]
    fn test_location_without_segment() {
        let r = with_header(reply(201, None, ""), "location", "/");
        assert!(matches!(location_id(&r).unwrap_err(), HvcaError::Location(_)));
    }

    #[test]
    fn test_api_error_from_problem_json() {
        let r = reply(
            422,
            Some("application/problem+json"),
            r#"{"description":"Common name not allowed by policy"}"#,
        );
        assert_eq!(
            api_error(&r),
            ApiError::new(422, "Common name not allowed by policy")
        );
    }

    #[test]
    fn test_api_error_unknown_content_type() {
        let r = reply(500, Some("text/plain"), "boom");
        assert_eq!(api_error(&r), ApiError::new(500, UNKNOWN_API_ERROR));
    }

    #[test]
    fn test_api_error_malformed_problem() {
        let r = reply(400, Some("application/problem+json"), "not json");
        assert_eq!(api_error(&r), ApiError::unknown(400));
    }
}
