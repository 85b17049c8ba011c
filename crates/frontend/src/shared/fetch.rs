//! HTTP access to the collection endpoints and parsing of their responses.

use async_trait::async_trait;
use contracts::shared::{ApiErrorDetail, ResponseBody};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::remote_data::RemoteData;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl FetchError {
    /// User-facing form, stored in a `RemoteData::Failure`
    pub fn to_error_details(&self) -> Vec<ApiErrorDetail> {
        vec![ApiErrorDetail::new("Network error", self.to_string())]
    }
}

/// Seam between the list controllers and the network
#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

/// Browser transport based on `fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = if status == 204 {
            String::new()
        } else {
            response
                .text()
                .await
                .map_err(|e| FetchError::Body(e.to_string()))?
        };

        Ok(RawResponse { status, body })
    }
}

// ============================================================================
// Response parsing
// ============================================================================

/// Outcome of [`parse_fetch_response`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse<T> {
    pub remote_data: RemoteData<Vec<T>>,
    pub page_count: Option<usize>,
    pub total_count: Option<usize>,
}

impl<T> ParsedResponse<T> {
    fn failure(errors: Vec<ApiErrorDetail>) -> Self {
        Self {
            remote_data: RemoteData::Failure(errors),
            page_count: None,
            total_count: None,
        }
    }
}

fn invalid_response(detail: impl Into<String>) -> Vec<ApiErrorDetail> {
    vec![ApiErrorDetail::new("Invalid response", detail)]
}

/// Map a collection response to remote data and pagination metadata.
///
/// - 204 is an empty result, with one page and zero items
/// - `meta.page` provides the page and item counts
/// - an array at `data` is a success; with `concatenate_with` the records are
///   appended to it and the item count is not defaulted
/// - anything else is a failure built from `errors`, or from `error`/`message`
pub fn parse_fetch_response<T: DeserializeOwned>(
    response: &RawResponse,
    concatenate_with: Option<Vec<T>>,
) -> ParsedResponse<T> {
    if response.status == 204 {
        return match concatenate_with {
            Some(existing) => ParsedResponse {
                remote_data: RemoteData::Success(existing),
                page_count: None,
                total_count: None,
            },
            None => ParsedResponse {
                remote_data: RemoteData::Success(Vec::new()),
                page_count: Some(1),
                total_count: Some(0),
            },
        };
    }

    let body: ResponseBody = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Unparsable response body (status {}): {}", response.status, e);
            return ParsedResponse::failure(invalid_response(e.to_string()));
        }
    };

    let page = body.meta.as_ref().and_then(|meta| meta.page);
    let page_count = page.and_then(|page| page.page_count);
    let mut total_count = page.and_then(|page| page.total_count);

    match body.data {
        Some(data @ Value::Array(_)) => {
            let items: Vec<T> = match serde_json::from_value(data) {
                Ok(items) => items,
                Err(e) => return ParsedResponse::failure(invalid_response(e.to_string())),
            };

            let payload = match concatenate_with {
                Some(mut existing) => {
                    existing.extend(items);
                    existing
                }
                None => {
                    total_count = total_count.or(Some(items.len()));
                    items
                }
            };

            ParsedResponse {
                remote_data: RemoteData::Success(payload),
                page_count,
                total_count,
            }
        }
        _ => {
            let errors = match body.errors {
                Some(errors) if !errors.is_empty() => errors,
                _ => vec![ApiErrorDetail::new(
                    body.error.unwrap_or_else(|| "Unknown error".to_string()),
                    body.message.unwrap_or_default(),
                )],
            };
            ParsedResponse::failure(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(response: RawResponse, concatenate_with: Option<Vec<Value>>) -> ParsedResponse<Value> {
        parse_fetch_response(&response, concatenate_with)
    }

    #[test]
    fn test_no_content_is_empty_success() {
        let parsed = parse(RawResponse::new(204, ""), None);

        assert_eq!(parsed.remote_data, RemoteData::Success(vec![]));
        assert_eq!(parsed.page_count, Some(1));
        assert_eq!(parsed.total_count, Some(0));
    }

    #[test]
    fn test_page_meta_is_extracted() {
        let body = json!({"data": ["a", "b", "c"], "meta": {"page": {"pageCount": 2, "totalCount": 30}}});
        let parsed = parse(RawResponse::new(200, body.to_string()), None);

        assert_eq!(
            parsed.remote_data,
            RemoteData::Success(vec![json!("a"), json!("b"), json!("c")])
        );
        assert_eq!(parsed.page_count, Some(2));
        assert_eq!(parsed.total_count, Some(30));
    }

    #[test]
    fn test_concatenation() {
        let body = json!({"data": ["a", "b", "c"], "meta": {"page": {"pageCount": 2, "totalCount": 30}}});
        let parsed = parse(
            RawResponse::new(200, body.to_string()),
            Some(vec![json!("x"), json!("y")]),
        );

        assert_eq!(
            parsed.remote_data,
            RemoteData::Success(vec![json!("x"), json!("y"), json!("a"), json!("b"), json!("c")])
        );
    }

    #[test]
    fn test_total_count_defaults_to_data_length() {
        let parsed = parse(RawResponse::new(200, json!({"data": [1, 2]}).to_string()), None);

        assert_eq!(parsed.total_count, Some(2));
    }

    #[test]
    fn test_generic_error_is_synthesized() {
        let body = json!({"error": "E", "message": "M"});
        let parsed = parse(RawResponse::new(500, body.to_string()), None);

        assert_eq!(
            parsed.remote_data,
            RemoteData::Failure(vec![ApiErrorDetail::new("E", "M")])
        );
    }

    #[test]
    fn test_api_errors_are_kept() {
        let body = json!({"errors": [{"title": "Invalid filter", "detail": "Fill numbers must be integers"}]});
        let parsed = parse(RawResponse::new(400, body.to_string()), None);

        assert_eq!(
            parsed.remote_data.errors().unwrap()[0].detail,
            "Fill numbers must be integers"
        );
    }

    #[test]
    fn test_null_detail_does_not_hide_api_error() {
        let body = json!({"errors": [{"status": "404", "title": "Run not found", "detail": null}]});
        let parsed = parse(RawResponse::new(404, body.to_string()), None);

        assert_eq!(
            parsed.remote_data,
            RemoteData::Failure(vec![ApiErrorDetail::new("Run not found", "")])
        );
    }

    #[test]
    fn test_invalid_json() {
        let parsed = parse(RawResponse::new(502, "<html>Bad gateway</html>"), None);

        assert_eq!(parsed.remote_data.errors().unwrap()[0].title, "Invalid response");
    }

    #[test]
    fn test_records_of_wrong_shape() {
        let parsed: ParsedResponse<contracts::domain::Tag> = parse_fetch_response(
            &RawResponse::new(200, json!({"data": [{"label": "no id"}]}).to_string()),
            None,
        );

        assert!(parsed.remote_data.is_failure());
    }
}
