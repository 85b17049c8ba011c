//! JSON:API style envelope used by every Bookkeeping collection endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Text of a loosely typed field: `null` is empty, other non-strings are kept as JSON
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// One user-facing error, as found in the `errors` array of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub detail: String,
}

impl ApiErrorDetail {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Pagination metadata (`meta.page`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub page_count: Option<usize>,
    #[serde(default)]
    pub total_count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub page: Option<PageMeta>,
}

/// Raw response body.
///
/// `data` stays untyped: a body whose `data` is not an array is an error
/// response, and that has to be detected before deserializing the records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
    #[serde(default)]
    pub errors: Option<Vec<ApiErrorDetail>>,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_with_page_meta() {
        let body: ResponseBody = serde_json::from_str(
            r#"{"data": [], "meta": {"page": {"pageCount": 2, "totalCount": 30}}}"#,
        )
        .unwrap();

        let page = body.meta.and_then(|meta| meta.page).unwrap();
        assert_eq!(page.page_count, Some(2));
        assert_eq!(page.total_count, Some(30));
    }

    #[test]
    fn test_error_without_detail() {
        let body: ResponseBody =
            serde_json::from_str(r#"{"errors": [{"status": "400", "title": "Invalid"}]}"#).unwrap();

        assert_eq!(body.errors.unwrap(), vec![ApiErrorDetail::new("Invalid", "")]);
    }

    #[test]
    fn test_null_detail_keeps_the_error() {
        let body: ResponseBody = serde_json::from_str(
            r#"{"errors": [{"status": "404", "title": "Run not found", "detail": null}]}"#,
        )
        .unwrap();

        assert_eq!(body.errors.unwrap(), vec![ApiErrorDetail::new("Run not found", "")]);
    }

    #[test]
    fn test_non_string_error_is_kept_as_text() {
        let body: ResponseBody =
            serde_json::from_str(r#"{"error": 500, "message": null}"#).unwrap();

        assert_eq!(body.error.as_deref(), Some("500"));
        assert_eq!(body.message, None);
    }
}
