//! Query-string construction for the collection endpoints.

use contracts::shared::PageParams;
use serde::Serialize;

/// `filter[...]` and `page[...]` of a collection request
#[derive(Debug, Serialize)]
pub struct CollectionQuery<'a, F: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a F>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

/// Append the serialized `query` to `endpoint`
pub fn build_url<Q: Serialize>(endpoint: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(query_string) if !query_string.is_empty() => {
            let separator = if endpoint.contains('?') { '&' } else { '?' };
            format!("{}{}{}", endpoint, separator, query_string)
        }
        Ok(_) => endpoint.to_string(),
        Err(e) => {
            log::warn!("Failed to serialize query for {}: {}", endpoint, e);
            endpoint.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::RunsFilter;

    fn decoded(url: &str) -> String {
        urlencoding::decode(url).unwrap().into_owned()
    }

    #[test]
    fn test_filter_and_page() {
        let filter = RunsFilter {
            run_numbers: Some("106,107".to_string()),
            ..Default::default()
        };
        let url = build_url(
            "/api/runs",
            &CollectionQuery {
                filter: Some(&filter),
                page: Some(PageParams { offset: 20, limit: 10 }),
            },
        );

        let url = decoded(&url);
        assert!(url.starts_with("/api/runs?"));
        assert!(url.contains("filter[runNumbers]=106,107"));
        assert!(url.contains("page[offset]=20"));
        assert!(url.contains("page[limit]=10"));
    }

    #[test]
    fn test_empty_query_leaves_endpoint_untouched() {
        let url = build_url(
            "/api/runs",
            &CollectionQuery::<RunsFilter> {
                filter: None,
                page: None,
            },
        );
        assert_eq!(url, "/api/runs");
    }
}
