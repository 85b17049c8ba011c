//! State of the current page and of the unpaged "all items" cache of an
//! overview, plus the bookkeeping of the requests filling them.

use contracts::shared::{ApiErrorDetail, PageParams};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::config::ListConfig;
use crate::shared::fetch::{parse_fetch_response, FetchError, RawResponse};
use crate::shared::observable::Observable;
use crate::shared::pagination::{ItemsPerPage, PaginationModel};
use crate::shared::query::{build_url, CollectionQuery};
use crate::shared::remote_data::RemoteData;

/// What a state change requires from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    Skip,
    Immediate,
    /// After the input quiet period
    Debounced,
}

impl Reload {
    pub fn when(changed: bool, reload: Reload) -> Reload {
        if changed {
            reload
        } else {
            Reload::Skip
        }
    }
}

/// Request prepared by the model, to be completed with its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub url: String,
    pub token: u64,
    /// Append the records to the current ones instead of replacing them
    pub concatenate: bool,
}

#[derive(Debug)]
pub struct OverviewPageModel<T> {
    endpoint: String,
    pagination: PaginationModel,
    items: RemoteData<Vec<T>>,
    all_items: RemoteData<Vec<T>>,
    items_token: u64,
    all_items_token: u64,
    loading_more: bool,
    observable: Observable,
}

impl<T: DeserializeOwned + Clone> OverviewPageModel<T> {
    pub fn new(endpoint: impl Into<String>, config: &ListConfig) -> Self {
        let pagination = PaginationModel::new(
            config.default_items_per_page,
            config.infinite_scroll_chunk_size,
        );
        let observable = Observable::new();
        pagination.observable().bubble_to(&observable);

        Self {
            endpoint: endpoint.into(),
            pagination,
            items: RemoteData::NotAsked,
            all_items: RemoteData::NotAsked,
            items_token: 0,
            all_items_token: 0,
            loading_more: false,
            observable,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn items(&self) -> &RemoteData<Vec<T>> {
        &self.items
    }

    pub fn all_items(&self) -> &RemoteData<Vec<T>> {
        &self.all_items
    }

    pub fn pagination(&self) -> &PaginationModel {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut PaginationModel {
        &mut self.pagination
    }

    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    fn loaded_count(&self) -> usize {
        self.items.payload().map_or(0, Vec::len)
    }

    /// Prepare the request of the current page.
    ///
    /// In infinite mode the next chunk starts after the records already loaded
    /// and is appended to them, unless `clear` is set.
    pub fn begin_load<F: Serialize>(&mut self, filter: Option<&F>, clear: bool) -> LoadRequest {
        let infinite = self.pagination.is_infinite_scroll_enabled();
        let concatenate = infinite && !clear && self.items.is_success();

        let offset = if !infinite {
            self.pagination.first_item_offset()
        } else if concatenate {
            self.loaded_count()
        } else {
            0
        };
        let page = PageParams {
            offset,
            limit: self.pagination.items_per_page(),
        };

        if concatenate {
            self.loading_more = true;
        } else {
            self.items = RemoteData::Loading;
            self.loading_more = false;
        }
        self.all_items = RemoteData::NotAsked;
        self.items_token += 1;
        self.observable.notify();

        LoadRequest {
            url: build_url(
                &self.endpoint,
                &CollectionQuery {
                    filter,
                    page: Some(page),
                },
            ),
            token: self.items_token,
            concatenate,
        }
    }

    /// Store the outcome of `request`; returns false if a later request superseded it
    pub fn complete_load(
        &mut self,
        request: LoadRequest,
        result: Result<RawResponse, FetchError>,
    ) -> bool {
        if request.token != self.items_token {
            log::debug!("Dropping stale response of {}", request.url);
            return false;
        }
        self.loading_more = false;

        match result {
            Ok(response) => {
                let concatenate_with = if request.concatenate {
                    Some(std::mem::take(&mut self.items).into_payload().unwrap_or_default())
                } else {
                    None
                };
                let previously_loaded = concatenate_with.as_ref().map(Vec::len);
                let parsed = parse_fetch_response(&response, concatenate_with);
                if let Some(total_count) = parsed.total_count {
                    self.pagination
                        .set_items_count(total_count, parsed.page_count);
                }
                if let RemoteData::Failure(errors) = &parsed.remote_data {
                    log::warn!("Loading {} failed: {:?}", request.url, errors);
                }
                self.items = parsed.remote_data;

                // An empty chunk means the list is exhausted, whatever the last total said
                if let Some(previously_loaded) = previously_loaded {
                    if self.items.is_success() && self.loaded_count() == previously_loaded {
                        self.pagination.set_items_count(previously_loaded, None);
                    }
                }
            }
            Err(e) => {
                log::warn!("{}", e);
                self.items = RemoteData::Failure(e.to_error_details());
            }
        }

        self.observable.notify();
        true
    }

    /// Next chunk to load in infinite mode, if any is left
    pub fn has_more_to_load(&self) -> bool {
        self.pagination.is_infinite_scroll_enabled()
            && !self.loading_more
            && self.items.is_success()
            && self.loaded_count() < self.pagination.items_count()
    }

    /// Serve the unpaged cache from the current page if it already holds every
    /// record, else prepare the unpaged request. `None` when nothing is to be fetched.
    pub fn begin_all_items_load<F: Serialize>(&mut self, filter: Option<&F>) -> Option<LoadRequest> {
        if !self.all_items.is_not_asked() {
            return None;
        }

        if let Some(items) = self.items.payload() {
            if items.len() == self.pagination.items_count() {
                self.all_items = RemoteData::Success(items.clone());
                self.observable.notify();
                return None;
            }
        }

        self.all_items = RemoteData::Loading;
        self.all_items_token += 1;
        self.observable.notify();

        Some(LoadRequest {
            url: build_url(&self.endpoint, &CollectionQuery { filter, page: None }),
            token: self.all_items_token,
            concatenate: false,
        })
    }

    pub fn complete_all_items_load(
        &mut self,
        request: LoadRequest,
        result: Result<RawResponse, FetchError>,
    ) -> bool {
        if request.token != self.all_items_token || !self.all_items.is_loading() {
            log::debug!("Dropping stale response of {}", request.url);
            return false;
        }

        self.all_items = match result {
            Ok(response) => parse_fetch_response(&response, None).remote_data,
            Err(e) => {
                log::warn!("{}", e);
                RemoteData::Failure(e.to_error_details())
            }
        };
        self.observable.notify();
        true
    }

    /// Drop the unpaged cache, e.g. after a record was created or deleted
    pub fn invalidate_all_items(&mut self) {
        self.all_items = RemoteData::NotAsked;
    }

    /// The API caps unpaged results: the cache may hold fewer records than exist
    pub fn is_all_items_truncated(&self) -> bool {
        self.all_items
            .payload()
            .is_some_and(|items| items.len() < self.pagination.items_count())
    }

    /// Show `errors` in place of the current page
    pub fn set_items_failure(&mut self, errors: Vec<ApiErrorDetail>) {
        self.items = RemoteData::Failure(errors);
        self.observable.notify();
    }

    pub fn set_current_page(&mut self, page: usize) -> Reload {
        Reload::when(self.pagination.set_current_page(page), Reload::Immediate)
    }

    pub fn go_to_next_page(&mut self) -> Reload {
        Reload::when(self.pagination.go_to_next_page(), Reload::Immediate)
    }

    pub fn set_items_per_page(&mut self, items_per_page: ItemsPerPage) -> Reload {
        match items_per_page {
            ItemsPerPage::Infinite => self.pagination.enable_infinite_mode(),
            ItemsPerPage::Count(amount) => self.pagination.set_items_per_page(amount),
        }
        Reload::Immediate
    }

    /// Use the amount typed in the custom items-per-page input, if valid
    pub fn apply_custom_items_per_page(&mut self) -> Reload {
        match self.pagination.parsed_custom_items_per_page() {
            Some(amount) => {
                self.pagination.set_custom_items_per_page("");
                self.set_items_per_page(ItemsPerPage::Count(amount))
            }
            None => Reload::Skip,
        }
    }

    /// Any filter change: back to the first page, cache invalidated
    pub fn on_filter_change(&mut self) {
        self.pagination.silently_set_current_page(1);
        self.invalidate_all_items();
        self.observable.notify();
    }

    pub fn reset(&mut self) {
        self.pagination.reset();
        self.invalidate_all_items();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::AppConfiguration;
    use crate::shared::testing::{page_limit, page_offset};
    use contracts::shared::RunsFilter;
    use serde_json::{json, Value};

    fn model() -> OverviewPageModel<Value> {
        OverviewPageModel::new("/api/runs", &AppConfiguration::default().list)
    }

    fn no_filter() -> Option<&'static RunsFilter> {
        None
    }

    fn response(ids: std::ops::Range<usize>, total: usize) -> Result<RawResponse, FetchError> {
        let data: Vec<Value> = ids.map(|id| json!({ "id": id })).collect();
        Ok(RawResponse::new(
            200,
            json!({ "data": data, "meta": { "page": { "totalCount": total } } }).to_string(),
        ))
    }

    fn decoded(request: &LoadRequest) -> String {
        urlencoding::decode(&request.url).unwrap().into_owned()
    }

    #[test]
    fn test_paged_offset() {
        let mut model = model();
        model.pagination_mut().set_items_count(100, None);
        model.set_current_page(3);

        let request = model.begin_load(no_filter(), false);
        let url = decoded(&request);

        assert_eq!(page_offset(&url), 20);
        assert_eq!(page_limit(&url), Some(10));
        assert!(!request.concatenate);
        assert!(model.items().is_loading());
    }

    #[test]
    fn test_filter_is_omitted_when_absent() {
        let mut model = model();
        let request = model.begin_load(no_filter(), true);
        assert!(!decoded(&request).contains("filter"));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut model = model();
        let first = model.begin_load(no_filter(), true);
        let second = model.begin_load(no_filter(), true);

        assert!(model.complete_load(second, response(0..2, 2)));
        assert!(!model.complete_load(first, response(0..5, 5)));

        assert_eq!(model.items().payload().map(Vec::len), Some(2));
        assert_eq!(model.pagination().items_count(), 2);
    }

    #[test]
    fn test_infinite_chunks_are_appended() {
        let mut model = model();
        model.set_items_per_page(ItemsPerPage::Infinite);

        let request = model.begin_load(no_filter(), true);
        assert_eq!(page_limit(&decoded(&request)), Some(19));
        model.complete_load(request, response(0..19, 30));
        assert!(model.has_more_to_load());

        let request = model.begin_load(no_filter(), false);
        assert!(request.concatenate);
        assert_eq!(page_offset(&decoded(&request)), 19);
        assert!(model.items().is_success());
        model.complete_load(request, response(19..30, 30));

        assert_eq!(model.items().payload().map(Vec::len), Some(30));
        assert!(!model.has_more_to_load());
    }

    #[test]
    fn test_pending_chunk_keeps_loaded_records() {
        let mut model = model();
        model.set_items_per_page(ItemsPerPage::Infinite);
        let request = model.begin_load(no_filter(), true);
        model.complete_load(request, response(0..19, 30));
        let loaded = model.items().clone();

        model.begin_load(no_filter(), false);

        assert!(model.is_loading_more());
        assert_eq!(model.items(), &loaded);
    }

    #[test]
    fn test_empty_chunk_ends_infinite_list() {
        let mut model = model();
        model.set_items_per_page(ItemsPerPage::Infinite);
        let request = model.begin_load(no_filter(), true);
        model.complete_load(request, response(0..19, 30));
        assert!(model.has_more_to_load());

        let request = model.begin_load(no_filter(), false);
        assert_eq!(page_offset(&decoded(&request)), 19);
        model.complete_load(request, Ok(RawResponse::new(204, String::new())));

        assert_eq!(model.items().payload().map(Vec::len), Some(19));
        assert_eq!(model.pagination().items_count(), 19);
        assert!(!model.has_more_to_load());
    }

    #[test]
    fn test_clear_restarts_infinite_list() {
        let mut model = model();
        model.set_items_per_page(ItemsPerPage::Infinite);
        let request = model.begin_load(no_filter(), true);
        model.complete_load(request, response(0..19, 30));

        let request = model.begin_load(no_filter(), true);
        assert!(!request.concatenate);
        assert_eq!(page_offset(&decoded(&request)), 0);
    }

    #[test]
    fn test_all_items_reuse_complete_page() {
        let mut model = model();
        let request = model.begin_load(no_filter(), true);
        model.complete_load(request, response(0..4, 4));

        assert!(model.begin_all_items_load(no_filter()).is_none());
        assert_eq!(model.all_items().payload().map(Vec::len), Some(4));
    }

    #[test]
    fn test_all_items_fetched_without_paging() {
        let mut model = model();
        let request = model.begin_load(no_filter(), true);
        model.complete_load(request, response(0..10, 25));

        let request = model.begin_all_items_load(no_filter()).unwrap();
        assert!(!decoded(&request).contains("page["));
        assert!(model.all_items().is_loading());
        assert!(model.begin_all_items_load(no_filter()).is_none());

        model.complete_all_items_load(request, response(0..25, 25));
        assert_eq!(model.all_items().payload().map(Vec::len), Some(25));
        assert!(!model.is_all_items_truncated());
    }

    #[test]
    fn test_next_page_reloads_until_last() {
        let mut model = model();
        model.pagination_mut().set_items_count(15, None);

        assert_eq!(model.go_to_next_page(), Reload::Immediate);
        assert_eq!(model.go_to_next_page(), Reload::Skip);
        assert_eq!(page_offset(&decoded(&model.begin_load(no_filter(), false))), 10);
    }

    #[test]
    fn test_custom_items_per_page() {
        let mut model = model();
        model.pagination_mut().set_custom_items_per_page("abc");
        assert_eq!(model.apply_custom_items_per_page(), Reload::Skip);

        model.pagination_mut().set_custom_items_per_page(" 25 ");
        assert_eq!(model.apply_custom_items_per_page(), Reload::Immediate);
        assert_eq!(model.pagination().selected_items_per_page(), ItemsPerPage::Count(25));
        assert_eq!(model.pagination().custom_items_per_page(), "");
    }

    #[test]
    fn test_reload_invalidates_all_items() {
        let mut model = model();
        let request = model.begin_load(no_filter(), true);
        model.complete_load(request, response(0..4, 4));
        model.begin_all_items_load(no_filter());

        model.begin_load(no_filter(), true);
        assert!(model.all_items().is_not_asked());
    }

    #[test]
    fn test_transport_error_becomes_failure() {
        let mut model = model();
        let request = model.begin_load(no_filter(), true);
        model.complete_load(
            request,
            Err(FetchError::Network {
                url: "/api/runs".to_string(),
                reason: "offline".to_string(),
            }),
        );

        let errors = model.items().errors().unwrap();
        assert_eq!(errors[0].title, "Network error");
    }

    #[test]
    fn test_set_current_page_is_noop_when_unchanged() {
        let mut model = model();
        model.pagination_mut().set_items_count(100, None);

        assert_eq!(model.set_current_page(1), Reload::Skip);
        assert_eq!(model.set_current_page(2), Reload::Immediate);
    }
}
