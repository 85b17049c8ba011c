//! Application-wide state: configuration and one controller per overview.
//!
//! Created once by [`crate::app::App`] and provided to the component tree as a
//! local [`StoredValue`], so views only capture a `Copy` handle.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;

use crate::domain::logs::LogsOverviewModel;
use crate::domain::runs::RunsOverviewModel;
use crate::domain::tags::TagsProvider;
use crate::shared::api_utils::{api_base, api_url};
use crate::shared::config::{load_config, AppConfiguration, RemoteConfiguration};
use crate::shared::fetch::{GlooTransport, Transport};
use crate::shared::observable::Observable;
use crate::shared::overview::ListController;
use crate::shared::runtime::{BrowserRuntime, Runtime};

pub const CONFIGURATION_ENDPOINT: &str = "/api/configuration";

pub type AppContextHandle = StoredValue<AppContext, LocalStorage>;

#[derive(Clone)]
pub struct AppContext {
    configuration: Rc<RefCell<AppConfiguration>>,
    api_base: String,
    transport: Rc<dyn Transport>,
    pub runs: ListController<RunsOverviewModel>,
    pub logs: ListController<LogsOverviewModel>,
    pub tags: TagsProvider,
}

impl AppContext {
    pub fn new(
        configuration: AppConfiguration,
        api_base: &str,
        transport: Rc<dyn Transport>,
        runtime: Rc<dyn Runtime>,
    ) -> Self {
        let debounce = Duration::from_millis(configuration.list.input_debounce_ms);
        let runs = ListController::new(
            RunsOverviewModel::new(api_base, &configuration.list),
            transport.clone(),
            runtime.clone(),
            debounce,
        );
        let logs = ListController::new(
            LogsOverviewModel::new(api_base, &configuration.list),
            transport.clone(),
            runtime.clone(),
            debounce,
        );
        let tags = TagsProvider::new(api_base, transport.clone(), runtime);

        Self {
            configuration: Rc::new(RefCell::new(configuration)),
            api_base: api_base.to_string(),
            transport,
            runs,
            logs,
            tags,
        }
    }

    /// Context of the running page: embedded configuration, `fetch` and the
    /// browser event loop
    pub fn browser() -> anyhow::Result<Self> {
        let configuration = load_config()?;
        let base = api_base(configuration.api.port);
        Ok(Self::new(
            configuration,
            &base,
            Rc::new(GlooTransport),
            Rc::new(BrowserRuntime),
        ))
    }

    pub fn configuration(&self) -> AppConfiguration {
        self.configuration.borrow().clone()
    }

    /// Apply the overrides served by the API, if any.
    ///
    /// The embedded defaults stay in place when the endpoint is missing or
    /// answers with something unexpected.
    pub async fn load_remote_configuration(&self) {
        let url = api_url(&self.api_base, CONFIGURATION_ENDPOINT);
        log::debug!("GET {}", url);

        let response = match self.transport.get(&url).await {
            Ok(response) if (200..300).contains(&response.status) => response,
            Ok(response) => {
                log::warn!("No remote configuration (status {})", response.status);
                return;
            }
            Err(e) => {
                log::warn!("No remote configuration: {}", e);
                return;
            }
        };

        let remote: RemoteConfiguration = match serde_json::from_str(&response.body) {
            Ok(remote) => remote,
            Err(e) => {
                log::warn!("Invalid remote configuration: {}", e);
                return;
            }
        };

        self.apply_remote_configuration(&remote);
    }

    pub fn apply_remote_configuration(&self, remote: &RemoteConfiguration) {
        let changed = self.configuration.borrow_mut().apply_remote(remote);
        if changed {
            let list = self.configuration.borrow().list.clone();
            log::info!(
                "Remote configuration applied: debounce {} ms, chunk size {}",
                list.input_debounce_ms,
                list.infinite_scroll_chunk_size
            );
            self.runs.apply_list_config(&list);
            self.logs.apply_list_config(&list);
        }
    }
}

/// Handle provided by [`crate::app::App`]
pub fn use_app_context() -> AppContextHandle {
    use_context::<AppContextHandle>().expect("AppContext not provided")
}

/// Signal bumped on every notification of the observable picked by `select`,
/// for the lifetime of the calling component.
///
/// Views read the models through the context and track this signal, so the
/// models themselves stay free of any reactive type.
pub fn use_observable_version(
    context: AppContextHandle,
    select: fn(&AppContext) -> Observable,
) -> RwSignal<u64> {
    let version = RwSignal::new(0u64);
    let observer = context.with_value(|app| {
        select(app).observe(move || {
            version.try_update(|version| *version += 1);
        })
    });
    on_cleanup(move || {
        context.try_with_value(|app| select(app).unobserve(observer));
    });
    version
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fetch::RawResponse;
    use crate::shared::overview::OverviewModel;
    use crate::shared::testing::{page_limit, MockTransport, TokioRuntime};
    use serde_json::json;

    fn context(transport: Rc<MockTransport>) -> AppContext {
        AppContext::new(
            AppConfiguration::default(),
            "http://localhost:4000",
            transport,
            Rc::new(TokioRuntime),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_configuration_reaches_the_controllers() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let transport = Rc::new(MockTransport::new(|url| {
                    if url.ends_with(CONFIGURATION_ENDPOINT) {
                        RawResponse::new(
                            200,
                            json!({ "inputDebounceTime": 500, "infiniteScrollChunkSize": 7 }).to_string(),
                        )
                    } else {
                        RawResponse::new(200, json!({ "data": [] }).to_string())
                    }
                }));
                let context = context(transport.clone());

                context.load_remote_configuration().await;
                assert_eq!(context.configuration().list.input_debounce_ms, 500);

                context.runs.update(|model| {
                    model.overview_mut().set_items_per_page(crate::shared::pagination::ItemsPerPage::Infinite)
                });
                context.runs.update(|model| model.set_run_numbers("1"));

                tokio::time::sleep(Duration::from_millis(300)).await;
                // Only the immediate load: the debounced one waits 500 ms
                assert_eq!(transport.requests().len(), 2);

                tokio::time::sleep(Duration::from_millis(300)).await;
                let requests = transport.decoded_requests();
                assert_eq!(requests.len(), 3);
                assert_eq!(page_limit(&requests[2]), Some(7));
            })
            .await;
    }

    #[tokio::test]
    async fn test_missing_remote_configuration_keeps_defaults() {
        let transport = Rc::new(MockTransport::new(|_| RawResponse::new(404, "")));
        let context = context(transport);

        context.load_remote_configuration().await;

        assert_eq!(context.configuration(), AppConfiguration::default());
    }
}
