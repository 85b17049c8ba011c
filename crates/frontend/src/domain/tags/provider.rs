//! Tags offered by the tag pickers, fetched once per application.

use std::cell::RefCell;
use std::rc::Rc;

use contracts::domain::Tag;

use crate::shared::api_utils::api_url;
use crate::shared::fetch::{parse_fetch_response, Transport};
use crate::shared::observable::Observable;
use crate::shared::remote_data::RemoteData;
use crate::shared::runtime::Runtime;

pub const TAGS_ENDPOINT: &str = "/api/tags";

#[derive(Clone)]
pub struct TagsProvider {
    url: String,
    tags: Rc<RefCell<RemoteData<Vec<Tag>>>>,
    transport: Rc<dyn Transport>,
    runtime: Rc<dyn Runtime>,
    observable: Observable,
}

impl TagsProvider {
    pub fn new(api_base: &str, transport: Rc<dyn Transport>, runtime: Rc<dyn Runtime>) -> Self {
        Self {
            url: api_url(api_base, TAGS_ENDPOINT),
            tags: Rc::new(RefCell::new(RemoteData::NotAsked)),
            transport,
            runtime,
            observable: Observable::new(),
        }
    }

    pub fn tags(&self) -> RemoteData<Vec<Tag>> {
        self.tags.borrow().clone()
    }

    /// Tags that can still be attached, archived ones are hidden
    pub fn pickable_tags(&self) -> Vec<Tag> {
        self.tags
            .borrow()
            .payload()
            .map(|tags| tags.iter().filter(|tag| !tag.archived).cloned().collect())
            .unwrap_or_default()
    }

    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    /// Fetch the tags unless they are loaded or loading
    pub async fn load(&self) {
        if !self.tags.borrow().is_not_asked() {
            return;
        }
        self.set_tags(RemoteData::Loading);

        log::debug!("GET {}", self.url);
        let tags = match self.transport.get(&self.url).await {
            Ok(response) => parse_fetch_response::<Tag>(&response, None).remote_data,
            Err(e) => {
                log::warn!("{}", e);
                RemoteData::Failure(e.to_error_details())
            }
        };
        self.set_tags(tags);
    }

    /// Spawned [`TagsProvider::load`]
    pub fn call_for_tags(&self) {
        let provider = self.clone();
        self.runtime.spawn(Box::pin(async move {
            provider.load().await;
        }));
    }

    /// Forget the loaded tags, the next call fetches them again
    pub fn invalidate(&self) {
        self.set_tags(RemoteData::NotAsked);
    }

    fn set_tags(&self, tags: RemoteData<Vec<Tag>>) {
        *self.tags.borrow_mut() = tags;
        self.observable.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fetch::RawResponse;
    use crate::shared::testing::{MockTransport, TokioRuntime};
    use serde_json::json;

    fn provider(transport: Rc<MockTransport>) -> TagsProvider {
        TagsProvider::new("http://localhost:4000", transport, Rc::new(TokioRuntime))
    }

    #[tokio::test]
    async fn test_tags_are_fetched_once() {
        let transport = Rc::new(MockTransport::with_body(json!({
            "data": [
                { "id": 1, "text": "FOOD" },
                { "id": 2, "text": "OLD", "archived": true }
            ]
        })));
        let provider = provider(transport.clone());

        provider.load().await;
        provider.load().await;

        assert_eq!(transport.requests(), vec!["http://localhost:4000/api/tags".to_string()]);
        assert_eq!(provider.tags().payload().map(Vec::len), Some(2));
        assert_eq!(provider.pickable_tags(), vec![Tag::new(1, "FOOD")]);
    }

    #[tokio::test]
    async fn test_failure_is_kept_until_invalidated() {
        let transport = Rc::new(MockTransport::new(|_| {
            RawResponse::new(500, json!({ "error": "Internal", "message": "down" }).to_string())
        }));
        let provider = provider(transport.clone());

        provider.load().await;
        assert!(provider.tags().is_failure());
        assert!(provider.pickable_tags().is_empty());

        provider.invalidate();
        provider.load().await;
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_observers_see_every_state() {
        let transport = Rc::new(MockTransport::with_body(json!({ "data": [] })));
        let provider = provider(transport);
        let states = Rc::new(RefCell::new(Vec::new()));
        let observed = states.clone();
        let inner = provider.clone();
        provider.observable().observe(move || {
            let state = inner.tags();
            observed.borrow_mut().push(if state.is_loading() { "loading" } else { "done" });
        });

        provider.load().await;

        assert_eq!(*states.borrow(), vec!["loading", "done"]);
    }
}
