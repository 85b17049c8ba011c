use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

/// Top-level pages of the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Runs,
    Logs,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Runs, Page::Logs];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Runs => "Runs",
            Page::Logs => "Logs",
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Page::Runs => "runs",
            Page::Logs => "logs",
        }
    }
}

/// Query string of the application URL
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<Page>,
}

/// Page named by a `?page=...` query string, if it is a known one
pub fn page_from_query(search: &str) -> Option<Page> {
    serde_qs::from_str::<PageQuery>(search.trim_start_matches('?'))
        .ok()
        .and_then(|query| query.page)
}

pub fn page_query(page: Page) -> String {
    let query = serde_qs::to_string(&PageQuery { page: Some(page) }).unwrap_or_default();
    format!("?{}", query)
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active: RwSignal<Page>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(Page::default()),
        }
    }

    /// Restore the active page from the URL, then keep the URL in sync with it
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if let Some(page) = page_from_query(&search) {
            self.active.set(page);
        }

        let this = *self;
        Effect::new(move |_| {
            let new_url = page_query(this.active.get());

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();

            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }

    pub fn open_page(&self, page: Page) {
        log::debug!("Opening page {:?}", page);
        self.active.set(page);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query() {
        assert_eq!(page_query(Page::Logs), "?page=logs");
        assert_eq!(page_from_query("?page=logs"), Some(Page::Logs));
        assert_eq!(page_from_query("page=runs&other=1"), Some(Page::Runs));
    }

    #[test]
    fn test_unknown_page_is_ignored() {
        assert_eq!(page_from_query("?page=lhcFills"), None);
        assert_eq!(page_from_query(""), None);
    }
}
