use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::model::{OverviewPageModel, Reload};
use crate::shared::config::ListConfig;
use crate::shared::debounce::Debouncer;
use crate::shared::fetch::Transport;
use crate::shared::observable::Observable;
use crate::shared::runtime::Runtime;

/// Page model holding filters on top of an [`OverviewPageModel`]
pub trait OverviewModel: 'static {
    type Item: DeserializeOwned + Clone + 'static;
    type Filter: Serialize;

    fn overview(&self) -> &OverviewPageModel<Self::Item>;

    fn overview_mut(&mut self) -> &mut OverviewPageModel<Self::Item>;

    /// Query form of the filters, `None` when no filter is active
    fn filter(&self) -> Option<Self::Filter>;
}

/// Runs the requests of an overview model.
///
/// Model observers are called while the model is mutably borrowed: they must
/// only schedule work, never borrow the model themselves.
pub struct ListController<M: OverviewModel> {
    model: Rc<RefCell<M>>,
    transport: Rc<dyn Transport>,
    runtime: Rc<dyn Runtime>,
    debouncer: Debouncer,
}

impl<M: OverviewModel> Clone for ListController<M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            transport: self.transport.clone(),
            runtime: self.runtime.clone(),
            debouncer: self.debouncer.clone(),
        }
    }
}

impl<M: OverviewModel> ListController<M> {
    pub fn new(
        model: M,
        transport: Rc<dyn Transport>,
        runtime: Rc<dyn Runtime>,
        debounce_delay: Duration,
    ) -> Self {
        Self {
            model: Rc::new(RefCell::new(model)),
            transport,
            runtime,
            debouncer: Debouncer::new(debounce_delay),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.model.borrow())
    }

    /// Mutate the model without reloading
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.model.borrow_mut())
    }

    /// Mutate the model and run the reload it asks for
    pub fn update(&self, f: impl FnOnce(&mut M) -> Reload) {
        let reload = f(&mut self.model.borrow_mut());
        self.dispatch(reload);
    }

    pub fn dispatch(&self, reload: Reload) {
        match reload {
            Reload::Skip => {}
            Reload::Immediate => self.reload(),
            Reload::Debounced => {
                let controller = self.clone();
                self.debouncer
                    .schedule(self.runtime.as_ref(), move || async move {
                        controller.load(true).await;
                    });
            }
        }
    }

    pub fn set_debounce_delay(&self, delay: Duration) {
        self.debouncer.set_delay(delay);
    }

    /// Take over a configuration received after construction
    pub fn apply_list_config(&self, config: &ListConfig) {
        self.set_debounce_delay(Duration::from_millis(config.input_debounce_ms));
        self.model
            .borrow_mut()
            .overview_mut()
            .pagination_mut()
            .set_infinite_chunk_size(config.infinite_scroll_chunk_size);
    }

    /// Notified on every change of the model, at any depth
    pub fn observable(&self) -> Observable {
        self.with(|model| model.overview().observable().clone())
    }

    /// Fresh load of the first records, superseding any pending debounced one
    pub fn reload(&self) {
        self.debouncer.cancel();
        let controller = self.clone();
        self.runtime.spawn(Box::pin(async move {
            controller.load(true).await;
        }));
    }

    /// Next chunk of an infinite list, if there is one
    pub fn load_more(&self) {
        if !self.with(|model| model.overview().has_more_to_load()) {
            return;
        }
        let controller = self.clone();
        self.runtime.spawn(Box::pin(async move {
            controller.load(false).await;
        }));
    }

    pub async fn load(&self, clear: bool) {
        let request = {
            let mut model = self.model.borrow_mut();
            let filter = model.filter();
            model.overview_mut().begin_load(filter.as_ref(), clear)
        };

        log::debug!("GET {}", request.url);
        let result = self.transport.get(&request.url).await;
        self.model
            .borrow_mut()
            .overview_mut()
            .complete_load(request, result);
    }

    /// Fill the unpaged cache if it was not asked yet
    pub async fn load_all_items(&self) {
        let request = {
            let mut model = self.model.borrow_mut();
            let filter = model.filter();
            model.overview_mut().begin_all_items_load(filter.as_ref())
        };

        if let Some(request) = request {
            log::debug!("GET {}", request.url);
            let result = self.transport.get(&request.url).await;
            self.model
                .borrow_mut()
                .overview_mut()
                .complete_all_items_load(request, result);
        }
    }

    /// Spawned [`ListController::load_all_items`]
    pub fn call_for_all_items(&self) {
        let controller = self.clone();
        self.runtime.spawn(Box::pin(async move {
            controller.load_all_items().await;
        }));
    }
}
