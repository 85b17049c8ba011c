use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Task spawning and timers, injected so controllers run outside a browser too
pub trait Runtime {
    fn spawn(&self, task: LocalFuture);

    fn sleep(&self, duration: Duration) -> LocalFuture;
}

/// Browser event loop
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserRuntime;

impl Runtime for BrowserRuntime {
    fn spawn(&self, task: LocalFuture) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalFuture {
        Box::pin(gloo_timers::future::sleep(duration))
    }
}
