use crate::app_context::{AppContext, AppContextHandle};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn MainLayout() -> impl IntoView {
    let global = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    // Runs once when the layout is created
    global.init_router_integration();

    view! { <Shell /> }
}

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());

    match AppContext::browser() {
        Ok(context) => {
            let handle: AppContextHandle = StoredValue::new_local(context.clone());
            provide_context(handle);

            spawn_local(async move {
                context.load_remote_configuration().await;
            });

            view! { <MainLayout /> }.into_any()
        }
        Err(e) => {
            log::error!("Failed to start the application: {:#}", e);
            view! {
                <div class="app-error">
                    <h2>"Application could not start"</h2>
                    <p>{format!("{:#}", e)}</p>
                </div>
            }
            .into_any()
        }
    }
}
