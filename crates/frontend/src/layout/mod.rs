pub mod global_context;
pub mod navbar;

use crate::domain::logs::ui::list::LogsList;
use crate::domain::runs::ui::list::RunsList;
use global_context::{AppGlobalContext, Page};
use leptos::prelude::*;
use navbar::Navbar;

/// Navigation bar above the active page
#[component]
pub fn Shell() -> impl IntoView {
    let global = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div class="app-layout">
            <Navbar />
            <main class="app-main">
                {move || match global.active.get() {
                    Page::Runs => view! { <RunsList /> }.into_any(),
                    Page::Logs => view! { <LogsList /> }.into_any(),
                }}
            </main>
        </div>
    }
}
