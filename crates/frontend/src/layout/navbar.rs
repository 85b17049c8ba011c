use crate::layout::global_context::{AppGlobalContext, Page};
use crate::shared::icons::icon;
use leptos::prelude::*;

#[component]
pub fn Navbar() -> impl IntoView {
    let global = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <nav class="main-nav-bar">
            <span class="main-nav-bar__brand">"Bookkeeping"</span>
            <ul>
                {Page::ALL.into_iter().map(|page| {
                    view! {
                        <li
                            class=move || if global.active.get() == page { "active" } else { "" }
                            on:click=move |_| global.open_page(page)
                        >
                            {icon(page.icon_name())}
                            <span>{page.title()}</span>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </nav>
    }
}
