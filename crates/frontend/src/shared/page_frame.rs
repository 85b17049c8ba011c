//! Root wrapper of every page.
//!
//! Sets the `id` of the root element, in the `{entity}--{kind}` format
//! (e.g. `"runs--list"`), used for DOM inspection and end-to-end selectors.

use leptos::prelude::*;

#[component]
pub fn PageFrame(
    page_id: &'static str,
    /// Appended after the base `page` class
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    let full_class = if class.is_empty() {
        "page".to_string()
    } else {
        format!("page {class}")
    };

    view! {
        <div id=page_id class=full_class>
            {children()}
        </div>
    }
}
