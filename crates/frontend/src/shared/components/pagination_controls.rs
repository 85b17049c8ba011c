use crate::shared::icons::icon;
use crate::shared::pagination::{estimate_displayable_rows, ItemsPerPage};
use leptos::prelude::*;

/// Height taken by the header, filters and pagination of an overview page
const PAGE_USED_HEIGHT_PX: f64 = 215.0;

/// Rows of `row_height` pixels fitting in the browser window
pub fn displayable_rows(row_height: f64) -> Option<usize> {
    let height = web_sys::window()?.inner_height().ok()?.as_f64()?;
    Some(estimate_displayable_rows(height, row_height, PAGE_USED_HEIGHT_PX))
}

/// Page navigation and items-per-page selector of an overview.
///
/// Pages are 1-based. In infinite mode the navigation buttons are hidden and
/// only the count of loaded items is shown.
#[component]
pub fn PaginationControls(
    /// Current page (1-based)
    #[prop(into)]
    current_page: Signal<usize>,

    #[prop(into)]
    pages_count: Signal<usize>,

    /// Records matching the filters
    #[prop(into)]
    items_count: Signal<usize>,

    /// Records currently displayed
    #[prop(into)]
    loaded_count: Signal<usize>,

    #[prop(into)]
    items_per_page: Signal<ItemsPerPage>,

    on_page_change: Callback<usize>,

    on_next_page: Callback<()>,

    on_items_per_page_change: Callback<ItemsPerPage>,

    page_size_options: Vec<usize>,

    #[prop(into)]
    is_amount_dropdown_visible: Signal<bool>,

    on_toggle_amount_dropdown: Callback<()>,

    /// Text of the custom page size input
    #[prop(into)]
    custom_items_per_page: Signal<String>,

    on_custom_input: Callback<String>,

    on_custom_apply: Callback<()>,
) -> impl IntoView {
    let is_infinite = move || items_per_page.get() == ItemsPerPage::Infinite;
    let last_page = move || pages_count.get().max(1);

    let selected_label = move || match items_per_page.get() {
        ItemsPerPage::Infinite => "Infinite".to_string(),
        ItemsPerPage::Count(count) => count.to_string(),
    };

    // A custom page size chosen elsewhere still needs an option to be displayed
    let page_size_options = StoredValue::new(page_size_options);
    let options = move || {
        let mut options = page_size_options.get_value();
        if let ItemsPerPage::Count(count) = items_per_page.get() {
            if !options.contains(&count) {
                options.push(count);
                options.sort_unstable();
            }
        }
        options
    };

    view! {
        <div class="pagination-controls">
            <Show
                when=move || !is_infinite()
                fallback=move || view! {
                    <span class="pagination-info">
                        {move || format!("{} / {}", loaded_count.get(), items_count.get())}
                    </span>
                }
            >
                <button
                    class="pagination-btn"
                    on:click=move |_| on_page_change.run(1)
                    disabled=move || current_page.get() <= 1
                    title="First page"
                >
                    {icon("chevrons-left")}
                </button>
                <button
                    class="pagination-btn"
                    on:click=move |_| {
                        let page = current_page.get();
                        if page > 1 {
                            on_page_change.run(page - 1);
                        }
                    }
                    disabled=move || current_page.get() <= 1
                    title="Previous page"
                >
                    {icon("chevron-left")}
                </button>
                <span class="pagination-info">
                    {move || format!("{} / {} ({})", current_page.get(), last_page(), items_count.get())}
                </span>
                <button
                    class="pagination-btn"
                    on:click=move |_| on_next_page.run(())
                    disabled=move || current_page.get() >= last_page()
                    title="Next page"
                >
                    {icon("chevron-right")}
                </button>
                <button
                    class="pagination-btn"
                    on:click=move |_| on_page_change.run(last_page())
                    disabled=move || current_page.get() >= last_page()
                    title="Last page"
                >
                    {icon("chevrons-right")}
                </button>
            </Show>
            <div class="amount-selector">
                <button
                    class="amount-selector__toggle"
                    on:click=move |_| on_toggle_amount_dropdown.run(())
                    title="Items per page"
                >
                    {selected_label}
                    {icon("chevron-down")}
                </button>
                <Show when=move || is_amount_dropdown_visible.get()>
                    <ul class="amount-selector__dropdown">
                        {move || options().into_iter().map(|size| {
                            view! {
                                <li
                                    class=move || if items_per_page.get() == ItemsPerPage::Count(size) { "selected" } else { "" }
                                    on:click=move |_| on_items_per_page_change.run(ItemsPerPage::Count(size))
                                >
                                    {size.to_string()}
                                </li>
                            }
                        }).collect_view()}
                        <li
                            class=move || if is_infinite() { "selected" } else { "" }
                            on:click=move |_| on_items_per_page_change.run(ItemsPerPage::Infinite)
                        >
                            "Infinite"
                        </li>
                    </ul>
                </Show>
            </div>
            <CustomItemsPerPage
                value=custom_items_per_page
                on_input=on_custom_input
                on_apply=on_custom_apply
            />
        </div>
    }
}

/// Text input for a page size missing from the selector
#[component]
pub fn CustomItemsPerPage(
    #[prop(into)]
    value: Signal<String>,

    on_input: Callback<String>,

    /// Called on Enter
    on_apply: Callback<()>,
) -> impl IntoView {
    view! {
        <input
            class="form__input pagination-custom"
            type="number"
            min="1"
            placeholder="Custom"
            prop:value=move || value.get()
            on:input=move |ev| on_input.run(event_target_value(&ev))
            on:keydown=move |ev| {
                if ev.key() == "Enter" {
                    on_apply.run(());
                }
            }
        />
    }
}
