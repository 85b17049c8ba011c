use leptos::prelude::*;

/// Options shown before the "more" toggle when the list is collapsed
const COLLAPSED_LIMIT: usize = 5;

/// One checkbox of a [`PickerList`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Checkbox list of picker options, collapsible past a few entries
#[component]
pub fn PickerList(
    /// Options with their selected state
    #[prop(into)]
    entries: Signal<Vec<PickerEntry>>,
    /// Whether only the first options are shown
    #[prop(into)]
    collapsed: Signal<bool>,
    /// Called with the value of the clicked option
    on_toggle: Callback<String>,
    on_toggle_collapse: Callback<()>,
) -> impl IntoView {
    let visible_entries = move || {
        let entries = entries.get();
        if collapsed.get() {
            entries.into_iter().take(COLLAPSED_LIMIT).collect()
        } else {
            entries
        }
    };

    view! {
        <div class="picker">
            {move || {
                visible_entries()
                    .into_iter()
                    .map(|entry| {
                        let value = entry.value.clone();
                        view! {
                            <label class="picker__option">
                                <input
                                    type="checkbox"
                                    prop:checked=entry.selected
                                    on:change=move |_| on_toggle.run(value.clone())
                                />
                                <span>{entry.label}</span>
                            </label>
                        }
                    })
                    .collect_view()
            }}
            <Show when=move || { entries.with(|entries| entries.len() > COLLAPSED_LIMIT) }>
                <button
                    class="picker__more"
                    on:click=move |_| on_toggle_collapse.run(())
                >
                    {move || if collapsed.get() { "More" } else { "Less" }}
                </button>
            </Show>
        </div>
    }
}
