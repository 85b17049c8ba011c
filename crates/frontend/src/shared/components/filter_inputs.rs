//! Form controls of the overview filter panels.
//!
//! Every control is driven by a signal derived from the page model and
//! reports edits through a callback, the model decides what to reload.

use contracts::shared::{CombinationOperator, ComparisonOperator};
use leptos::prelude::*;

/// Free-text filter, typically a comma separated list
#[component]
pub fn TextFilter(
    #[prop(into)]
    label: String,
    #[prop(into)]
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input"
                type="text"
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </div>
    }
}

/// Operator selector followed by a numeric limit
#[component]
pub fn ComparisonFilter(
    #[prop(into)]
    label: String,
    #[prop(into)]
    operator: Signal<ComparisonOperator>,
    #[prop(into)]
    limit: Signal<Option<i64>>,
    on_operator_change: Callback<ComparisonOperator>,
    /// Raw text of the limit input
    on_limit_change: Callback<String>,
    /// Unit displayed after the input
    #[prop(optional)]
    unit: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <div class="comparison-filter">
                <select
                    class="comparison-filter__operator"
                    prop:value=move || operator.get().symbol()
                    on:change=move |ev| {
                        if let Some(selected) = ComparisonOperator::from_symbol(&event_target_value(&ev)) {
                            on_operator_change.run(selected);
                        }
                    }
                >
                    {ComparisonOperator::ALL.into_iter().map(|option| view! {
                        <option value=option.symbol() selected=move || operator.get() == option>
                            {option.symbol()}
                        </option>
                    }).collect_view()}
                </select>
                <input
                    class="form__input comparison-filter__limit"
                    type="number"
                    min="0"
                    prop:value=move || limit.get().map(|limit| limit.to_string()).unwrap_or_default()
                    on:input=move |ev| on_limit_change.run(event_target_value(&ev))
                />
                {unit.map(|unit| view! { <span class="comparison-filter__unit">{unit}</span> })}
            </div>
        </div>
    }
}

/// Any / On / Off radio group of an optional boolean filter
#[component]
pub fn TriStateFilter(
    #[prop(into)]
    label: String,
    /// Radio group name, unique on the page
    name: &'static str,
    #[prop(into)]
    value: Signal<Option<bool>>,
    on_change: Callback<Option<bool>>,
) -> impl IntoView {
    let choices: [(&'static str, Option<bool>); 3] =
        [("Any", None), ("On", Some(true)), ("Off", Some(false))];

    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <div class="form__radio-group">
                {choices.into_iter().map(|(choice_label, choice)| view! {
                    <label class="form__radio-wrapper">
                        <input
                            type="radio"
                            class="form__radio"
                            name=name
                            prop:checked=move || value.get() == choice
                            on:change=move |_| on_change.run(choice)
                        />
                        <span class="form__radio-label">{choice_label}</span>
                    </label>
                }).collect_view()}
            </div>
        </div>
    }
}

/// Checkboxes over a fixed list of values
#[component]
pub fn CheckboxGroup(
    #[prop(into)]
    label: String,
    /// Values with their checked state
    #[prop(into)]
    options: Signal<Vec<(String, bool)>>,
    on_toggle: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <div class="form__checkbox-group">
                {move || options.get().into_iter().map(|(option, checked)| {
                    let toggled = option.clone();
                    view! {
                        <label class="form__checkbox-wrapper">
                            <input
                                type="checkbox"
                                class="form__checkbox"
                                prop:checked=checked
                                on:change=move |_| on_toggle.run(toggled.clone())
                            />
                            <span class="form__checkbox-label">{option}</span>
                        </label>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

/// How the selected tags are combined
#[component]
pub fn CombinationOperatorSelector(
    /// Radio group name, unique on the page
    name: &'static str,
    #[prop(into)]
    value: Signal<CombinationOperator>,
    on_change: Callback<CombinationOperator>,
) -> impl IntoView {
    view! {
        <div class="form__radio-group">
            {CombinationOperator::ALL.into_iter().map(|operator| view! {
                <label class="form__radio-wrapper">
                    <input
                        type="radio"
                        class="form__radio"
                        name=name
                        prop:checked=move || value.get() == operator
                        on:change=move |_| on_change.run(operator)
                    />
                    <span class="form__radio-label">{operator.label()}</span>
                </label>
            }).collect_view()}
        </div>
    }
}
