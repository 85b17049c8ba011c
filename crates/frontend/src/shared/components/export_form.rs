use leptos::prelude::*;
use thaw::*;

use super::filter_inputs::CheckboxGroup;
use crate::shared::export::ExportType;
use crate::shared::icons::icon;

/// Fields, format and file name of an export, plus its trigger
#[component]
pub fn ExportForm(
    /// Exportable fields with their selected state
    #[prop(into)]
    fields: Signal<Vec<(String, bool)>>,
    #[prop(into)]
    export_type: Signal<ExportType>,
    #[prop(into)]
    export_name: Signal<String>,
    #[prop(into)]
    disabled: Signal<bool>,
    /// Warning shown above the trigger, e.g. when the export is truncated
    #[prop(into)]
    notice: Signal<Option<String>>,
    on_toggle_field: Callback<String>,
    on_export_type_change: Callback<ExportType>,
    on_export_name_change: Callback<String>,
    on_export: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="export-form">
            <CheckboxGroup label="Fields" options=fields on_toggle=on_toggle_field />

            <div class="form__group">
                <label class="form__label">"Format"</label>
                <div class="form__radio-group">
                    {ExportType::ALL.into_iter().map(|option| view! {
                        <label class="form__radio-wrapper">
                            <input
                                type="radio"
                                class="form__radio"
                                name="export-type"
                                prop:checked=move || export_type.get() == option
                                on:change=move |_| on_export_type_change.run(option)
                            />
                            <span class="form__radio-label">{option.label()}</span>
                        </label>
                    }).collect_view()}
                </div>
            </div>

            <div class="form__group">
                <label class="form__label">"File name"</label>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || export_name.get()
                    on:change=move |ev| on_export_name_change.run(event_target_value(&ev))
                />
            </div>

            {move || notice.get().map(|notice| view! {
                <div class="alert alert--warning">{notice}</div>
            })}

            <Button
                appearance=ButtonAppearance::Primary
                on_click=move |_| on_export.run(())
                disabled=disabled
            >
                {icon("download")}
                " Export"
            </Button>
        </div>
    }
}
