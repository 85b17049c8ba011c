use contracts::shared::ApiErrorDetail;
use leptos::prelude::*;

/// Errors of a failed fetch, one alert per entry
#[component]
pub fn ErrorList(
    #[prop(into)]
    errors: Signal<Vec<ApiErrorDetail>>,
) -> impl IntoView {
    view! {
        <div class="error-list">
            {move || errors.get().into_iter().map(|error| view! {
                <div class="alert alert--error">
                    <strong>{error.title}</strong>
                    {(!error.detail.is_empty()).then(|| view! { <span>" : "{error.detail}</span> })}
                </div>
            }).collect_view()}
        </div>
    }
}
