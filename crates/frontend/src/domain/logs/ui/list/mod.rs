use contracts::domain::{Log, Tag};
use contracts::shared::CombinationOperator;
use leptos::prelude::*;
use thaw::*;

use crate::app_context::{use_app_context, use_observable_version, AppContextHandle};
use crate::domain::logs::model::{LogsFilterField, LogsOverviewModel};
use crate::shared::components::error_list::ErrorList;
use crate::shared::components::filter_inputs::{CombinationOperatorSelector, TextFilter};
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::pagination_controls::{displayable_rows, PaginationControls};
use crate::shared::date_utils::format_optional_timestamp;
use crate::shared::icons::icon;
use crate::shared::overview::{OverviewModel, Reload};
use crate::shared::page_frame::PageFrame;
use crate::shared::pagination::ItemsPerPage;
use crate::shared::picker::PickerList;

const LOG_ROW_HEIGHT_PX: f64 = 46.0;

fn read<R>(
    context: AppContextHandle,
    version: RwSignal<u64>,
    f: impl FnOnce(&LogsOverviewModel) -> R,
) -> R {
    version.track();
    context.with_value(|app| app.logs.with(f))
}

fn update(context: AppContextHandle, f: impl FnOnce(&mut LogsOverviewModel) -> Reload) {
    context.with_value(|app| app.logs.update(f));
}

fn find_tag(context: AppContextHandle, text: &str) -> Option<Tag> {
    context.with_value(|app| {
        app.tags
            .pickable_tags()
            .into_iter()
            .chain(app.logs.with(|model| model.tags().picker().selected_options().to_vec()))
            .find(|tag| tag.text == text)
    })
}

#[component]
pub fn LogsList() -> impl IntoView {
    let context = use_app_context();
    let version = use_observable_version(context, |app| app.logs.observable());
    let selector_version = use_observable_version(context, |app| {
        app.logs
            .with(|model| model.overview().pagination().items_per_page_selector().clone())
    });
    let tags_version = use_observable_version(context, |app| app.tags.observable().clone());
    let is_filter_expanded = RwSignal::new(false);

    context.with_value(|app| {
        if app.logs.with(|model| model.overview().items().is_not_asked()) {
            if let Some(rows) = displayable_rows(LOG_ROW_HEIGHT_PX) {
                app.logs.with_mut(|model| {
                    model.overview_mut().pagination_mut().provide_default_items_per_page(rows)
                });
            }
            app.logs.reload();
        }
        app.tags.call_for_tags();
    });

    let logs = Memo::new(move |_| {
        read(context, version, |model| model.overview().items().payload().cloned().unwrap_or_default())
    });
    let errors = Memo::new(move |_| {
        read(context, version, |model| model.overview().items().errors().cloned())
    });
    let is_loading = Memo::new(move |_| read(context, version, |model| model.overview().items().is_loading()));
    let is_success = Memo::new(move |_| read(context, version, |model| model.overview().items().is_success()));
    let active_labels = Signal::derive(move || {
        read(context, version, |model| {
            LogsFilterField::ALL
                .into_iter()
                .filter(|field| model.is_filter_active(*field))
                .collect::<Vec<_>>()
        })
    });

    let pagination_controls = move || {
        view! {
            <PaginationControls
                current_page=Signal::derive(move || read(context, version, |model| model.overview().pagination().current_page()))
                pages_count=Signal::derive(move || read(context, version, |model| model.overview().pagination().pages_count()))
                items_count=Signal::derive(move || read(context, version, |model| model.overview().pagination().items_count()))
                loaded_count=Signal::derive(move || read(context, version, |model| {
                    model.overview().items().payload().map(Vec::len).unwrap_or(0)
                }))
                items_per_page=Signal::derive(move || read(context, version, |model| {
                    model.overview().pagination().selected_items_per_page()
                }))
                on_page_change=Callback::new(move |page: usize| {
                    update(context, |model| model.overview_mut().set_current_page(page))
                })
                on_next_page=Callback::new(move |_| {
                    update(context, |model| model.overview_mut().go_to_next_page())
                })
                on_items_per_page_change=Callback::new(move |amount: ItemsPerPage| {
                    update(context, |model| model.overview_mut().set_items_per_page(amount))
                })
                page_size_options=context.with_value(|app| app.configuration().list.page_size_options)
                is_amount_dropdown_visible=Signal::derive(move || {
                    version.track();
                    read(context, selector_version, |model| model.overview().pagination().is_amount_dropdown_visible())
                })
                on_toggle_amount_dropdown=Callback::new(move |_| {
                    context.with_value(|app| app.logs.with_mut(|model| {
                        model.overview_mut().pagination_mut().toggle_amount_dropdown_visibility()
                    }))
                })
                custom_items_per_page=Signal::derive(move || read(context, selector_version, |model| {
                    model.overview().pagination().custom_items_per_page().to_string()
                }))
                on_custom_input=Callback::new(move |value: String| {
                    context.with_value(|app| app.logs.with_mut(|model| {
                        model.overview_mut().pagination_mut().set_custom_items_per_page(&value)
                    }))
                })
                on_custom_apply=Callback::new(move |_| {
                    update(context, |model| model.overview_mut().apply_custom_items_per_page())
                })
            />
        }
    };

    let filter_tags = move || {
        view! {
            <Flex gap=FlexGap::Small>
                {move || active_labels.get().into_iter().map(|field| view! {
                    <FilterTag
                        label=field.label()
                        on_remove=Callback::new(move |_| update(context, |model| model.clear_filter(field)))
                    />
                }).collect_view()}
            </Flex>
        }
    };

    let header_actions = move || {
        view! {
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| update(context, |model| model.reset_filtering(true))
                disabled=Signal::derive(move || active_labels.with(|fields| fields.is_empty()))
            >
                "Reset filters"
            </Button>
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| context.with_value(|app| app.logs.reload())
            >
                {icon("refresh")}
            </Button>
        }
    };

    let text_input = move |field: LogsFilterField, placeholder: &'static str| {
        view! {
            <TextFilter
                label=field.label()
                placeholder=placeholder
                value=Signal::derive(move || read(context, version, |model| model.text(field).to_string()))
                on_input=Callback::new(move |value: String| update(context, |model| model.set_text(field, &value)))
            />
        }
    };

    view! {
        <PageFrame page_id="logs--list">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Logs"</h1>
                    <span class="badge badge--primary">
                        {move || read(context, version, |model| model.overview().pagination().items_count())}
                    </span>
                </div>
            </div>

            <div class="page__content">
                <FilterPanel
                    is_expanded=is_filter_expanded
                    active_filters_count=Signal::derive(move || active_labels.with(Vec::len))
                    pagination_controls=pagination_controls
                    filter_tags=filter_tags
                    header_actions=header_actions
                >
                    <Flex gap=FlexGap::Medium>
                        {text_input(LogsFilterField::Title, "Title contains...")}
                        {text_input(LogsFilterField::Author, "Author name")}
                        {text_input(LogsFilterField::RunNumbers, "e.g. 534454, 534455")}
                        {text_input(LogsFilterField::EnvironmentIds, "e.g. Dxi029djX")}
                    </Flex>

                    <div class="form__group">
                        <label class="form__label">"Tags"</label>
                        <CombinationOperatorSelector
                            name="logs-tags-operator"
                            value=Signal::derive(move || read(context, version, |model| model.tags().operator()))
                            on_change=Callback::new(move |operator: CombinationOperator| {
                                update(context, |model| model.set_tags_operator(operator))
                            })
                        />
                        <PickerList
                            entries=Signal::derive(move || {
                                tags_version.track();
                                let available = context.with_value(|app| app.tags.pickable_tags());
                                read(context, version, |model| model.tags().picker().entries(&available))
                            })
                            collapsed=Signal::derive(move || read(context, version, |model| model.tags().picker().is_collapsed()))
                            on_toggle=Callback::new(move |text: String| {
                                if let Some(tag) = find_tag(context, &text) {
                                    update(context, |model| model.toggle_tag(tag));
                                }
                            })
                            on_toggle_collapse=Callback::new(move |_| {
                                context.with_value(|app| app.logs.with_mut(LogsOverviewModel::toggle_tags_collapse))
                            })
                        />
                    </div>
                </FilterPanel>

                <Show when=move || is_loading.get()>
                    <div class="loading">"Loading..."</div>
                </Show>
                {move || errors.get().map(|errors| view! { <ErrorList errors=errors /> })}
                <Show when=move || is_success.get() && logs.with(Vec::is_empty)>
                    <div class="empty-state">"No log found"</div>
                </Show>
                <LogsTable logs=logs />

                <Show when=move || read(context, version, |model| model.overview().is_loading_more())>
                    <div class="loading">"Loading more..."</div>
                </Show>
                <Show when=move || read(context, version, |model| model.overview().has_more_to_load())>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| context.with_value(|app| app.logs.load_more())
                    >
                        "Load more"
                    </Button>
                </Show>
            </div>
        </PageFrame>
    }
}

#[component]
fn LogsTable(
    #[prop(into)]
    logs: Signal<Vec<Log>>,
) -> impl IntoView {
    view! {
        <div
            class="table-wrapper"
            style:display=move || if logs.with(Vec::is_empty) { "none" } else { "block" }
        >
            <Table attr:style="width: 100%;">
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Title"</TableHeaderCell>
                        <TableHeaderCell>"Author"</TableHeaderCell>
                        <TableHeaderCell>"Created"</TableHeaderCell>
                        <TableHeaderCell>"Tags"</TableHeaderCell>
                        <TableHeaderCell>"Runs"</TableHeaderCell>
                        <TableHeaderCell>"Replies"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    <For
                        each=move || logs.get()
                        key=|log| log.id
                        children=log_row
                    />
                </TableBody>
            </Table>
        </div>
    }
}

fn log_row(log: Log) -> impl IntoView {
    let tags = log.tags.iter().map(|tag| tag.text.clone()).collect::<Vec<_>>().join(", ");
    let runs = log.runs.iter().map(|run| run.run_number.to_string()).collect::<Vec<_>>().join(", ");
    view! {
        <TableRow>
            <TableCell><TableCellLayout truncate=true>{log.title}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{log.author.map(|author| author.name).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_optional_timestamp(log.created_at)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout truncate=true>{tags}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout truncate=true>{runs}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{log.replies.unwrap_or(0)}</TableCellLayout></TableCell>
        </TableRow>
    }
}
