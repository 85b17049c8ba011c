use contracts::domain::{Run, RunQuality, Tag, TRIGGER_VALUES};
use contracts::shared::{CombinationOperator, ComparisonOperator};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::app_context::{use_app_context, use_observable_version, AppContextHandle};
use crate::domain::runs::export::{export_all_runs, prepare_runs_export};
use crate::domain::runs::model::{RunsComparison, RunsFilterField, RunsOverviewModel};
use crate::shared::components::error_list::ErrorList;
use crate::shared::components::export_form::ExportForm;
use crate::shared::components::filter_inputs::{
    CheckboxGroup, CombinationOperatorSelector, ComparisonFilter, TextFilter, TriStateFilter,
};
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::pagination_controls::{displayable_rows, PaginationControls};
use crate::shared::date_utils::{format_duration, format_optional_timestamp};
use crate::shared::export::{download, ExportType};
use crate::shared::icons::icon;
use crate::shared::overview::{OverviewModel, Reload};
use crate::shared::page_frame::PageFrame;
use crate::shared::pagination::ItemsPerPage;
use crate::shared::picker::PickerList;

/// Distance to the bottom of the table below which the next chunk is loaded
const LOAD_MORE_THRESHOLD_PX: i32 = 40;

const RUN_ROW_HEIGHT_PX: f64 = 59.0;

fn read<R>(
    context: AppContextHandle,
    version: RwSignal<u64>,
    f: impl FnOnce(&RunsOverviewModel) -> R,
) -> R {
    version.track();
    context.with_value(|app| app.runs.with(f))
}

fn update(context: AppContextHandle, f: impl FnOnce(&mut RunsOverviewModel) -> Reload) {
    context.with_value(|app| app.runs.update(f));
}

/// Tag behind a picker value, among the loaded tags or the selected ones
fn find_tag(context: AppContextHandle, text: &str) -> Option<Tag> {
    context.with_value(|app| {
        app.tags
            .pickable_tags()
            .into_iter()
            .chain(app.runs.with(|model| model.tags().picker().selected_options().to_vec()))
            .find(|tag| tag.text == text)
    })
}

fn on_off(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "On",
        Some(false) => "Off",
        None => "-",
    }
}

#[component]
pub fn RunsList() -> impl IntoView {
    let context = use_app_context();
    let version = use_observable_version(context, |app| app.runs.observable());
    let selector_version = use_observable_version(context, |app| {
        app.runs
            .with(|model| model.overview().pagination().items_per_page_selector().clone())
    });
    let tags_version = use_observable_version(context, |app| app.tags.observable().clone());
    let export_version = use_observable_version(context, |app| {
        app.runs
            .with(|model| model.data_export().visual_change().clone())
    });
    let is_filter_expanded = RwSignal::new(false);
    let is_export_open = RwSignal::new(false);

    // The state survives navigation: only the first visit loads
    context.with_value(|app| {
        if app.runs.with(|model| model.overview().items().is_not_asked()) {
            if let Some(rows) = displayable_rows(RUN_ROW_HEIGHT_PX) {
                app.runs.with_mut(|model| {
                    model.overview_mut().pagination_mut().provide_default_items_per_page(rows)
                });
            }
            app.runs.reload();
        }
        app.tags.call_for_tags();
    });

    // Memos: the table only changes when the records do, not on every notification
    let runs = Memo::new(move |_| {
        read(context, version, |model| model.overview().items().payload().cloned().unwrap_or_default())
    });
    let errors = Memo::new(move |_| {
        read(context, version, |model| model.overview().items().errors().cloned())
    });
    let is_loading = Memo::new(move |_| read(context, version, |model| model.overview().items().is_loading()));
    let is_success = Memo::new(move |_| read(context, version, |model| model.overview().items().is_success()));
    let active_filters = Signal::derive(move || read(context, version, |model| model.active_filters()));

    let text_filter = move |field: RunsFilterField| {
        Signal::derive(move || {
            read(context, version, |model| match field {
                RunsFilterField::RunNumbers => model.run_numbers().to_string(),
                RunsFilterField::FillNumbers => model.fill_numbers().to_string(),
                RunsFilterField::EnvironmentIds => model.environment_ids().to_string(),
                RunsFilterField::LhcPeriods => model.lhc_periods().to_string(),
                RunsFilterField::OdcTopologyFullName => model.odc_topology_full_name().to_string(),
                _ => String::new(),
            })
        })
    };

    let comparison_operator = move |comparison: RunsComparison| {
        Signal::derive(move || read(context, version, |model| model.comparison(comparison).operator()))
    };
    let comparison_limit = move |comparison: RunsComparison| {
        Signal::derive(move || read(context, version, |model| model.comparison(comparison).limit()))
    };
    let on_operator = move |comparison: RunsComparison| {
        Callback::new(move |operator: ComparisonOperator| {
            update(context, |model| model.set_comparison_operator(comparison, operator))
        })
    };
    let on_limit = move |comparison: RunsComparison| {
        Callback::new(move |raw: String| {
            update(context, |model| model.set_comparison_limit(comparison, &raw))
        })
    };

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
                    context.with_value(|app| app.runs.with_mut(|model| {
                        model.overview_mut().pagination_mut().toggle_amount_dropdown_visibility()
                    }))
                })
                custom_items_per_page=Signal::derive(move || read(context, selector_version, |model| {
                    model.overview().pagination().custom_items_per_page().to_string()
                }))
                on_custom_input=Callback::new(move |value: String| {
                    context.with_value(|app| app.runs.with_mut(|model| {
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
                {move || active_filters.get().into_iter().map(|field| view! {
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
                disabled=Signal::derive(move || active_filters.with(|filters| filters.is_empty()))
            >
                "Reset filters"
            </Button>
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| context.with_value(|app| app.runs.reload())
            >
                {icon("refresh")}
            </Button>
        }
    };

    let export_fields = Signal::derive(move || {
        read(context, export_version, |model| {
            let export = model.data_export();
            export
                .available_fields()
                .into_iter()
                .map(|field| {
                    let selected = export.selected_fields().contains(&field);
                    (field, selected)
                })
                .collect::<Vec<_>>()
        })
    });

    let export_notice = Signal::derive(move || {
        read(context, export_version, |model| {
            model.data_export().total_existing_items_count().map(|total| {
                format!(
                    "Only {} of the {} matching runs could be exported",
                    model.overview().all_items().payload().map(Vec::len).unwrap_or(0),
                    total
                )
            })
        })
    });

    let run_export = Callback::new(move |_| {
        spawn_local(async move {
            let controller = context.with_value(|app| app.runs.clone());
            match export_all_runs(&controller).await {
                Ok(file) => {
                    if let Err(e) = download(&file) {
                        log::error!("{}", e);
                    }
                }
                Err(e) => log::warn!("Runs export aborted: {}", e),
            }
        });
    });

    let on_scroll = move |ev: leptos::ev::Event| {
        let target = event_target::<web_sys::HtmlElement>(&ev);
        let remaining = target.scroll_height() - target.scroll_top() - target.client_height();
        if remaining < LOAD_MORE_THRESHOLD_PX {
            context.with_value(|app| app.runs.load_more());
        }
    };

    view! {
        <PageFrame page_id="runs--list">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Runs"</h1>
                    <span class="badge badge--primary">
                        {move || read(context, version, |model| model.overview().pagination().items_count())}
                    </span>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            is_export_open.update(|open| *open = !*open);
                            if is_export_open.get_untracked() {
                                context.with_value(|app| prepare_runs_export(&app.runs));
                            }
                        }
                    >
                        {icon("download")}
                        " Export"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <Show when=move || is_export_open.get()>
                    <ExportForm
                        fields=export_fields
                        export_type=Signal::derive(move || read(context, export_version, |model| model.data_export().export_type()))
                        export_name=Signal::derive(move || read(context, export_version, |model| model.data_export().export_name().to_string()))
                        disabled=Signal::derive(move || {
                            version.track();
                            read(context, export_version, |model| {
                                model.data_export().is_disabled() || model.overview().all_items().is_loading()
                            })
                        })
                        notice=export_notice
                        on_toggle_field=Callback::new(move |field: String| {
                            context.with_value(|app| app.runs.with_mut(|model| model.data_export_mut().toggle_field(&field)))
                        })
                        on_export_type_change=Callback::new(move |export_type: ExportType| {
                            context.with_value(|app| app.runs.with_mut(|model| model.data_export_mut().set_export_type(export_type)))
                        })
                        on_export_name_change=Callback::new(move |name: String| {
                            context.with_value(|app| app.runs.with_mut(|model| model.data_export_mut().set_export_name(&name)))
                        })
                        on_export=run_export
                    />
                </Show>

                <FilterPanel
                    is_expanded=is_filter_expanded
                    active_filters_count=Signal::derive(move || active_filters.with(Vec::len))
                    pagination_controls=pagination_controls
                    filter_tags=filter_tags
                    header_actions=header_actions
                >
                    <Flex gap=FlexGap::Medium>
                        <TextFilter
                            label="Run numbers"
                            placeholder="e.g. 534454, 534455"
                            value=text_filter(RunsFilterField::RunNumbers)
                            on_input=Callback::new(move |value: String| update(context, |model| model.set_run_numbers(&value)))
                        />
                        <TextFilter
                            label="Fill numbers"
                            placeholder="e.g. 7966, 7954"
                            value=text_filter(RunsFilterField::FillNumbers)
                            on_input=Callback::new(move |value: String| update(context, |model| model.set_fill_numbers(&value)))
                        />
                        <TextFilter
                            label="Environment ids"
                            placeholder="e.g. Dxi029djX"
                            value=text_filter(RunsFilterField::EnvironmentIds)
                            on_input=Callback::new(move |value: String| update(context, |model| model.set_environment_ids(&value)))
                        />
                        <TextFilter
                            label="LHC periods"
                            placeholder="e.g. LHC22a"
                            value=text_filter(RunsFilterField::LhcPeriods)
                            on_input=Callback::new(move |value: String| update(context, |model| model.set_lhc_periods(&value)))
                        />
                        <TextFilter
                            label="ODC topology"
                            value=text_filter(RunsFilterField::OdcTopologyFullName)
                            on_input=Callback::new(move |value: String| update(context, |model| model.set_odc_topology_full_name(&value)))
                        />
                    </Flex>

                    <Flex gap=FlexGap::Medium>
                        <ComparisonFilter
                            label="Run duration"
                            unit="min"
                            operator=comparison_operator(RunsComparison::RunDuration)
                            limit=comparison_limit(RunsComparison::RunDuration)
                            on_operator_change=on_operator(RunsComparison::RunDuration)
                            on_limit_change=on_limit(RunsComparison::RunDuration)
                        />
                        <ComparisonFilter
                            label="Detectors count"
                            operator=comparison_operator(RunsComparison::NDetectors)
                            limit=comparison_limit(RunsComparison::NDetectors)
                            on_operator_change=on_operator(RunsComparison::NDetectors)
                            on_limit_change=on_limit(RunsComparison::NDetectors)
                        />
                        <ComparisonFilter
                            label="FLPs count"
                            operator=comparison_operator(RunsComparison::NFlps)
                            limit=comparison_limit(RunsComparison::NFlps)
                            on_operator_change=on_operator(RunsComparison::NFlps)
                            on_limit_change=on_limit(RunsComparison::NFlps)
                        />
                        <ComparisonFilter
                            label="EPNs count"
                            operator=comparison_operator(RunsComparison::NEpns)
                            limit=comparison_limit(RunsComparison::NEpns)
                            on_operator_change=on_operator(RunsComparison::NEpns)
                            on_limit_change=on_limit(RunsComparison::NEpns)
                        />
                    </Flex>

                    <Flex gap=FlexGap::Medium>
                        <CheckboxGroup
                            label="Run quality"
                            options=Signal::derive(move || read(context, version, |model| {
                                RunQuality::ALL
                                    .into_iter()
                                    .map(|quality| (quality.to_string(), model.is_run_quality_selected(quality)))
                                    .collect::<Vec<_>>()
                            }))
                            on_toggle=Callback::new(move |value: String| {
                                if let Some(quality) = RunQuality::ALL.into_iter().find(|quality| quality.as_str() == value) {
                                    update(context, |model| model.toggle_run_quality(quality));
                                }
                            })
                        />
                        <CheckboxGroup
                            label="Trigger value"
                            options=Signal::derive(move || read(context, version, |model| {
                                TRIGGER_VALUES
                                    .iter()
                                    .map(|value| (value.to_string(), model.trigger_values().iter().any(|selected| selected == value)))
                                    .collect::<Vec<_>>()
                            }))
                            on_toggle=Callback::new(move |value: String| update(context, |model| model.toggle_trigger_value(&value)))
                        />
                        <TriStateFilter
                            label="Data distribution"
                            name="runs-ddflp"
                            value=Signal::derive(move || read(context, version, |model| model.ddflp()))
                            on_change=Callback::new(move |value: Option<bool>| update(context, |model| model.set_ddflp(value)))
                        />
                        <TriStateFilter
                            label="DCS"
                            name="runs-dcs"
                            value=Signal::derive(move || read(context, version, |model| model.dcs()))
                            on_change=Callback::new(move |value: Option<bool>| update(context, |model| model.set_dcs(value)))
                        />
                        <TriStateFilter
                            label="EPN"
                            name="runs-epn"
                            value=Signal::derive(move || read(context, version, |model| model.epn()))
                            on_change=Callback::new(move |value: Option<bool>| update(context, |model| model.set_epn(value)))
                        />
                    </Flex>

                    <div class="form__group">
                        <label class="form__label">"Tags"</label>
                        <CombinationOperatorSelector
                            name="runs-tags-operator"
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
                                context.with_value(|app| app.runs.with_mut(RunsOverviewModel::toggle_tags_collapse))
                            })
                        />
                    </div>
                </FilterPanel>

                <Show when=move || is_loading.get()>
                    <div class="loading">"Loading..."</div>
                </Show>
                {move || errors.get().map(|errors| view! { <ErrorList errors=errors /> })}
                <Show when=move || is_success.get() && runs.with(Vec::is_empty)>
                    <div class="empty-state">"No run found"</div>
                </Show>
                <RunsTable runs=runs on_scroll=on_scroll />

                <Show when=move || read(context, version, |model| model.overview().is_loading_more())>
                    <div class="loading">"Loading more..."</div>
                </Show>
                <Show when=move || read(context, version, |model| model.overview().has_more_to_load())>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| context.with_value(|app| app.runs.load_more())
                    >
                        "Load more"
                    </Button>
                </Show>
            </div>
        </PageFrame>
    }
}

/// Mounted once so the scroll position survives appended chunks
#[component]
fn RunsTable(
    #[prop(into)]
    runs: Signal<Vec<Run>>,
    on_scroll: impl Fn(leptos::ev::Event) + 'static,
) -> impl IntoView {
    view! {
        <div
            class="table-wrapper"
            style:display=move || if runs.with(Vec::is_empty) { "none" } else { "block" }
            on:scroll=on_scroll
        >
            <Table attr:style="width: 100%; min-width: 1200px;">
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Run"</TableHeaderCell>
                        <TableHeaderCell>"Fill"</TableHeaderCell>
                        <TableHeaderCell>"LHC period"</TableHeaderCell>
                        <TableHeaderCell>"Environment"</TableHeaderCell>
                        <TableHeaderCell>"Run type"</TableHeaderCell>
                        <TableHeaderCell>"Quality"</TableHeaderCell>
                        <TableHeaderCell>"O2 start"</TableHeaderCell>
                        <TableHeaderCell>"O2 stop"</TableHeaderCell>
                        <TableHeaderCell>"Duration"</TableHeaderCell>
                        <TableHeaderCell>"Detectors"</TableHeaderCell>
                        <TableHeaderCell>"FLPs"</TableHeaderCell>
                        <TableHeaderCell>"EPNs"</TableHeaderCell>
                        <TableHeaderCell>"DD FLP"</TableHeaderCell>
                        <TableHeaderCell>"DCS"</TableHeaderCell>
                        <TableHeaderCell>"EPN"</TableHeaderCell>
                        <TableHeaderCell>"Trigger"</TableHeaderCell>
                        <TableHeaderCell>"Tags"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    <For
                        each=move || runs.get()
                        key=|run| run.run_number
                        children=run_row
                    />
                </TableBody>
            </Table>
        </div>
    }
}

fn run_row(run: Run) -> impl IntoView {
    let tags = run.tags.iter().map(|tag| tag.text.clone()).collect::<Vec<_>>().join(", ");
    view! {
        <TableRow>
            <TableCell><TableCellLayout>{run.run_number}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.fill_number.map(|fill| fill.to_string()).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.lhc_period.unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout truncate=true>{run.environment_id.unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.run_type.map(|run_type| run_type.name).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.run_quality.map(|quality| quality.to_string()).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_optional_timestamp(run.time_o2_start)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{format_optional_timestamp(run.time_o2_end)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.run_duration.map(format_duration).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout truncate=true>{run.detectors.unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.n_flps.map(|count| count.to_string()).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.n_epns.map(|count| count.to_string()).unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{on_off(run.ddflp)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{on_off(run.dcs)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{on_off(run.epn)}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout>{run.trigger_value.unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
            <TableCell><TableCellLayout truncate=true>{tags}</TableCellLayout></TableCell>
        </TableRow>
    }
}
