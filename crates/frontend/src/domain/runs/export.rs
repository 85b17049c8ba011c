use std::collections::HashMap;

use serde_json::{json, Value};

use super::model::RunsOverviewModel;
use crate::shared::date_utils::{format_duration, format_timestamp};
use crate::shared::export::{
    ExportConfiguration, ExportError, ExportFile, ExportType, FieldFormatter, FormatterFn,
};
use crate::shared::overview::{ListController, OverviewModel};
use crate::shared::remote_data::RemoteData;

fn timestamp(value: &Value, _run: &Value) -> Value {
    match value.as_i64() {
        Some(timestamp) => json!(format_timestamp(timestamp)),
        None => Value::Null,
    }
}

fn run_duration(value: &Value, _run: &Value) -> Value {
    match value.as_i64() {
        Some(duration) => json!(format_duration(duration)),
        None => Value::Null,
    }
}

fn on_off(value: &Value, _run: &Value) -> Value {
    match value.as_bool() {
        Some(true) => json!("On"),
        Some(false) => json!("Off"),
        None => Value::Null,
    }
}

fn tag_texts(value: &Value, _run: &Value) -> Value {
    let texts: Vec<&str> = value
        .as_array()
        .map(|tags| tags.iter().filter_map(|tag| tag["text"].as_str()).collect())
        .unwrap_or_default();
    if texts.is_empty() {
        json!("-")
    } else {
        json!(texts.join("-"))
    }
}

fn run_type_name(value: &Value, _run: &Value) -> Value {
    value.get("name").cloned().unwrap_or(Value::Null)
}

/// Exportable run fields; the names are the API field names
pub fn runs_export_configuration() -> ExportConfiguration {
    let mut run_type = HashMap::new();
    run_type.insert(ExportType::Csv, run_type_name as FormatterFn);

    ExportConfiguration::new()
        .field("runNumber", FieldFormatter::Identity)
        .field("fillNumber", FieldFormatter::Identity)
        .field("lhcPeriod", FieldFormatter::Identity)
        .field("environmentId", FieldFormatter::Identity)
        .field("runType", FieldFormatter::PerType(run_type))
        .field("runQuality", FieldFormatter::Identity)
        .field("timeO2Start", FieldFormatter::Single(timestamp))
        .field("timeO2End", FieldFormatter::Single(timestamp))
        .field("timeTrgStart", FieldFormatter::Single(timestamp))
        .field("timeTrgEnd", FieldFormatter::Single(timestamp))
        .field("runDuration", FieldFormatter::Single(run_duration))
        .field("detectors", FieldFormatter::Identity)
        .field("nDetectors", FieldFormatter::Identity)
        .field("nFlps", FieldFormatter::Identity)
        .field("nEpns", FieldFormatter::Identity)
        .field("dcs", FieldFormatter::Single(on_off))
        .field("ddflp", FieldFormatter::Single(on_off))
        .field("epn", FieldFormatter::Single(on_off))
        .field("epnTopology", FieldFormatter::Identity)
        .field("odcTopologyFullName", FieldFormatter::Identity)
        .field("triggerValue", FieldFormatter::Identity)
        .field("tags", FieldFormatter::Single(tag_texts))
}

fn is_source_not_asked(controller: &ListController<RunsOverviewModel>) -> bool {
    controller.with(|model| {
        let mut not_asked = false;
        model
            .data_export()
            .call_for_data(model.overview().all_items(), || not_asked = true);
        not_asked
    })
}

/// Start fetching the runs to export, unless they were already asked for
pub fn prepare_runs_export(controller: &ListController<RunsOverviewModel>) {
    if is_source_not_asked(controller) {
        controller.call_for_all_items();
    }
}

/// Export every run matching the filters, fetching them first if needed
pub async fn export_all_runs(
    controller: &ListController<RunsOverviewModel>,
) -> Result<ExportFile, ExportError> {
    controller.with_mut(|model| model.data_export_mut().set_disabled(true));
    if is_source_not_asked(controller) {
        controller.load_all_items().await;
    }

    controller.with_mut(|model| {
        model.data_export_mut().set_disabled(false);
        let runs = match model.overview().all_items() {
            RemoteData::Success(runs) => runs.clone(),
            RemoteData::Failure(errors) => {
                let errors = errors.clone();
                model.overview_mut().set_items_failure(errors);
                return Err(ExportError::SourceUnavailable);
            }
            RemoteData::NotAsked | RemoteData::Loading => return Err(ExportError::SourceUnavailable),
        };
        let truncated = model.overview().is_all_items_truncated();
        let total = model.overview().pagination().items_count();
        model
            .data_export_mut()
            .set_total_existing_items_count(truncated.then_some(total));
        model.export(&runs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::export::create_export;
    use contracts::domain::{Run, RunQuality, RunType, Tag};

    fn run() -> Run {
        Run {
            run_number: 106,
            run_quality: Some(RunQuality::Good),
            time_o2_start: Some(1_565_314_200_000),
            run_duration: Some(5_400_000),
            dcs: Some(true),
            run_type: Some(RunType {
                id: 1,
                name: "PHYSICS".to_string(),
            }),
            tags: vec![Tag::new(1, "FOOD"), Tag::new(2, "RUN")],
            ..Default::default()
        }
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_runs_csv_export() {
        let content = create_export(
            &[run()],
            &fields(&["runNumber", "runQuality", "timeO2Start", "runDuration", "dcs", "ddflp", "tags", "runType"]),
            &runs_export_configuration(),
            ExportType::Csv,
        )
        .unwrap();

        assert_eq!(
            content,
            "runNumber,runQuality,timeO2Start,runDuration,dcs,ddflp,tags,runType\r\n\
             106,\"good\",\"09.08.2019 01:30:00\",\"01:30:00\",\"On\",,\"FOOD-RUN\",\"PHYSICS\""
        );
    }

    #[test]
    fn test_run_type_is_kept_whole_in_json() {
        let content = create_export(
            &[run()],
            &fields(&["runType"]),
            &runs_export_configuration(),
            ExportType::Json,
        )
        .unwrap();

        let exported: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(exported[0]["runType"]["name"], json!("PHYSICS"));
    }

    #[tokio::test]
    async fn test_export_fetches_unpaged_runs() {
        use crate::shared::config::AppConfiguration;
        use crate::shared::testing::{page_limit, MockTransport, TokioRuntime};
        use std::rc::Rc;
        use std::time::Duration;

        let transport = Rc::new(MockTransport::with_body(json!({
            "data": [{ "runNumber": 1 }, { "runNumber": 2 }],
            "meta": { "page": { "pageCount": 1, "totalCount": 2 } }
        })));
        let controller = ListController::new(
            RunsOverviewModel::new("http://localhost:4000", &AppConfiguration::default().list),
            transport.clone(),
            Rc::new(TokioRuntime),
            Duration::from_millis(200),
        );
        controller.with_mut(|model| {
            let export = model.data_export_mut();
            export.set_selected_fields(&fields(&["runNumber"]));
            export.set_export_type(ExportType::Csv);
            export.set_export_name("runs");
        });

        let file = export_all_runs(&controller).await.unwrap();

        assert_eq!(file.filename, "runs.csv");
        assert_eq!(file.content, "runNumber\r\n1\r\n2");
        assert_eq!(page_limit(&transport.decoded_requests()[0]), None);
        assert!(!controller.with(|model| model.data_export().is_disabled()));
    }

    #[tokio::test]
    async fn test_export_without_runs_reports_no_data() {
        use crate::shared::config::AppConfiguration;
        use crate::shared::testing::{MockTransport, TokioRuntime};
        use std::rc::Rc;
        use std::time::Duration;

        let transport = Rc::new(MockTransport::with_body(json!({ "data": [] })));
        let controller = ListController::new(
            RunsOverviewModel::new("http://localhost:4000", &AppConfiguration::default().list),
            transport,
            Rc::new(TokioRuntime),
            Duration::from_millis(200),
        );
        controller.with_mut(|model| model.data_export_mut().set_selected_fields(&fields(&["runNumber"])));

        let result = export_all_runs(&controller).await;

        assert!(matches!(result, Err(ExportError::NoData)));
        let title = controller.with(|model| model.overview().items().errors().map(|errors| errors[0].title.clone()));
        assert_eq!(title.as_deref(), Some("No data found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_opening_export_fetches_runs_once() {
        use crate::shared::config::AppConfiguration;
        use crate::shared::testing::{page_limit, MockTransport, TokioRuntime};
        use std::rc::Rc;
        use std::time::Duration;

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let transport = Rc::new(MockTransport::with_body(json!({
                    "data": [{ "runNumber": 1 }, { "runNumber": 2 }],
                    "meta": { "page": { "pageCount": 1, "totalCount": 2 } }
                })));
                let controller = ListController::new(
                    RunsOverviewModel::new("http://localhost:4000", &AppConfiguration::default().list),
                    transport.clone(),
                    Rc::new(TokioRuntime),
                    Duration::from_millis(200),
                );
                controller.with_mut(|model| {
                    model.data_export_mut().set_selected_fields(&fields(&["runNumber"]))
                });

                prepare_runs_export(&controller);
                tokio::time::sleep(Duration::from_millis(10)).await;
                prepare_runs_export(&controller);
                tokio::time::sleep(Duration::from_millis(10)).await;

                let requests = transport.decoded_requests();
                assert_eq!(requests.len(), 1);
                assert_eq!(page_limit(&requests[0]), None);
                assert!(controller.with(|model| model.overview().all_items().is_success()));

                let file = export_all_runs(&controller).await.unwrap();
                assert_eq!(file.content, "[\n  {\n    \"runNumber\": 1\n  },\n  {\n    \"runNumber\": 2\n  }\n]");
                assert_eq!(transport.decoded_requests().len(), 1);
            })
            .await;
    }

    #[test]
    fn test_untagged_run_exports_dash() {
        assert_eq!(tag_texts(&json!([]), &Value::Null), json!("-"));
    }
}
