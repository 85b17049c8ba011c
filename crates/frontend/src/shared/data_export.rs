use serde::Serialize;

use super::export::{create_export, ExportConfiguration, ExportError, ExportFile, ExportType};
use super::observable::Observable;
use super::remote_data::RemoteData;

const DEFAULT_EXPORT_NAME: &str = "data";

/// Form state of an export: selected fields, target format and file name
#[derive(Debug)]
pub struct DataExportModel {
    configuration: ExportConfiguration,
    selected_fields: Vec<String>,
    export_type: ExportType,
    export_name: String,
    disabled: bool,
    total_existing_items_count: Option<usize>,
    // Form edits, kept apart from the data observable of the overview
    visual_change: Observable,
}

impl DataExportModel {
    pub fn new(configuration: ExportConfiguration) -> Self {
        Self {
            configuration,
            selected_fields: Vec::new(),
            export_type: ExportType::default(),
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            disabled: false,
            total_existing_items_count: None,
            visual_change: Observable::new(),
        }
    }

    pub fn configuration(&self) -> &ExportConfiguration {
        &self.configuration
    }

    pub fn available_fields(&self) -> Vec<String> {
        self.configuration.field_names()
    }

    pub fn selected_fields(&self) -> &[String] {
        &self.selected_fields
    }

    /// Unknown fields are ignored, the configuration order is kept
    pub fn set_selected_fields(&mut self, fields: &[String]) {
        self.selected_fields = self
            .configuration
            .field_names()
            .into_iter()
            .filter(|field| fields.contains(field))
            .collect();
        self.visual_change.notify();
    }

    pub fn toggle_field(&mut self, field: &str) {
        let mut fields = self.selected_fields.clone();
        if let Some(position) = fields.iter().position(|selected| selected == field) {
            fields.remove(position);
        } else {
            fields.push(field.to_string());
        }
        self.set_selected_fields(&fields);
    }

    pub fn export_type(&self) -> ExportType {
        self.export_type
    }

    pub fn set_export_type(&mut self, export_type: ExportType) {
        self.export_type = export_type;
        self.visual_change.notify();
    }

    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    pub fn set_export_name(&mut self, export_name: &str) {
        let export_name = export_name.trim();
        self.export_name = if export_name.is_empty() {
            DEFAULT_EXPORT_NAME.to_string()
        } else {
            export_name.to_string()
        };
        self.visual_change.notify();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled || self.selected_fields.is_empty()
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.visual_change.notify();
    }

    /// Records matching the filters, when more exist than can be exported
    pub fn total_existing_items_count(&self) -> Option<usize> {
        self.total_existing_items_count
    }

    pub fn set_total_existing_items_count(&mut self, count: Option<usize>) {
        self.total_existing_items_count = count;
        self.visual_change.notify();
    }

    pub fn visual_change(&self) -> &Observable {
        &self.visual_change
    }

    /// Trigger `fetch` if the export source was not requested yet
    pub fn call_for_data<T>(&self, source: &RemoteData<Vec<T>>, fetch: impl FnOnce()) {
        if source.is_not_asked() {
            fetch();
        }
    }

    pub fn create_file<T: Serialize>(&self, records: &[T]) -> Result<ExportFile, ExportError> {
        let content = create_export(
            records,
            &self.selected_fields,
            &self.configuration,
            self.export_type,
        )?;
        Ok(ExportFile::new(&self.export_name, self.export_type, content))
    }

    pub fn reset(&mut self) {
        self.selected_fields.clear();
        self.export_type = ExportType::default();
        self.export_name = DEFAULT_EXPORT_NAME.to_string();
        self.disabled = false;
        self.total_existing_items_count = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::export::FieldFormatter;
    use serde_json::json;
    use std::cell::Cell;

    fn model() -> DataExportModel {
        DataExportModel::new(
            ExportConfiguration::new()
                .field("a", FieldFormatter::Identity)
                .field("b", FieldFormatter::Identity),
        )
    }

    #[test]
    fn test_selection_keeps_configuration_order() {
        let mut model = model();
        model.toggle_field("b");
        model.toggle_field("a");
        model.toggle_field("unknown");

        assert_eq!(model.selected_fields(), ["a".to_string(), "b".to_string()]);

        model.toggle_field("a");
        assert_eq!(model.selected_fields(), ["b".to_string()]);
    }

    #[test]
    fn test_disabled_without_selection() {
        let mut model = model();
        assert!(model.is_disabled());

        model.toggle_field("a");
        assert!(!model.is_disabled());
    }

    #[test]
    fn test_create_file() {
        let mut model = model();
        model.set_selected_fields(&["a".to_string()]);
        model.set_export_type(ExportType::Csv);
        model.set_export_name("runs");

        let file = model
            .create_file(&[json!({ "a": 1, "b": 2 }), json!({ "a": 3, "b": 4 })])
            .unwrap();

        assert_eq!(file.filename, "runs.csv");
        assert_eq!(file.content, "a\r\n1\r\n3");
    }

    #[test]
    fn test_call_for_data_only_when_not_asked() {
        let model = model();
        let calls = Cell::new(0);

        model.call_for_data(&RemoteData::<Vec<i32>>::NotAsked, || calls.set(calls.get() + 1));
        model.call_for_data(&RemoteData::<Vec<i32>>::Loading, || calls.set(calls.get() + 1));

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_blank_export_name_falls_back_to_default() {
        let mut model = model();
        model.set_export_name("  ");
        assert_eq!(model.export_name(), "data");
    }
}
