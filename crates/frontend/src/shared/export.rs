//! Client-side export of records to JSON or CSV files.
//!
//! Each selected field goes through the formatter configured for it, then the
//! picked records are serialized and handed to the browser as a download.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExportType {
    #[default]
    Json,
    Csv,
}

impl ExportType {
    pub const ALL: [ExportType; 2] = [ExportType::Json, ExportType::Csv];

    pub fn label(&self) -> &'static str {
        match self {
            ExportType::Json => "JSON",
            ExportType::Csv => "CSV",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportType::Json => "json",
            ExportType::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportType::Json => "application/json",
            ExportType::Csv => "text/csv;charset=utf-8;",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,

    #[error("No field selected for export")]
    NoFieldSelected,

    #[error("Records to export could not be fetched")]
    SourceUnavailable,

    #[error("Failed to serialize records: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to download file: {0}")]
    Download(String),
}

/// Receives the field value and the whole record it belongs to
pub type FormatterFn = fn(&Value, &Value) -> Value;

#[derive(Debug, Clone, Default)]
pub enum FieldFormatter {
    #[default]
    Identity,
    Single(FormatterFn),
    /// Export types without an entry fall back to identity
    PerType(HashMap<ExportType, FormatterFn>),
}

impl FieldFormatter {
    pub fn format(&self, value: &Value, record: &Value, export_type: ExportType) -> Value {
        let formatter = match self {
            FieldFormatter::Identity => None,
            FieldFormatter::Single(formatter) => Some(*formatter),
            FieldFormatter::PerType(formatters) => formatters.get(&export_type).copied(),
        };
        match formatter {
            Some(formatter) => formatter(value, record),
            None => value.clone(),
        }
    }
}

/// Exportable fields, in display order, with their formatters
#[derive(Debug, Clone, Default)]
pub struct ExportConfiguration {
    fields: Vec<(String, FieldFormatter)>,
}

impl ExportConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, formatter: FieldFormatter) -> Self {
        self.fields.push((name.to_string(), formatter));
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn formatter(&self, name: &str) -> Option<&FieldFormatter> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, formatter)| formatter)
    }
}

/// Only the `fields` of `record`, formatted. Missing fields are null.
pub fn pick_fields(
    record: &Value,
    fields: &[String],
    configuration: &ExportConfiguration,
    export_type: ExportType,
) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            let value = record.get(field).unwrap_or(&Value::Null);
            let formatted = match configuration.formatter(field) {
                Some(formatter) => formatter.format(value, record, export_type),
                None => value.clone(),
            };
            (field.clone(), formatted)
        })
        .collect()
}

fn csv_cell(value: &Value) -> Result<String, ExportError> {
    match value {
        Value::Null => Ok(String::new()),
        value => Ok(serde_json::to_string(value)?),
    }
}

/// Header of field names, then one line per record of JSON-encoded values
pub fn to_csv(rows: &[Map<String, Value>], fields: &[String]) -> Result<String, ExportError> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(fields.join(","));
    for row in rows {
        let cells = fields
            .iter()
            .map(|field| csv_cell(row.get(field).unwrap_or(&Value::Null)))
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(cells.join(","));
    }
    Ok(lines.join("\r\n"))
}

/// Serialized content of the export of `records`
pub fn create_export<T: Serialize>(
    records: &[T],
    fields: &[String],
    configuration: &ExportConfiguration,
    export_type: ExportType,
) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }
    if fields.is_empty() {
        return Err(ExportError::NoFieldSelected);
    }

    let rows = records
        .iter()
        .map(|record| {
            let record = serde_json::to_value(record)?;
            Ok(pick_fields(&record, fields, configuration, export_type))
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    match export_type {
        ExportType::Json => Ok(serde_json::to_string_pretty(&rows)?),
        ExportType::Csv => to_csv(&rows, fields),
    }
}

/// Generated file, ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl ExportFile {
    pub fn new(export_name: &str, export_type: ExportType, content: String) -> Self {
        Self {
            filename: format!("{}.{}", export_name, export_type.extension()),
            mime_type: export_type.mime_type(),
            content,
        }
    }
}

/// Hand the file to the browser through a temporary object URL
pub fn download(file: &ExportFile) -> Result<(), ExportError> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(&file.content));

    let properties = BlobPropertyBag::new();
    properties.set_type(file.mime_type);

    let blob = Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| ExportError::Download(format!("Failed to create blob: {:?}", e)))?;

    download_blob(&blob, &file.filename)
}

fn download_blob(blob: &Blob, filename: &str) -> Result<(), ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::Download("No window object".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::Download("No document object".into()))?;
    let body = document
        .body()
        .ok_or_else(|| ExportError::Download("No body element".into()))?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| ExportError::Download(format!("Failed to create object URL: {:?}", e)))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| ExportError::Download(format!("Failed to create anchor: {:?}", e)))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| ExportError::Download(format!("Failed to cast to anchor: {:?}", e)))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| ExportError::Download(format!("Failed to set style: {:?}", e)))?;

    body.append_child(&anchor)
        .map_err(|e| ExportError::Download(format!("Failed to append anchor: {:?}", e)))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| ExportError::Download(format!("Failed to remove anchor: {:?}", e)))?;

    // The click has started the download, the URL is no longer needed
    Url::revoke_object_url(&url)
        .map_err(|e| ExportError::Download(format!("Failed to revoke URL: {:?}", e)))?;

    Ok(())
}
