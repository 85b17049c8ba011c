//! Filters and pagination of the logs overview.

use contracts::domain::{Log, Tag};
use contracts::shared::{CombinationOperator, LogsFilter};

use crate::shared::config::ListConfig;
use crate::shared::filters::TagFilterModel;
use crate::shared::overview::{OverviewModel, OverviewPageModel, Reload};

pub const LOGS_ENDPOINT: &str = "/api/logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogsFilterField {
    Title,
    Author,
    RunNumbers,
    EnvironmentIds,
    Tags,
}

impl LogsFilterField {
    pub const ALL: [LogsFilterField; 5] = [
        LogsFilterField::Title,
        LogsFilterField::Author,
        LogsFilterField::RunNumbers,
        LogsFilterField::EnvironmentIds,
        LogsFilterField::Tags,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LogsFilterField::Title => "Title",
            LogsFilterField::Author => "Author",
            LogsFilterField::RunNumbers => "Run numbers",
            LogsFilterField::EnvironmentIds => "Environments",
            LogsFilterField::Tags => "Tags",
        }
    }

    /// Typed in a text input
    pub fn is_text(&self) -> bool {
        !matches!(self, LogsFilterField::Tags)
    }
}

#[derive(Debug)]
pub struct LogsOverviewModel {
    overview: OverviewPageModel<Log>,
    title: String,
    author: String,
    run_numbers: String,
    environment_ids: String,
    tags: TagFilterModel,
}

impl LogsOverviewModel {
    pub fn new(api_base: &str, config: &ListConfig) -> Self {
        let overview = OverviewPageModel::new(format!("{}{}", api_base, LOGS_ENDPOINT), config);
        let tags = TagFilterModel::new(CombinationOperator::And);
        tags.observable().bubble_to(overview.observable());

        Self {
            overview,
            title: String::new(),
            author: String::new(),
            run_numbers: String::new(),
            environment_ids: String::new(),
            tags,
        }
    }

    fn text_field_mut(&mut self, field: LogsFilterField) -> Option<&mut String> {
        match field {
            LogsFilterField::Title => Some(&mut self.title),
            LogsFilterField::Author => Some(&mut self.author),
            LogsFilterField::RunNumbers => Some(&mut self.run_numbers),
            LogsFilterField::EnvironmentIds => Some(&mut self.environment_ids),
            LogsFilterField::Tags => None,
        }
    }

    pub fn text(&self, field: LogsFilterField) -> &str {
        match field {
            LogsFilterField::Title => &self.title,
            LogsFilterField::Author => &self.author,
            LogsFilterField::RunNumbers => &self.run_numbers,
            LogsFilterField::EnvironmentIds => &self.environment_ids,
            LogsFilterField::Tags => "",
        }
    }

    /// Debounced; ignored for non-text fields
    pub fn set_text(&mut self, field: LogsFilterField, value: &str) -> Reload {
        let value = value.trim();
        let changed = match self.text_field_mut(field) {
            Some(current) if *current != value => {
                *current = value.to_string();
                true
            }
            _ => false,
        };
        if changed {
            self.overview.on_filter_change();
        }
        Reload::when(changed, Reload::Debounced)
    }

    pub fn tags(&self) -> &TagFilterModel {
        &self.tags
    }

    pub fn toggle_tag(&mut self, tag: Tag) -> Reload {
        self.tags.toggle_tag(tag);
        self.overview.on_filter_change();
        Reload::Immediate
    }

    pub fn set_tags_operator(&mut self, operator: CombinationOperator) -> Reload {
        self.tags.set_operator(operator);
        let changed = !self.tags.is_empty();
        if changed {
            self.overview.on_filter_change();
        }
        Reload::when(changed, Reload::Immediate)
    }

    pub fn toggle_tags_collapse(&mut self) {
        self.tags.picker_mut().toggle_collapse();
    }

    pub fn is_filter_active(&self, field: LogsFilterField) -> bool {
        match field {
            LogsFilterField::Tags => !self.tags.is_empty(),
            field => !self.text(field).is_empty(),
        }
    }

    pub fn is_any_filter_active(&self) -> bool {
        LogsFilterField::ALL
            .iter()
            .any(|field| self.is_filter_active(*field))
    }

    pub fn active_filter_labels(&self) -> Vec<&'static str> {
        LogsFilterField::ALL
            .iter()
            .filter(|field| self.is_filter_active(**field))
            .map(LogsFilterField::label)
            .collect()
    }

    pub fn clear_filter(&mut self, field: LogsFilterField) -> Reload {
        let changed = self.is_filter_active(field);
        if field.is_text() {
            if let Some(text) = self.text_field_mut(field) {
                text.clear();
            }
        } else {
            self.tags.reset();
        }
        if changed {
            self.overview.on_filter_change();
        }
        Reload::when(changed, Reload::Immediate)
    }

    pub fn reset_filtering(&mut self, fetch: bool) -> Reload {
        self.title.clear();
        self.author.clear();
        self.run_numbers.clear();
        self.environment_ids.clear();
        self.tags.reset();
        self.overview.on_filter_change();
        if fetch {
            Reload::Immediate
        } else {
            Reload::Skip
        }
    }

    pub fn reset(&mut self, fetch: bool) -> Reload {
        self.overview.reset();
        self.reset_filtering(fetch)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl OverviewModel for LogsOverviewModel {
    type Item = Log;
    type Filter = LogsFilter;

    fn overview(&self) -> &OverviewPageModel<Log> {
        &self.overview
    }

    fn overview_mut(&mut self) -> &mut OverviewPageModel<Log> {
        &mut self.overview
    }

    fn filter(&self) -> Option<LogsFilter> {
        let filter = LogsFilter {
            title: non_empty(&self.title),
            author: non_empty(&self.author),
            run: non_empty(&self.run_numbers),
            environments: non_empty(&self.environment_ids),
            tags: self.tags.normalized(),
        };
        (!filter.is_empty()).then_some(filter)
    }
}
