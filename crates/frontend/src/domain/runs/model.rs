//! Filters, pagination and export state of the runs overview.

use contracts::domain::{Run, RunQuality, Tag};
use contracts::shared::{ApiErrorDetail, CombinationOperator, ComparisonOperator, RunsFilter};

use super::export::runs_export_configuration;
use crate::shared::config::ListConfig;
use crate::shared::data_export::DataExportModel;
use crate::shared::date_utils::minutes_to_ms;
use crate::shared::export::{ExportError, ExportFile};
use crate::shared::filters::{NumericalComparisonFilterModel, TagFilterModel};
use crate::shared::overview::{OverviewModel, OverviewPageModel, Reload};

pub const RUNS_ENDPOINT: &str = "/api/runs";

/// Every filter of the runs overview.
///
/// Activity and labels are both derived from this list, a new filter only
/// needs to be added here and in [`RunsOverviewModel::is_filter_active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunsFilterField {
    RunNumbers,
    FillNumbers,
    EnvironmentIds,
    LhcPeriods,
    OdcTopologyFullName,
    RunDuration,
    NDetectors,
    NFlps,
    NEpns,
    RunQualities,
    TriggerValues,
    Ddflp,
    Dcs,
    Epn,
    Tags,
}

impl RunsFilterField {
    pub const ALL: [RunsFilterField; 15] = [
        RunsFilterField::RunNumbers,
        RunsFilterField::FillNumbers,
        RunsFilterField::EnvironmentIds,
        RunsFilterField::LhcPeriods,
        RunsFilterField::OdcTopologyFullName,
        RunsFilterField::RunDuration,
        RunsFilterField::NDetectors,
        RunsFilterField::NFlps,
        RunsFilterField::NEpns,
        RunsFilterField::RunQualities,
        RunsFilterField::TriggerValues,
        RunsFilterField::Ddflp,
        RunsFilterField::Dcs,
        RunsFilterField::Epn,
        RunsFilterField::Tags,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RunsFilterField::RunNumbers => "Run numbers",
            RunsFilterField::FillNumbers => "Fill numbers",
            RunsFilterField::EnvironmentIds => "Environment ids",
            RunsFilterField::LhcPeriods => "LHC periods",
            RunsFilterField::OdcTopologyFullName => "ODC topology",
            RunsFilterField::RunDuration => "Run duration",
            RunsFilterField::NDetectors => "Detectors count",
            RunsFilterField::NFlps => "FLPs count",
            RunsFilterField::NEpns => "EPNs count",
            RunsFilterField::RunQualities => "Run quality",
            RunsFilterField::TriggerValues => "Trigger value",
            RunsFilterField::Ddflp => "Data distribution",
            RunsFilterField::Dcs => "DCS",
            RunsFilterField::Epn => "EPN",
            RunsFilterField::Tags => "Tags",
        }
    }
}

/// Numeric comparison filters of the runs overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunsComparison {
    /// In minutes
    RunDuration,
    NDetectors,
    NFlps,
    NEpns,
}

#[derive(Debug)]
pub struct RunsOverviewModel {
    overview: OverviewPageModel<Run>,

    run_numbers: String,
    fill_numbers: String,
    environment_ids: String,
    lhc_periods: String,
    odc_topology_full_name: String,
    run_duration: NumericalComparisonFilterModel,
    n_detectors: NumericalComparisonFilterModel,
    n_flps: NumericalComparisonFilterModel,
    n_epns: NumericalComparisonFilterModel,
    run_qualities: Vec<RunQuality>,
    trigger_values: Vec<String>,
    ddflp: Option<bool>,
    dcs: Option<bool>,
    epn: Option<bool>,
    tags: TagFilterModel,

    data_export: DataExportModel,
}

impl RunsOverviewModel {
    pub fn new(api_base: &str, config: &ListConfig) -> Self {
        let overview = OverviewPageModel::new(format!("{}{}", api_base, RUNS_ENDPOINT), config);
        let tags = TagFilterModel::new(CombinationOperator::And);
        tags.observable().bubble_to(overview.observable());

        Self {
            overview,
            run_numbers: String::new(),
            fill_numbers: String::new(),
            environment_ids: String::new(),
            lhc_periods: String::new(),
            odc_topology_full_name: String::new(),
            run_duration: NumericalComparisonFilterModel::new(),
            n_detectors: NumericalComparisonFilterModel::new(),
            n_flps: NumericalComparisonFilterModel::new(),
            n_epns: NumericalComparisonFilterModel::new(),
            run_qualities: Vec::new(),
            trigger_values: Vec::new(),
            ddflp: None,
            dcs: None,
            epn: None,
            tags,
            data_export: DataExportModel::new(runs_export_configuration()),
        }
    }

    fn filter_changed(&mut self, changed: bool, reload: Reload) -> Reload {
        if changed {
            self.overview.on_filter_change();
        }
        Reload::when(changed, reload)
    }

    fn set_text(field: &mut String, value: &str) -> bool {
        let value = value.trim();
        if *field != value {
            *field = value.to_string();
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------------
    // Text filters, debounced
    // ------------------------------------------------------------------------

    pub fn run_numbers(&self) -> &str {
        &self.run_numbers
    }

    pub fn set_run_numbers(&mut self, run_numbers: &str) -> Reload {
        let changed = Self::set_text(&mut self.run_numbers, run_numbers);
        self.filter_changed(changed, Reload::Debounced)
    }

    pub fn fill_numbers(&self) -> &str {
        &self.fill_numbers
    }

    pub fn set_fill_numbers(&mut self, fill_numbers: &str) -> Reload {
        let changed = Self::set_text(&mut self.fill_numbers, fill_numbers);
        self.filter_changed(changed, Reload::Debounced)
    }

    pub fn environment_ids(&self) -> &str {
        &self.environment_ids
    }

    pub fn set_environment_ids(&mut self, environment_ids: &str) -> Reload {
        let changed = Self::set_text(&mut self.environment_ids, environment_ids);
        self.filter_changed(changed, Reload::Debounced)
    }

    pub fn lhc_periods(&self) -> &str {
        &self.lhc_periods
    }

    pub fn set_lhc_periods(&mut self, lhc_periods: &str) -> Reload {
        let changed = Self::set_text(&mut self.lhc_periods, lhc_periods);
        self.filter_changed(changed, Reload::Debounced)
    }

    pub fn odc_topology_full_name(&self) -> &str {
        &self.odc_topology_full_name
    }

    pub fn set_odc_topology_full_name(&mut self, topology: &str) -> Reload {
        let changed = Self::set_text(&mut self.odc_topology_full_name, topology);
        self.filter_changed(changed, Reload::Debounced)
    }

    // ------------------------------------------------------------------------
    // Numeric comparisons
    // ------------------------------------------------------------------------

    pub fn comparison(&self, comparison: RunsComparison) -> &NumericalComparisonFilterModel {
        match comparison {
            RunsComparison::RunDuration => &self.run_duration,
            RunsComparison::NDetectors => &self.n_detectors,
            RunsComparison::NFlps => &self.n_flps,
            RunsComparison::NEpns => &self.n_epns,
        }
    }

    fn comparison_mut(&mut self, comparison: RunsComparison) -> &mut NumericalComparisonFilterModel {
        match comparison {
            RunsComparison::RunDuration => &mut self.run_duration,
            RunsComparison::NDetectors => &mut self.n_detectors,
            RunsComparison::NFlps => &mut self.n_flps,
            RunsComparison::NEpns => &mut self.n_epns,
        }
    }

    pub fn set_comparison_operator(
        &mut self,
        comparison: RunsComparison,
        operator: ComparisonOperator,
    ) -> Reload {
        let changed = self.comparison_mut(comparison).set_operator(operator);
        self.filter_changed(changed, Reload::Immediate)
    }

    /// Counts are typed, the duration is picked from a range: only counts are debounced
    pub fn set_comparison_limit(&mut self, comparison: RunsComparison, raw_limit: &str) -> Reload {
        let changed = self.comparison_mut(comparison).set_raw_limit(raw_limit);
        let reload = match comparison {
            RunsComparison::RunDuration => Reload::Immediate,
            _ => Reload::Debounced,
        };
        self.filter_changed(changed, reload)
    }

    // ------------------------------------------------------------------------
    // Toggles, immediate
    // ------------------------------------------------------------------------

    pub fn run_qualities(&self) -> &[RunQuality] {
        &self.run_qualities
    }

    pub fn is_run_quality_selected(&self, quality: RunQuality) -> bool {
        self.run_qualities.contains(&quality)
    }

    pub fn toggle_run_quality(&mut self, quality: RunQuality) -> Reload {
        if self.is_run_quality_selected(quality) {
            self.run_qualities.retain(|selected| *selected != quality);
        } else {
            self.run_qualities.push(quality);
        }
        self.filter_changed(true, Reload::Immediate)
    }

    pub fn trigger_values(&self) -> &[String] {
        &self.trigger_values
    }

    pub fn toggle_trigger_value(&mut self, trigger_value: &str) -> Reload {
        if let Some(position) = self.trigger_values.iter().position(|v| v == trigger_value) {
            self.trigger_values.remove(position);
        } else {
            self.trigger_values.push(trigger_value.to_string());
        }
        self.filter_changed(true, Reload::Immediate)
    }

    pub fn ddflp(&self) -> Option<bool> {
        self.ddflp
    }

    pub fn set_ddflp(&mut self, ddflp: Option<bool>) -> Reload {
        let changed = self.ddflp != ddflp;
        self.ddflp = ddflp;
        self.filter_changed(changed, Reload::Immediate)
    }

    pub fn dcs(&self) -> Option<bool> {
        self.dcs
    }

    pub fn set_dcs(&mut self, dcs: Option<bool>) -> Reload {
        let changed = self.dcs != dcs;
        self.dcs = dcs;
        self.filter_changed(changed, Reload::Immediate)
    }

    pub fn epn(&self) -> Option<bool> {
        self.epn
    }

    pub fn set_epn(&mut self, epn: Option<bool>) -> Reload {
        let changed = self.epn != epn;
        self.epn = epn;
        self.filter_changed(changed, Reload::Immediate)
    }

    pub fn tags(&self) -> &TagFilterModel {
        &self.tags
    }

    pub fn toggle_tag(&mut self, tag: Tag) -> Reload {
        self.tags.toggle_tag(tag);
        self.filter_changed(true, Reload::Immediate)
    }

    pub fn set_tags_operator(&mut self, operator: CombinationOperator) -> Reload {
        self.tags.set_operator(operator);
        self.filter_changed(!self.tags.is_empty(), Reload::Immediate)
    }

    pub fn toggle_tags_collapse(&mut self) {
        self.tags.picker_mut().toggle_collapse();
    }

    // ------------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------------

    pub fn is_filter_active(&self, field: RunsFilterField) -> bool {
        match field {
            RunsFilterField::RunNumbers => !self.run_numbers.is_empty(),
            RunsFilterField::FillNumbers => !self.fill_numbers.is_empty(),
            RunsFilterField::EnvironmentIds => !self.environment_ids.is_empty(),
            RunsFilterField::LhcPeriods => !self.lhc_periods.is_empty(),
            RunsFilterField::OdcTopologyFullName => !self.odc_topology_full_name.is_empty(),
            RunsFilterField::RunDuration => !self.run_duration.is_empty(),
            RunsFilterField::NDetectors => !self.n_detectors.is_empty(),
            RunsFilterField::NFlps => !self.n_flps.is_empty(),
            RunsFilterField::NEpns => !self.n_epns.is_empty(),
            RunsFilterField::RunQualities => !self.run_qualities.is_empty(),
            RunsFilterField::TriggerValues => !self.trigger_values.is_empty(),
            RunsFilterField::Ddflp => self.ddflp.is_some(),
            RunsFilterField::Dcs => self.dcs.is_some(),
            RunsFilterField::Epn => self.epn.is_some(),
            RunsFilterField::Tags => !self.tags.is_empty(),
        }
    }

    pub fn active_filters(&self) -> Vec<RunsFilterField> {
        RunsFilterField::ALL
            .into_iter()
            .filter(|field| self.is_filter_active(*field))
            .collect()
    }

    pub fn is_any_filter_active(&self) -> bool {
        RunsFilterField::ALL
            .iter()
            .any(|field| self.is_filter_active(*field))
    }

    pub fn active_filter_labels(&self) -> Vec<&'static str> {
        self.active_filters()
            .iter()
            .map(RunsFilterField::label)
            .collect()
    }

    /// Restore the default of one filter
    pub fn clear_filter(&mut self, field: RunsFilterField) -> Reload {
        let changed = self.is_filter_active(field);
        self.clear_field(field);
        self.filter_changed(changed, Reload::Immediate)
    }

    fn clear_field(&mut self, field: RunsFilterField) {
        match field {
            RunsFilterField::RunNumbers => self.run_numbers.clear(),
            RunsFilterField::FillNumbers => self.fill_numbers.clear(),
            RunsFilterField::EnvironmentIds => self.environment_ids.clear(),
            RunsFilterField::LhcPeriods => self.lhc_periods.clear(),
            RunsFilterField::OdcTopologyFullName => self.odc_topology_full_name.clear(),
            RunsFilterField::RunDuration => self.run_duration.reset(),
            RunsFilterField::NDetectors => self.n_detectors.reset(),
            RunsFilterField::NFlps => self.n_flps.reset(),
            RunsFilterField::NEpns => self.n_epns.reset(),
            RunsFilterField::RunQualities => self.run_qualities.clear(),
            RunsFilterField::TriggerValues => self.trigger_values.clear(),
            RunsFilterField::Ddflp => self.ddflp = None,
            RunsFilterField::Dcs => self.dcs = None,
            RunsFilterField::Epn => self.epn = None,
            RunsFilterField::Tags => self.tags.reset(),
        }
    }

    /// Every filter back to its default
    pub fn reset_filtering(&mut self, fetch: bool) -> Reload {
        for field in RunsFilterField::ALL {
            self.clear_field(field);
        }
        self.filter_changed(true, if fetch { Reload::Immediate } else { Reload::Skip })
    }

    /// Filters and pagination back to their defaults
    pub fn reset(&mut self, fetch: bool) -> Reload {
        self.overview.reset();
        self.reset_filtering(fetch)
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    pub fn data_export(&self) -> &DataExportModel {
        &self.data_export
    }

    pub fn data_export_mut(&mut self) -> &mut DataExportModel {
        &mut self.data_export
    }

    /// File of the selected fields of `runs`; an empty `runs` shows an error instead
    pub fn export(&mut self, runs: &[Run]) -> Result<ExportFile, ExportError> {
        let result = self.data_export.create_file(runs);
        match &result {
            Err(ExportError::NoData) => self.overview.set_items_failure(vec![ApiErrorDetail::new(
                "No data found",
                "No valid runs were found for provided run number(s)",
            )]),
            Err(e) => log::warn!("Runs export failed: {}", e),
            Ok(file) => log::debug!("Exporting {} runs to {}", runs.len(), file.filename),
        }
        result
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn joined<T: ToString>(values: &[T]) -> Option<String> {
    (!values.is_empty()).then(|| {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    })
}

impl OverviewModel for RunsOverviewModel {
    type Item = Run;
    type Filter = RunsFilter;

    fn overview(&self) -> &OverviewPageModel<Run> {
        &self.overview
    }

    fn overview_mut(&mut self) -> &mut OverviewPageModel<Run> {
        &mut self.overview
    }

    fn filter(&self) -> Option<RunsFilter> {
        let filter = RunsFilter {
            run_numbers: non_empty(&self.run_numbers),
            fill_numbers: non_empty(&self.fill_numbers),
            environment_ids: non_empty(&self.environment_ids),
            lhc_periods: non_empty(&self.lhc_periods),
            odc_topology_full_name: non_empty(&self.odc_topology_full_name),
            run_duration: self.run_duration.normalized_scaled(minutes_to_ms(1)),
            n_detectors: self.n_detectors.normalized(),
            n_flps: self.n_flps.normalized(),
            n_epns: self.n_epns.normalized(),
            run_qualities: joined(&self.run_qualities),
            trigger_values: joined(&self.trigger_values),
            ddflp: self.ddflp,
            dcs: self.dcs,
            epn: self.epn,
            tags: self.tags.normalized(),
        };
        (!filter.is_empty()).then_some(filter)
    }
}
