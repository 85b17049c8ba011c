use serde::{Deserialize, Serialize};
use std::fmt;

use super::tag::Tag;

// ============================================================================
// Run quality
// ============================================================================

/// Quality flag set by the shifters at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunQuality {
    Good,
    Bad,
    Test,
    None,
}

impl RunQuality {
    pub const ALL: [RunQuality; 4] = [
        RunQuality::Good,
        RunQuality::Bad,
        RunQuality::Test,
        RunQuality::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RunQuality::Good => "good",
            RunQuality::Bad => "bad",
            RunQuality::Test => "test",
            RunQuality::None => "none",
        }
    }
}

impl fmt::Display for RunQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger configurations a run can be started with
pub const TRIGGER_VALUES: [&str; 3] = ["OFF", "LTU", "CTP"];

// ============================================================================
// Run
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunType {
    pub id: i64,
    pub name: String,
}

/// A data-taking run as returned by `GET /api/runs`
///
/// Timestamps are milliseconds since the epoch, durations are milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Run {
    pub id: i64,
    pub run_number: i64,
    pub time_o2_start: Option<i64>,
    pub time_o2_end: Option<i64>,
    pub time_trg_start: Option<i64>,
    pub time_trg_end: Option<i64>,
    pub run_duration: Option<i64>,
    pub environment_id: Option<String>,
    pub run_type: Option<RunType>,
    pub run_quality: Option<RunQuality>,
    pub n_detectors: Option<u32>,
    pub n_flps: Option<u32>,
    pub n_epns: Option<u32>,
    pub dcs: Option<bool>,
    pub ddflp: Option<bool>,
    pub epn: Option<bool>,
    pub epn_topology: Option<String>,
    pub odc_topology_full_name: Option<String>,
    pub fill_number: Option<i64>,
    pub lhc_period: Option<String>,
    pub detectors: Option<String>,
    pub trigger_value: Option<String>,
    pub tags: Vec<Tag>,
}
