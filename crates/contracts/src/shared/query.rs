//! Query parameters accepted by the collection endpoints.
//!
//! Every filter field is optional and skipped when empty: the API treats a
//! present-but-empty parameter as a filter on the empty value.

use serde::{Deserialize, Serialize};

/// `page[offset]` / `page[limit]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub offset: usize,
    pub limit: usize,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[default]
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    Greater,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 5] = [
        ComparisonOperator::Less,
        ComparisonOperator::LessOrEqual,
        ComparisonOperator::Equal,
        ComparisonOperator::GreaterOrEqual,
        ComparisonOperator::Greater,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::Equal => "=",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Greater => ">",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operator| operator.symbol() == symbol)
    }
}

/// How the selected tags of a tag filter are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationOperator {
    #[default]
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "none-of")]
    NoneOf,
}

impl CombinationOperator {
    pub const ALL: [CombinationOperator; 3] = [
        CombinationOperator::And,
        CombinationOperator::Or,
        CombinationOperator::NoneOf,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CombinationOperator::And => "AND",
            CombinationOperator::Or => "OR",
            CombinationOperator::NoneOf => "NONE-OF",
        }
    }
}

/// `{operator, limit}` pair, e.g. `filter[nDetectors][operator]=>=&filter[nDetectors][limit]=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericComparison {
    pub operator: ComparisonOperator,
    pub limit: i64,
}

impl NumericComparison {
    pub fn new(operator: ComparisonOperator, limit: i64) -> Self {
        Self { operator, limit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsFilter {
    /// Comma separated tag texts
    pub values: String,
    pub operation: CombinationOperator,
}

// ============================================================================
// Collection filters
// ============================================================================

/// `filter[...]` of `GET /api/runs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_numbers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_numbers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lhc_periods: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odc_topology_full_name: Option<String>,
    /// Limit in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_duration: Option<NumericComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_detectors: Option<NumericComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_flps: Option<NumericComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_epns: Option<NumericComparison>,
    /// Comma separated run qualities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_qualities: Option<String>,
    /// Comma separated trigger values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_values: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddflp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsFilter>,
}

impl RunsFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `filter[...]` of `GET /api/logs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Comma separated run numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    /// Comma separated environment ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsFilter>,
}

impl LogsFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let filter = RunsFilter {
            fill_numbers: Some("1,2".to_string()),
            dcs: Some(false),
            ..Default::default()
        };

        let query = serde_qs::to_string(&filter).unwrap();
        assert!(query.contains("fillNumbers="));
        assert!(query.contains("dcs=false"));
        assert!(!query.contains("runNumbers"));
        assert!(!query.contains("ddflp"));
        assert!(!query.contains("tags"));
    }

    #[test]
    fn test_default_filter_is_empty() {
        assert!(RunsFilter::default().is_empty());
        assert!(LogsFilter::default().is_empty());
        assert!(!LogsFilter {
            title: Some("EOS".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(ComparisonOperator::from_symbol(">="), Some(ComparisonOperator::GreaterOrEqual));
        assert_eq!(ComparisonOperator::from_symbol("!"), None);
        assert_eq!(ComparisonOperator::default(), ComparisonOperator::Equal);
    }
}
