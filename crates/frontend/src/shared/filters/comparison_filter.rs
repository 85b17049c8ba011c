use contracts::shared::{ComparisonOperator, NumericComparison};

/// Numeric input paired with a comparison operator, e.g. `>= 3` detectors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericalComparisonFilterModel {
    operator: ComparisonOperator,
    limit: Option<i64>,
}

impl NumericalComparisonFilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// Returns true if the filter value changed, i.e. a limit is set
    pub fn set_operator(&mut self, operator: ComparisonOperator) -> bool {
        let changed = self.operator != operator;
        self.operator = operator;
        changed && self.limit.is_some()
    }

    pub fn set_limit(&mut self, limit: Option<i64>) -> bool {
        let changed = self.limit != limit;
        self.limit = limit;
        changed
    }

    /// Parse user input, an empty or invalid input clears the limit
    pub fn set_raw_limit(&mut self, raw: &str) -> bool {
        self.set_limit(raw.trim().parse::<i64>().ok())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none()
    }

    pub fn normalized(&self) -> Option<NumericComparison> {
        self.normalized_scaled(1)
    }

    /// Limit multiplied by `factor`, for inputs given in a larger unit than the API expects
    pub fn normalized_scaled(&self, factor: i64) -> Option<NumericComparison> {
        self.limit
            .map(|limit| NumericComparison::new(self.operator, limit.saturating_mul(factor)))
    }

    /// e.g. `>= 3`
    pub fn describe(&self) -> Option<String> {
        self.limit
            .map(|limit| format!("{} {}", self.operator.symbol(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_change_without_limit_is_not_a_change() {
        let mut filter = NumericalComparisonFilterModel::new();
        assert!(!filter.set_operator(ComparisonOperator::Greater));

        filter.set_limit(Some(3));
        assert!(filter.set_operator(ComparisonOperator::Less));
        assert!(!filter.set_operator(ComparisonOperator::Less));
    }

    #[test]
    fn test_raw_limit() {
        let mut filter = NumericalComparisonFilterModel::new();
        assert!(filter.set_raw_limit(" 12 "));
        assert_eq!(filter.limit(), Some(12));

        assert!(filter.set_raw_limit("abc"));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_scaled_normalization() {
        let mut filter = NumericalComparisonFilterModel::new();
        filter.set_operator(ComparisonOperator::GreaterOrEqual);
        filter.set_limit(Some(2));

        assert_eq!(
            filter.normalized_scaled(60_000),
            Some(NumericComparison::new(ComparisonOperator::GreaterOrEqual, 120_000))
        );
        assert_eq!(filter.describe().as_deref(), Some(">= 2"));
    }
}
