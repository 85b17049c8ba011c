pub mod comparison_filter;
pub mod tag_filter;

pub use comparison_filter::NumericalComparisonFilterModel;
pub use tag_filter::TagFilterModel;
