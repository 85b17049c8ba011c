pub mod api;
pub mod query;

pub use api::{ApiErrorDetail, PageMeta, ResponseBody, ResponseMeta};
pub use query::{
    CombinationOperator, ComparisonOperator, LogsFilter, NumericComparison, PageParams,
    RunsFilter, TagsFilter,
};
