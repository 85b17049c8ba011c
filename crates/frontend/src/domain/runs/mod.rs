pub mod export;
pub mod model;
pub mod ui;

pub use model::{RunsComparison, RunsFilterField, RunsOverviewModel};
