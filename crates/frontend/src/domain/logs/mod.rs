pub mod model;
pub mod ui;

pub use model::{LogsFilterField, LogsOverviewModel};
