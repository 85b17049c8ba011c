pub mod api_utils;
pub mod components;
pub mod config;
pub mod data_export;
pub mod date_utils;
pub mod debounce;
pub mod export;
pub mod fetch;
pub mod filters;
pub mod icons;
pub mod observable;
pub mod overview;
pub mod page_frame;
pub mod pagination;
pub mod picker;
pub mod query;
pub mod remote_data;
pub mod runtime;

#[cfg(test)]
pub mod testing;
