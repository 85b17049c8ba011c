pub mod error_list;
pub mod export_form;
pub mod filter_inputs;
pub mod filter_panel;
pub mod pagination_controls;
