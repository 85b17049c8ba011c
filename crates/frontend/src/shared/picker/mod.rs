//! Picker system
//!
//! Selection state of a list of options (`PickerModel`) and its checkbox
//! listing (`PickerList`). Any type implementing [`PickerOption`] can be picked.

pub mod component;
pub mod model;
pub mod traits;

pub use component::{PickerEntry, PickerList};
pub use model::{PickerModel, TagPickerModel};
pub use traits::PickerOption;
