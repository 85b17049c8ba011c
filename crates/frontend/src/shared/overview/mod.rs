//! List-view state shared by every overview page.
//!
//! A page model keeps its filters next to an [`OverviewPageModel`] and
//! implements [`OverviewModel`]; its setters return a [`Reload`] that the
//! [`ListController`] turns into an immediate or debounced request.

pub mod controller;
pub mod model;

pub use controller::{ListController, OverviewModel};
pub use model::{LoadRequest, OverviewPageModel, Reload};
