pub mod log;
pub mod run;
pub mod tag;

pub use log::{Log, LogAuthor, LogRunReference};
pub use run::{Run, RunQuality, RunType, TRIGGER_VALUES};
pub use tag::Tag;
