pub mod logs;
pub mod runs;
pub mod tags;
