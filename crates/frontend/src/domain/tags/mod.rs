pub mod provider;

pub use provider::TagsProvider;
