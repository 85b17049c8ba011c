//! Wire types shared with the Bookkeeping REST API.

pub mod domain;
pub mod shared;
