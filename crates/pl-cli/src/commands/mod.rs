//! CLI command implementations

pub(crate) mod common;
pub(crate) mod counts;
pub(crate) mod load;
pub(crate) mod reset;
