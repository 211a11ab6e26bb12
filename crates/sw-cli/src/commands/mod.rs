//! CLI command implementations

pub(crate) mod common;
pub(crate) mod describe;
pub(crate) mod generate;
pub(crate) mod tables;
