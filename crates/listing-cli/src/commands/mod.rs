//! CLI command implementations.

pub mod preview;
pub mod serve;
pub mod validate;
