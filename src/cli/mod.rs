//! CLI command implementations

pub mod definition;
pub mod export;

pub use definition::{Cli, Commands};
