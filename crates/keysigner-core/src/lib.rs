//! Keysigner Core Library
//!
//! Input validation, command building, tool execution and the operation
//! flows behind the keysigner CLI.

pub mod audit;
pub mod builders;
pub mod command;
pub mod error;
pub mod executor;
pub mod flows;
pub mod keystore;
pub mod models;
pub mod output_dir;
pub mod prompt;
pub mod toolchain;

#[cfg(test)]
mod testing;

pub use error::{KeysignerError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
