//! CLI command implementations

pub mod commands;
pub mod compare;
pub mod error;
pub mod fetch;
pub mod info;

pub use commands::{Cli, Commands};
pub use compare::CompareArgs;
pub use error::CliError;
pub use fetch::{FetchArgs, FetchFormat};
pub use info::InfoArgs;
