pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{LocalStorage, RoundRobinPartitioner, ShellHost};
pub use crate::config::{Cli, Command, FetchConfig, RunConfig};
pub use crate::core::fetch::WarFetcher;
pub use crate::core::runner::{BranchRunner, RunSettings};
pub use crate::core::split::build_split_plan;
pub use crate::utils::error::{AthError, Result};
