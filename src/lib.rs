pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::Settings;
pub use crate::core::{etl::EtlEngine, pipeline::SecretMessagePipeline};
pub use crate::utils::error::{Result, SecretError};
