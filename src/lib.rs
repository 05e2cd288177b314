pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::BulkInsertClient, storage::LocalStorage};
pub use app::Uploader;
pub use config::settings::UploadSettings;
pub use crate::core::{pipeline::BatchingPipeline, runner::Runner};
pub use domain::model::{DataType, RunCounters};
pub use utils::error::{EtlError, Result};
