pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::settings::{SettingsOverrides, UploadSettings};
#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::domain::model::DataType;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "geo-upload")]
#[command(about = "Upload GeoJSON features to the backend in batches")]
pub struct CliConfig {
    /// Path to the GeoJSON file to upload
    #[arg(long)]
    pub file_path: Option<String>,

    /// Kind of data in the file
    #[arg(long, value_enum)]
    pub data_type: Option<DataType>,

    /// Base URL of the upload backend [default: http://backend:8080]
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Number of records sent per request [default: 50]
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        self.config.as_ref().map(TomlConfig::from_file).transpose()
    }

    /// 合併命令列與設定檔，命令列優先
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<UploadSettings> {
        let overrides = SettingsOverrides {
            file_path: self.file_path.clone(),
            data_type: self.data_type.map(|data_type| data_type.to_string()),
            api_base_url: self.api_base_url.clone(),
            buffer_size: self.buffer_size,
            timeout_seconds: self.timeout_seconds,
        };
        UploadSettings::resolve(overrides, file)
    }

    pub fn monitor_enabled(&self, file: Option<&TomlConfig>) -> bool {
        self.monitor || file.map(TomlConfig::monitoring_enabled).unwrap_or(false)
    }
}
