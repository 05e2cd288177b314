use crate::adapters::http::DEFAULT_API_BASE_URL;
use crate::config::toml_config::TomlConfig;
use crate::core::pipeline::DEFAULT_BUFFER_SIZE;
use crate::core::{ConfigProvider, DataType};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::Serialize;
use std::time::Duration;

/// 命令列或設定檔提供的原始值（皆為選填）
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub file_path: Option<String>,
    pub data_type: Option<String>,
    pub api_base_url: Option<String>,
    pub buffer_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

/// 合併後、可直接執行的上傳設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSettings {
    pub file_path: String,
    pub data_type: String,
    pub api_base_url: String,
    pub buffer_size: usize,
    pub timeout_seconds: Option<u64>,
}

impl UploadSettings {
    pub fn new(file_path: impl Into<String>, data_type: DataType) -> Self {
        Self {
            file_path: file_path.into(),
            data_type: data_type.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            timeout_seconds: None,
        }
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// 優先順序：命令列 > 設定檔 > 預設值
    pub fn resolve(overrides: SettingsOverrides, file: Option<&TomlConfig>) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();

        let file_path = overrides.file_path.or(file.source.file_path);
        let data_type = overrides.data_type.or(file.source.data_type);

        Ok(Self {
            file_path: validate_required_field("file_path", &file_path)?.clone(),
            data_type: validate_required_field("data_type", &data_type)?.clone(),
            api_base_url: overrides
                .api_base_url
                .or(file.submit.base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            buffer_size: overrides
                .buffer_size
                .or(file.batch.buffer_size)
                .unwrap_or(DEFAULT_BUFFER_SIZE),
            timeout_seconds: overrides.timeout_seconds.or(file.submit.timeout_seconds),
        })
    }
}

impl Validate for UploadSettings {
    fn validate(&self) -> Result<()> {
        validate_path("file_path", &self.file_path)?;
        validate_non_empty_string("data_type", &self.data_type)?;
        self.data_type.parse::<DataType>()?;
        validate_url("api_base_url", &self.api_base_url)?;
        validate_positive_number("buffer_size", self.buffer_size, 1)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 3600)?;
        }
        Ok(())
    }
}

impl ConfigProvider for UploadSettings {
    fn file_path(&self) -> &str {
        &self.file_path
    }

    fn data_type(&self) -> &str {
        &self.data_type
    }

    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    #[test]
    fn test_defaults() {
        let settings = UploadSettings::new("countries.geojson", DataType::Country);

        assert_eq!(settings.api_base_url(), "http://backend:8080");
        assert_eq!(settings.buffer_size(), 50);
        assert_eq!(settings.data_type(), "country");
        assert!(settings.request_timeout().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[source]
file_path = "from-file.geojson"
data_type = "earthquake"

[submit]
base_url = "http://file-backend:8080"
timeout_seconds = 10

[batch]
buffer_size = 20
"#,
        )
        .unwrap();

        let overrides = SettingsOverrides {
            file_path: Some("from-cli.geojson".to_string()),
            buffer_size: Some(5),
            ..Default::default()
        };

        let settings = UploadSettings::resolve(overrides, Some(&file)).unwrap();

        assert_eq!(settings.file_path, "from-cli.geojson");
        assert_eq!(settings.data_type, "earthquake");
        assert_eq!(settings.api_base_url, "http://file-backend:8080");
        assert_eq!(settings.buffer_size, 5);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_missing_required_values() {
        let overrides = SettingsOverrides {
            data_type: Some("country".to_string()),
            ..Default::default()
        };

        let result = UploadSettings::resolve(overrides, None);
        assert!(matches!(
            result,
            Err(EtlError::MissingConfigError { field }) if field == "file_path"
        ));
    }

    #[test]
    fn test_validation_rejects_unknown_data_type() {
        let mut settings = UploadSettings::new("data.geojson", DataType::Country);
        settings.data_type = "volcano".to_string();

        assert!(matches!(
            settings.validate(),
            Err(EtlError::UnsupportedDataType { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_buffer_and_bad_url() {
        let settings = UploadSettings::new("data.geojson", DataType::Country).with_buffer_size(0);
        assert!(settings.validate().is_err());

        let settings =
            UploadSettings::new("data.geojson", DataType::Country).with_api_base_url("backend");
        assert!(settings.validate().is_err());
    }
}
