use crate::utils::error::EtlError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// 來源檔案中的一筆原始 feature，不做任何結構假設
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEntry(Value);

impl RawEntry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// 取得頂層欄位；JSON `null` 視同不存在
    pub fn member(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key).filter(|v| !v.is_null())
    }

    /// 取得 `properties` 底下的欄位；JSON `null` 視同不存在
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.member("properties")?
            .as_object()?
            .get(key)
            .filter(|v| !v.is_null())
    }

    pub fn geometry(&self) -> Option<&Value> {
        self.member("geometry")
    }
}

impl fmt::Display for RawEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// GeoJSON geometry (`type` + `coordinates`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub geometry: Geometry,
}

/// 數值欄位保留來源的 JSON 數字表示（整數不會變成浮點數）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    pub latitude: Number,
    pub longitude: Number,
    pub date: String,
    pub provider_id: String,
    pub magnitude: Number,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub depth: Option<Number>,
}

/// 單筆資料被轉換器拒絕的原因；不會中斷整個上傳流程
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("malformed field '{field}': {reason}")]
    MalformedField { field: &'static str, reason: String },

    #[error("unable to recognize the date format '{value}'")]
    UnrecognizedDateFormat { value: String },
}

/// 一次批次送出失敗的原因
#[derive(Debug, thiserror::Error)]
pub enum SubmitFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend reported {count} error(s) for the batch")]
    RemoteErrors { count: usize },
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Success,
    Failure(SubmitFailure),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success)
    }
}

impl From<SubmitFailure> for SubmitOutcome {
    fn from(failure: SubmitFailure) -> Self {
        SubmitOutcome::Failure(failure)
    }
}

/// 單次執行的計數器，每次 run 重新開始
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub entry_count: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub batch_count: usize,
    pub batch_failure_count: usize,
    /// 失敗批次中被丟棄（不重送）的記錄數
    pub dropped_record_count: usize,
}

impl fmt::Display for RunCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries seen, {} accepted, {} rejected, {} batches submitted, {} failed ({} records dropped)",
            self.entry_count,
            self.accepted_count,
            self.rejected_count,
            self.batch_count,
            self.batch_failure_count,
            self.dropped_record_count
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Country,
    Earthquake,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Country => "country",
            DataType::Earthquake => "earthquake",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(DataType::Country),
            "earthquake" => Ok(DataType::Earthquake),
            other => Err(EtlError::UnsupportedDataType {
                value: other.to_string(),
            }),
        }
    }
}
