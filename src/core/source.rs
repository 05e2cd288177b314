use crate::core::{RawEntry, Storage};
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;
use serde_json::Value;

pub const FEATURES_FIELD: &str = "features";

// 只解析需要的欄位，其他頂層內容（crs、name 等）直接略過
#[derive(Deserialize)]
struct FeatureDocument {
    #[serde(default)]
    features: Option<Vec<Value>>,
}

/// GeoJSON FeatureCollection 的 feature 來源，依原始順序逐筆產生 `RawEntry`
#[derive(Debug)]
pub struct FeatureSource {
    entries: Vec<Value>,
}

impl FeatureSource {
    pub async fn open<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        tracing::debug!("Reading source document: {}", path);
        let bytes = storage.read_file(path).await?;
        Self::from_slice(&bytes)
    }

    /// 找不到 `features` 集合是唯一會中止整個流程的情況
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: FeatureDocument = serde_json::from_slice(bytes)?;
        let entries = document.features.ok_or_else(|| EtlError::MissingCollection {
            field: FEATURES_FIELD.to_string(),
        })?;

        tracing::debug!("Located {} entries in '{}'", entries.len(), FEATURES_FIELD);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FeatureSource {
    type Item = RawEntry;
    type IntoIter = std::iter::Map<std::vec::IntoIter<Value>, fn(Value) -> RawEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter().map(RawEntry::new as fn(Value) -> RawEntry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locates_features_in_order() {
        let document = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"NAME": "A"}},
                {"properties": {"NAME": "B"}},
                {"properties": {"NAME": "C"}}
            ]
        });

        let source = FeatureSource::from_slice(document.to_string().as_bytes()).unwrap();
        assert_eq!(source.len(), 3);

        let names: Vec<String> = source
            .into_iter()
            .map(|entry| entry.property("NAME").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_features_is_fatal() {
        let document = json!({"type": "FeatureCollection"});
        let result = FeatureSource::from_slice(document.to_string().as_bytes());
        assert!(matches!(result, Err(EtlError::MissingCollection { .. })));
    }

    #[test]
    fn test_null_features_is_fatal() {
        let document = json!({"type": "FeatureCollection", "features": null});
        let result = FeatureSource::from_slice(document.to_string().as_bytes());
        assert!(matches!(result, Err(EtlError::MissingCollection { .. })));
    }

    #[test]
    fn test_empty_features_is_not_fatal() {
        let document = json!({"features": []});
        let source = FeatureSource::from_slice(document.to_string().as_bytes()).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let result = FeatureSource::from_slice(b"{not json");
        assert!(matches!(result, Err(EtlError::SerializationError(_))));
    }
}
