use crate::adapters::http::{BulkInsertClient, RemoteErrorPolicy};
use crate::core::{
    BatchSubmitter, CountryRecord, EntryTransformer, Geometry, RawEntry, Rejection, SubmitOutcome,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const COUNTRIES_RESOURCE: &str = "countries";

/// 國界資料：需要 `properties.NAME` 與 `geometry`
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryTransformer;

impl CountryTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl EntryTransformer for CountryTransformer {
    type Output = CountryRecord;

    fn name(&self) -> &'static str {
        "Country Parser"
    }

    fn transform(&self, entry: &RawEntry) -> Result<CountryRecord, Rejection> {
        if entry.as_object().is_none() {
            return Err(Rejection::NotAnObject);
        }

        let name = match entry.property("NAME") {
            Some(Value::String(name)) => name.clone(),
            // 非字串的純量（數字、布林）轉成字串
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
            Some(other) => {
                return Err(Rejection::MalformedField {
                    field: "NAME",
                    reason: format!("expected a scalar, found {}", other),
                })
            }
            None => return Err(Rejection::MissingField { field: "NAME" }),
        };

        let geometry = entry
            .geometry()
            .ok_or(Rejection::MissingField { field: "geometry" })?;
        let geometry = parse_geometry(geometry)?;

        Ok(CountryRecord { name, geometry })
    }
}

fn parse_geometry(value: &Value) -> Result<Geometry, Rejection> {
    Geometry::deserialize(value).map_err(|e| Rejection::MalformedField {
        field: "geometry",
        reason: e.to_string(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountryRequest<'a> {
    request_id: String,
    name: &'a str,
    coordinates: &'a Value,
    shape_type: String,
}

impl<'a> From<&'a CountryRecord> for CountryRequest<'a> {
    fn from(record: &'a CountryRecord) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            name: &record.name,
            coordinates: &record.geometry.coordinates,
            shape_type: record.geometry.kind.to_uppercase(),
        }
    }
}

pub struct CountrySubmitter {
    client: BulkInsertClient,
}

impl CountrySubmitter {
    pub fn new(client: BulkInsertClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchSubmitter for CountrySubmitter {
    type Record = CountryRecord;

    async fn submit(&self, batch: &[CountryRecord]) -> SubmitOutcome {
        let requests: Vec<CountryRequest<'_>> = batch.iter().map(CountryRequest::from).collect();
        self.client
            .post_batch(COUNTRIES_RESOURCE, &requests, RemoteErrorPolicy::NonEmptyList)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SubmitFailure;
    use httpmock::prelude::*;
    use serde_json::json;

    fn country(name: &str, kind: &str) -> RawEntry {
        RawEntry::new(json!({
            "type": "Feature",
            "properties": {"NAME": name, "ISO_A3": "XXX"},
            "geometry": {"type": kind, "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
        }))
    }

    #[test]
    fn test_transform_well_formed_country() {
        let record = CountryTransformer::new()
            .transform(&country("France", "Polygon"))
            .unwrap();

        assert_eq!(record.name, "France");
        assert_eq!(record.geometry.kind, "Polygon");
        assert_eq!(record.geometry.coordinates[0][1], json!([1.0, 0.0]));
    }

    #[test]
    fn test_transform_rejects_missing_name() {
        let entry = RawEntry::new(json!({
            "properties": {"ISO_A3": "XXX"},
            "geometry": {"type": "Polygon", "coordinates": []}
        }));

        assert_eq!(
            CountryTransformer::new().transform(&entry),
            Err(Rejection::MissingField { field: "NAME" })
        );
    }

    #[test]
    fn test_transform_rejects_missing_properties() {
        let entry = RawEntry::new(json!({
            "geometry": {"type": "Polygon", "coordinates": []}
        }));

        assert_eq!(
            CountryTransformer::new().transform(&entry),
            Err(Rejection::MissingField { field: "NAME" })
        );
    }

    #[test]
    fn test_transform_rejects_missing_or_null_geometry() {
        let missing = RawEntry::new(json!({"properties": {"NAME": "France"}}));
        let null = RawEntry::new(json!({"properties": {"NAME": "France"}, "geometry": null}));

        for entry in [missing, null] {
            assert_eq!(
                CountryTransformer::new().transform(&entry),
                Err(Rejection::MissingField { field: "geometry" })
            );
        }
    }

    #[test]
    fn test_transform_rejects_geometry_without_coordinates() {
        let entry = RawEntry::new(json!({
            "properties": {"NAME": "France"},
            "geometry": {"type": "Polygon"}
        }));

        assert!(matches!(
            CountryTransformer::new().transform(&entry),
            Err(Rejection::MalformedField { field: "geometry", .. })
        ));
    }

    #[test]
    fn test_transform_accepts_scalar_name() {
        let entry = RawEntry::new(json!({
            "properties": {"NAME": 42},
            "geometry": {"type": "Polygon", "coordinates": []}
        }));

        let record = CountryTransformer::new().transform(&entry).unwrap();
        assert_eq!(record.name, "42");
        assert_eq!(record.geometry.kind, "Polygon");
    }

    #[test]
    fn test_transform_rejects_structured_name() {
        let entry = RawEntry::new(json!({
            "properties": {"NAME": {"en": "France"}},
            "geometry": {"type": "Polygon", "coordinates": []}
        }));

        assert!(matches!(
            CountryTransformer::new().transform(&entry),
            Err(Rejection::MalformedField { field: "NAME", .. })
        ));
    }

    #[test]
    fn test_request_payload_shape() {
        let record = CountryTransformer::new()
            .transform(&country("Chile", "MultiPolygon"))
            .unwrap();
        let request = serde_json::to_value(CountryRequest::from(&record)).unwrap();

        assert_eq!(request["name"], "Chile");
        assert_eq!(request["shapeType"], "MULTIPOLYGON");
        assert_eq!(request["coordinates"], record.geometry.coordinates);
        assert!(Uuid::parse_str(request["requestId"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let record = CountryTransformer::new()
            .transform(&country("Chile", "Polygon"))
            .unwrap();

        let first = CountryRequest::from(&record).request_id;
        let second = CountryRequest::from(&record).request_id;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_submit_posts_to_countries() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/countries")
                .body_contains("\"shapeType\":\"POLYGON\"")
                .body_contains("\"name\":\"France\"");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"errors": []}));
        });

        let transformer = CountryTransformer::new();
        let batch = vec![
            transformer.transform(&country("France", "Polygon")).unwrap(),
            transformer.transform(&country("Spain", "Polygon")).unwrap(),
        ];

        let client = BulkInsertClient::new(&server.base_url(), None).unwrap();
        let outcome = CountrySubmitter::new(client).submit(&batch).await;

        api_mock.assert();
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_submit_reports_remote_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/countries");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"errors": [{"requestId": "x", "message": "duplicate"}]}));
        });

        let batch = vec![CountryTransformer::new()
            .transform(&country("France", "Polygon"))
            .unwrap()];

        let client = BulkInsertClient::new(&server.base_url(), None).unwrap();
        let outcome = CountrySubmitter::new(client).submit(&batch).await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failure(SubmitFailure::RemoteErrors { count: 1 })
        ));
    }
}
