use crate::adapters::http::{BulkInsertClient, RemoteErrorPolicy};
use crate::core::{
    BatchSubmitter, EarthquakeRecord, EntryTransformer, RawEntry, Rejection, SubmitOutcome,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

pub const EARTHQUAKES_RESOURCE: &str = "earthquakes";

// MM/DD/YYYY
static US_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date pattern"));

// YYYY-MM-DDTHH:MM:SS[.fff]Z
static ISO_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z$").expect("valid timestamp pattern")
});

const REQUIRED_FIELDS: [&str; 6] = ["Latitude", "Longitude", "Date", "Time", "ID", "Magnitude"];

/// 地震資料：需要座標、日期時間、來源 ID 與規模；`Depth` 與 `Type` 為選填
#[derive(Debug, Clone, Copy, Default)]
pub struct EarthquakeTransformer;

impl EarthquakeTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl EntryTransformer for EarthquakeTransformer {
    type Output = EarthquakeRecord;

    fn name(&self) -> &'static str {
        "Earthquake Parser"
    }

    fn transform(&self, entry: &RawEntry) -> Result<EarthquakeRecord, Rejection> {
        if entry.as_object().is_none() {
            return Err(Rejection::NotAnObject);
        }

        if let Some(field) = REQUIRED_FIELDS
            .into_iter()
            .find(|field| entry.property(field).is_none())
        {
            return Err(Rejection::MissingField { field });
        }

        let date = required_str(entry, "Date")?;
        let date = normalize_date(date, entry.property("Time"))?;

        Ok(EarthquakeRecord {
            latitude: required_number(entry, "Latitude")?,
            longitude: required_number(entry, "Longitude")?,
            date,
            provider_id: provider_id(entry)?,
            magnitude: required_number(entry, "Magnitude")?,
            kind: optional_str(entry, "Type")?,
            depth: optional_number(entry, "Depth")?,
        })
    }
}

/// `MM/DD/YYYY` 搭配 `Time` 組成 `YYYY-MM-DDTHH:MM:SSZ`；已是 ISO-8601 的時間戳則原樣保留
pub fn normalize_date(date: &str, time: Option<&Value>) -> Result<String, Rejection> {
    if let Some(caps) = US_DATE.captures(date) {
        let time = match time {
            Some(Value::String(time)) => time,
            Some(other) => {
                return Err(Rejection::MalformedField {
                    field: "Time",
                    reason: format!("expected a string, found {}", other),
                })
            }
            None => return Err(Rejection::MissingField { field: "Time" }),
        };
        let (month, day, year) = (&caps[1], &caps[2], &caps[3]);
        return Ok(format!("{}-{}-{}T{}Z", year, month, day, time));
    }

    if ISO_TIMESTAMP.is_match(date) {
        return Ok(date.to_string());
    }

    Err(Rejection::UnrecognizedDateFormat {
        value: date.to_string(),
    })
}

fn required_str<'a>(entry: &'a RawEntry, field: &'static str) -> Result<&'a str, Rejection> {
    match entry.property(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(malformed(field, "a string", other)),
        None => Err(Rejection::MissingField { field }),
    }
}

fn required_number(entry: &RawEntry, field: &'static str) -> Result<Number, Rejection> {
    optional_number(entry, field)?.ok_or(Rejection::MissingField { field })
}

// 原樣保留數字（整數仍為整數）
fn optional_number(entry: &RawEntry, field: &'static str) -> Result<Option<Number>, Rejection> {
    match entry.property(field) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(other) => Err(malformed(field, "a number", other)),
    }
}

fn optional_str(entry: &RawEntry, field: &'static str) -> Result<Option<String>, Rejection> {
    match entry.property(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(malformed(field, "a string", other)),
    }
}

// ID 可能是字串或數字，一律轉成字串
fn provider_id(entry: &RawEntry) -> Result<String, Rejection> {
    match entry.property("ID") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(malformed("ID", "a string or number", other)),
        None => Err(Rejection::MissingField { field: "ID" }),
    }
}

fn malformed(field: &'static str, expected: &str, found: &Value) -> Rejection {
    Rejection::MalformedField {
        field,
        reason: format!("expected {}, found {}", expected, found),
    }
}

pub struct EarthquakeSubmitter {
    client: BulkInsertClient,
}

impl EarthquakeSubmitter {
    pub fn new(client: BulkInsertClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchSubmitter for EarthquakeSubmitter {
    type Record = EarthquakeRecord;

    async fn submit(&self, batch: &[EarthquakeRecord]) -> SubmitOutcome {
        self.client
            .post_batch(EARTHQUAKES_RESOURCE, batch, RemoteErrorPolicy::AnyPresent)
            .await
    }
}
