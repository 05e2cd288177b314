pub mod country;
pub mod earthquake;

use crate::adapters::http::BulkInsertClient;
use crate::core::pipeline::BatchingPipeline;
use crate::core::{DataType, RunCounters, Storage};
use crate::utils::error::Result;
use country::{CountrySubmitter, CountryTransformer};
use earthquake::{EarthquakeSubmitter, EarthquakeTransformer};

/// 依資料類型選出對應的 Transformer + Submitter 組合
pub enum Uploader {
    Country(BatchingPipeline<CountryTransformer, CountrySubmitter>),
    Earthquake(BatchingPipeline<EarthquakeTransformer, EarthquakeSubmitter>),
}

impl Uploader {
    pub fn for_data_type(data_type: DataType, client: BulkInsertClient, buffer_size: usize) -> Self {
        match data_type {
            DataType::Country => Uploader::Country(BatchingPipeline::new(
                CountryTransformer::new(),
                CountrySubmitter::new(client),
                buffer_size,
            )),
            DataType::Earthquake => Uploader::Earthquake(BatchingPipeline::new(
                EarthquakeTransformer::new(),
                EarthquakeSubmitter::new(client),
                buffer_size,
            )),
        }
    }

    pub fn parser_name(&self) -> &'static str {
        match self {
            Uploader::Country(pipeline) => pipeline.transformer_name(),
            Uploader::Earthquake(pipeline) => pipeline.transformer_name(),
        }
    }

    pub async fn run<S: Storage>(&self, storage: &S, path: &str) -> Result<RunCounters> {
        match self {
            Uploader::Country(pipeline) => pipeline.run(storage, path).await,
            Uploader::Earthquake(pipeline) => pipeline.run(storage, path).await,
        }
    }
}
