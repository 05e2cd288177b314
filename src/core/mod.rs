pub mod pipeline;
pub mod runner;
pub mod source;

pub use crate::domain::model::{
    CountryRecord, DataType, EarthquakeRecord, Geometry, RawEntry, Rejection, RunCounters,
    SubmitFailure, SubmitOutcome,
};
pub use crate::domain::ports::{BatchSubmitter, ConfigProvider, EntryTransformer, Storage};
pub use crate::utils::error::Result;
