pub mod date_detector;
pub mod etl;
pub mod normalizer;
pub mod pipeline;

pub use crate::domain::model::{Dataset, DatasetReport, FlatRecord, FlatValue};
pub use crate::domain::ports::{ConfigProvider, Fetcher, Pipeline, Storage, TableWriter};
pub use crate::utils::error::Result;
