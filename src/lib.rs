pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{FileTableWriter, HttpFetcher, LocalStorage, StdoutJsonWriter, TableFormat};
pub use crate::config::TravelerInfoConfig;
pub use crate::core::{etl::EtlEngine, pipeline::TravelerInfoPipeline};
pub use crate::domain::model::{Dataset, DatasetReport, FlatRecord, FlatValue};
pub use crate::utils::error::{EtlError, Result};
