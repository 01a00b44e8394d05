use crate::domain::model::{Dataset, DatasetReport, FlatRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location of `path` as seen by a user, for reporting.
    fn display_path(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
    fn resolve_access_code(&self) -> Result<String>;
}

/// Downloads the raw JSON body of a dataset.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, dataset: Dataset, access_code: &str) -> Result<String>;
}

/// Persists the flattened records of a dataset, returning the written locations.
#[async_trait]
pub trait TableWriter: Send + Sync {
    async fn write_table(&self, dataset: Dataset, records: &[FlatRecord]) -> Result<Vec<String>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, dataset: Dataset) -> Result<String>;
    async fn transform(&self, dataset: Dataset, raw: String) -> Result<Vec<FlatRecord>>;
    async fn load(&self, dataset: Dataset, records: Vec<FlatRecord>) -> Result<DatasetReport>;
}
