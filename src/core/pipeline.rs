use crate::core::normalizer::parse_and_normalize;
use crate::core::{ConfigProvider, Fetcher, Pipeline, TableWriter};
use crate::domain::model::{Dataset, DatasetReport, FlatRecord};
use crate::utils::error::Result;

pub struct TravelerInfoPipeline<F: Fetcher, W: TableWriter, C: ConfigProvider> {
    fetcher: F,
    writer: W,
    config: C,
}

impl<F: Fetcher, W: TableWriter, C: ConfigProvider> TravelerInfoPipeline<F, W, C> {
    pub fn new(fetcher: F, writer: W, config: C) -> Self {
        Self {
            fetcher,
            writer,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher, W: TableWriter, C: ConfigProvider> Pipeline for TravelerInfoPipeline<F, W, C> {
    async fn extract(&self, dataset: Dataset) -> Result<String> {
        let access_code = self.config.resolve_access_code()?;
        self.fetcher.fetch(dataset, &access_code).await
    }

    async fn transform(&self, dataset: Dataset, raw: String) -> Result<Vec<FlatRecord>> {
        parse_and_normalize(dataset, &raw)
    }

    async fn load(&self, dataset: Dataset, records: Vec<FlatRecord>) -> Result<DatasetReport> {
        let outputs = self.writer.write_table(dataset, &records).await?;
        Ok(DatasetReport {
            dataset,
            record_count: records.len(),
            outputs,
        })
    }
}
