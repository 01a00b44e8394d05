use crate::core::Pipeline;
use crate::domain::model::{Dataset, DatasetReport};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Processes the datasets one after another, stopping at the first failure.
    pub async fn run(&self, datasets: &[Dataset]) -> Result<Vec<DatasetReport>> {
        tracing::info!("Starting ETL process for {} dataset(s)", datasets.len());

        let mut reports = Vec::with_capacity(datasets.len());
        for &dataset in datasets {
            reports.push(self.run_dataset(dataset).await?);
        }

        let total: usize = reports.iter().map(|r| r.record_count).sum();
        tracing::info!("Processed {} records across {} dataset(s)", total, reports.len());
        Ok(reports)
    }

    pub async fn run_dataset(&self, dataset: Dataset) -> Result<DatasetReport> {
        tracing::info!("Extracting {}...", dataset);
        let raw = self.pipeline.extract(dataset).await?;

        tracing::debug!("Transforming {}...", dataset);
        let records = self.pipeline.transform(dataset, raw).await?;
        tracing::info!("Transformed {} records of {}", records.len(), dataset);

        let report = self.pipeline.load(dataset, records).await?;
        for output in &report.outputs {
            tracing::debug!("{} saved to {}", dataset, output);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FlatRecord;
    use crate::utils::error::EtlError;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        fail_on: Option<Dataset>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self, dataset: Dataset) -> Result<String> {
            self.calls.lock().await.push(format!("extract {}", dataset));
            if self.fail_on == Some(dataset) {
                return Err(EtlError::HttpStatus {
                    status: 500,
                    url: dataset.endpoint_path().to_string(),
                });
            }
            Ok(r#"[{"Id": 1}, {"Id": 2}]"#.to_string())
        }

        async fn transform(&self, dataset: Dataset, raw: String) -> Result<Vec<FlatRecord>> {
            self.calls.lock().await.push(format!("transform {}", dataset));
            crate::core::normalizer::parse_and_normalize(dataset, &raw)
        }

        async fn load(&self, dataset: Dataset, records: Vec<FlatRecord>) -> Result<DatasetReport> {
            self.calls.lock().await.push(format!("load {}", dataset));
            Ok(DatasetReport {
                dataset,
                record_count: records.len(),
                outputs: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_run_is_sequential_per_dataset() {
        let pipeline = RecordingPipeline::default();
        let calls = pipeline.calls.clone();
        let engine = EtlEngine::new(pipeline);

        let reports = engine
            .run(&[Dataset::HighwayAlerts, Dataset::TravelTimes])
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].record_count, 2);
        assert_eq!(
            *calls.lock().await,
            vec![
                "extract HighwayAlerts",
                "transform HighwayAlerts",
                "load HighwayAlerts",
                "extract TravelTimes",
                "transform TravelTimes",
                "load TravelTimes",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let pipeline = RecordingPipeline {
            fail_on: Some(Dataset::HighwayCameras),
            ..Default::default()
        };
        let calls = pipeline.calls.clone();
        let engine = EtlEngine::new(pipeline);

        let err = engine
            .run(&[
                Dataset::HighwayAlerts,
                Dataset::HighwayCameras,
                Dataset::TravelTimes,
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::HttpStatus { status: 500, .. }));
        let calls = calls.lock().await;
        assert_eq!(calls.last().map(String::as_str), Some("extract HighwayCameras"));
        assert!(!calls.iter().any(|c| c.contains("TravelTimes")));
    }
}
