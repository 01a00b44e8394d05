use crate::adapters::archive::package_directory;
use crate::adapters::{FileTableWriter, HttpFetcher, LocalStorage, StdoutJsonWriter};
use crate::config::TravelerInfoConfig;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::TravelerInfoPipeline;
use crate::domain::model::{Dataset, DatasetReport};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CreateTablesSummary {
    pub reports: Vec<DatasetReport>,
    pub archive: Option<PathBuf>,
}

/// Fetches one dataset and prints its flattened records as JSON on stdout.
pub async fn print_dataset(config: &TravelerInfoConfig, dataset: Dataset) -> Result<DatasetReport> {
    config.validate()?;
    config.resolve_access_code()?;

    let fetcher = HttpFetcher::from_config(config)?;
    let pipeline = TravelerInfoPipeline::new(fetcher, StdoutJsonWriter, config.clone());
    EtlEngine::new(pipeline).run_dataset(dataset).await
}

/// Writes a table per configured dataset under the output path, then zips the
/// output directory unless compression is disabled.
pub async fn create_tables(config: &TravelerInfoConfig) -> Result<CreateTablesSummary> {
    config.validate()?;
    let datasets = config.datasets()?;
    let formats = config.table_formats()?;
    // Fail before touching the output directory
    config.resolve_access_code()?;

    let fetcher = HttpFetcher::from_config(config)?;
    let storage = LocalStorage::new(config.output_path());
    let writer = FileTableWriter::new(storage, formats);
    let pipeline = TravelerInfoPipeline::new(fetcher, writer, config.clone());

    let reports = EtlEngine::new(pipeline).run(&datasets).await?;

    let archive = if config.load.compress {
        tracing::info!("Compressing data in {}...", config.output_path());
        Some(package_directory(Path::new(config.output_path()))?)
    } else {
        None
    };

    Ok(CreateTablesSummary { reports, archive })
}

/// Usage text shown when `traveler-info` is run without a dataset name.
pub fn dataset_usage() -> String {
    let mut usage =
        String::from("You must provide the traffic api type as a parameter. Valid values are:");
    for name in Dataset::names() {
        usage.push_str("\n\t");
        usage.push_str(name);
    }
    usage
}

/// Logs a failure with its category and prints a user-facing message on stderr.
pub fn report_failure(e: &EtlError) {
    tracing::error!(
        "❌ Failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}
