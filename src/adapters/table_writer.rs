use crate::domain::model::{Dataset, FlatRecord};
use crate::domain::ports::{Storage, TableWriter};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Json,
}

impl TableFormat {
    pub const NAMES: &'static [&'static str] = &["csv", "tsv", "json"];

    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
            TableFormat::Json => "json",
        }
    }

    pub fn render(self, records: &[FlatRecord]) -> Result<Vec<u8>> {
        match self {
            TableFormat::Csv => render_delimited(records, b','),
            TableFormat::Tsv => render_delimited(records, b'\t'),
            TableFormat::Json => Ok(serde_json::to_vec_pretty(records)?),
        }
    }
}

impl FromStr for TableFormat {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(TableFormat::Csv),
            "tsv" => Ok(TableFormat::Tsv),
            "json" => Ok(TableFormat::Json),
            other => Err(EtlError::InvalidConfigValueError {
                field: "load.output_formats".to_string(),
                value: other.to_string(),
                reason: format!("Unsupported format. Valid formats: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

/// Column names of a table: the sorted union of every record's fields.
pub fn table_columns(records: &[FlatRecord]) -> Vec<&str> {
    let columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();
    columns.into_iter().collect()
}

fn render_delimited(records: &[FlatRecord], delimiter: u8) -> Result<Vec<u8>> {
    let columns = table_columns(records);
    if columns.is_empty() {
        if !records.is_empty() {
            tracing::warn!(
                "{} records have no fields; writing an empty delimited table",
                records.len()
            );
        }
        return Ok(Vec::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(
            columns
                .iter()
                .map(|c| record.get(c).map(|v| v.to_cell()).unwrap_or_default()),
        )?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Writes one file per format, named after the dataset (`HighwayAlerts.csv`).
pub struct FileTableWriter<S: Storage> {
    storage: S,
    formats: Vec<TableFormat>,
}

impl<S: Storage> FileTableWriter<S> {
    pub fn new(storage: S, formats: Vec<TableFormat>) -> Self {
        Self { storage, formats }
    }
}

#[async_trait]
impl<S: Storage> TableWriter for FileTableWriter<S> {
    async fn write_table(&self, dataset: Dataset, records: &[FlatRecord]) -> Result<Vec<String>> {
        let mut outputs = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let file_name = format!("{}.{}", dataset.name(), format.extension());
            let data = format.render(records)?;

            tracing::debug!(
                "Writing {} records of {} to {}",
                records.len(),
                dataset,
                file_name
            );
            self.storage.write_file(&file_name, &data).await?;
            outputs.push(self.storage.display_path(&file_name));
        }

        Ok(outputs)
    }
}

/// Prints the records as a pretty JSON array on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutJsonWriter;

#[async_trait]
impl TableWriter for StdoutJsonWriter {
    async fn write_table(&self, dataset: Dataset, records: &[FlatRecord]) -> Result<Vec<String>> {
        let json = serde_json::to_string_pretty(records)?;
        tracing::debug!("Printing {} records of {}", records.len(), dataset);
        println!("{}", json);
        Ok(vec!["<stdout>".to_string()])
    }
}
