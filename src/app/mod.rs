// Application layer: wires config, adapters and the ETL engine together for the binaries.

pub mod commands;

pub use commands::{create_tables, dataset_usage, print_dataset, report_failure, CreateTablesSummary};
