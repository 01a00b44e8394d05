use clap::Parser;
use std::path::PathBuf;
use wsdot_traveler_info::app::{self, CreateTablesSummary};
use wsdot_traveler_info::utils::logger::{self, LogFormat};
use wsdot_traveler_info::{Result, TravelerInfoConfig};

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Creates tables using data from the WSDOT Traffic API")]
struct Args {
    /// Directory the tables are written to. Defaults to "./TravelerInfo"
    #[arg(long)]
    output_path: Option<String>,

    /// WSDOT Traffic API code. Defaults to WSDOT_TRAFFIC_API_CODE or accesscode.txt
    #[arg(short = 'c', long)]
    code: Option<String>,

    /// Output formats (csv, tsv, json), comma-separated
    #[arg(long, value_delimiter = ',')]
    format: Vec<String>,

    /// Skip packaging the output directory into a zip archive
    #[arg(long)]
    no_zip: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Datasets to download. Defaults to all of them
    names: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_logger(args.log_format, args.verbose);

    tracing::info!("🚀 Starting create-tables");

    match run(args).await {
        Ok(summary) => {
            for report in &summary.reports {
                println!("✅ {}: {} records", report.dataset, report.record_count);
                for output in &report.outputs {
                    println!("   📁 {}", output);
                }
            }
            if let Some(archive) = &summary.archive {
                println!("📦 Archive saved to: {}", archive.display());
            }
        }
        Err(e) => {
            app::report_failure(&e);
            std::process::exit(e.severity().exit_code());
        }
    }
}

async fn run(args: Args) -> Result<CreateTablesSummary> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            TravelerInfoConfig::from_file(path)?
        }
        None => TravelerInfoConfig::default(),
    };

    if let Some(output_path) = args.output_path {
        config.load.output_path = output_path;
    }
    if let Some(code) = args.code {
        config.auth.access_code = Some(code);
    }
    if !args.format.is_empty() {
        config.load.output_formats = args.format;
    }
    if args.no_zip {
        config.load.compress = false;
    }
    if !args.names.is_empty() {
        config.load.datasets = Some(args.names);
    }
    tracing::debug!("Config: {:?}", config);

    app::create_tables(&config).await
}
