use clap::Parser;
use std::path::PathBuf;
use wsdot_traveler_info::utils::logger::{self, LogFormat};
use wsdot_traveler_info::{app, Dataset, DatasetReport, Result, TravelerInfoConfig};

#[derive(Parser, Debug)]
#[command(name = "traveler-info")]
#[command(about = "Prints flattened WSDOT Traveler Info records as JSON")]
struct Args {
    /// Dataset name, e.g. HighwayAlerts
    name: Option<String>,

    /// WSDOT Traffic API access code. Defaults to WSDOT_TRAFFIC_API_CODE or accesscode.txt
    access_code: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_logger(args.log_format, args.verbose);

    let Some(name) = args.name.as_deref() else {
        eprintln!("{}", app::dataset_usage());
        std::process::exit(1);
    };

    let result = run(&args, name).await;

    match result {
        Ok(report) => {
            tracing::info!("✅ Printed {} records of {}", report.record_count, report.dataset);
        }
        Err(e) => {
            app::report_failure(&e);
            std::process::exit(e.severity().exit_code());
        }
    }
}

async fn run(args: &Args, name: &str) -> Result<DatasetReport> {
    let dataset: Dataset = name.parse()?;
    let mut config = match &args.config {
        Some(path) => TravelerInfoConfig::from_file(path)?,
        None => TravelerInfoConfig::default(),
    };
    if let Some(code) = &args.access_code {
        config.auth.access_code = Some(code.clone());
    }
    tracing::debug!("Config: {:?}", config);

    app::print_dataset(&config, dataset).await
}
