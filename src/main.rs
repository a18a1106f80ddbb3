use clap::Parser;
use http_load_test::cli::{run_compare, Cli, OutputFormat, RunArgs};
use http_load_test::driver::Driver;
use http_load_test::error::LoadTestError;
use http_load_test::logging;
use http_load_test::progress::{BarProgress, NoProgress, ProgressReporter};
use http_load_test::reporter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli {
        Cli::Run(args) => run_load_test(args).await,
        Cli::Compare { current, previous } => {
            logging::init(false);
            run_compare(&current, &previous)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_load_test(args: RunArgs) -> Result<(), LoadTestError> {
    logging::init(args.verbose);

    // Configuration problems stop us here, before any request is sent.
    let cfg = args.to_config()?;
    let driver = Driver::new(cfg)?;

    if args.format == OutputFormat::Text {
        let cfg = driver.config();
        println!("Starting load test against {}", cfg.target_url);
        println!("Total requests: {}", cfg.total_requests);
        println!("Concurrent requests: {}", cfg.concurrency);
    }

    let progress: Box<dyn ProgressReporter> = if args.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(BarProgress::new())
    };

    let report = driver.run(progress.as_ref()).await?;

    match args.format {
        OutputFormat::Text => reporter::display_summary(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(output_path) = args.output.as_deref() {
        reporter::write_json_result(&report, output_path).map_err(|e| {
            LoadTestError::ConfigError(format!("Failed to write result file: {}", e))
        })?;
    }

    Ok(())
}
