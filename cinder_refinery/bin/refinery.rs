use chrono::Local;
use cinder_deposit::config::deposit_config::DepositConfig;
use cinder_refinery::config::refinery_config::RefineryConfig;
use cinder_refinery::framework::errors::CinderRefineryError;
use cinder_refinery::framework::refinery::Refinery;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the grouped mean pipeline over a dataset
    Submit {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        workers: Option<usize>,
        #[arg(long, default_value = "config/refinery.xml")]
        config: String,
        #[arg(long, default_value = "config/deposit.xml")]
        deposit_config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // add logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    match &args.command {
        Commands::Submit {
            input,
            workers,
            config,
            deposit_config,
        } => {
            let refinery_config = RefineryConfig::from_xml_file(config)?;
            let mut deposit = DepositConfig::from_xml_file(deposit_config)?;
            if let Some(input) = input {
                deposit.dataset_path = input.clone();
            }

            let mut refinery = Refinery::new(refinery_config)?;
            if let Some(workers) = workers {
                refinery = refinery.with_workers(*workers)?;
            }

            let now = Local::now();
            println!("Time: {}", now.format("%Y-%m-%d %H:%M:%S"));
            println!("Workers: {}", refinery.worker_count());

            let report = match refinery.run_pipeline(&deposit).await {
                Ok(report) => report,
                Err(err) => {
                    if let CinderRefineryError::StageFailed(stage, cause) = &err {
                        error!("Refinery Error in {} stage: {}", stage, cause);
                    }
                    return Err(err.into());
                }
            };

            println!(
                "\nAverage {} per {} (map/reduce, {} rows):",
                deposit.measure_column, deposit.group_column, report.rows
            );
            for (key, mean) in report.mapreduce.ranked() {
                println!("{}: {:.2}", key, mean);
            }

            let top_n = refinery.config.report_top_n;
            println!("\nTop {} by average {}:", top_n, deposit.measure_column);
            for (key, mean) in report.reference.top(top_n) {
                println!("{:<16} {:>12.2}", key, mean);
            }

            println!("\nAverage {} by {} (SQL query):", deposit.measure_column, deposit.group_column);
            for (key, mean) in &report.query {
                println!("{:<16} {:>12.2}", key, mean);
            }

            println!("\nCompleted in {:?}", report.elapsed);
        }
    }

    Ok(())
}
