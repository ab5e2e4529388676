use chrono::Local;
use cinder_deposit::config::deposit_config::DepositConfig;
use cinder_deposit::core::ingest::load_table;
use cinder_deposit::core::store::TableStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config/deposit.xml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a delimited file and store it in the database
    Put {
        #[arg(short, long)]
        lfp: Option<String>,
        #[arg(short, long)]
        table: Option<String>,
    },
    /// Print the mean measure per group, highest first
    Query {
        #[arg(short, long)]
        table: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let config = DepositConfig::from_xml_file(&args.config)?;

    let now = Local::now();
    println!("Time: {}", now.format("%Y-%m-%d %H:%M:%S"));

    match &args.command {
        Commands::Put { lfp, table } => {
            let path = lfp.clone().unwrap_or_else(|| config.dataset_path.clone());
            let table_name = table.clone().unwrap_or_else(|| config.database_table.clone());

            let loaded = load_table(&path, &config.column_mapping(), config.encoding()?)?;
            let mut store = TableStore::open(&config.database_path)?;
            let written = store.persist(&loaded, &table_name)?;
            println!("Stored {} rows from {} into '{}'.", written, path, table_name);
        }
        Commands::Query { table } => {
            let table_name = table.clone().unwrap_or_else(|| config.database_table.clone());
            let store = TableStore::open(&config.database_path)?;
            let averages = store.average_by_group(
                &table_name,
                &config.group_column,
                &config.measure_column,
            )?;

            println!("{:<16} {:>12}", config.group_column, "avg");
            for (key, average) in averages {
                println!("{:<16} {:>12.2}", key, average);
            }
        }
    }
    Ok(())
}
