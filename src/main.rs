//! Titanic CLI - passenger API server and query commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use titanic::config::{self, Overrides};
use titanic::service::PassengerService;
use titanic::ui::{self, Icons};
use titanic::{server, storage};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "titanic")]
#[command(version)]
#[command(about = "Read-only query service over the Titanic passenger dataset")]
#[command(long_about = r#"
Serves and queries the Titanic passenger dataset from a CSV file or a
SQLite database.

Example usage:
  titanic --store-type csv --store-path data/titanic.csv serve --port 8080
  titanic get 2 --attributes "id,name, age"
  titanic histogram
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store backend (csv or sqlite)
    #[arg(long, global = true)]
    store_type: Option<String>,

    /// Path to the CSV file or SQLite database
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show one passenger
    Get {
        /// Passenger ID
        id: String,

        /// Comma separated attributes to show (default: all)
        #[arg(short, long, default_value = "")]
        attributes: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show all passengers
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the fare percentile histogram
    Histogram {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let port = match &cli.command {
        Commands::Serve { port } => *port,
        _ => None,
    };
    let file = config::load_config(cli.config.as_deref())?;
    let settings = config::resolve(
        file,
        Overrides {
            port,
            store_type: cli.store_type.clone(),
            store_path: cli.store_path.clone(),
        },
    )?;

    let service = PassengerService::new(storage::open_store(settings.store_type, &settings.store_path));

    match cli.command {
        Commands::Serve { .. } => {
            ui::title(Icons::SHIP, &format!("Serving passengers on port {}", settings.port));
            ui::store_line(settings.store_type, &settings.store_path);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::start_server(settings.port, service))?;
        }

        Commands::Get { id, attributes, json } => {
            let (passenger, filter) = service.lookup(&id, &attributes)?;
            let projection = filter.apply(&passenger);

            if json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                ui::title(Icons::PERSON, &format!("Passenger {}", passenger.passenger_id));
                println!("{}", ui::record_table(&projection));
            }
        }

        Commands::List { json } => {
            let passengers = service.get_all()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&passengers)?);
            } else if passengers.is_empty() {
                ui::notice("No passengers in store.");
            } else {
                ui::title(Icons::DATABASE, &format!("{} passengers", passengers.len()));
                println!("{}", ui::passenger_table(&passengers));
            }
        }

        Commands::Histogram { json } => {
            let histogram = service.fare_histogram()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&histogram)?);
            } else if histogram.entries.is_empty() {
                ui::notice("No fares to bucket.");
            } else {
                ui::title(Icons::STATS, "Fare percentile histogram");
                println!("{}", ui::histogram_table(&histogram));
                for bar in ui::band_bars(&histogram) {
                    println!("  {}", bar);
                }
                ui::bucketed(histogram.total());
            }
        }
    }

    Ok(())
}
