/// Main entry point for the habit tracker
///
/// This file sets up logging, parses command line arguments and then either
/// opens the interactive menu or serves the dashboard API.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use habit_tracker::cli::Menu;
use habit_tracker::config::{self, DASHBOARD_FILE, HABITS_FILE};
use habit_tracker::dashboard::{server, AppState, DashboardState};
use habit_tracker::motivation::{GeminiClient, MotivationService, RetryPolicy};
use habit_tracker::{read_json_or_default, HabitTracker, JsonFileStorage};

/// Command line arguments for the habit tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the habits JSON file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard JSON API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,

        /// Path to the dashboard JSON file
        #[arg(long)]
        dashboard_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_tracker={}", log_level))
        .with_writer(std::io::stderr) // Keep stdout for the menu
        .init();

    match args.command {
        None => {
            let data_file = config::resolve_data_file(args.data_file, HABITS_FILE)?;
            info!("Using habit data at: {}", data_file.display());

            let tracker = HabitTracker::new(JsonFileStorage::new(data_file));
            let stdin = io::stdin();
            let mut menu = Menu::new(tracker, stdin.lock(), io::stdout());
            menu.run()?;
        }
        Some(Command::Serve { addr, dashboard_file }) => {
            let data_path = config::resolve_data_file(dashboard_file, DASHBOARD_FILE)?;
            info!("Using dashboard data at: {}", data_path.display());

            let data: DashboardState = read_json_or_default(&data_path);
            let generator = GeminiClient::new(config::gemini_config_from_env());
            let motivation = MotivationService::new(Box::new(generator), RetryPolicy::default());

            server::serve(addr, AppState::new(data_path, data, motivation)).await?;
        }
    }

    info!("Habit tracker shutdown complete");
    Ok(())
}
