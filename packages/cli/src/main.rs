// ABOUTME: Procura binary entry point
// ABOUTME: `procura serve` runs the API server; `procura seed-admin` bootstraps the first admin

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod seed;
mod server;

use config::Config;

#[derive(Parser)]
#[command(name = "procura", about = "Vendor management and RFP administration backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve,
    /// Create a staff user directly in the database. Admin registration over
    /// the API requires an existing admin, so the first one is seeded here.
    SeedAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve => server::run(config).await,
        Command::SeedAdmin {
            username,
            email,
            password,
            first_name,
            last_name,
        } => seed::seed_admin(&config, username, email, password, first_name, last_name).await,
    }
}
