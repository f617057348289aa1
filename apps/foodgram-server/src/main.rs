mod config;
mod logging;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgram::infra::fixtures;
use foodgram::{FoodgramModule, NewUser, Role};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Foodgram Server - recipes, shopping lists and subscriptions
#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram Server - recipes, shopping lists and subscriptions")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use a private in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Create a user account
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// Issue a new API token for an existing user and print it
    IssueToken {
        #[arg(long)]
        email: String,
    },
    /// Import tags from a JSON fixture file
    LoadTags { path: PathBuf },
    /// Import ingredients from a JSON fixture file
    LoadIngredients { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.mock);

    logging::init(&config.logging, cli.verbose);
    tracing::info!("Foodgram Server starting");

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
        Commands::CreateUser {
            email,
            username,
            first_name,
            last_name,
            admin,
        } => {
            let module = open_module(&config).await?;
            let user = module
                .services()
                .users
                .create_user(NewUser {
                    email,
                    username,
                    first_name,
                    last_name,
                    role: if admin { Role::Admin } else { Role::User },
                })
                .await?;
            println!("created user {} ({})", user.id, user.username);
            Ok(())
        }
        Commands::IssueToken { email } => {
            let module = open_module(&config).await?;
            let (_, token) = module.services().users.issue_token(&email).await?;
            println!("{token}");
            Ok(())
        }
        Commands::LoadTags { path } => {
            let module = open_module(&config).await?;
            let report = fixtures::load_tags(&module.services().catalog, &path).await?;
            println!("tags: {} created, {} already present", report.created, report.existing);
            Ok(())
        }
        Commands::LoadIngredients { path } => {
            let module = open_module(&config).await?;
            let report = fixtures::load_ingredients(&module.services().catalog, &path).await?;
            println!(
                "ingredients: {} created, {} already present",
                report.created, report.existing
            );
            Ok(())
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    print!("{}", config.to_yaml()?);
    Ok(())
}

/// Connect to the configured database and apply migrations.
async fn open_module(config: &AppConfig) -> Result<FoodgramModule> {
    let mut options = ConnectOptions::new(config.database.dsn.clone());
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("failed to connect to the database")?;

    let module = FoodgramModule::new(db, config.foodgram.clone());
    module.migrate().await?;
    Ok(module)
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing foodgram module...");
    let module = open_module(&config).await?;
    let router = server::with_http_layers(module.router());

    let cancel = CancellationToken::new();
    tokio::spawn(server::cancel_on_signal(cancel.clone()));

    server::serve(router, &config.server.bind_addr, cancel).await
}
