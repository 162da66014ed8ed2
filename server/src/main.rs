use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{EmployeeRepository, EmployeeService, SeaOrmEmployeeRepository};
use server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
    seed,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "employee-server", version, about = "Employee directory REST service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo employees.
    Seed(SeedCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

#[derive(Args, Debug)]
struct SeedCommand {
    #[arg(long, help = "Delete every employee before seeding")]
    reset: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
        },
        Command::Seed(cmd) => run_seed(cmd).await,
    }
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env()?;
    connect(&settings).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let pool = setup_pool().await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let repo = Arc::new(SeaOrmEmployeeRepository::new(pool.clone()));
    let state = AppState::new(EmployeeService::new(repo), config).with_pool(pool);
    http::serve((&cmd).into(), state).await
}

async fn run_seed(cmd: SeedCommand) -> Result<()> {
    let pool = setup_pool().await?;
    ensure_migrations(&pool, false).await?;
    let repo = Arc::new(SeaOrmEmployeeRepository::new(pool));
    if cmd.reset {
        let removed = repo.delete_all().await?;
        info!(removed, "cleared employee table");
    }
    let report = seed::seed_demo(&EmployeeService::new(repo)).await?;
    info!(
        created = report.created,
        skipped = report.skipped,
        "seed finished"
    );
    Ok(())
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
