//! Create an administrator profile in the configured PostgreSQL database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use profiles_api::domain::{Password, UserProfileManager};
use profiles_api::outbound::hashing::Argon2PasswordHasher;
use profiles_api::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_VAR: &str = "PROFILES_API_DATABASE_URL";
const PASSWORD_VAR: &str = "PROFILES_API_SUPERUSER_PASSWORD";

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff profile with every permission",
    version
)]
struct CliArgs {
    /// Login email; the domain part is lower-cased before storage.
    #[arg(long, value_name = "address")]
    email: String,
    /// Display name.
    #[arg(long, value_name = "name")]
    name: String,
    /// Plaintext password. Falls back to `PROFILES_API_SUPERUSER_PASSWORD`.
    #[arg(long, value_name = "secret")]
    password: Option<String>,
    /// Database connection URL. Falls back to `PROFILES_API_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // Logging is best effort for a one-shot command.
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args))
}

fn resolve(flag: Option<String>, var: &str) -> Option<String> {
    flag.or_else(|| env::var(var).ok())
        .filter(|value| !value.trim().is_empty())
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve(args.database_url, DATABASE_URL_VAR)
        .ok_or_else(|| eyre!("pass --database-url or set {DATABASE_URL_VAR}"))?;
    let password = resolve(args.password, PASSWORD_VAR)
        .map(Password::new)
        .ok_or_else(|| eyre!("pass --password or set {PASSWORD_VAR}"))?;

    run_pending_migrations(&database_url)
        .await
        .wrap_err("failed to apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("failed to connect to the database")?;
    let profiles = UserProfileManager::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
    );

    let user = profiles
        .create_superuser(&args.email, &args.name, &password)
        .await
        .wrap_err("failed to create superuser")?;
    info!(id = %user.id(), email = %user.email(), "superuser created");
    Ok(())
}
