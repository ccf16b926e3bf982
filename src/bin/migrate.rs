//! Applies the embedded schema migrations to the configured database.

#[macro_use]
extern crate error_chain;
extern crate kitsu_store;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

use kitsu_store::errors::*;
use kitsu_store::{db, Config};
use tracing_subscriber::EnvFilter;

quick_main!(run);

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config)?;
    let conn = db::connection(&pool)?;
    db::run_migrations(&conn)?;
    info!("migrations complete");
    Ok(())
}
