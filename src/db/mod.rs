use config::Config;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use errors::*;
use r2d2;
use r2d2::CustomizeConnection;
use r2d2_diesel::{self, ConnectionManager};
use std::ops::Deref;
use std::time::Duration;

pub mod schema;

embed_migrations!("migrations");

// An alias to the type for a pool of Diesel Postgres connections.
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub struct DbConnection(pub r2d2::PooledConnection<ConnectionManager<PgConnection>>);

// For the convenience of using an &DbConnection as an &PgConnection.
impl Deref for DbConnection {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Session settings applied once to every connection the pool opens.
#[derive(Debug)]
struct SessionSettings {
    statement_timeout: Option<Duration>,
}

impl CustomizeConnection<PgConnection, r2d2_diesel::Error> for SessionSettings {
    fn on_acquire(&self, conn: &mut PgConnection) -> ::std::result::Result<(), r2d2_diesel::Error> {
        if let Some(timeout) = self.statement_timeout {
            conn.batch_execute(&format!("SET statement_timeout = {}", timeout.as_millis()))
                .map_err(r2d2_diesel::Error::QueryError)?;
        }
        Ok(())
    }
}

/// Builds the bounded connection pool. The size is fixed for the life of
/// the pool.
pub fn init_pool(config: &Config) -> Result<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.clone());
    let settings = SessionSettings {
        statement_timeout: config.statement_timeout,
    };
    let pool = r2d2::Pool::builder()
        .max_size(config.connections)
        .connection_customizer(Box::new(settings))
        .build(manager)?;
    info!(
        connections = config.connections,
        statement_timeout_ms = ?config.statement_timeout.map(|t| t.as_millis()),
        "database pool ready"
    );
    Ok(pool)
}

/// Checks a connection out of the pool, blocking up to the pool's
/// connection timeout.
pub fn connection(pool: &Pool) -> Result<DbConnection> {
    match pool.get() {
        Ok(conn) => Ok(DbConnection(conn)),
        Err(e) => {
            warn!(error = %e, "no database connection available");
            Err(e.into())
        }
    }
}

/// Applies any pending schema migrations.
pub fn run_migrations(conn: &PgConnection) -> Result<()> {
    info!("running pending migrations");
    embedded_migrations::run(conn)?;
    debug!("schema is up to date");
    Ok(())
}
