use dotenv::dotenv;
use errors::*;
use std::env;
use std::time::Duration;

/// r2d2's own default pool size.
pub const DEFAULT_CONNECTIONS: u32 = 10;
const DEFAULT_DB_PORT: &str = "5432";

/// Database settings, read once at process start and handed to
/// `db::init_pool`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub connections: u32,
    pub statement_timeout: Option<Duration>,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// `DATABASE_URL` wins; otherwise the URL is assembled from the
    /// `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME` parts.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let connections = match lookup("DB_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => bail!(ErrorKind::InvalidConfig("DB_CONNECTIONS", raw)),
            },
            None => DEFAULT_CONNECTIONS,
        };

        let statement_timeout = match lookup("DB_STATEMENT_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => bail!(ErrorKind::InvalidConfig("DB_STATEMENT_TIMEOUT_MS", raw)),
            },
            None => None,
        };

        Ok(Config {
            database_url,
            connections,
            statement_timeout,
        })
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST").ok_or(ErrorKind::MissingConfig("DATABASE_URL"))?;
    let port = lookup("DB_PORT").unwrap_or_else(|| DEFAULT_DB_PORT.to_owned());
    let name = lookup("DB_NAME").ok_or(ErrorKind::MissingConfig("DB_NAME"))?;
    let credentials = match (lookup("DB_USER"), lookup("DB_PASSWORD")) {
        (Some(user), Some(password)) => format!("{}:{}@", user, password),
        (Some(user), None) => format!("{}@", user),
        (None, _) => String::new(),
    };
    Ok(format!("postgres://{}{}:{}/{}", credentials, host, port, name))
}
