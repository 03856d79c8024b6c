use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DB: &str = "activities-db";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    /// Reads `.env`, then `ACTIVITIES_PORT`/`ACTIVITIES_DB`. A port given as the
    /// first CLI argument wins over the environment.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();
        let arg_port = env::args().nth(1);
        Self::from_sources(arg_port, env::var("ACTIVITIES_PORT").ok(), env::var("ACTIVITIES_DB").ok())
    }

    fn from_sources(arg_port: Option<String>, env_port: Option<String>, db: Option<String>) -> anyhow::Result<Self> {
        let port = match arg_port.or(env_port) {
            Some(p) => p.parse().with_context(|| format!("invalid port {p:?}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            port,
            db_path: PathBuf::from(db.unwrap_or_else(|| DEFAULT_DB.to_string())),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_port_wins_over_env() {
        let config = Config::from_sources(Some("8000".into()), Some("9000".into()), None).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB));
    }

    #[test]
    fn defaults_and_bad_port() {
        let config = Config::from_sources(None, None, Some("/tmp/acts".into())).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.db_path, PathBuf::from("/tmp/acts"));
        assert!(Config::from_sources(Some("eighty".into()), None, None).is_err());
    }
}
