use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use ::http::HeaderValue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// `ENV=production`: serve the built client from `static_dir`.
    pub production: bool,
    pub static_dir: PathBuf,
    pub cors_origin: HeaderValue,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(key).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| {
            let name = get("DB_NAME").unwrap_or_else(|| "todos".to_string());
            format!("sqlite://{name}.db")
        });

        let host_str = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let host = host_str.parse::<IpAddr>().map_err(|_| ConfigError::InvalidHost(host_str))?;

        let port = get("PORT").unwrap_or_else(|| "5000".to_string()).parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let production = get("ENV").is_some_and(|v| v == "production");
        let static_dir = PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| "./client/dist".to_string()));

        let origin = get("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());
        let cors_origin = HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidCorsOrigin(origin))?;

        Ok(Config { database_url, host, port, production, static_dir, cors_origin })
    }

    pub fn addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]).unwrap();
        assert_eq!(c.database_url, "sqlite://todos.db");
        assert_eq!(c.addr().to_string(), "0.0.0.0:5000");
        assert!(!c.production);
        assert_eq!(c.static_dir, PathBuf::from("./client/dist"));
        assert_eq!(c.cors_origin, "http://localhost:5173");
    }

    #[test]
    fn database_url_wins_over_db_name() {
        assert_eq!(config(&[("DB_NAME", "golang_db")]).unwrap().database_url, "sqlite://golang_db.db");
        let c = config(&[("DB_NAME", "ignored"), ("DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(c.database_url, "sqlite::memory:");
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        assert_eq!(config(&[("PORT", "")]).unwrap().port, 5000);
    }

    #[test]
    fn only_production_enables_static_assets() {
        assert!(config(&[("ENV", "production")]).unwrap().production);
        assert!(!config(&[("ENV", "development")]).unwrap().production);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(matches!(config(&[("PORT", "http")]), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(config(&[("PORT", "0")]), Err(ConfigError::PortOutOfRange(0))));
        assert!(matches!(config(&[("PORT", "70000")]), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn rejects_bad_host() {
        assert!(matches!(config(&[("HOST", "localhost")]), Err(ConfigError::InvalidHost(_))));
    }
}
