//! Connection settings.

use log::LevelFilter;
use sea_orm::ConnectOptions;
use serde::Deserialize;
use std::str::FromStr;

use crate::Error;

/// Settings used by [`database::connect`](crate::database::connect)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// sqlx connection string
    pub database_url: String,
    /// Upper bound of the connection pool; the driver default when unset
    pub max_connections: Option<u32>,
    /// Log every SQL statement
    pub sqlx_logging: bool,
    /// Level used for statement logs
    pub sqlx_logging_level: LevelFilter,
    /// Create missing tables on connect
    pub create_schema: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_owned(),
            max_connections: None,
            sqlx_logging: false,
            sqlx_logging_level: LevelFilter::Debug,
            create_schema: true,
        }
    }
}

impl StoreConfig {
    /// Read the configuration from the process environment.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `DATABASE_URL` | `database_url` |
    /// | `STOREFRONT_MAX_CONNECTIONS` | `max_connections` |
    /// | `STOREFRONT_SQLX_LOGGING` | `sqlx_logging` |
    /// | `STOREFRONT_SQLX_LOGGING_LEVEL` | `sqlx_logging_level` |
    /// | `STOREFRONT_CREATE_SCHEMA` | `create_schema` |
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(value) = lookup("STOREFRONT_MAX_CONNECTIONS") {
            config.max_connections = Some(parse("STOREFRONT_MAX_CONNECTIONS", value)?);
        }
        if let Some(value) = lookup("STOREFRONT_SQLX_LOGGING") {
            config.sqlx_logging = parse("STOREFRONT_SQLX_LOGGING", value)?;
        }
        if let Some(value) = lookup("STOREFRONT_SQLX_LOGGING_LEVEL") {
            config.sqlx_logging_level = parse("STOREFRONT_SQLX_LOGGING_LEVEL", value)?;
        }
        if let Some(value) = lookup("STOREFRONT_CREATE_SCHEMA") {
            config.create_schema = parse("STOREFRONT_CREATE_SCHEMA", value)?;
        }
        Ok(config)
    }

    /// SeaORM connection options for this configuration
    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.database_url.clone());
        opt.sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
        if let Some(max_connections) = self.max_connections {
            opt.max_connections(max_connections);
        }
        opt
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config { key, value })
}
