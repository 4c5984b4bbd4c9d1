use std::{env, str::FromStr};

use anyhow::bail;

/// Backend serving one resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Database,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" | "postgres" => Ok(StoreKind::Database),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            other => bail!("unknown store backend `{other}`, expected `database` or `memory`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub product_store: StoreKind,
    pub category_store: StoreKind,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let product_store = store_kind("PRODUCT_STORE")?;
        let category_store = store_kind("CATEGORY_STORE")?;

        let config = Self {
            database_url,
            host,
            port,
            product_store,
            category_store,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.uses_database() && self.database_url.is_none() {
            bail!("DATABASE_URL must be set when a store uses the database backend");
        }
        Ok(())
    }

    pub fn uses_database(&self) -> bool {
        self.product_store == StoreKind::Database || self.category_store == StoreKind::Database
    }
}

fn store_kind(key: &str) -> anyhow::Result<StoreKind> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(StoreKind::Database),
    }
}
