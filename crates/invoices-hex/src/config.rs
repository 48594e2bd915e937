use anyhow::Context;
use serde::Deserialize;
use std::env;

pub const DEFAULT_PORT: &str = "5000";

/// Service settings read from the environment.
///
/// `invoices_collection` is left unset unless `INVOICES_COLLECTION` is given;
/// the store then uses its own default (`invoices`). Data written by the
/// earlier Node service lives in `ibmmodels`, so set
/// `INVOICES_COLLECTION=ibmmodels` to serve it.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub mongo_url: String,
    pub mongo_database: Option<String>,
    pub invoices_collection: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongo_url = get("MONGO_URL")
            .or_else(|| get("MONGODB_URL"))
            .context("MONGO_URL not found in environment variables")?;

        let server_port = get("PORT").unwrap_or_else(|| DEFAULT_PORT.into());
        server_port
            .parse::<u16>()
            .with_context(|| format!("PORT must be a port number, got {server_port:?}"))?;

        Ok(Self {
            server_port,
            mongo_url,
            mongo_database: get("MONGO_DATABASE"),
            invoices_collection: get("INVOICES_COLLECTION"),
        })
    }
}
