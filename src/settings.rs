//! Store connection settings, read from `TYPESENSE_*` environment
//! variables.

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub api_key: String,
    pub port: u16,
    pub protocol: String,
    pub collection: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("port", 443)?
            .set_default("protocol", "https")?
            .set_default("collection", "people")?
            .add_source(Environment::with_prefix("TYPESENSE"))
            .build()?
            .try_deserialize()
            .context("invalid store settings (TYPESENSE_HOST and TYPESENSE_API_KEY are required)")
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_joins_protocol_host_port() {
        let settings = Settings {
            host: "search.example.com".into(),
            api_key: "k".into(),
            port: 8108,
            protocol: "http".into(),
            collection: "people".into(),
        };
        assert_eq!(settings.base_url(), "http://search.example.com:8108");
    }
}
