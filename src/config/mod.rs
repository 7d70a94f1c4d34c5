mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from the optional YAML file and the process environment.
pub async fn load() -> Result<Config> {
    let lookup = |key: &str| env::var(key).ok();
    match env::var("CONFIG_PATH") {
        Ok(path) => load_from(&path, true, lookup).await,
        Err(_) => load_from(DEFAULT_CONFIG_PATH, false, lookup).await,
    }
}

/// Reads the YAML file at `config_path` (when present) and applies variables
/// resolved through `lookup`. A missing file is an error only when `required`.
pub async fn load_from<F>(config_path: &str, required: bool, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let file_contents = if Path::new(config_path).exists() {
        debug!("Loading configuration from: {}", config_path);
        Some(tokio::fs::read_to_string(config_path).await?)
    } else if required {
        return Err(Error::config(format!(
            "Configuration file not found: {}",
            config_path
        )));
    } else {
        debug!("No configuration file, using environment only");
        None
    };

    Config::from_sources(file_contents.as_deref(), lookup)
}

impl Config {
    /// Builds a config from YAML text (if any) and then applies variables
    /// resolved through `lookup`.
    pub fn from_sources<F>(yaml: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match yaml {
            Some(text) if !text.trim().is_empty() => serde_yaml::from_str(text)?,
            _ => Config::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("N8N_WEBHOOK_URL") {
            self.webhook.url = Some(url);
        }
        if let Some(secret) = lookup("N8N_WEBHOOK_SECRET") {
            self.webhook.secret = secret;
        }
        if let Some(secret) = lookup("N8N_CALLBACK_SECRET") {
            self.webhook.callback_secret = secret;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
        }

        // An empty URL can't be forwarded to, so it counts as unset.
        if self.webhook.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.webhook.url = None;
        }

        Ok(())
    }
}
