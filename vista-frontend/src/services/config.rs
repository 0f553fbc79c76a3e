//! Load the deployment configuration
use gloo_net::http::Request;
use thiserror::Error;
use tracing::{debug, warn};
use vista_common::config::{Config, ConfigError};

const CONFIG_URL: &str = "./config.json";

#[derive(Error, Debug)]
enum LoadError {
    #[error("{0}")]
    Http(#[from] gloo_net::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

async fn fetch() -> Result<Config, LoadError> {
    let response = Request::get(CONFIG_URL).send().await?;
    if !response.ok() {
        return Err(LoadError::Status(response.status()));
    }
    let text = response.text().await?;
    Ok(Config::from_json(&text)?)
}

/// Fetch `config.json`, using the defaults if it is missing or invalid.
pub async fn load() -> Config {
    match fetch().await {
        Ok(config) => {
            debug!("Loaded config: {config:?}");
            config
        }
        Err(err) => {
            warn!("Using default config: {err}");
            Config::default()
        }
    }
}
