use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::api::STARTGG_GRAPHQL_URL;
use crate::models::Session;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// start.gg GraphQL endpoint
    pub startgg_api_url: String,

    /// start.gg API token
    pub startgg_token: String,

    /// Event to show on the board
    pub event_id: Option<String>,

    /// Interval in seconds between board refreshes
    pub refresh_interval: u64,

    /// Deadline in seconds for a single fetch
    pub request_timeout: u64,

    /// Venue map saved by the map editor
    pub venue_layout_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            startgg_api_url: env::var("STARTGG_API_URL")
                .unwrap_or_else(|_| STARTGG_GRAPHQL_URL.to_string()),

            startgg_token: env::var("STARTGG_TOKEN").context("STARTGG_TOKEN must be set")?,

            event_id: env::var("STARTGG_EVENT_ID").ok().filter(|id| !id.is_empty()),

            refresh_interval: env::var("REFRESH_INTERVAL")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("REFRESH_INTERVAL must be a valid number")?,

            request_timeout: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("REQUEST_TIMEOUT must be a valid number")?,

            venue_layout_path: env::var("VENUE_LAYOUT_PATH")
                .unwrap_or_else(|_| "data/venue_layout.json".to_string())
                .into(),
        };

        if config.refresh_interval == 0 {
            anyhow::bail!("REFRESH_INTERVAL must be at least 1 second");
        }
        if config.request_timeout == 0 {
            anyhow::bail!("REQUEST_TIMEOUT must be at least 1 second");
        }

        Ok(config)
    }

    /// Session for the configured event
    pub fn session(&self) -> Result<Session> {
        let event_id = self
            .event_id
            .as_deref()
            .context("STARTGG_EVENT_ID must be set (run list_events to find it)")?;

        Ok(Session::new(&self.startgg_token, event_id))
    }
}
