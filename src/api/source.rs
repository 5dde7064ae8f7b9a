use async_trait::async_trait;

use crate::api::{FetchResult, StartggClient};
use crate::models::{BracketSnapshot, Session};

/// Anything that can produce a bracket snapshot for the refresh scheduler
#[async_trait]
pub trait BracketSource: Send + Sync {
    async fn fetch_board(&self) -> FetchResult<BracketSnapshot>;
}

/// The live start.gg feed for one session's event
pub struct EventFeed {
    client: StartggClient,
    event_id: String,
}

impl EventFeed {
    pub fn new(api_url: &str, session: &Session) -> Self {
        Self {
            client: StartggClient::new(api_url, session.token()),
            event_id: session.event_id().to_string(),
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

#[async_trait]
impl BracketSource for EventFeed {
    async fn fetch_board(&self) -> FetchResult<BracketSnapshot> {
        self.client.fetch_dashboard(&self.event_id).await
    }
}
