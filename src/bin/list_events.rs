use std::env;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bracket_board::api::{StartggClient, STARTGG_GRAPHQL_URL};

const SLUG_PREFIX: &str = "tournament/";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "list_events=info,bracket_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let slug = parse_slug(&args).context("Usage: list_events <tournament-slug>")?;

    dotenvy::dotenv().ok();
    let token = env::var("STARTGG_TOKEN").context("STARTGG_TOKEN must be set")?;
    let api_url =
        env::var("STARTGG_API_URL").unwrap_or_else(|_| STARTGG_GRAPHQL_URL.to_string());

    info!("Looking up tournament {}", slug);

    let client = StartggClient::new(&api_url, &token);
    let tournament = client.fetch_tournament_events(&slug).await?;

    println!("{} (id {})", tournament.name, tournament.id);
    for event in &tournament.events {
        println!(
            "  {:>10}  {}  [{}]",
            event.id,
            event.name,
            event.videogame.as_deref().unwrap_or("-")
        );
    }

    info!(
        "Found {} events; set STARTGG_EVENT_ID to one of the ids above",
        tournament.events.len()
    );

    Ok(())
}

/// Accepts "genesis-9", "tournament/genesis-9" or a full start.gg URL
fn parse_slug(args: &[String]) -> Option<String> {
    let raw = args.get(1)?.trim().trim_end_matches('/');

    let slug = match raw.find(SLUG_PREFIX) {
        Some(pos) => &raw[pos + SLUG_PREFIX.len()..],
        None => raw,
    };
    let slug = slug.split('/').next().unwrap_or(slug);

    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(slug: &str) -> Vec<String> {
        vec!["list_events".to_string(), slug.to_string()]
    }

    #[test]
    fn test_parse_slug() {
        assert_eq!(parse_slug(&args("genesis-9")).as_deref(), Some("genesis-9"));
        assert_eq!(parse_slug(&args("tournament/genesis-9")).as_deref(), Some("genesis-9"));
        assert_eq!(
            parse_slug(&args("https://www.start.gg/tournament/genesis-9/events")).as_deref(),
            Some("genesis-9")
        );
        assert_eq!(parse_slug(&args("  ")), None);
        assert_eq!(parse_slug(&["list_events".to_string()]), None);
    }
}
