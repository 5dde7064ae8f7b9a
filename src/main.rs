use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bracket_board::api::EventFeed;
use bracket_board::config::Config;
use bracket_board::matching::{BoardCycle, StationOccupancy};
use bracket_board::models::{DisplayMatch, SchedulerStatus, VenueLayout};
use bracket_board::workers::{ElapsedClocks, RefreshScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bracket_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting bracket-board");

    // Load configuration
    let config = Config::from_env()?;
    let session = config.session()?;
    info!("Configuration loaded for {:?}", session);

    let layout = load_venue_layout(&config.venue_layout_path)?;

    let feed = EventFeed::new(&config.startgg_api_url, &session);
    info!("Watching event {}", feed.event_id());

    // Everything below hangs off this token; cancelling it stops every timer
    let shutdown = CancellationToken::new();

    let scheduler = RefreshScheduler::new(
        Arc::new(feed),
        config.refresh_interval,
        config.request_timeout,
    )
    .spawn(shutdown.child_token());

    let mut cycles = scheduler.cycles();
    let status = scheduler.status();
    let mut clocks = ElapsedClocks::new(shutdown.child_token());
    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    info!("Board running. Enter 'r' to refresh now, 'q' to quit");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            changed = cycles.changed() => {
                if changed.is_err() {
                    error!("Refresh scheduler exited unexpectedly");
                    break;
                }
                let cycle = cycles.borrow_and_update().clone();
                if let Some(cycle) = cycle {
                    clocks.sync(cycle.on_station());
                    render(&cycle, &layout, &clocks, &status.borrow());
                }
            }
            line = commands.next_line(), if stdin_open => {
                match line {
                    Ok(Some(cmd)) => match cmd.trim() {
                        "r" => {
                            if status.borrow().in_flight {
                                info!("Fetch in progress, refresh ignored");
                            } else if !scheduler.refresh_now() {
                                info!("Refresh already queued");
                            }
                        }
                        "q" => break,
                        "" => {}
                        other => warn!("Unknown command: {}", other),
                    },
                    // stdin closed; keep running until Ctrl-C
                    Ok(None) => stdin_open = false,
                    Err(e) => warn!("Failed to read command: {}", e),
                }
            }
        }
    }

    shutdown.cancel();
    scheduler.shutdown().await;
    drop(clocks);

    info!("Shutting down bracket-board");
    Ok(())
}

/// Load the venue layout from JSON file or use an empty map
fn load_venue_layout(path: &Path) -> Result<VenueLayout> {
    if path.exists() {
        VenueLayout::load_from_file(path)
    } else {
        info!("No venue layout file found, station map disabled");
        Ok(VenueLayout::default())
    }
}

fn render(cycle: &BoardCycle, layout: &VenueLayout, clocks: &ElapsedClocks, status: &SchedulerStatus) {
    println!();
    println!(
        "== {} // {} == cycle {} (next refresh in {}s)",
        cycle.meta.tournament_name.to_uppercase(),
        cycle.meta.event_name,
        cycle.sequence,
        status.seconds_to_refresh
    );

    if cycle.is_idle() {
        println!("NO ACTIVE MATCHES... STANDBY");
    }

    if !cycle.called.is_empty() {
        println!("-- CALLED TO STATION (REPORT)");
        for m in &cycle.called {
            println!("{}", station_line(m, clocks));
        }
    }

    if !cycle.playing.is_empty() {
        println!("-- ENGAGED / IN-PROGRESS");
        for m in &cycle.playing {
            println!("{}", station_line(m, clocks));
        }
    }

    println!("-- UPCOMING");
    if cycle.upcoming.is_empty() {
        println!("WAITING FOR QUEUE...");
    }
    for (idx, m) in cycle.upcoming.iter().enumerate() {
        println!("#{:<3} {} vs {}  [Pool {}]", idx + 1, m.p1, m.p2, m.round);
    }

    if !layout.is_empty() {
        let (view, _) = cycle.occupancy.restricted_to(layout);
        let cells: Vec<String> = layout
            .station_ids()
            .into_iter()
            .map(|id| map_cell(id, &view))
            .collect();
        println!("-- MAP  {}", cells.join(" "));
    }
}

/// `[5*]` playing, `[5!]` called, `[5]` free
fn map_cell(id: &str, view: &StationOccupancy) -> String {
    if view.is_playing(id) {
        format!("[{}*]", id)
    } else if view.is_called(id) {
        format!("[{}!]", id)
    } else {
        format!("[{}]", id)
    }
}

fn station_line(m: &DisplayMatch, clocks: &ElapsedClocks) -> String {
    let kind = if m.is_stream { "STREAM" } else { "SETUP" };
    let station = m.station_label().unwrap_or_else(|| "-".to_string());
    let clock = clocks.display(&m.id).unwrap_or_else(|| "00:00".to_string());

    format!(
        "{:>6} {:>4}  {} vs {}  [Pool {}]  {}",
        kind, station, m.p1, m.p2, m.round, clock
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_map_cell_marks() {
        let view = StationOccupancy {
            playing: BTreeSet::from(["1".to_string()]),
            called: BTreeSet::from(["2".to_string()]),
        };

        assert_eq!(map_cell("1", &view), "[1*]");
        assert_eq!(map_cell("2", &view), "[2!]");
        assert_eq!(map_cell("3", &view), "[3]");
    }
}
