use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::{FetchError, FetchResult};
use crate::models::{BracketSnapshot, EventMeta, MatchSlot, MatchSnapshot, SetState};

pub const STARTGG_GRAPHQL_URL: &str = "https://api.start.gg/gql/alpha";

// Only the 100 most recently finished sets are pulled in for name resolution;
// prerequisites older than that stay unresolved.
const DASHBOARD_QUERY: &str = r#"
query GetTournamentData($eventId: ID!) {
  event(id: $eventId) {
    name
    tournament {
      name
      images {
        url
        type
      }
    }
    activeSets: sets(
      page: 1
      perPage: 300
      sortType: CALL_ORDER
      filters: { state: [1, 2, 4, 5, 6] }
    ) {
      nodes {
        id
        fullRoundText
        state
        startedAt
        station {
          id
          number
        }
        stream {
          streamName
        }
        phaseGroup {
          displayIdentifier
        }
        slots {
          id
          prereqId
          prereqPlacement
          entrant {
            name
          }
        }
      }
    }
    completedSets: sets(
      page: 1
      perPage: 100
      sortType: RECENT
      filters: { state: [3] }
    ) {
      nodes {
        id
        slots {
          entrant {
            name
          }
        }
      }
    }
  }
}
"#;

const TOURNAMENT_EVENTS_QUERY: &str = r#"
query GetEvents($slug: String!) {
  tournament(slug: $slug) {
    id
    name
    events {
      id
      name
      videogame {
        name
      }
    }
  }
}
"#;

/// Client for the start.gg GraphQL API
pub struct StartggClient {
    client: Client,
    api_url: String,
    token: String,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

/// start.gg ids arrive as numbers, or as strings for preview sets
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Int(i64),
    Str(String),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Int(n) => n.to_string(),
            IdValue::Str(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DashboardData {
    event: Option<EventNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventNode {
    name: Option<String>,
    tournament: Option<TournamentNode>,
    active_sets: Option<SetConnection>,
    completed_sets: Option<SetConnection>,
}

#[derive(Debug, Deserialize)]
struct TournamentNode {
    name: Option<String>,
    images: Option<Vec<ImageNode>>,
}

#[derive(Debug, Deserialize)]
struct ImageNode {
    url: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetConnection {
    nodes: Option<Vec<SetNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetNode {
    id: IdValue,
    full_round_text: Option<String>,
    state: Option<i64>,
    started_at: Option<i64>,
    station: Option<StationNode>,
    stream: Option<IgnoredAny>,
    phase_group: Option<PhaseGroupNode>,
    slots: Option<Vec<Option<SlotNode>>>,
}

#[derive(Debug, Deserialize)]
struct StationNode {
    number: Option<IdValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhaseGroupNode {
    display_identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotNode {
    prereq_id: Option<IdValue>,
    prereq_placement: Option<i64>,
    entrant: Option<EntrantNode>,
}

#[derive(Debug, Deserialize)]
struct EntrantNode {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TournamentEventsData {
    tournament: Option<TournamentEventsNode>,
}

#[derive(Debug, Deserialize)]
struct TournamentEventsNode {
    id: IdValue,
    name: Option<String>,
    events: Option<Vec<EventSummaryNode>>,
}

#[derive(Debug, Deserialize)]
struct EventSummaryNode {
    id: IdValue,
    name: Option<String>,
    videogame: Option<VideogameNode>,
}

#[derive(Debug, Deserialize)]
struct VideogameNode {
    name: Option<String>,
}

/// A tournament and the events it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentEvents {
    pub id: String,
    pub name: String,
    pub events: Vec<EventSummary>,
}

/// One bracket of a tournament, e.g. "Ultimate Singles"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub videogame: Option<String>,
}

impl StartggClient {
    /// Create a new start.gg client
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            token: token.to_string(),
        }
    }

    /// Fetch event header plus active and recently completed sets
    pub async fn fetch_dashboard(&self, event_id: &str) -> FetchResult<BracketSnapshot> {
        let response: GraphQLResponse<DashboardData> = self
            .post(DASHBOARD_QUERY, serde_json::json!({ "eventId": event_id }))
            .await?;

        let snapshot = dashboard_from_response(response)?;

        debug!(
            "Fetched event {}: {} active sets, {} completed sets",
            event_id,
            snapshot.active.len(),
            snapshot.completed.len()
        );

        Ok(snapshot)
    }

    /// Look up a tournament by slug and list its events
    pub async fn fetch_tournament_events(&self, slug: &str) -> FetchResult<TournamentEvents> {
        let response: GraphQLResponse<TournamentEventsData> = self
            .post(TOURNAMENT_EVENTS_QUERY, serde_json::json!({ "slug": slug }))
            .await?;

        tournament_events_from_response(response)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> FetchResult<GraphQLResponse<T>> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turn a GraphQL error list into a protocol error
fn check_errors<T>(response: &GraphQLResponse<T>) -> FetchResult<()> {
    match &response.errors {
        Some(errors) if !errors.is_empty() => {
            let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            warn!("start.gg GraphQL errors: {:?}", messages);
            Err(FetchError::protocol(messages.join("; ")))
        }
        _ => Ok(()),
    }
}

/// Decode a raw dashboard response body
pub fn decode_dashboard(body: &str) -> FetchResult<BracketSnapshot> {
    let response: GraphQLResponse<DashboardData> = serde_json::from_str(body)?;
    dashboard_from_response(response)
}

fn dashboard_from_response(response: GraphQLResponse<DashboardData>) -> FetchResult<BracketSnapshot> {
    check_errors(&response)?;

    let event = response
        .data
        .and_then(|d| d.event)
        .ok_or_else(|| FetchError::protocol("Response has no event"))?;

    let tournament = event
        .tournament
        .ok_or_else(|| FetchError::protocol("Event has no tournament"))?;

    let images = tournament.images.unwrap_or_default();
    let logo_url = images
        .iter()
        .find(|img| img.kind.as_deref() == Some("profile"))
        .or_else(|| images.first())
        .and_then(|img| img.url.clone());

    let meta = EventMeta {
        tournament_name: tournament.name.unwrap_or_default(),
        event_name: event.name.unwrap_or_default(),
        logo_url,
    };

    Ok(BracketSnapshot {
        meta,
        active: convert_sets(event.active_sets, None),
        completed: convert_sets(event.completed_sets, Some(SetState::Completed)),
    })
}

/// `fallback_state` covers the completed query, which does not select `state`
fn convert_sets(connection: Option<SetConnection>, fallback_state: Option<SetState>) -> Vec<MatchSnapshot> {
    connection
        .and_then(|c| c.nodes)
        .unwrap_or_default()
        .into_iter()
        .map(|node| convert_set(node, fallback_state))
        .collect()
}

fn convert_set(node: SetNode, fallback_state: Option<SetState>) -> MatchSnapshot {
    let state = match (node.state, fallback_state) {
        (Some(code), _) => SetState::from_code(code),
        (None, Some(state)) => state,
        (None, None) => SetState::Unknown(0),
    };

    let mut slots = node.slots.unwrap_or_default().into_iter();
    let first = convert_slot(slots.next().flatten());
    let second = convert_slot(slots.next().flatten());

    MatchSnapshot {
        id: node.id.into_string(),
        slots: [first, second],
        state,
        started_at: node.started_at,
        station: node
            .station
            .and_then(|s| s.number)
            .map(IdValue::into_string),
        is_stream: node.stream.is_some(),
        round_text: node.full_round_text,
        pool: node.phase_group.and_then(|p| p.display_identifier),
    }
}

fn convert_slot(slot: Option<SlotNode>) -> MatchSlot {
    match slot {
        Some(slot) => MatchSlot::from_parts(
            slot.entrant.and_then(|e| e.name),
            slot.prereq_id.map(IdValue::into_string),
            slot.prereq_placement,
        ),
        None => MatchSlot::Empty,
    }
}

fn tournament_events_from_response(
    response: GraphQLResponse<TournamentEventsData>,
) -> FetchResult<TournamentEvents> {
    if check_errors(&response).is_err() {
        return Err(FetchError::protocol("Tournament not found or invalid token"));
    }

    let tournament = response
        .data
        .and_then(|d| d.tournament)
        .ok_or_else(|| FetchError::protocol("Tournament not found or invalid token"))?;

    let events = tournament
        .events
        .unwrap_or_default()
        .into_iter()
        .map(|e| EventSummary {
            id: e.id.into_string(),
            name: e.name.unwrap_or_default(),
            videogame: e.videogame.and_then(|v| v.name),
        })
        .collect();

    Ok(TournamentEvents {
        id: tournament.id.into_string(),
        name: tournament.name.unwrap_or_default(),
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Placement;

    const DASHBOARD_BODY: &str = r#"{
        "data": {
            "event": {
                "name": "Ultimate Singles",
                "tournament": {
                    "name": "Genesis 9",
                    "images": [
                        {"url": "https://img/banner.png", "type": "banner"},
                        {"url": "https://img/profile.png", "type": "profile"}
                    ]
                },
                "activeSets": {
                    "nodes": [
                        {
                            "id": 11,
                            "fullRoundText": "Winners Semi-Final",
                            "state": 2,
                            "startedAt": 1700000000,
                            "station": {"id": 900, "number": 5},
                            "stream": null,
                            "phaseGroup": {"displayIdentifier": "A1"},
                            "slots": [
                                {"id": "s1", "prereqId": "10", "prereqPlacement": 1, "entrant": {"name": "Alice"}},
                                {"id": "s2", "prereqId": null, "prereqPlacement": null, "entrant": {"name": "Carol"}}
                            ]
                        },
                        {
                            "id": "preview_77_2",
                            "fullRoundText": "Losers Round 1",
                            "state": 5,
                            "startedAt": null,
                            "station": null,
                            "stream": {"streamName": "mainstage"},
                            "phaseGroup": null,
                            "slots": [
                                {"id": "s3", "prereqId": "preview_77_1", "prereqPlacement": 2, "entrant": null}
                            ]
                        }
                    ]
                },
                "completedSets": {
                    "nodes": [
                        {"id": 10, "slots": [{"entrant": {"name": "Alice"}}, {"entrant": {"name": "Bob"}}]}
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn test_decode_dashboard() {
        let snapshot = decode_dashboard(DASHBOARD_BODY).unwrap();

        assert_eq!(snapshot.meta.tournament_name, "Genesis 9");
        assert_eq!(snapshot.meta.event_name, "Ultimate Singles");
        assert_eq!(snapshot.meta.logo_url.as_deref(), Some("https://img/profile.png"));

        assert_eq!(snapshot.active.len(), 2);
        let playing = &snapshot.active[0];
        assert_eq!(playing.id, "11");
        assert_eq!(playing.state, SetState::InProgress);
        assert_eq!(playing.station.as_deref(), Some("5"));
        assert!(!playing.is_stream);
        assert_eq!(playing.pool.as_deref(), Some("A1"));
        assert_eq!(playing.slots[0], MatchSlot::Entrant("Alice".into()));

        let pending = &snapshot.active[1];
        assert_eq!(pending.id, "preview_77_2");
        assert!(pending.is_stream);
        assert_eq!(pending.station, None);
        assert_eq!(
            pending.slots[0],
            MatchSlot::Pending {
                prereq_id: "preview_77_1".into(),
                placement: Placement::Loser
            }
        );
        assert_eq!(pending.slots[1], MatchSlot::Empty);

        assert_eq!(snapshot.completed.len(), 1);
        assert_eq!(snapshot.completed[0].state, SetState::Completed);
        assert_eq!(snapshot.completed[0].entrant_names(), Some(("Alice", "Bob")));
    }

    #[test]
    fn test_logo_falls_back_to_first_image() {
        let body = r#"{"data": {"event": {"name": "E", "tournament": {"name": "T",
            "images": [{"url": "https://img/banner.png", "type": "banner"}]},
            "activeSets": {"nodes": []}, "completedSets": {"nodes": []}}}}"#;

        let snapshot = decode_dashboard(body).unwrap();

        assert_eq!(snapshot.meta.logo_url.as_deref(), Some("https://img/banner.png"));
        assert!(snapshot.active.is_empty());
    }

    #[test]
    fn test_blank_prereq_id_decodes_as_empty_slot() {
        let body = r#"{"data": {"event": {"name": "E", "tournament": {"name": "T"},
            "activeSets": {"nodes": [{"id": 5, "state": 1, "slots": [
                {"prereqId": "", "prereqPlacement": 1, "entrant": null},
                {"prereqId": null, "prereqPlacement": null, "entrant": {"name": "Bob"}}
            ]}]},
            "completedSets": {"nodes": []}}}}"#;

        let snapshot = decode_dashboard(body).unwrap();

        assert_eq!(snapshot.active[0].slots[0], MatchSlot::Empty);
    }

    #[test]
    fn test_graphql_errors_are_protocol_errors() {
        let body = r#"{"data": null, "errors": [{"message": "Invalid authentication token"}]}"#;

        match decode_dashboard(body) {
            Err(FetchError::Protocol(msg)) => assert!(msg.contains("Invalid authentication token")),
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_event_is_protocol_error() {
        let body = r#"{"data": {"event": null}}"#;
        assert!(matches!(decode_dashboard(body), Err(FetchError::Protocol(_))));
    }

    #[test]
    fn test_malformed_body_is_protocol_error() {
        assert!(matches!(decode_dashboard("<html>"), Err(FetchError::Protocol(_))));
    }

    #[test]
    fn test_tournament_events() {
        let body = r#"{"data": {"tournament": {"id": 5, "name": "Genesis 9", "events": [
            {"id": 101, "name": "Ultimate Singles", "videogame": {"name": "Super Smash Bros. Ultimate"}},
            {"id": 102, "name": "Melee Singles", "videogame": null}
        ]}}}"#;
        let response: GraphQLResponse<TournamentEventsData> = serde_json::from_str(body).unwrap();

        let tournament = tournament_events_from_response(response).unwrap();

        assert_eq!(tournament.id, "5");
        assert_eq!(tournament.events.len(), 2);
        assert_eq!(tournament.events[0].id, "101");
        assert_eq!(tournament.events[1].videogame, None);
    }

    #[test]
    fn test_unknown_tournament() {
        let body = r#"{"data": {"tournament": null}}"#;
        let response: GraphQLResponse<TournamentEventsData> = serde_json::from_str(body).unwrap();

        assert!(matches!(
            tournament_events_from_response(response),
            Err(FetchError::Protocol(_))
        ));
    }
}
