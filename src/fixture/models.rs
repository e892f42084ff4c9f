use chrono::NaiveDate;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::shared::EntityId;
use crate::stats::StatKind;

/// Stored fixture record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fixture {
    pub id: EntityId,
    pub date: NaiveDate,
    pub home_team: String, // Team names, not ids
    pub away_team: String,
    /// Scores are opaque text (e.g. "3", "abandoned", "w/o")
    pub home_score: String,
    pub away_score: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub man_of_the_match: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub events: EventLogs,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Append-only record of who triggered one kind of stat event.
///
/// Ids and name snapshots are only ever pushed together, so both sequences
/// always have the same length and line up index for index. Names are the
/// player's name at event time and are never rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    player_ids: Vec<EntityId>,
    player_names: Vec<String>,
}

impl EventLog {
    pub fn push(&mut self, player_id: EntityId, player_name: String) {
        self.player_ids.push(player_id);
        self.player_names.push(player_name);
    }

    pub fn len(&self) -> usize {
        self.player_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.player_ids.is_empty()
    }

    pub fn player_ids(&self) -> &[EntityId] {
        &self.player_ids
    }

    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    /// Number of entries recorded for the given player
    pub fn occurrences(&self, player_id: &EntityId) -> u64 {
        self.player_ids.iter().filter(|id| *id == player_id).count() as u64
    }
}

/// Per-kind event logs of a fixture.
///
/// Serializes flat: for each recorded kind `<kind>` holds the player ids and
/// `<kind>_names` the name snapshots. Kinds with no events are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLogs(BTreeMap<StatKind, EventLog>);

impl EventLogs {
    /// A kind that was never recorded has no log; callers treat that as empty
    pub fn get(&self, kind: StatKind) -> Option<&EventLog> {
        self.0.get(&kind)
    }

    pub fn push(&mut self, kind: StatKind, player_id: EntityId, player_name: String) {
        self.0.entry(kind).or_default().push(player_id, player_name);
    }

    pub fn occurrences(&self, player_id: &EntityId, kind: StatKind) -> u64 {
        self.get(kind)
            .map_or(0, |log| log.occurrences(player_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &EventLog)> {
        self.0.iter().map(|(kind, log)| (*kind, log))
    }
}

impl Serialize for EventLogs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len() * 2))?;
        for (kind, log) in &self.0 {
            map.serialize_entry(kind.as_ref(), log.player_ids())?;
            map.serialize_entry(&kind.names_key(), log.player_names())?;
        }
        map.end()
    }
}

/// Fields supplied when creating a fixture
#[derive(Debug, Clone)]
pub struct NewFixture {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: String,
    pub away_score: String,
    pub man_of_the_match: Option<EntityId>,
    pub location: Option<Location>,
}

impl Fixture {
    /// Creates a fixture with empty event logs
    pub fn new(fields: NewFixture) -> Self {
        Self {
            id: EntityId::new(),
            date: fields.date,
            home_team: fields.home_team,
            away_team: fields.away_team,
            home_score: fields.home_score,
            away_score: fields.away_score,
            man_of_the_match: fields.man_of_the_match,
            location: fields.location,
            events: EventLogs::default(),
        }
    }
}

/// Read-side fixture with the man of the match resolved to a name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureView {
    #[serde(flatten)]
    pub fixture: Fixture,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub man_of_the_match_name: Option<String>,
}
