use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::shared::{AppError, EntityId};

/// Stored player record
///
/// The four counters are derived state: they mirror the number of matching
/// events across all fixtures and are only written by the stats propagator
/// (or by an explicit field update, which the next recount overwrites).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub age: u32,
    pub position: String,
    pub fun_fact: String,
    pub goals: u32,
    pub assists: u32,
    pub games_played: u32,
    pub man_of_the_match: u32,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub team_id: EntityId,
}

impl Player {
    /// Creates an active player with zeroed counters
    pub fn new(
        name: String,
        age: u32,
        position: String,
        fun_fact: String,
        team_id: EntityId,
    ) -> Self {
        Self {
            id: EntityId::new(),
            name,
            age,
            position,
            fun_fact,
            goals: 0,
            assists: 0,
            games_played: 0,
            man_of_the_match: 0,
            active: true,
            created: Utc::now(),
            team_id,
        }
    }

    pub fn counter(&self, counter: PlayerCounter) -> u32 {
        match counter {
            PlayerCounter::Goals => self.goals,
            PlayerCounter::Assists => self.assists,
            PlayerCounter::GamesPlayed => self.games_played,
            PlayerCounter::ManOfTheMatch => self.man_of_the_match,
        }
    }

    /// Applies a single field update in place
    pub fn apply(&mut self, update: &PlayerUpdate) {
        match update {
            PlayerUpdate::Name(name) => self.name = name.clone(),
            PlayerUpdate::Age(age) => self.age = *age,
            PlayerUpdate::Position(position) => self.position = position.clone(),
            PlayerUpdate::FunFact(fact) => self.fun_fact = fact.clone(),
            PlayerUpdate::Goals(n) => self.goals = *n,
            PlayerUpdate::Assists(n) => self.assists = *n,
            PlayerUpdate::GamesPlayed(n) => self.games_played = *n,
            PlayerUpdate::ManOfTheMatch(n) => self.man_of_the_match = *n,
            PlayerUpdate::Active(active) => self.active = *active,
        }
    }
}

/// Fields supplied when creating a player
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub age: u32,
    pub position: String,
    pub fun_fact: String,
    pub team_id: EntityId,
}

/// Active-roster read view: the stored player plus its team's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub player: Player,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

/// Numeric player fields that can be ranked on a leaderboard
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayerCounter {
    #[strum(to_string = "goals")]
    Goals,
    #[strum(to_string = "assists")]
    Assists,
    #[strum(to_string = "games_played", serialize = "appearances")]
    GamesPlayed,
    #[strum(to_string = "man_of_the_match", serialize = "motm")]
    ManOfTheMatch,
}

/// One updatable player field together with its typed value
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerUpdate {
    Name(String),
    Age(u32),
    Position(String),
    FunFact(String),
    Goals(u32),
    Assists(u32),
    GamesPlayed(u32),
    ManOfTheMatch(u32),
    Active(bool),
}

impl PlayerUpdate {
    /// Stored field (and column) name
    pub fn field(&self) -> &'static str {
        match self {
            PlayerUpdate::Name(_) => "name",
            PlayerUpdate::Age(_) => "age",
            PlayerUpdate::Position(_) => "position",
            PlayerUpdate::FunFact(_) => "fun_fact",
            PlayerUpdate::Goals(_) => "goals",
            PlayerUpdate::Assists(_) => "assists",
            PlayerUpdate::GamesPlayed(_) => "games_played",
            PlayerUpdate::ManOfTheMatch(_) => "man_of_the_match",
            PlayerUpdate::Active(_) => "active",
        }
    }

    pub fn for_counter(counter: PlayerCounter, value: u32) -> Self {
        match counter {
            PlayerCounter::Goals => PlayerUpdate::Goals(value),
            PlayerCounter::Assists => PlayerUpdate::Assists(value),
            PlayerCounter::GamesPlayed => PlayerUpdate::GamesPlayed(value),
            PlayerCounter::ManOfTheMatch => PlayerUpdate::ManOfTheMatch(value),
        }
    }

    /// Parses a raw `field=value` pair from the open update map.
    ///
    /// Keys outside the allow-list yield `Ok(None)` and are dropped by the
    /// caller rather than rejected. A known key with a value of the wrong
    /// type is a validation error.
    pub fn from_field(key: &str, value: &str) -> Result<Option<Self>, AppError> {
        let update = match key {
            "name" => PlayerUpdate::Name(value.to_string()),
            "age" => PlayerUpdate::Age(parse_number(key, value)?),
            "position" => PlayerUpdate::Position(value.to_string()),
            "fun_fact" => PlayerUpdate::FunFact(value.to_string()),
            "goals" => PlayerUpdate::Goals(parse_number(key, value)?),
            "assists" => PlayerUpdate::Assists(parse_number(key, value)?),
            "games_played" => PlayerUpdate::GamesPlayed(parse_number(key, value)?),
            "man_of_the_match" => PlayerUpdate::ManOfTheMatch(parse_number(key, value)?),
            "active" => PlayerUpdate::Active(value.trim().parse().map_err(|_| {
                AppError::Validation(format!("{} must be true or false, got {:?}", key, value))
            })?),
            _ => return Ok(None),
        };
        Ok(Some(update))
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, AppError> {
    value.trim().parse().map_err(|_| {
        AppError::Validation(format!(
            "{} must be a non-negative integer, got {:?}",
            key, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_new_player_defaults() {
        let team_id = EntityId::new();
        let player = Player::new(
            "Alex".to_string(),
            21,
            "ST".to_string(),
            "Loves pizza".to_string(),
            team_id,
        );

        assert!(player.active);
        assert_eq!(player.team_id, team_id);
        assert_eq!(player.goals, 0);
        assert_eq!(player.assists, 0);
        assert_eq!(player.games_played, 0);
        assert_eq!(player.man_of_the_match, 0);
    }

    #[test]
    fn test_apply_updates_only_named_field() {
        let mut player = Player::new(
            "Alex".to_string(),
            21,
            "ST".to_string(),
            String::new(),
            EntityId::new(),
        );

        player.apply(&PlayerUpdate::Goals(4));
        player.apply(&PlayerUpdate::Active(false));

        assert_eq!(player.goals, 4);
        assert!(!player.active);
        assert_eq!(player.name, "Alex");
        assert_eq!(player.counter(PlayerCounter::Goals), 4);
    }

    #[rstest]
    #[case("name", "Jamie", PlayerUpdate::Name("Jamie".to_string()))]
    #[case("age", "23", PlayerUpdate::Age(23))]
    #[case("fun_fact", "Can juggle", PlayerUpdate::FunFact("Can juggle".to_string()))]
    #[case("goals", "7", PlayerUpdate::Goals(7))]
    #[case("man_of_the_match", "2", PlayerUpdate::ManOfTheMatch(2))]
    #[case("active", "false", PlayerUpdate::Active(false))]
    fn test_from_field_known_keys(
        #[case] key: &str,
        #[case] value: &str,
        #[case] expected: PlayerUpdate,
    ) {
        assert_eq!(PlayerUpdate::from_field(key, value).unwrap(), Some(expected));
    }

    #[rstest]
    #[case("id")]
    #[case("team_id")]
    #[case("created")]
    #[case("shoe_size")]
    fn test_from_field_drops_unknown_keys(#[case] key: &str) {
        assert_eq!(PlayerUpdate::from_field(key, "anything").unwrap(), None);
    }

    #[rstest]
    #[case("age", "old")]
    #[case("goals", "-1")]
    #[case("active", "yes")]
    fn test_from_field_rejects_bad_values(#[case] key: &str, #[case] value: &str) {
        let result = PlayerUpdate::from_field(key, value);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[rstest]
    #[case("goals", PlayerCounter::Goals)]
    #[case("assists", PlayerCounter::Assists)]
    #[case("games_played", PlayerCounter::GamesPlayed)]
    #[case("appearances", PlayerCounter::GamesPlayed)]
    #[case("man_of_the_match", PlayerCounter::ManOfTheMatch)]
    #[case("motm", PlayerCounter::ManOfTheMatch)]
    fn test_counter_names(#[case] raw: &str, #[case] expected: PlayerCounter) {
        assert_eq!(PlayerCounter::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_counter_update_targets_same_field() {
        use strum::IntoEnumIterator;

        for counter in PlayerCounter::iter() {
            assert_eq!(PlayerUpdate::for_counter(counter, 1).field(), counter.as_ref());
        }
    }
}
