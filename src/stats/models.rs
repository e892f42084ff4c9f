use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::player::models::PlayerCounter;

/// A category of fixture event that is tracked per player.
///
/// The string form is the fixture event-log key; the aliases let callers
/// name a kind by its player counter as well.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum StatKind {
    #[strum(to_string = "goal_scorers", serialize = "goals", serialize = "goal")]
    #[serde(rename = "goal_scorers", alias = "goals", alias = "goal")]
    Goal,
    #[strum(to_string = "assist_scorers", serialize = "assists", serialize = "assist")]
    #[serde(rename = "assist_scorers", alias = "assists", alias = "assist")]
    Assist,
    #[strum(
        to_string = "motm_awards",
        serialize = "man_of_the_match",
        serialize = "motm"
    )]
    #[serde(rename = "motm_awards", alias = "man_of_the_match", alias = "motm")]
    ManOfTheMatch,
    #[strum(
        to_string = "lineup",
        serialize = "games_played",
        serialize = "appearance"
    )]
    #[serde(rename = "lineup", alias = "games_played", alias = "appearance")]
    Appearance,
}

impl StatKind {
    /// Player field that mirrors the count of this kind's events
    pub fn counter(self) -> PlayerCounter {
        match self {
            StatKind::Goal => PlayerCounter::Goals,
            StatKind::Assist => PlayerCounter::Assists,
            StatKind::ManOfTheMatch => PlayerCounter::ManOfTheMatch,
            StatKind::Appearance => PlayerCounter::GamesPlayed,
        }
    }

    /// Key of the name-snapshot sequence paired with this kind's id sequence
    pub fn names_key(self) -> String {
        format!("{}_names", self)
    }
}
