use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::EntityId;

/// Stored team record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String, // Unique within the store
    pub coach: String,
    pub founded: i32,
    /// Member player ids, soft references that are not cleaned up on player delete
    pub players: Vec<EntityId>,
    pub created: DateTime<Utc>,
}

impl Team {
    /// Creates a team with an empty member list
    pub fn new(name: String, coach: String, founded: i32) -> Self {
        Self {
            id: EntityId::new(),
            name,
            coach,
            founded,
            players: Vec::new(),
            created: Utc::now(),
        }
    }

    pub fn has_player(&self, player_id: &EntityId) -> bool {
        self.players.contains(player_id)
    }
}
