use serde::{Deserialize, Serialize};

use crate::shared::EntityId;

/// Query parameters for creating a team
#[derive(Debug, Clone, Deserialize)]
pub struct AddTeamRequest {
    pub name: String,
    #[serde(default)]
    pub coach: String,
    pub founded: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamNameQuery {
    pub name: String,
}

/// Response for resolving a team name to its id
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamIdResponse {
    pub team_id: EntityId,
}
