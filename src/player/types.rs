use serde::{Deserialize, Serialize};

/// Query parameters for `/api/player/add`; `team` is the team's name
#[derive(Debug, Clone, Deserialize)]
pub struct AddPlayerRequest {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub fact: String,
    pub team: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
