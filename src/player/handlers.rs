use axum::{
    extract::{Query, State},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{Player, PlayerUpdate, RosterEntry},
    service::PlayerService,
    types::{AddPlayerRequest, MessageResponse},
};
use crate::shared::{AppError, AppState, IdQuery};

fn player_service(state: &AppState) -> PlayerService {
    PlayerService::new(
        Arc::clone(&state.player_repository),
        Arc::clone(&state.team_repository),
    )
}

/// GET /api/player
///
/// Active players with their team's name.
#[instrument(name = "list_active_players", skip(state))]
pub async fn list_active_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    let roster = player_service(&state).active_roster().await?;

    info!(player_count = roster.len(), "Active roster listed successfully");
    Ok(Json(roster))
}

/// POST /api/player/add?name=&age=&position=&fact=&team=
#[instrument(name = "add_player", skip(state))]
pub async fn add_player(
    State(state): State<AppState>,
    Query(request): Query<AddPlayerRequest>,
) -> Result<Json<Player>, AppError> {
    let player = player_service(&state)
        .add_player_to_named_team(
            &request.team,
            request.name,
            request.age,
            request.position,
            request.fact,
        )
        .await?;

    Ok(Json(player))
}

/// POST /api/player/update?id=&<field>=<value>...
///
/// Unknown fields are ignored.
#[instrument(name = "update_player", skip(state))]
pub async fn update_player(
    State(state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Player>, AppError> {
    let player_id = params
        .remove("id")
        .ok_or_else(|| AppError::InvalidId("missing id parameter".to_string()))?;

    let mut updates = Vec::new();
    for (key, value) in &params {
        match PlayerUpdate::from_field(key, value)? {
            Some(update) => updates.push(update),
            None => debug!(field = %key, "Ignoring unknown player field"),
        }
    }

    let player = player_service(&state)
        .update_player(&player_id, updates)
        .await?;
    Ok(Json(player))
}

/// DELETE /api/player/delete?id=
#[instrument(name = "delete_player", skip(state))]
pub async fn delete_player(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let player_id = player_service(&state).delete_player(&query.id).await?;
    state.stats_service.clear_player_lock(&player_id).await;
    Ok(Json(MessageResponse::new("Player deleted")))
}
