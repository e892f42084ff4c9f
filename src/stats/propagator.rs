use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::StatKind;
use crate::player::models::{Player, PlayerUpdate};
use crate::player::repository::PlayerRepository;
use crate::shared::{AppError, EntityId};

/// Writes recomputed counts onto the player record. Plain field set, last
/// writer wins.
pub struct CountPropagator {
    players: Arc<dyn PlayerRepository + Send + Sync>,
}

impl CountPropagator {
    pub fn new(players: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        Self { players }
    }

    #[instrument(skip(self))]
    pub async fn apply_count(
        &self,
        player_id: &EntityId,
        kind: StatKind,
        count: u32,
    ) -> Result<Player, AppError> {
        let update = PlayerUpdate::for_counter(kind.counter(), count);
        let player = self.players.update_player(player_id, &[update]).await?;

        debug!(player_id = %player_id, counter = %kind.counter(), count, "Player counter updated");
        Ok(player)
    }
}
