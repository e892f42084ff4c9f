use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::StatKind;
use crate::fixture::repository::FixtureRepository;
use crate::shared::{AppError, EntityId};

/// Recounts a player's events from the fixture logs
///
/// Always a full recount, never a delta, so running it again against the
/// same logs yields the same number and a stale counter heals itself on the
/// next pass.
pub struct Aggregator {
    fixtures: Arc<dyn FixtureRepository + Send + Sync>,
}

impl Aggregator {
    pub fn new(fixtures: Arc<dyn FixtureRepository + Send + Sync>) -> Self {
        Self { fixtures }
    }

    #[instrument(skip(self))]
    pub async fn recompute_count(
        &self,
        player_id: &EntityId,
        kind: StatKind,
    ) -> Result<u32, AppError> {
        let count = self.fixtures.count_events(player_id, kind).await?;
        debug!(player_id = %player_id, %kind, count, "Recounted player events");

        u32::try_from(count).map_err(|_| {
            AppError::DatabaseError(format!(
                "{} count for player {} exceeds the counter range",
                kind, player_id
            ))
        })
    }
}
