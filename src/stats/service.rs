use std::collections::HashMap;
use std::sync::Arc;

use strum::IntoEnumIterator;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument};

use super::{
    aggregator::Aggregator, models::StatKind, propagator::CountPropagator,
    recorder::EventRecorder,
};
use crate::fixture::{
    repository::FixtureRepository, types::AddFixtureRequest, FixtureService, FixtureView,
};
use crate::player::{models::Player, repository::PlayerRepository};
use crate::shared::{AppError, EntityId};

/// Coordinates stat recording: append the event, recount the player, write
/// the count back, then return the refreshed fixture view.
///
/// The steps touch two entities without a transaction. A failure after the
/// append leaves the event in place and the counter stale until the next
/// recount for that player. Recount and write-back for one player run under
/// that player's lock so concurrent calls in this process cannot lose an
/// update.
pub struct StatsService {
    players: Arc<dyn PlayerRepository + Send + Sync>,
    fixtures: Arc<dyn FixtureRepository + Send + Sync>,
    recorder: EventRecorder,
    aggregator: Aggregator,
    propagator: CountPropagator,
    player_mutexes: Arc<RwLock<HashMap<EntityId, Arc<AsyncMutex<()>>>>>,
}

impl StatsService {
    pub fn new(
        players: Arc<dyn PlayerRepository + Send + Sync>,
        fixtures: Arc<dyn FixtureRepository + Send + Sync>,
    ) -> Self {
        Self {
            recorder: EventRecorder::new(Arc::clone(&players), Arc::clone(&fixtures)),
            aggregator: Aggregator::new(Arc::clone(&fixtures)),
            propagator: CountPropagator::new(Arc::clone(&players)),
            players,
            fixtures,
            player_mutexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_stat_to_fixture(
        &self,
        fixture_id: &EntityId,
        player_id: &EntityId,
        kind: StatKind,
    ) -> Result<FixtureView, AppError> {
        self.recorder.record_stat(fixture_id, player_id, kind).await?;

        let player_lock = self.player_lock(player_id).await;
        let refreshed = {
            let _guard = player_lock.lock().await;
            self.recount(player_id, kind).await
        };
        self.release_player_lock(player_id, player_lock).await;
        refreshed?;

        let view = self.fixture_service().get_fixture(fixture_id).await?;

        info!(fixture_id = %fixture_id, player_id = %player_id, %kind, "Stat added to fixture");
        Ok(view)
    }

    /// Creates a fixture. A requested man of the match is recorded as a
    /// `ManOfTheMatch` event, which sets the fixture reference and the
    /// player's counter together.
    #[instrument(skip(self))]
    pub async fn add_fixture(&self, request: AddFixtureRequest) -> Result<FixtureView, AppError> {
        let fixtures = self.fixture_service();
        let (fixture, man_of_the_match) = fixtures.add_fixture(request).await?;

        match man_of_the_match {
            Some(player_id) => {
                self.add_stat_to_fixture(&fixture.id, &player_id, StatKind::ManOfTheMatch)
                    .await
            }
            None => fixtures.get_fixture(&fixture.id).await,
        }
    }

    /// Recounts every stat kind for one player and writes all counters back
    #[instrument(skip(self))]
    pub async fn resync_player(&self, player_id: &EntityId) -> Result<Player, AppError> {
        if self.players.get_player(player_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Player {} not found", player_id)));
        }

        let player_lock = self.player_lock(player_id).await;
        let resynced = {
            let _guard = player_lock.lock().await;
            self.recount_all(player_id).await
        };
        self.release_player_lock(player_id, player_lock).await;
        let player = resynced?;

        info!(
            player_id = %player_id,
            goals = player.goals,
            assists = player.assists,
            games_played = player.games_played,
            man_of_the_match = player.man_of_the_match,
            "Player counters resynced"
        );
        Ok(player)
    }

    /// Drops the lock entry of a deleted player
    pub async fn clear_player_lock(&self, player_id: &EntityId) {
        let mut mutexes = self.player_mutexes.write().await;
        mutexes.remove(player_id);
        debug!(player_id = %player_id, "Player lock cleared");
    }

    /// Number of players with a lock entry
    pub async fn tracked_player_locks(&self) -> usize {
        self.player_mutexes.read().await.len()
    }

    async fn recount(&self, player_id: &EntityId, kind: StatKind) -> Result<Player, AppError> {
        let count = self.aggregator.recompute_count(player_id, kind).await?;
        self.propagator.apply_count(player_id, kind, count).await
    }

    async fn recount_all(&self, player_id: &EntityId) -> Result<Player, AppError> {
        let mut player = None;
        for kind in StatKind::iter() {
            player = Some(self.recount(player_id, kind).await?);
        }
        player.ok_or_else(|| AppError::NotFound(format!("Player {} not found", player_id)))
    }

    fn fixture_service(&self) -> FixtureService {
        FixtureService::new(Arc::clone(&self.fixtures), Arc::clone(&self.players))
    }

    async fn player_lock(&self, player_id: &EntityId) -> Arc<AsyncMutex<()>> {
        {
            let mutexes = self.player_mutexes.read().await;
            if let Some(lock) = mutexes.get(player_id) {
                return lock.clone();
            }
        }

        let mut mutexes = self.player_mutexes.write().await;
        mutexes
            .entry(*player_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Removes the entry once the map holds the only other handle. Clones are
    /// only taken under the map lock, so no waiter can be missed.
    async fn release_player_lock(&self, player_id: &EntityId, lock: Arc<AsyncMutex<()>>) {
        let mut mutexes = self.player_mutexes.write().await;
        let idle = mutexes
            .get(player_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &lock) && Arc::strong_count(&lock) == 2);
        if idle {
            mutexes.remove(player_id);
        }
    }
}
