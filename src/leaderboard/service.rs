use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::fixture::{repository::FixtureRepository, FixtureService, FixtureView};
use crate::player::{models::PlayerCounter, repository::PlayerRepository, Player};
use crate::shared::AppError;

/// Read-only rankings over the player and fixture stores
pub struct LeaderboardService {
    players: Arc<dyn PlayerRepository + Send + Sync>,
    fixtures: Arc<dyn FixtureRepository + Send + Sync>,
}

impl LeaderboardService {
    pub fn new(
        players: Arc<dyn PlayerRepository + Send + Sync>,
        fixtures: Arc<dyn FixtureRepository + Send + Sync>,
    ) -> Self {
        Self { players, fixtures }
    }

    /// Players ranked by `counter`, highest first. Equal values keep store
    /// insertion order, so repeated calls on unchanged data agree.
    #[instrument(skip(self))]
    pub async fn top_n(&self, counter: PlayerCounter, n: usize) -> Result<Vec<Player>, AppError> {
        let mut players = self.players.list_players().await?;

        players.sort_by_key(|p| Reverse(p.counter(counter)));
        players.truncate(n);

        debug!(%counter, returned = players.len(), "Leaderboard built");
        Ok(players)
    }

    /// Most recent fixtures by date, with man of the match names resolved
    #[instrument(skip(self))]
    pub async fn recent_fixtures(&self, n: usize) -> Result<Vec<FixtureView>, AppError> {
        let mut fixtures = self.fixtures.list_fixtures().await?;

        fixtures.sort_by_key(|f| Reverse(f.date));
        fixtures.truncate(n);

        FixtureService::new(Arc::clone(&self.fixtures), Arc::clone(&self.players))
            .views(fixtures)
            .await
    }
}
