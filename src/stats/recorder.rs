use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::StatKind;
use crate::fixture::repository::FixtureRepository;
use crate::player::repository::PlayerRepository;
use crate::shared::{AppError, EntityId};

/// Appends stat events to fixture event logs
///
/// Events are never deduplicated: the same player can be recorded any
/// number of times for one fixture and kind.
pub struct EventRecorder {
    players: Arc<dyn PlayerRepository + Send + Sync>,
    fixtures: Arc<dyn FixtureRepository + Send + Sync>,
}

impl EventRecorder {
    pub fn new(
        players: Arc<dyn PlayerRepository + Send + Sync>,
        fixtures: Arc<dyn FixtureRepository + Send + Sync>,
    ) -> Self {
        Self { players, fixtures }
    }

    /// Snapshots the player's current name and appends `(player, name)` to
    /// the fixture's log for `kind`. Player counters are not touched.
    #[instrument(skip(self))]
    pub async fn record_stat(
        &self,
        fixture_id: &EntityId,
        player_id: &EntityId,
        kind: StatKind,
    ) -> Result<(), AppError> {
        let player = self
            .players
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {} not found", player_id)))?;

        self.fixtures
            .append_event(fixture_id, kind, player_id, &player.name)
            .await?;

        debug!(fixture_id = %fixture_id, player_id = %player_id, %kind, "Stat event recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::models::{Fixture, NewFixture};
    use crate::fixture::repository::InMemoryFixtureRepository;
    use crate::player::models::Player;
    use crate::player::repository::InMemoryPlayerRepository;
    use chrono::NaiveDate;

    async fn setup() -> (EventRecorder, Arc<InMemoryFixtureRepository>, Player, Fixture) {
        let players = Arc::new(InMemoryPlayerRepository::new());
        let fixtures = Arc::new(InMemoryFixtureRepository::new());

        let player = Player::new(
            "Casey".to_string(),
            22,
            "CM".to_string(),
            String::new(),
            EntityId::new(),
        );
        players.create_player(&player).await.unwrap();

        let fixture = Fixture::new(NewFixture {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            home_team: "Seeded FC".to_string(),
            away_team: "United".to_string(),
            home_score: "1".to_string(),
            away_score: "0".to_string(),
            man_of_the_match: None,
            location: None,
        });
        fixtures.create_fixture(&fixture).await.unwrap();

        let recorder = EventRecorder::new(players, fixtures.clone());
        (recorder, fixtures, player, fixture)
    }

    #[tokio::test]
    async fn test_record_stat_snapshots_name() {
        let (recorder, fixtures, player, fixture) = setup().await;

        recorder
            .record_stat(&fixture.id, &player.id, StatKind::Assist)
            .await
            .unwrap();
        recorder
            .record_stat(&fixture.id, &player.id, StatKind::Assist)
            .await
            .unwrap();

        let stored = fixtures.get_fixture(&fixture.id).await.unwrap().unwrap();
        let log = stored.events.get(StatKind::Assist).unwrap();
        assert_eq!(log.player_ids(), &[player.id, player.id]);
        assert_eq!(log.player_names(), &["Casey".to_string(), "Casey".to_string()]);
        assert!(stored.events.get(StatKind::Goal).is_none());
    }

    #[tokio::test]
    async fn test_record_stat_missing_entities() {
        let (recorder, fixtures, player, fixture) = setup().await;

        let missing_player = recorder
            .record_stat(&fixture.id, &EntityId::new(), StatKind::Goal)
            .await;
        assert!(matches!(missing_player, Err(AppError::NotFound(_))));

        let missing_fixture = recorder
            .record_stat(&EntityId::new(), &player.id, StatKind::Goal)
            .await;
        assert!(matches!(missing_fixture, Err(AppError::NotFound(_))));

        assert_eq!(
            fixtures.count_events(&player.id, StatKind::Goal).await.unwrap(),
            0
        );
    }
}
