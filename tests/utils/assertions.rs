//! Test assertion helpers for cross-checking counters against event logs
#![allow(dead_code)] // Test utilities may not all be used in every test

use strum::IntoEnumIterator;

use fctracker::StatKind;

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

impl TestSetup {
    /// Every setup player's counters equal the number of matching events
    pub async fn assert_counters_match_logs(&self) {
        for (index, player) in self.players.iter().enumerate() {
            let stored = self.reload_player(index).await;
            for kind in StatKind::iter() {
                let events = self
                    .state
                    .fixture_repository
                    .count_events(&player.id, kind)
                    .await
                    .unwrap();
                assert_eq!(
                    u64::from(stored.counter(kind.counter())),
                    events,
                    "{} counter for {} disagrees with the event logs",
                    kind,
                    stored.name
                );
            }
        }
    }

    /// Every event log pairs each id with a name snapshot
    pub async fn assert_logs_aligned(&self) {
        let fixtures = self.state.fixture_repository.list_fixtures().await.unwrap();
        for fixture in fixtures {
            for (kind, log) in fixture.events.iter() {
                assert_eq!(
                    log.player_ids().len(),
                    log.player_names().len(),
                    "{} log of fixture {} is misaligned",
                    kind,
                    fixture.id
                );
            }
        }
    }
}
