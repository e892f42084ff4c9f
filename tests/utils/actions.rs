use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use fctracker::{AppError, FixtureView, Player, StatKind};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Records a stat through the coordinator using setup indices
    pub async fn record(
        &self,
        fixture: usize,
        player: usize,
        kind: StatKind,
    ) -> Result<FixtureView, AppError> {
        self.state
            .stats_service
            .add_stat_to_fixture(&self.fixtures[fixture].id, &self.players[player].id, kind)
            .await
    }

    /// Current stored copy of a setup player
    pub async fn reload_player(&self, player: usize) -> Player {
        self.state
            .player_repository
            .get_player(&self.players[player].id)
            .await
            .unwrap()
            .expect("player should exist")
    }

    /// Sends a request through the full router and parses the JSON body
    pub async fn request(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, json)
    }
}
