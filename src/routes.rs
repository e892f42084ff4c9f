use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::shared::AppState;
use crate::{fixture, leaderboard, player, seed, stats, team};

/// Builds the full HTTP API
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/seed", post(seed::seed))
        // Players
        .route("/api/player", get(player::list_active_players))
        .route("/api/player/add", post(player::add_player))
        .route("/api/player/update", post(player::update_player))
        .route("/api/player/delete", delete(player::delete_player))
        .route("/api/player/resync", post(stats::resync_player))
        // Teams
        .route("/api/team/add", post(team::add_team))
        .route("/api/team/getbyid", get(team::get_team_by_id))
        .route("/api/team/getidbyname", get(team::get_team_id_by_name))
        .route("/api/team/getall", get(team::list_teams))
        // Fixtures
        .route("/api/fixture/add", post(fixture::add_fixture))
        .route("/api/fixture/getall", get(fixture::list_fixtures))
        .route("/api/fixture/addstat", post(stats::add_stat))
        .route("/api/fixture/addgoalscorer", post(stats::add_goalscorer))
        .route("/api/fixture/addassist", post(stats::add_assist))
        .route("/api/fixture/:id", get(fixture::get_fixture))
        // Leaderboards
        .route("/api/leaderboard/fixtures", get(leaderboard::recent_fixtures))
        .route("/api/leaderboard/:stat", get(leaderboard::player_leaderboard))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}
