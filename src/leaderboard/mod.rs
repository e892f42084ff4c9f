// Public API - what other modules can use
pub use handlers::{player_leaderboard, recent_fixtures, DEFAULT_LEADERBOARD_SIZE};
pub use service::LeaderboardService;

// Internal modules
mod handlers;
pub mod service;
