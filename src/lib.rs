// Library crate for the football club tracker
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod db;
pub mod fixture;
pub mod leaderboard;
pub mod player;
pub mod routes;
pub mod seed;
pub mod shared;
pub mod stats;
pub mod team;

// Re-export commonly used types for easier access in tests
pub use fixture::{Fixture, FixtureView};
pub use player::{Player, PlayerCounter};
pub use shared::{AppError, AppState, EntityId};
pub use stats::{StatKind, StatsService};
pub use team::Team;
