// Public API - what other modules can use
pub use handlers::{add_player, delete_player, list_active_players, update_player};
pub use models::{Player, PlayerCounter, PlayerUpdate, RosterEntry};
pub use service::PlayerService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
