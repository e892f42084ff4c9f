// Public API - what other modules can use
pub use handlers::{add_team, get_team_by_id, get_team_id_by_name, list_teams};
pub use models::Team;
pub use service::TeamService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
