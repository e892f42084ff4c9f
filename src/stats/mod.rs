// Public API - what other modules can use
pub use handlers::{add_assist, add_goalscorer, add_stat, resync_player};
pub use models::StatKind;
pub use service::StatsService;

// Internal modules
pub mod aggregator;
mod handlers;
pub mod models;
pub mod propagator;
pub mod recorder;
pub mod service;
pub mod types;
