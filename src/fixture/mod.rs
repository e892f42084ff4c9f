// Public API - what other modules can use
pub use handlers::{add_fixture, get_fixture, list_fixtures};
pub use models::{EventLog, Fixture, FixtureView, Location};
pub use service::FixtureService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
