#![allow(dead_code)]

pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::FlakyPlayerRepository;
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
