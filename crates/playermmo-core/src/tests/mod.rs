//! Cross-module tests.
//!
//! - `properties.rs`: proptest checks of the arithmetic and undo guarantees
//! - `scenarios.rs`: end-to-end walkthroughs through the session
//! - `helpers.rs`: shared fixtures and generators

mod helpers;
mod properties;

pub use helpers::*;
