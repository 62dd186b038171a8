//! Shared test fixtures for RosterForge crates.
//!
//! This crate provides pools and stores for testing. It depends only on
//! `rosterforge-core` so every other crate can use it as a dev-dependency.
//!
//! - [`scenario`] - small hand-written pools with known answers
//! - [`random`] - seeded random pools shaped like real slates
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! rosterforge-test = { workspace = true }
//! ```

pub mod random;
pub mod scenario;

pub use random::{random_pool, PoolShape};
pub use scenario::{five_entity_pool, four_slot_template, record, store_of};
