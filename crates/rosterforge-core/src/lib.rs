//! RosterForge Core - Core types for lineup enumeration
//!
//! This crate provides the fundamental abstractions for RosterForge:
//! - Entities and the read-only entity store
//! - Base roles, slot eligibility and roster templates
//! - Candidate tuples and their canonical form
//! - Pool ingestion from tabular rows

pub mod entity;
pub mod error;
pub mod pool;
pub mod slot;
pub mod store;
pub mod tuple;

pub use entity::{Attribute, Entity, EntityId, Value};
pub use error::{Result, RosterForgeError};
pub use pool::{game_key, PoolRecord};
pub use slot::{Role, RosterTemplate, Slot, SlotSet};
pub use store::EntityStore;
pub use tuple::{has_duplicates, CanonicalTuple, Tuple, MAX_INLINE};
