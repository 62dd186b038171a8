//! Entities, attribute names and attribute values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::slot::SlotSet;

/// Dense index of an entity inside an [`EntityStore`](crate::EntityStore).
///
/// Ids are handed out in lexicographic order of entity names, so sorting ids
/// numerically is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single pool member with immutable attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub positions: SlotSet,
    pub salary: i64,
    pub fpts: f64,
    pub team: Arc<str>,
    /// Sorted `TEAM-OPP` pairing; absent when the pool had no opponent column.
    pub game: Option<Arc<str>>,
    /// Declared pass-through numeric columns.
    pub extras: BTreeMap<String, f64>,
}

/// Name of an attribute that can be looked up or aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Cost,
    Score,
    Team,
    Game,
    Position,
    Custom(String),
}

impl Attribute {
    pub fn custom(name: impl Into<String>) -> Self {
        Attribute::Custom(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Cost => "salary",
            Attribute::Score => "fpts",
            Attribute::Team => "team",
            Attribute::Game => "game",
            Attribute::Position => "pos",
            Attribute::Custom(name) => name,
        }
    }
}

impl FromStr for Attribute {
    type Err = std::convert::Infallible;

    /// Column aliases map onto the built-in attributes; anything else is custom.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "salary" | "cost" => Attribute::Cost,
            "fpts" | "score" => Attribute::Score,
            "team" => Attribute::Team,
            "game" => Attribute::Game,
            "pos" | "position" => Attribute::Position,
            other => Attribute::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    Slots(SlotSet),
}

impl Value {
    /// Numeric view used by summation; text and slot values have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) | Value::Slots(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Slots(v) => write!(f, "{}", v),
        }
    }
}
