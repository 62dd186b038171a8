//! Read-only entity lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::{Attribute, Entity, EntityId, Value};
use crate::error::{Result, RosterForgeError};
use crate::pool::PoolRecord;
use crate::slot::SlotSet;

/// Immutable lookup of attribute values by entity id.
///
/// Entities are stored sorted by name and ids are their positions, which
/// makes ascending id order the canonical tuple order.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    index: HashMap<String, EntityId>,
}

impl EntityStore {
    /// Builds a store from pool rows, keeping the declared pass-through columns.
    ///
    /// # Errors
    ///
    /// `DuplicateEntity` if two rows share a name, `UnknownAttribute` if a
    /// declared column is missing from a row.
    pub fn from_records<I>(records: I, pass_through: &[String]) -> Result<Self>
    where
        I: IntoIterator<Item = PoolRecord>,
    {
        let entities = records
            .into_iter()
            .map(|record| record.into_entity(pass_through))
            .collect::<Result<Vec<_>>>()?;
        Self::from_entities(entities)
    }

    /// Builds a store from already-converted entities.
    pub fn from_entities(mut entities: Vec<Entity>) -> Result<Self> {
        entities.sort_by(|a, b| a.name.cmp(&b.name));

        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            let id = EntityId(i as u32);
            if index.insert(entity.name.clone(), id).is_some() {
                return Err(RosterForgeError::DuplicateEntity(entity.name.clone()));
            }
        }

        Ok(Self { entities, index })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.index.get(name).copied()
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities
            .get(id.index())
            .ok_or(RosterForgeError::UnknownEntity(id.0))
    }

    /// Iterates `(id, entity)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityId(i as u32), entity))
    }

    /// Looks up one attribute of one entity.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` if `id` is out of range, `UnknownAttribute` if the
    /// entity carries no such attribute (a missing game or custom column).
    pub fn attribute(&self, id: EntityId, attribute: &Attribute) -> Result<Value> {
        let entity = self.entity(id)?;
        match attribute {
            Attribute::Cost => Ok(Value::Int(entity.salary)),
            Attribute::Score => Ok(Value::Float(entity.fpts)),
            Attribute::Team => Ok(Value::Text(Arc::clone(&entity.team))),
            Attribute::Game => entity
                .game
                .as_ref()
                .map(|game| Value::Text(Arc::clone(game)))
                .ok_or_else(|| unknown_attribute(entity, attribute)),
            Attribute::Position => Ok(Value::Slots(entity.positions)),
            Attribute::Custom(column) => entity
                .extras
                .get(column)
                .map(|value| Value::Float(*value))
                .ok_or_else(|| unknown_attribute(entity, attribute)),
        }
    }

    pub fn name(&self, id: EntityId) -> Result<&str> {
        Ok(&self.entity(id)?.name)
    }

    pub fn salary(&self, id: EntityId) -> Result<i64> {
        Ok(self.entity(id)?.salary)
    }

    pub fn fpts(&self, id: EntityId) -> Result<f64> {
        Ok(self.entity(id)?.fpts)
    }

    pub fn team(&self, id: EntityId) -> Result<&Arc<str>> {
        Ok(&self.entity(id)?.team)
    }

    pub fn positions(&self, id: EntityId) -> Result<SlotSet> {
        Ok(self.entity(id)?.positions)
    }

    /// Ids of every entity eligible for at least one of `accepts`, in canonical order.
    pub fn candidates(&self, accepts: SlotSet) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, entity)| entity.positions.intersects(accepts))
            .map(|(id, _)| id)
            .collect()
    }
}

fn unknown_attribute(entity: &Entity, attribute: &Attribute) -> RosterForgeError {
    RosterForgeError::UnknownAttribute {
        entity: entity.name.clone(),
        attribute: attribute.to_string(),
    }
}
