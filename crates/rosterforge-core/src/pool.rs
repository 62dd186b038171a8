//! Tabular pool rows as handed over by the data-acquisition layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{Result, RosterForgeError};
use crate::slot::SlotSet;

/// One row of the entity pool.
///
/// Unknown numeric columns land in `extras`; other unknown columns are
/// dropped. Only extras declared as pass-through survive into the store.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawPoolRecord")]
pub struct PoolRecord {
    pub name: String,
    #[serde(alias = "pos")]
    pub position: String,
    pub salary: i64,
    pub fpts: f64,
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opp: Option<String>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, f64>,
}

/// Wire form of [`PoolRecord`] before non-numeric extras are dropped.
#[derive(Deserialize)]
struct RawPoolRecord {
    name: String,
    #[serde(alias = "pos")]
    position: String,
    salary: i64,
    fpts: f64,
    team: String,
    #[serde(default)]
    opp: Option<String>,
    #[serde(flatten)]
    extras: BTreeMap<String, ExtraValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtraValue {
    Number(f64),
    Other(IgnoredAny),
}

impl From<RawPoolRecord> for PoolRecord {
    fn from(raw: RawPoolRecord) -> Self {
        let extras = raw
            .extras
            .into_iter()
            .filter_map(|(column, value)| match value {
                ExtraValue::Number(value) => Some((column, value)),
                ExtraValue::Other(_) => None,
            })
            .collect();
        Self {
            name: raw.name,
            position: raw.position,
            salary: raw.salary,
            fpts: raw.fpts,
            team: raw.team,
            opp: raw.opp,
            extras,
        }
    }
}

impl PoolRecord {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        salary: i64,
        fpts: f64,
        team: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            salary,
            fpts,
            team: team.into(),
            opp: None,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_opp(mut self, opp: impl Into<String>) -> Self {
        self.opp = Some(opp.into());
        self
    }

    pub fn with_extra(mut self, column: impl Into<String>, value: f64) -> Self {
        self.extras.insert(column.into(), value);
        self
    }

    /// Converts the row into an entity, keeping only `pass_through` extras.
    pub(crate) fn into_entity(self, pass_through: &[String]) -> Result<Entity> {
        let mut extras = BTreeMap::new();
        for column in pass_through {
            match self.extras.get(column) {
                Some(value) => {
                    extras.insert(column.clone(), *value);
                }
                None => {
                    return Err(RosterForgeError::UnknownAttribute {
                        entity: self.name,
                        attribute: column.clone(),
                    })
                }
            }
        }

        let game = self.opp.as_deref().map(|opp| game_key(&self.team, opp));

        Ok(Entity {
            positions: SlotSet::parse(&self.position),
            salary: self.salary,
            fpts: self.fpts,
            team: Arc::from(self.team.as_str()),
            game,
            extras,
            name: self.name,
        })
    }
}

/// Game identifier: the two team codes sorted and joined with `-`.
pub fn game_key(team: &str, opp: &str) -> Arc<str> {
    let (first, second) = if team <= opp { (team, opp) } else { (opp, team) };
    Arc::from(format!("{}-{}", first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Role;

    #[test]
    fn test_game_key_is_symmetric() {
        assert_eq!(&*game_key("NYK", "BOS"), "BOS-NYK");
        assert_eq!(game_key("BOS", "NYK"), game_key("NYK", "BOS"));
    }

    #[test]
    fn test_into_entity_keeps_declared_extras() {
        let record = PoolRecord::new("Jalen Brunson", "PG", 9_800, 48.5, "NYK")
            .with_opp("BOS")
            .with_extra("e_fpts", 51.0)
            .with_extra("minutes", 36.0);

        let entity = record.into_entity(&["e_fpts".to_string()]).unwrap();
        assert_eq!(entity.extras.len(), 1);
        assert_eq!(entity.extras["e_fpts"], 51.0);
        assert_eq!(entity.game.as_deref(), Some("BOS-NYK"));
        assert!(entity.positions.contains(Role::PointGuard));
    }

    #[test]
    fn test_into_entity_missing_declared_column() {
        let record = PoolRecord::new("Josh Hart", "SG/SF", 6_100, 30.0, "NYK");
        let err = record.into_entity(&["e_fpts".to_string()]).unwrap_err();
        assert!(matches!(err, RosterForgeError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_deserialize_flattened_extras() {
        let json = r#"{"name":"A","pos":"C","salary":4000,"fpts":20.5,"team":"BOS","opp":"NYK","e_fpts":22.0}"#;
        let record: PoolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.position, "C");
        assert_eq!(record.opp.as_deref(), Some("NYK"));
        assert_eq!(record.extras["e_fpts"], 22.0);
    }

    #[test]
    fn test_non_numeric_extras_are_dropped() {
        let json = r#"{"name":"B","position":"PG/SG","salary":5000,"fpts":25.0,"team":"NYK","status":"Q","injured":false,"minutes":31}"#;
        let record: PoolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.extras.len(), 1);
        assert_eq!(record.extras["minutes"], 31.0);
        assert!(record.opp.is_none());

        let entity = record.into_entity(&["minutes".to_string()]).unwrap();
        assert_eq!(entity.extras["minutes"], 31.0);

        let again = PoolRecord::new("C", "C", 4_000, 20.0, "BOS").with_extra("own", 0.2);
        let round: PoolRecord = serde_json::from_str(&serde_json::to_string(&again).unwrap()).unwrap();
        assert_eq!(round, again);
    }

    #[test]
    fn test_declared_text_column_is_unknown() {
        let json = r#"{"name":"D","pos":"SF","salary":4500,"fpts":21.0,"team":"MIA","status":"OUT"}"#;
        let record: PoolRecord = serde_json::from_str(json).unwrap();
        let err = record.into_entity(&["status".to_string()]).unwrap_err();
        assert!(matches!(err, RosterForgeError::UnknownAttribute { attribute, .. } if attribute == "status"));
    }
}
