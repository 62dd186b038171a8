//! Base roles, slot eligibility sets and roster templates.
//!
//! A roster template is an ordered list of slots. Every slot accepts one or
//! more base roles; an entity fits a slot when its own role set intersects the
//! slot's. Flexible slots (`G`, `F`, `UTIL`) are simply slots with more than
//! one accepted role.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five base roles an entity can be eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Role {
    #[serde(rename = "PG")]
    PointGuard,
    #[serde(rename = "SG")]
    ShootingGuard,
    #[serde(rename = "SF")]
    SmallForward,
    #[serde(rename = "PF")]
    PowerForward,
    #[serde(rename = "C")]
    Center,
}

impl Role {
    /// All base roles in template order.
    pub const ALL: [Role; 5] = [
        Role::PointGuard,
        Role::ShootingGuard,
        Role::SmallForward,
        Role::PowerForward,
        Role::Center,
    ];

    /// Parses a single position token such as `"PG"` or `"c"`.
    ///
    /// Returns `None` for anything that is not a base role.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "PG" => Some(Role::PointGuard),
            "SG" => Some(Role::ShootingGuard),
            "SF" => Some(Role::SmallForward),
            "PF" => Some(Role::PowerForward),
            "C" => Some(Role::Center),
            _ => None,
        }
    }

    /// Short code used in position strings and slot labels.
    pub fn code(self) -> &'static str {
        match self {
            Role::PointGuard => "PG",
            Role::ShootingGuard => "SG",
            Role::SmallForward => "SF",
            Role::PowerForward => "PF",
            Role::Center => "C",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A compact set of base roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SlotSet(u8);

impl SlotSet {
    /// The empty set.
    pub const EMPTY: SlotSet = SlotSet(0);

    /// Every base role.
    pub fn all() -> Self {
        Self::of(&Role::ALL)
    }

    /// Builds a set from the given roles.
    pub fn of(roles: &[Role]) -> Self {
        SlotSet(roles.iter().fold(0, |bits, role| bits | role.bit()))
    }

    /// Parses a position string such as `"PG/SG"`.
    ///
    /// Tokens that are not base roles are ignored, so a malformed string
    /// simply yields fewer (possibly zero) roles.
    pub fn parse(position: &str) -> Self {
        let roles: Vec<Role> = position.split('/').filter_map(Role::from_token).collect();
        Self::of(&roles)
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Returns true if the two sets share at least one role.
    pub fn intersects(self, other: SlotSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the roles in template order.
    pub fn roles(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl fmt::Display for SlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.roles().map(Role::code).collect();
        f.write_str(&codes.join("/"))
    }
}

/// A named roster position and the roles it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub label: String,
    pub accepts: SlotSet,
}

impl Slot {
    pub fn new(label: impl Into<String>, accepts: SlotSet) -> Self {
        Self {
            label: label.into(),
            accepts,
        }
    }

    fn single(role: Role) -> Self {
        Self::new(role.code(), SlotSet::of(&[role]))
    }
}

/// The fixed shape of a lineup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTemplate {
    slots: Vec<Slot>,
}

impl RosterTemplate {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// Eight slots: one of each base role plus `G`, `F` and `UTIL` flex slots.
    pub fn classic8() -> Self {
        use Role::*;
        Self::new(vec![
            Slot::single(PointGuard),
            Slot::single(ShootingGuard),
            Slot::single(SmallForward),
            Slot::single(PowerForward),
            Slot::single(Center),
            Slot::new("G", SlotSet::of(&[PointGuard, ShootingGuard])),
            Slot::new("F", SlotSet::of(&[SmallForward, PowerForward])),
            Slot::new("UTIL", SlotSet::all()),
        ])
    }

    /// Nine slots: two of each base role except a single center.
    pub fn classic9() -> Self {
        use Role::*;
        Self::new(vec![
            Slot::single(PointGuard),
            Slot::single(PointGuard),
            Slot::single(ShootingGuard),
            Slot::single(ShootingGuard),
            Slot::single(SmallForward),
            Slot::single(SmallForward),
            Slot::single(PowerForward),
            Slot::single(PowerForward),
            Slot::single(Center),
        ])
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot labels in template order; duplicated labels are kept.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.label.clone()).collect()
    }
}
