//! Player (a resolved slot) and SlotAssignment (slot → name mapping).

use crate::models::slot::{Group, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A slot resolved to a display name. Group is set only in mixed tournaments.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub slot: Slot,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
}

impl Player {
    pub fn new(slot: Slot, name: impl Into<String>) -> Self {
        Self {
            slot,
            name: name.into(),
            group: None,
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }
}

/// Total bijection between input names and slots `1..=N`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotAssignment {
    names: BTreeMap<Slot, String>,
}

impl SlotAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign names to consecutive slots starting at `first_slot`.
    pub(crate) fn place<I>(&mut self, first_slot: Slot, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        for (offset, name) in names.into_iter().enumerate() {
            self.names.insert(first_slot + offset, name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for `slot`, if assigned.
    pub fn name(&self, slot: Slot) -> Option<&str> {
        self.names.get(&slot).map(String::as_str)
    }

    /// Name for `slot`, or `Player {slot}` when nothing is assigned.
    pub fn display_name(&self, slot: Slot) -> String {
        self.name(slot)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Player {slot}"))
    }

    /// First slot holding `name`.
    pub fn slot_of(&self, name: &str) -> Option<Slot> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&slot, _)| slot)
    }

    pub(crate) fn rename(&mut self, slot: Slot, name: String) -> bool {
        match self.names.get_mut(&slot) {
            Some(existing) => {
                *existing = name;
                true
            }
            None => false,
        }
    }

    /// `(slot, name)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &str)> {
        self.names.iter().map(|(&slot, name)| (slot, name.as_str()))
    }

    /// Names in slot order.
    pub fn names(&self) -> Vec<&str> {
        self.names.values().map(String::as_str).collect()
    }

    pub fn slots(&self) -> Vec<Slot> {
        self.names.keys().copied().collect()
    }
}
