//! Room domain model.
//!
//! # Responsibility
//! - Describe a physical space identified by a code and a category.
//! - Carry the machines owned by the room as an eagerly loaded collection.
//!
//! # Invariants
//! - `machines` is the inverse side of the machine -> room reference; writes
//!   of a room never persist it.

use crate::model::entity::{Entity, EntityId, ValidationError, UNSAVED_ID};
use crate::model::machine::Machine;
use serde::{Deserialize, Serialize};

/// Identifier of a persisted room.
pub type RoomId = EntityId;

/// Physical space hosting machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Storage-assigned; never read from input.
    #[serde(skip_deserializing)]
    id: RoomId,
    /// Room label, e.g. `SA01`.
    pub code: String,
    /// Category label. Serialized as `type` to match external naming.
    #[serde(rename = "type")]
    pub kind: String,
    /// Machines located in this room. Filled by repository reads.
    #[serde(default)]
    pub machines: Vec<Machine>,
}

impl Room {
    /// Creates an unsaved room with an empty machine collection.
    pub fn new(code: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            code: code.into(),
            kind: kind.into(),
            machines: Vec::new(),
        }
    }

    pub(crate) fn with_id(id: RoomId, code: String, kind: String) -> Self {
        Self {
            id,
            code,
            kind,
            machines: Vec::new(),
        }
    }

    pub(crate) fn assign_id(&mut self, id: RoomId) {
        self.id = id;
    }

    /// Returns the references of machines currently loaded in this room.
    pub fn machine_refs(&self) -> Vec<&str> {
        self.machines
            .iter()
            .map(|machine| machine.reference.as_str())
            .collect()
    }
}

impl Entity for Room {
    const NAME: &'static str = "room";

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::BlankRoomCode);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Room;
    use crate::model::entity::{Entity, ValidationError, UNSAVED_ID};

    #[test]
    fn new_room_is_unsaved_and_empty() {
        let room = Room::new("SA01", "Informatique");
        assert_eq!(room.id(), UNSAVED_ID);
        assert!(!room.is_persisted());
        assert!(room.machines.is_empty());
    }

    #[test]
    fn blank_code_fails_validation() {
        let room = Room::new("   ", "Informatique");
        assert_eq!(room.validate(), Err(ValidationError::BlankRoomCode));
    }

    #[test]
    fn serializes_kind_as_type() {
        let room = Room::new("SA02", "Réseau");
        let value = serde_json::to_value(&room).unwrap();
        assert_eq!(value["type"], "Réseau");
        assert_eq!(value["code"], "SA02");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn deserialized_room_ignores_incoming_id() {
        let room: Room =
            serde_json::from_str(r#"{"id":1,"code":"SA05","type":"Stock"}"#).unwrap();
        assert_eq!(room.id(), UNSAVED_ID);
        assert!(!room.is_persisted());
        assert_eq!(room.code, "SA05");
        assert!(room.machines.is_empty());
    }
}
