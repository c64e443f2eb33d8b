//! Machine domain model.
//!
//! # Invariants
//! - `room_id` is `None` only before the machine is assigned to a room.
//! - A machine may be created only when it references a persisted room.

use crate::model::entity::{Entity, EntityId, ValidationError, UNSAVED_ID};
use crate::model::room::{Room, RoomId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a persisted machine.
pub type MachineId = EntityId;

/// Piece of equipment owned by exactly one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    /// Storage-assigned; never read from input.
    #[serde(skip_deserializing)]
    id: MachineId,
    /// Inventory reference/tag, e.g. `MA01`.
    #[serde(rename = "ref")]
    pub reference: String,
    pub brand: String,
    /// Non-negative by convention; not enforced.
    pub price: f64,
    /// Calendar date without time-of-day.
    pub purchase_date: NaiveDate,
    /// Foreign key to the owning room.
    pub room_id: Option<RoomId>,
}

impl Machine {
    /// Creates an unsaved machine assigned to `room`.
    ///
    /// The room reference stays `None` when `room` itself is unsaved.
    pub fn new(
        reference: impl Into<String>,
        brand: impl Into<String>,
        price: f64,
        purchase_date: NaiveDate,
        room: &Room,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            reference: reference.into(),
            brand: brand.into(),
            price,
            purchase_date,
            room_id: room.is_persisted().then_some(room.id()),
        }
    }

    pub(crate) fn with_id(
        id: MachineId,
        reference: String,
        brand: String,
        price: f64,
        purchase_date: NaiveDate,
        room_id: RoomId,
    ) -> Self {
        Self {
            id,
            reference,
            brand,
            price,
            purchase_date,
            room_id: Some(room_id),
        }
    }

    pub(crate) fn assign_id(&mut self, id: MachineId) {
        self.id = id;
    }

    /// Moves this machine to `room`. Takes effect on the next write.
    pub fn assign_room(&mut self, room: &Room) {
        self.room_id = room.is_persisted().then_some(room.id());
    }
}

impl Entity for Machine {
    const NAME: &'static str = "machine";

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.room_id {
            Some(room_id) if room_id != UNSAVED_ID => {}
            _ => return Err(ValidationError::MissingRoom),
        }
        if !self.price.is_finite() {
            return Err(ValidationError::NonFinitePrice(self.price));
        }
        Ok(())
    }
}
