//! Domain model for the room/machine inventory.
//!
//! # Responsibility
//! - Define the records persisted by the repository layer.
//! - Own identity rules shared by every persisted entity.
//!
//! # Invariants
//! - Identifiers are assigned by storage, never by callers.
//! - `UNSAVED_ID` marks an entity that has not been persisted yet.

pub mod entity;
pub mod machine;
pub mod room;

pub use entity::{Entity, EntityId, ValidationError, UNSAVED_ID};
pub use machine::{Machine, MachineId};
pub use room::{Room, RoomId};
