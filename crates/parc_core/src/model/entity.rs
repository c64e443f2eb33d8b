//! Shared identity contract for persisted records.
//!
//! # Invariants
//! - An identifier equal to `UNSAVED_ID` means "not yet persisted".
//! - Once assigned, an identifier never changes for the entity lifetime.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned integer identity.
pub type EntityId = i64;

/// Sentinel identifier carried by entities that were never persisted.
pub const UNSAVED_ID: EntityId = 0;

/// Record with storage-assigned identity.
pub trait Entity {
    /// Stable entity name used in errors and log events.
    const NAME: &'static str;

    /// Returns the identifier, or `UNSAVED_ID` before the first create.
    fn id(&self) -> EntityId;

    /// Checks field-level invariants before a write reaches storage.
    fn validate(&self) -> Result<(), ValidationError>;

    /// True once storage has assigned an identifier.
    fn is_persisted(&self) -> bool {
        self.id() != UNSAVED_ID
    }
}

/// Field-level invariant violations detected before persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Room code is empty or whitespace only.
    BlankRoomCode,
    /// Machine is not assigned to a persisted room.
    MissingRoom,
    /// Machine price is NaN or infinite.
    NonFinitePrice(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankRoomCode => write!(f, "room code must not be blank"),
            Self::MissingRoom => write!(f, "machine must reference a persisted room"),
            Self::NonFinitePrice(price) => write!(f, "machine price must be finite, got {price}"),
        }
    }
}

impl Error for ValidationError {}
