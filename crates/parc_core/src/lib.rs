//! Core persistence layer for the room/machine inventory.
//! This crate owns the model, storage bootstrap and repository contracts.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{Entity, EntityId, Machine, MachineId, Room, RoomId, ValidationError, UNSAVED_ID};
pub use repo::{
    MachineRepository, RepoError, RepoErrorKind, RepoResult, Repository, SqliteMachineRepository,
    SqliteRoomRepository,
};
pub use service::inventory_service::{DemoInventory, InventoryService, MachineRequest};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
