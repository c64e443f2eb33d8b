//! Repository layer: CRUD contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the generic per-entity data access contract.
//! - Keep SQL and transaction handling out of service/bootstrap code.
//!
//! # Invariants
//! - Every operation is bounded by exactly one unit of work.
//! - Failures surface as typed `RepoError` values classified by
//!   `RepoErrorKind`; nothing is swallowed.

pub mod error;
pub mod machine_repo;
pub mod repository;
pub mod room_repo;

pub use error::{RepoError, RepoErrorKind, RepoResult};
pub use machine_repo::{MachineRepository, SqliteMachineRepository};
pub use repository::Repository;
pub use room_repo::SqliteRoomRepository;
