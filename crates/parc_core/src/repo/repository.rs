//! Generic CRUD contract shared by every entity repository.
//!
//! # Invariants
//! - Each operation runs in its own unit of work; nothing is batched.
//! - Failures are returned as `RepoError`, never as panics.

use crate::db::migrations::latest_version;
use crate::model::{Entity, EntityId};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;

/// CRUD surface for one entity type with a storage-assigned identifier.
pub trait Repository<T: Entity> {
    /// Persists a new entity and writes the assigned identifier back into it.
    ///
    /// Fails with `AlreadyPersisted` when the entity already has an id.
    fn create(&self, entity: &mut T) -> RepoResult<EntityId>;

    /// Overwrites every mutable field of the stored record.
    ///
    /// Fails with `Unsaved` for entities without an id and `NotFound` when
    /// no stored record matches.
    fn update(&self, entity: &T) -> RepoResult<()>;

    /// Removes the stored record.
    fn delete(&self, entity: &T) -> RepoResult<()>;

    /// Returns `Ok(None)` when no record matches `id`.
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>>;

    /// Returns every stored record, ordered by identifier.
    fn find_all(&self) -> RepoResult<Vec<T>>;
}

pub(crate) fn ensure_unsaved<T: Entity>(entity: &T) -> RepoResult<()> {
    if entity.is_persisted() {
        return Err(RepoError::AlreadyPersisted {
            entity: T::NAME,
            id: entity.id(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_saved<T: Entity>(entity: &T) -> RepoResult<EntityId> {
    if !entity.is_persisted() {
        return Err(RepoError::Unsaved { entity: T::NAME });
    }
    Ok(entity.id())
}

/// Verifies that `conn` is migrated and exposes `table` with `columns`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
