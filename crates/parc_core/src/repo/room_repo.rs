//! Room repository backed by SQLite.
//!
//! # Invariants
//! - Every room read loads the room's machines eagerly.
//! - Room writes never touch the `machines` table; the machine side owns
//!   the relationship.
//! - A room that still owns machines cannot be deleted (foreign key).

use crate::db::{run_unit_of_work, UnitOfWorkMode};
use crate::model::{Entity, EntityId, Machine, Room, RoomId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::machine_repo::{select_all_machines, select_machines_by_room};
use crate::repo::repository::{
    ensure_connection_ready, ensure_saved, ensure_unsaved, Repository,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const ROOM_SELECT_SQL: &str = "SELECT id, code, type FROM rooms";

/// SQLite-backed room repository.
pub struct SqliteRoomRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoomRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "rooms", &["id", "code", "type"])?;
        Ok(Self { conn })
    }
}

impl Repository<Room> for SqliteRoomRepository<'_> {
    fn create(&self, room: &mut Room) -> RepoResult<EntityId> {
        ensure_unsaved(room)?;
        room.validate()?;

        let id = run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Write,
            "room_create",
            |tx| -> RepoResult<EntityId> {
                tx.execute(
                    "INSERT INTO rooms (code, type) VALUES (?1, ?2);",
                    params![room.code.as_str(), room.kind.as_str()],
                )?;
                Ok(tx.last_insert_rowid())
            },
        )?;

        room.assign_id(id);
        Ok(id)
    }

    fn update(&self, room: &Room) -> RepoResult<()> {
        let id = ensure_saved(room)?;
        room.validate()?;

        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Write,
            "room_update",
            |tx| -> RepoResult<()> {
                let changed = tx.execute(
                    "UPDATE rooms SET code = ?1, type = ?2 WHERE id = ?3;",
                    params![room.code.as_str(), room.kind.as_str(), id],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: Room::NAME,
                        id,
                    });
                }
                Ok(())
            },
        )
    }

    fn delete(&self, room: &Room) -> RepoResult<()> {
        let id = ensure_saved(room)?;

        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Write,
            "room_delete",
            |tx| -> RepoResult<()> {
                let changed = tx.execute("DELETE FROM rooms WHERE id = ?1;", [id])?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: Room::NAME,
                        id,
                    });
                }
                Ok(())
            },
        )
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Room>> {
        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Read,
            "room_find_by_id",
            |tx| -> RepoResult<Option<Room>> {
                let room = tx
                    .query_row(
                        &format!("{ROOM_SELECT_SQL} WHERE id = ?1;"),
                        [id],
                        parse_room_row,
                    )
                    .optional()?;

                match room {
                    Some(mut room) => {
                        room.machines = select_machines_by_room(tx, id)?;
                        Ok(Some(room))
                    }
                    None => Ok(None),
                }
            },
        )
    }

    fn find_all(&self) -> RepoResult<Vec<Room>> {
        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Read,
            "room_find_all",
            |tx| -> RepoResult<Vec<Room>> {
                let mut stmt = tx.prepare(&format!("{ROOM_SELECT_SQL} ORDER BY id ASC;"))?;
                let mut rows = stmt.query([])?;
                let mut rooms = Vec::new();
                while let Some(row) = rows.next()? {
                    rooms.push(parse_room_row(row)?);
                }

                let mut machines_by_room = group_by_room(select_all_machines(tx)?);
                for room in &mut rooms {
                    room.machines = machines_by_room.remove(&room.id()).unwrap_or_default();
                }
                Ok(rooms)
            },
        )
    }
}

fn parse_room_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room::with_id(
        row.get("id")?,
        row.get("code")?,
        row.get("type")?,
    ))
}

fn group_by_room(machines: Vec<Machine>) -> HashMap<RoomId, Vec<Machine>> {
    let mut grouped: HashMap<RoomId, Vec<Machine>> = HashMap::new();
    for machine in machines {
        if let Some(room_id) = machine.room_id {
            grouped.entry(room_id).or_default().push(machine);
        }
    }
    grouped
}
