//! Machine repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Machine::validate()` before SQL mutations.
//! - `room_id` must reference an existing room; the foreign key rejects
//!   anything else.

use crate::db::{run_unit_of_work, UnitOfWorkMode};
use crate::model::{Entity, EntityId, Machine, RoomId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::repository::{
    ensure_connection_ready, ensure_saved, ensure_unsaved, Repository,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

const MACHINE_SELECT_SQL: &str = "SELECT
    id,
    reference,
    brand,
    price,
    purchase_date,
    room_id
FROM machines";

const MACHINE_COLUMNS: &[&str] = &[
    "id",
    "reference",
    "brand",
    "price",
    "purchase_date",
    "room_id",
];

/// Machine persistence with the room-scoped lookup used by room reads.
pub trait MachineRepository: Repository<Machine> {
    /// Returns every machine owned by `room_id`, ordered by identifier.
    fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Machine>>;
}

/// SQLite-backed machine repository.
pub struct SqliteMachineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMachineRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "machines", MACHINE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl Repository<Machine> for SqliteMachineRepository<'_> {
    fn create(&self, machine: &mut Machine) -> RepoResult<EntityId> {
        ensure_unsaved(machine)?;
        machine.validate()?;

        let id = run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Write,
            "machine_create",
            |tx| -> RepoResult<EntityId> {
                tx.execute(
                    "INSERT INTO machines (
                        reference,
                        brand,
                        price,
                        purchase_date,
                        room_id
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        machine.reference.as_str(),
                        machine.brand.as_str(),
                        machine.price,
                        format_purchase_date(machine.purchase_date),
                        machine.room_id,
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            },
        )?;

        machine.assign_id(id);
        Ok(id)
    }

    fn update(&self, machine: &Machine) -> RepoResult<()> {
        let id = ensure_saved(machine)?;
        machine.validate()?;

        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Write,
            "machine_update",
            |tx| -> RepoResult<()> {
                let changed = tx.execute(
                    "UPDATE machines
                     SET
                        reference = ?1,
                        brand = ?2,
                        price = ?3,
                        purchase_date = ?4,
                        room_id = ?5
                     WHERE id = ?6;",
                    params![
                        machine.reference.as_str(),
                        machine.brand.as_str(),
                        machine.price,
                        format_purchase_date(machine.purchase_date),
                        machine.room_id,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: Machine::NAME,
                        id,
                    });
                }
                Ok(())
            },
        )
    }

    fn delete(&self, machine: &Machine) -> RepoResult<()> {
        let id = ensure_saved(machine)?;

        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Write,
            "machine_delete",
            |tx| -> RepoResult<()> {
                let changed = tx.execute("DELETE FROM machines WHERE id = ?1;", [id])?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: Machine::NAME,
                        id,
                    });
                }
                Ok(())
            },
        )
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Machine>> {
        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Read,
            "machine_find_by_id",
            |tx| -> RepoResult<Option<Machine>> {
                select_machine(tx, id)
            },
        )
    }

    fn find_all(&self) -> RepoResult<Vec<Machine>> {
        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Read,
            "machine_find_all",
            |tx| -> RepoResult<Vec<Machine>> {
                select_all_machines(tx)
            },
        )
    }
}

impl MachineRepository for SqliteMachineRepository<'_> {
    fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Machine>> {
        run_unit_of_work(
            self.conn,
            UnitOfWorkMode::Read,
            "machine_find_by_room",
            |tx| -> RepoResult<Vec<Machine>> {
                select_machines_by_room(tx, room_id)
            },
        )
    }
}

fn select_machine(conn: &Connection, id: EntityId) -> RepoResult<Option<Machine>> {
    let mut stmt = conn.prepare(&format!("{MACHINE_SELECT_SQL} WHERE id = ?1;"))?;
    let parsed = stmt
        .query_row([id], |row| Ok(parse_machine_row(row)))
        .optional()?;
    parsed.transpose()
}

pub(crate) fn select_all_machines(conn: &Connection) -> RepoResult<Vec<Machine>> {
    let mut stmt = conn.prepare(&format!("{MACHINE_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut machines = Vec::new();
    while let Some(row) = rows.next()? {
        machines.push(parse_machine_row(row)?);
    }
    Ok(machines)
}

pub(crate) fn select_machines_by_room(
    conn: &Connection,
    room_id: RoomId,
) -> RepoResult<Vec<Machine>> {
    let mut stmt = conn.prepare(&format!(
        "{MACHINE_SELECT_SQL} WHERE room_id = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([room_id])?;
    let mut machines = Vec::new();
    while let Some(row) = rows.next()? {
        machines.push(parse_machine_row(row)?);
    }
    Ok(machines)
}

fn parse_machine_row(row: &Row<'_>) -> RepoResult<Machine> {
    let id: EntityId = row.get("id")?;

    let date_text: String = row.get("purchase_date")?;
    let purchase_date = NaiveDate::parse_from_str(&date_text, PURCHASE_DATE_FORMAT)
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{date_text}` in machines.purchase_date for id {id}"
            ))
        })?;

    Ok(Machine::with_id(
        id,
        row.get("reference")?,
        row.get("brand")?,
        row.get("price")?,
        purchase_date,
        row.get("room_id")?,
    ))
}

fn format_purchase_date(date: NaiveDate) -> String {
    date.format(PURCHASE_DATE_FORMAT).to_string()
}
