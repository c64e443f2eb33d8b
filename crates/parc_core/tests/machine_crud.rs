use chrono::NaiveDate;
use parc_core::db::open_db_in_memory;
use parc_core::{
    Entity, Machine, MachineRepository, RepoError, RepoErrorKind, Repository, Room,
    SqliteMachineRepository, SqliteRoomRepository, ValidationError,
};
use rusqlite::Connection;

fn purchase_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
}

fn persisted_room(conn: &Connection, code: &str) -> Room {
    let repo = SqliteRoomRepository::try_new(conn).unwrap();
    let mut room = Room::new(code, "Test");
    repo.create(&mut room).unwrap();
    room
}

fn machine_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM machines;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_assigns_id_and_find_by_id_returns_equal_machine() {
    let conn = open_db_in_memory().unwrap();
    let room = persisted_room(&conn, "SA01");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut machine = Machine::new("MA01", "HP", 6000.0, purchase_date(), &room);
    let id = repo.create(&mut machine).unwrap();

    assert_eq!(machine.id(), id);
    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, machine);
    assert_eq!(loaded.purchase_date, purchase_date());
    assert_eq!(loaded.room_id, Some(room.id()));
}

#[test]
fn fractional_price_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let room = persisted_room(&conn, "SA01");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut machine = Machine::new("MA07", "Asus", 1234.56, purchase_date(), &room);
    repo.create(&mut machine).unwrap();

    let loaded = repo.find_by_id(machine.id()).unwrap().unwrap();
    assert_eq!(loaded.price, 1234.56);
}

#[test]
fn update_overwrites_every_field() {
    let conn = open_db_in_memory().unwrap();
    let first_room = persisted_room(&conn, "SA01");
    let second_room = persisted_room(&conn, "SA02");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut machine = Machine::new("MA01", "HP", 6000.0, purchase_date(), &first_room);
    repo.create(&mut machine).unwrap();

    machine.reference = "Updated Ref".to_string();
    machine.brand = "Dell".to_string();
    machine.price = 4500.5;
    machine.purchase_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    machine.assign_room(&second_room);
    repo.update(&machine).unwrap();

    let loaded = repo.find_by_id(machine.id()).unwrap().unwrap();
    assert_eq!(loaded, machine);
    assert_eq!(loaded.reference, "Updated Ref");
    assert_eq!(loaded.room_id, Some(second_room.id()));
}

#[test]
fn delete_then_lookups_report_absent() {
    let conn = open_db_in_memory().unwrap();
    let room = persisted_room(&conn, "SA01");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut machine = Machine::new("MA01", "HP", 6000.0, purchase_date(), &room);
    let id = repo.create(&mut machine).unwrap();
    repo.delete(&machine).unwrap();

    assert!(repo.find_by_id(id).unwrap().is_none());
    assert!(repo.find_all().unwrap().iter().all(|item| item.id() != id));

    let err = repo.delete(&machine).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "machine", .. }));
}

#[test]
fn update_of_unsaved_machine_does_not_touch_other_rows() {
    let conn = open_db_in_memory().unwrap();
    let room = persisted_room(&conn, "SA01");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut stored = Machine::new("MA01", "HP", 6000.0, purchase_date(), &room);
    repo.create(&mut stored).unwrap();

    let unsaved = Machine::new("MA02", "Dell", 1.0, purchase_date(), &room);
    let err = repo.update(&unsaved).unwrap_err();
    assert!(matches!(err, RepoError::Unsaved { entity: "machine" }));
    assert!(matches!(
        repo.delete(&unsaved),
        Err(RepoError::Unsaved { .. })
    ));

    let loaded = repo.find_by_id(stored.id()).unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(machine_count(&conn), 1);
}

#[test]
fn create_without_room_fails_validation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let unsaved_room = Room::new("SA01", "Informatique");
    let mut machine = Machine::new("MA01", "HP", 6000.0, purchase_date(), &unsaved_room);
    let err = repo.create(&mut machine).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingRoom)
    ));
    assert_eq!(err.kind(), RepoErrorKind::Invalid);
    assert!(!machine.is_persisted());
    assert_eq!(machine_count(&conn), 0);
}

#[test]
fn create_with_unknown_room_is_a_constraint_violation_and_rolls_back() {
    let conn = open_db_in_memory().unwrap();
    let room = persisted_room(&conn, "SA01");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut machine = Machine::new("MA01", "HP", 6000.0, purchase_date(), &room);
    machine.room_id = Some(room.id() + 100);
    let err = repo.create(&mut machine).unwrap_err();

    assert_eq!(err.kind(), RepoErrorKind::ConstraintViolation);
    assert!(!machine.is_persisted());
    assert_eq!(machine_count(&conn), 0);
    assert!(conn.is_autocommit());
}

#[test]
fn find_all_contains_created_machines() {
    let conn = open_db_in_memory().unwrap();
    let computing = persisted_room(&conn, "SA01");
    let network = persisted_room(&conn, "SA02");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut created = vec![
        Machine::new("MA01", "HP", 6000.0, purchase_date(), &computing),
        Machine::new("MA02", "Dell", 5500.0, purchase_date(), &computing),
        Machine::new("MA03", "Lenovo", 7000.0, purchase_date(), &network),
    ];
    for machine in &mut created {
        repo.create(machine).unwrap();
    }

    let machines = repo.find_all().unwrap();
    assert!(machines.len() >= created.len());
    for machine in &created {
        assert!(machines.contains(machine));
    }
    let references: Vec<&str> = machines.iter().map(|item| item.reference.as_str()).collect();
    assert_eq!(references, vec!["MA01", "MA02", "MA03"]);
}

#[test]
fn find_by_room_scopes_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let computing = persisted_room(&conn, "SA01");
    let network = persisted_room(&conn, "SA02");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut ma01 = Machine::new("MA01", "HP", 6000.0, purchase_date(), &computing);
    let mut ma03 = Machine::new("MA03", "Lenovo", 7000.0, purchase_date(), &network);
    repo.create(&mut ma01).unwrap();
    repo.create(&mut ma03).unwrap();

    assert_eq!(repo.find_by_room(computing.id()).unwrap(), vec![ma01]);
    assert_eq!(repo.find_by_room(network.id()).unwrap(), vec![ma03]);
    assert!(repo.find_by_room(network.id() + 1).unwrap().is_empty());
}

#[test]
fn corrupt_purchase_date_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let room = persisted_room(&conn, "SA01");
    let repo = SqliteMachineRepository::try_new(&conn).unwrap();

    let mut machine = Machine::new("MA01", "HP", 6000.0, purchase_date(), &room);
    repo.create(&mut machine).unwrap();
    conn.execute(
        "UPDATE machines SET purchase_date = 'yesterday' WHERE id = ?1;",
        [machine.id()],
    )
    .unwrap();

    let err = repo.find_by_id(machine.id()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
