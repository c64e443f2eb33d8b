//! Demo entry point for the inventory core.
//!
//! # Responsibility
//! - Load configuration, start logging and open the store.
//! - Seed two rooms and three machines, then print the machines of the
//!   first room.

use chrono::Local;
use log::{error, info};
use parc_core::db::{open_db, open_db_in_memory};
use parc_core::{
    core_version, init_logging, AppConfig, InventoryService, RepoResult, RoomId,
    SqliteMachineRepository, SqliteRoomRepository,
};
use rusqlite::Connection;
use std::process::ExitCode;

const DEMO_ROOM_ID: RoomId = 1;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("parc: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("parc: logging disabled: {err}");
        }
    }
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let opened = match &config.db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("parc: cannot open database: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run_demo(&conn) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                "event=cli_demo module=cli status=error error_code={} error={}",
                err.code(),
                err
            );
            eprintln!("parc: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo(conn: &Connection) -> RepoResult<()> {
    let service = InventoryService::new(
        SqliteRoomRepository::try_new(conn)?,
        SqliteMachineRepository::try_new(conn)?,
    );

    service.seed_demo_inventory(Local::now().date_naive())?;

    if let Some(room) = service.room_with_machines(DEMO_ROOM_ID)? {
        println!("Room : {}", room.code);
        for machine in &room.machines {
            println!("  Machine : {}", machine.reference);
        }
    }

    Ok(())
}
