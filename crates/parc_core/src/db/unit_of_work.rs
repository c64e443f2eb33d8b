//! Transaction scope wrapping exactly one repository operation.
//!
//! # Responsibility
//! - Begin a transaction, run one operation, then commit it.
//! - Roll back when the operation fails so no partial state remains.
//!
//! # Invariants
//! - Every unit of work is finished (committed or rolled back) before
//!   `run_unit_of_work` returns.
//! - Units of work are never shared across operations.

use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::Display;
use std::time::Instant;

/// Locking intent of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOfWorkMode {
    /// Deferred transaction; takes a shared lock on first read.
    Read,
    /// Immediate transaction; takes the write lock up front.
    Write,
}

impl UnitOfWorkMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Read => TransactionBehavior::Deferred,
            Self::Write => TransactionBehavior::Immediate,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Runs `work` inside a fresh transaction on `conn`.
///
/// Commits when `work` succeeds and rolls back when it fails, returning the
/// original error.
///
/// # Side effects
/// - Emits `unit_of_work` logging events with operation name, duration and
///   status.
pub fn run_unit_of_work<T, E, F>(
    conn: &Connection,
    mode: UnitOfWorkMode,
    operation: &'static str,
    work: F,
) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error> + Display,
{
    let started_at = Instant::now();

    let tx = match Transaction::new_unchecked(conn, mode.behavior()) {
        Ok(tx) => tx,
        Err(err) => {
            error!(
                "event=unit_of_work module=db status=error op={operation} mode={} duration_ms={} error_code=begin_failed error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match work(&tx) {
        Ok(value) => match tx.commit() {
            Ok(()) => {
                debug!(
                    "event=unit_of_work module=db status=ok op={operation} mode={} duration_ms={}",
                    mode.as_str(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event=unit_of_work module=db status=error op={operation} mode={} duration_ms={} error_code=commit_failed error={}",
                    mode.as_str(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        },
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                error!(
                    "event=unit_of_work module=db status=error op={operation} mode={} error_code=rollback_failed error={}",
                    mode.as_str(),
                    rollback_err
                );
            }
            warn!(
                "event=unit_of_work module=db status=rolled_back op={operation} mode={} duration_ms={} error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
