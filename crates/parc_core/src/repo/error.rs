//! Repository error type and outcome classification.

use crate::db::DbError;
use crate::model::{EntityId, ValidationError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target record does not exist.
    NotFound { entity: &'static str, id: EntityId },
    /// Update/delete called on an entity that was never persisted.
    Unsaved { entity: &'static str },
    /// Create called on an entity that already has an identifier.
    AlreadyPersisted { entity: &'static str, id: EntityId },
    /// Entity failed field validation; storage was not touched.
    Validation(ValidationError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a model value.
    InvalidData(String),
}

/// Coarse outcome class callers can branch on without matching variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorKind {
    NotFound,
    ConstraintViolation,
    Connectivity,
    /// Caller broke an operation precondition.
    Invalid,
    Unknown,
}

impl RepoError {
    /// Classifies this error into a stable outcome class.
    pub fn kind(&self) -> RepoErrorKind {
        match self {
            Self::NotFound { .. } => RepoErrorKind::NotFound,
            Self::Unsaved { .. } | Self::AlreadyPersisted { .. } | Self::Validation(_) => {
                RepoErrorKind::Invalid
            }
            Self::Db(DbError::Sqlite(err)) => classify_sqlite_error(err),
            Self::Db(DbError::UnsupportedSchemaVersion { .. })
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => RepoErrorKind::Unknown,
        }
    }

    /// Stable snake_case code used in log events.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            RepoErrorKind::NotFound => "not_found",
            RepoErrorKind::ConstraintViolation => "constraint_violation",
            RepoErrorKind::Connectivity => "connectivity",
            RepoErrorKind::Invalid => "invalid",
            RepoErrorKind::Unknown => "unknown",
        }
    }
}

fn classify_sqlite_error(err: &rusqlite::Error) -> RepoErrorKind {
    match err {
        rusqlite::Error::QueryReturnedNoRows => RepoErrorKind::NotFound,
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => RepoErrorKind::ConstraintViolation,
            ErrorCode::CannotOpen
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::NotADatabase
            | ErrorCode::SystemIoFailure
            | ErrorCode::PermissionDenied
            | ErrorCode::ReadOnly
            | ErrorCode::DiskFull => RepoErrorKind::Connectivity,
            _ => RepoErrorKind::Unknown,
        },
        _ => RepoErrorKind::Unknown,
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Unsaved { entity } => write!(f, "{entity} has not been persisted yet"),
            Self::AlreadyPersisted { entity, id } => {
                write!(f, "{entity} is already persisted with id {id}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound { .. }
            | Self::Unsaved { .. }
            | Self::AlreadyPersisted { .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
