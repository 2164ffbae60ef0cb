//! Maps SQLite failures onto `RepositoryError`.
//!
//! The schema carries exactly two duplicate-key shapes (the UNIQUE
//! constraint on `groups.restaurant_id` and the `attendees.user_id`
//! primary key) and two foreign keys (`groups -> restaurants`,
//! `attendees -> groups`), so only the constraint family of extended
//! codes needs individual treatment; everything else collapses into
//! connection or query failures.

use dinnersync_core::storage::RepositoryError;
use rusqlite::ffi;

/// Maps a `tokio_rusqlite` error to a `RepositoryError`.
///
/// Pass the entity id when the call site knows it; duplicate-key and
/// not-found variants carry it through to the API error message.
pub fn map_sqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: Option<&str>,
) -> RepositoryError {
    let id = id.unwrap_or("unknown").to_string();

    match err {
        tokio_rusqlite::Error::Rusqlite(inner) => match &inner {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                RepositoryError::AlreadyExists { entity_type, id }
            }

            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                RepositoryError::InvalidData(format!(
                    "{entity_type} {id} references a missing row"
                ))
            }

            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::CannotOpen =>
            {
                RepositoryError::ConnectionFailed(format!("Cannot open database: {inner}"))
            }

            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound { entity_type, id },

            _ => RepositoryError::QueryFailed(inner.to_string()),
        },

        tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }

        other => RepositoryError::QueryFailed(other.to_string()),
    }
}
