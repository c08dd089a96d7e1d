//! Database errors and their translation to `PortError`

use thiserror::Error;

use core_kernel::PortError;

/// PostgreSQL SQLSTATE codes the claim store reacts to
mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const CHECK_VIOLATION: &str = "23514";
}

/// Errors raised by the repositories
///
/// `sqlx` errors are classified by SQLSTATE on conversion, so the
/// active-claim and single-owner unique indexes surface as
/// [`DatabaseError::DuplicateEntry`] even when propagated with `?`.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique index violation; carries the constraint name when known
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A state-guarded `UPDATE` matched no row
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded into a domain value
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DatabaseError {
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Claim", "CLM-123");
    /// assert!(error.is_not_found());
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted)
    }
}

fn from_database_error(err: &dyn sqlx::error::DatabaseError) -> DatabaseError {
    let detail = match err.constraint() {
        Some(constraint) => format!("{} ({})", err.message(), constraint),
        None => err.message().to_string(),
    };
    match err.code().as_deref() {
        Some(sqlstate::UNIQUE_VIOLATION) => DatabaseError::DuplicateEntry(detail),
        Some(sqlstate::FOREIGN_KEY_VIOLATION) => DatabaseError::ForeignKeyViolation(detail),
        Some(sqlstate::CHECK_VIOLATION) => DatabaseError::ConstraintViolation(detail),
        _ => DatabaseError::QueryFailed(detail),
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::SerializationError(error.to_string())
            }
            sqlx::Error::Database(db_err) => from_database_error(db_err.as_ref()),
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        DatabaseError::SerializationError(error.to_string())
    }
}

/// Translation applied by every adapter before a result leaves `infra_db`
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => PortError::NotFound {
                entity_type: "record".to_string(),
                id: message,
            },
            DatabaseError::DuplicateEntry(message) | DatabaseError::Conflict(message) => {
                PortError::conflict(message)
            }
            DatabaseError::PoolExhausted => PortError::ServiceUnavailable {
                service: "postgres connection pool".to_string(),
            },
            DatabaseError::ConnectionFailed(_) => PortError::connection(error.to_string()),
            other => PortError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(error.is_not_found());
        assert!(PortError::from(error).is_not_found());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(error.is_connection_error());
        assert!(PortError::from(error).is_transient());
        assert!(PortError::from(DatabaseError::ConnectionFailed("refused".into())).is_transient());
    }

    #[test]
    fn test_duplicate_and_conflict_map_to_port_conflict() {
        let duplicate = DatabaseError::DuplicateEntry("venue_claims_active_claimant_venue".into());
        assert!(duplicate.is_constraint_violation());
        assert!(PortError::from(duplicate).is_conflict());
        assert!(PortError::from(DatabaseError::Conflict("not pending".into())).is_conflict());
    }

    #[test]
    fn test_decode_failure_is_internal() {
        let error = DatabaseError::SerializationError("bad status".into());
        let port = PortError::from(error);
        assert!(!port.is_transient());
        assert!(matches!(port, PortError::Internal { .. }));
    }
}
