#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Coarse classification of a SeaORM error, used by repositories to turn
/// constraint violations into domain errors.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    NotFound,
    Unavailable,
    Other,
}

#[cfg(feature = "postgres")]
impl DbErrorKind {
    pub fn of(error: &sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, SqlErr};

        match error.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::UniqueViolation,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::ForeignKeyViolation,
            _ => match error {
                DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::NotFound,
                DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Self::Unavailable,
                _ => Self::Other,
            },
        }
    }
}

#[cfg(all(test, feature = "postgres"))]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_classifies_not_found() {
        assert_eq!(
            DbErrorKind::of(&DbErr::RecordNotFound("product".into())),
            DbErrorKind::NotFound
        );
        assert_eq!(DbErrorKind::of(&DbErr::RecordNotUpdated), DbErrorKind::NotFound);
    }

    #[test]
    fn test_unrecognized_errors_are_other() {
        assert_eq!(DbErrorKind::of(&DbErr::Custom("boom".into())), DbErrorKind::Other);
    }

    #[test]
    fn test_database_error_from_db_err() {
        let err: DatabaseError = DbErr::Custom("boom".into()).into();
        assert!(err.to_string().contains("boom"));
    }
}
