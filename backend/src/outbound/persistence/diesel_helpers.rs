//! Error mapping and conversions shared by the Diesel repositories.

use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors to store connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors to store errors, logging the database detail.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StoreError::query("referenced record does not exist")
        }
        _ => StoreError::query("database error"),
    }
}

/// Convert a `COUNT(*)` result into an unsigned count.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Convert a pagination offset into a SQL `BIGINT`.
pub(crate) fn offset_to_i64(offset: u64) -> Result<i64, StoreError> {
    i64::try_from(offset).map_err(|_| StoreError::query("page offset out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom")))
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let error = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(error, StoreError::Connection { .. }));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation))]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation))]
    #[case(DieselError::NotFound)]
    fn other_failures_map_to_query_errors(#[case] error: DieselError) {
        assert!(matches!(map_diesel_error(error), StoreError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, StoreError::connection("timed out"));
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, 0)]
    #[case(42, 42)]
    fn counts_clamp_to_zero(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(count_to_u64(raw), expected);
    }
}
