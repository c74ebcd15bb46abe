//! Error shared by the relational entity repositories.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Persistence failures raised by entity repository adapters.
    pub enum StoreError {
        /// Store connection could not be established or was lost.
        Connection { message: String } => "store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "store query failed: {message}",
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        Error::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn maps_to_internal_error() {
        let error: Error = StoreError::query("relation missing").into();
        assert_eq!(error.code(), ErrorCode::InternalError);
        assert_eq!(error.message(), "store query failed: relation missing");
    }
}
