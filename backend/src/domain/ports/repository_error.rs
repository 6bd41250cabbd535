//! Shared error type for the persistence ports.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Failures raised by persistence adapters.
    pub enum RepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// A read or write was rejected or failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A stored item could not be mapped to or from a domain record.
        Serialization { message: String } => "repository item mapping failed: {message}",
        /// A create-if-absent write found an existing record.
        AlreadyExists { key: String } => "record already exists: {key}",
    }
}

impl From<RepositoryError> for Error {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Connection { message } => {
                Error::service_unavailable(format!("storage unavailable: {message}"))
            }
            RepositoryError::AlreadyExists { key } => {
                Error::conflict(format!("record already exists: {key}"))
            }
            other @ (RepositoryError::Query { .. } | RepositoryError::Serialization { .. }) => {
                Error::internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::connection("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("validation"), ErrorCode::InternalError)]
    #[case(RepositoryError::serialization("missing field"), ErrorCode::InternalError)]
    #[case(RepositoryError::already_exists("giran_fan"), ErrorCode::Conflict)]
    fn maps_to_domain_codes(#[case] error: RepositoryError, #[case] code: ErrorCode) {
        assert_eq!(Error::from(error).code(), code);
    }
}
