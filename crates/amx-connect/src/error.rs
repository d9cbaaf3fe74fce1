//! Error types for the amx-connect crate

use amx_core_interface::{ConnectionError, ValueTypeError};
use thiserror::Error;

/// Anything that went wrong while talking to a remote bean.
///
/// Every attribute, introspection and navigation call on `AmxClient` reports
/// failures through this one type. The underlying cause is kept as `source()`.
#[derive(Error, Debug)]
pub enum RemoteAccessError {
    #[error("Exception in {operation}: {source}")]
    Connection {
        operation: &'static str,
        #[source]
        source: ConnectionError,
    },

    #[error("Exception in {operation}: attribute {attribute}: {source}")]
    UnexpectedType {
        operation: &'static str,
        attribute: String,
        #[source]
        source: ValueTypeError,
    },
}

impl RemoteAccessError {
    pub(crate) fn connection(operation: &'static str, source: ConnectionError) -> Self {
        RemoteAccessError::Connection { operation, source }
    }

    /// Name of the client call that failed (e.g. `"getAttribute"`)
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteAccessError::Connection { operation, .. }
            | RemoteAccessError::UnexpectedType { operation, .. } => operation,
        }
    }

    /// The connection-level failure, if this error came from the connection
    pub fn connection_error(&self) -> Option<&ConnectionError> {
        match self {
            RemoteAccessError::Connection { source, .. } => Some(source),
            RemoteAccessError::UnexpectedType { .. } => None,
        }
    }
}

/// Failure of `AmxClient::invoke`.
///
/// Unlike the other client calls, `invoke` keeps operation failures and
/// reflection failures apart from "could not reach the bean", so callers can
/// tell a missing bean from an operation that ran and failed.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error(transparent)]
    Access(#[from] RemoteAccessError),

    #[error("Operation failed: {0}")]
    Operation(#[source] ConnectionError),

    #[error("Operation could not be resolved: {0}")]
    Reflection(#[source] ConnectionError),
}

impl From<ConnectionError> for InvokeError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::MBean(_) => InvokeError::Operation(err),
            ConnectionError::Reflection(_) => InvokeError::Reflection(err),
            other => InvokeError::Access(RemoteAccessError::connection("invoke", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_core_interface::ObjectName;
    use std::error::Error as _;

    #[test]
    fn test_remote_access_error_keeps_cause() {
        let name = ObjectName::new("amx:type=cache").unwrap();
        let err = RemoteAccessError::connection(
            "getAttribute",
            ConnectionError::InstanceNotFound(name),
        );

        assert_eq!(err.operation(), "getAttribute");
        assert!(matches!(
            err.connection_error(),
            Some(ConnectionError::InstanceNotFound(_))
        ));
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<ConnectionError>().is_some());
    }

    #[test]
    fn test_invoke_error_classification() {
        let op = InvokeError::from(ConnectionError::MBean("boom".to_string()));
        assert!(matches!(op, InvokeError::Operation(_)));

        let refl = InvokeError::from(ConnectionError::Reflection("no such op".to_string()));
        assert!(matches!(refl, InvokeError::Reflection(_)));

        let io = InvokeError::from(ConnectionError::Io(std::io::Error::other("reset")));
        match io {
            InvokeError::Access(inner) => assert_eq!(inner.operation(), "invoke"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
