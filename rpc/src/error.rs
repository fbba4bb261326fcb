use celestia_openrpc_types::ErrorKind;
use http::header::InvalidHeaderValue;
use jsonrpsee::core::ClientError;

/// Message of the node's error for a blob which doesn't exist.
pub(crate) const BLOB_NOT_FOUND: &str = "blob: not found";

/// Message of the error reported by a [`Client`] after it was closed.
///
/// [`Client`]: crate::Client
pub(crate) const CLIENT_CLOSED: &str = "client closed";

/// Alias for a `Result` with the error type [`celestia_openrpc::Error`].
///
/// [`celestia_openrpc::Error`]: crate::Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Representation of all the errors that can occur when interacting with the node.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Auth token couldn't be put into the `Authorization` header.
    #[error("Token contains invalid characters: {0}")]
    InvalidCharactersInToken(#[from] InvalidHeaderValue),

    /// Error of the rpc transport or returned by the node.
    #[error(transparent)]
    JsonRpc(ClientError),

    /// The url has a scheme other than `http[s]` or `ws[s]`.
    #[error("Protocol not supported or missing: {0}")]
    ProtocolNotSupported(String),

    /// Validation or verification of the node's response failed.
    #[error(transparent)]
    Types(#[from] celestia_openrpc_types::Error),

    /// The requested item doesn't exist.
    #[error("Not found")]
    NotFound,

    /// Client was used after it was closed.
    #[error("Client closed")]
    ClientClosed,
}

impl Error {
    /// Get the stable [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCharactersInToken(_)
            | Error::ProtocolNotSupported(_)
            | Error::ClientClosed => ErrorKind::Transport,
            Error::NotFound => ErrorKind::NotFound,
            Error::Types(e) => e.kind(),
            Error::JsonRpc(e) => client_error_kind(e),
        }
    }
}

impl From<ClientError> for Error {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Custom(msg) if msg == CLIENT_CLOSED => Error::ClientClosed,
            ClientError::Call(err) if err.message().contains(BLOB_NOT_FOUND) => Error::NotFound,
            e => Error::JsonRpc(e),
        }
    }
}

fn client_error_kind(err: &ClientError) -> ErrorKind {
    match err {
        ClientError::RequestTimeout => ErrorKind::Deadline,
        ClientError::Call(err) if err.message().contains(BLOB_NOT_FOUND) => ErrorKind::NotFound,
        ClientError::Call(_) => ErrorKind::Rejected,
        ClientError::ParseError(_) => ErrorKind::Malformed,
        _ => ErrorKind::Transport,
    }
}

#[cfg(test)]
mod tests {
    use jsonrpsee::types::ErrorObject;

    use super::*;

    #[test]
    fn not_found_from_node_message() {
        let err = ClientError::Call(ErrorObject::owned(1, BLOB_NOT_FOUND, None::<()>));
        assert!(matches!(Error::from(err), Error::NotFound));

        let err = ClientError::Call(ErrorObject::owned(
            1,
            "getting blob: blob: not found",
            None::<()>,
        ));
        assert_eq!(Error::from(err).kind(), ErrorKind::NotFound);

        let err = ClientError::Call(ErrorObject::owned(1, "header: not found", None::<()>));
        assert_eq!(Error::from(err).kind(), ErrorKind::Rejected);
    }

    #[test]
    fn node_errors_are_not_transport() {
        let err = ClientError::Call(ErrorObject::owned(-32601, "method not found", None::<()>));
        let err = Error::from(err);
        assert!(matches!(err, Error::JsonRpc(_)));
        assert_eq!(err.kind(), ErrorKind::Rejected);

        let err = ClientError::Transport("connection reset".into());
        assert_eq!(Error::from(err).kind(), ErrorKind::Transport);
    }

    #[test]
    fn kinds_of_transport_errors() {
        assert_eq!(
            Error::from(ClientError::RequestTimeout).kind(),
            ErrorKind::Deadline
        );
        assert_eq!(
            Error::from(ClientError::Custom(CLIENT_CLOSED.into())).kind(),
            ErrorKind::Transport
        );
        assert!(matches!(
            Error::from(ClientError::Custom(CLIENT_CLOSED.into())),
            Error::ClientClosed
        ));
        assert_eq!(
            Error::ProtocolNotSupported("tcp://localhost".into()).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn kinds_of_types_errors() {
        let err = Error::from(celestia_openrpc_types::Error::EmptyBlobData);
        assert_eq!(err.kind(), ErrorKind::InvalidBlob);
    }
}
