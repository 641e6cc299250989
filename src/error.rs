//! Error types for greet sessions, configuration and the client.

use thiserror::Error;
use tonic::Status;

use crate::session::SessionState;

/// Errors that terminate a streaming session.
///
/// End of input is not an error: it is reported as `Ok(None)` by
/// [`DuplexStream::receive`](crate::session::DuplexStream::receive).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The inbound stream failed or was reset by the peer.
    #[error("transport error: {}", .0.message())]
    Transport(#[from] Status),

    /// The response stream is closed, usually because the client went away.
    #[error("send failed: response stream closed")]
    SendFailure,

    /// The session deadline elapsed while a receive or send was pending.
    #[error("session deadline exceeded")]
    DeadlineExceeded(#[from] tokio::time::error::Elapsed),
}

impl From<SessionError> for Status {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Transport(status) => status,
            SessionError::SendFailure => Status::unavailable(err.to_string()),
            SessionError::DeadlineExceeded(_) => Status::deadline_exceeded(err.to_string()),
        }
    }
}

/// Indicates that a session state change would move termination backwards.
#[derive(Debug, Error)]
#[error("invalid session transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: SessionState,
    pub to: SessionState,
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid address in {var}: '{value}'")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid duration in {var}: '{value}' (expected milliseconds)")]
    InvalidDuration {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Errors returned by [`GreetClient`](crate::grpc::GreetClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to connect to the server.
    #[error("failed to connect")]
    Connect(#[from] tonic::transport::Error),

    /// The call failed with a gRPC status.
    #[error("gRPC error: {0}")]
    Grpc(#[from] Status),

    /// The call did not complete within the configured timeout.
    #[error("timeout waiting for server response")]
    Timeout(#[from] tokio::time::error::Elapsed),

    /// The response stream ended before the server replied.
    #[error("response stream closed before a reply arrived")]
    StreamClosed,
}
