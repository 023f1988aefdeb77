//! Transport failure representation and classification output.
//!
//! `TransportError` is the structured failure a transport reports to the
//! engine: a tagged value carrying a network code, a server status, or a
//! wrapped inner failure, so classification can pattern-match instead of
//! inspecting type identity.

use std::fmt;
use thiserror::Error;

/// Errno-style code for a network-level failure the engine treats as
/// transient. Transports map their own error types onto this set; anything
/// that does not fit belongs in [`TransportError::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// ETIMEDOUT: the socket operation itself timed out.
    TimedOut,
    /// ENETDOWN
    NetworkDown,
    /// ENETRESET
    NetworkReset,
    /// ENETUNREACH
    NetworkUnreachable,
    /// ECONNABORTED
    ConnectionAborted,
    /// ECONNRESET
    ConnectionReset,
    /// ECONNREFUSED
    ConnectionRefused,
    /// EMFILE: out of file descriptors; clears up once sockets close.
    TooManyOpenFiles,
    /// Peer killed the connection mid-transfer (no errno, e.g. a socket
    /// closed between response headers and body).
    SocketClosed,
}

/// Failure reported by one transport attempt.
///
/// Transports wrap lower-level failures with [`TransportError::wrap`]; the
/// classifier unwinds the chain and decides retryability from the innermost
/// cause.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure with a recognized transient code.
    #[error("network error ({code:?}): {message}")]
    Network {
        code: TransportCode,
        message: String,
    },
    /// The attempt deadline elapsed before the transport finished.
    #[error("attempt deadline elapsed")]
    DeadlineElapsed,
    /// The server answered with an HTTP-style status code.
    #[error("server returned status {status}")]
    Status { status: u16, body: Option<String> },
    /// A higher layer added context around another transport failure.
    #[error("{context}")]
    Wrapped {
        context: String,
        #[source]
        source: Box<TransportError>,
    },
    /// Anything else: malformed input, protocol violations, bugs. Never
    /// retried.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn network(code: TransportCode, message: impl Into<String>) -> Self {
        TransportError::Network {
            code,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        TransportError::Status { status, body: None }
    }

    /// Wraps this failure with context, extending the cause chain.
    pub fn wrap(self, context: impl Into<String>) -> Self {
        TransportError::Wrapped {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The directly wrapped failure, if this is a wrapper.
    pub fn cause(&self) -> Option<&TransportError> {
        match self {
            TransportError::Wrapped { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Retry-relevant category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The per-attempt deadline elapsed (distinct from a socket-level
    /// ETIMEDOUT, which is `NetworkTransient`).
    Timeout,
    /// Transient network failure (reset, refused, unreachable, ...).
    NetworkTransient,
    /// Server-reported status in 400..600. The full range is retryable,
    /// 4xx included.
    ServerError(u16),
    /// Reserved: 4xx statuses currently fold into `ServerError`. Splitting
    /// them out (and making them fatal) is a pending policy refinement.
    ClientError(u16),
    /// Unrecognized failure shape. Never retried, so a malformed request or
    /// a programming error cannot cause a retry storm.
    Unknown,
}

impl ErrorCategory {
    pub fn retryable(self) -> bool {
        match self {
            ErrorCategory::Timeout
            | ErrorCategory::NetworkTransient
            | ErrorCategory::ServerError(_) => true,
            ErrorCategory::ClientError(_) | ErrorCategory::Unknown => false,
        }
    }
}

/// A transport failure reduced to its retry-relevant category.
///
/// Built once by [`classify`](super::classify); the `retryable` flag is the
/// sole authority on retry eligibility and is never recomputed downstream.
#[derive(Debug)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub retryable: bool,
    /// The original (outermost) failure, chain intact.
    pub cause: TransportError,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.category, self.cause)
    }
}

impl std::error::Error for ClassifiedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
