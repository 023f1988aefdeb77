//! Retry engine for one logical network call.
//!
//! This module encapsulates failure classification (network codes, deadlines,
//! server statuses), exponential backoff with jitter, and per-attempt
//! timeouts so that transports (CLI, tests, embedding callers) can share a
//! consistent policy. The transport itself is supplied by the caller as an
//! async closure; nothing here opens sockets or parses payloads.

mod attempt;
mod classify;
mod error;
mod policy;
mod run;

pub use attempt::{run_attempt, Attempt, Outcome};
pub use classify::classify;
pub use error::{ClassifiedError, ErrorCategory, TransportCode, TransportError};
pub use policy::RetryPolicy;
pub use run::{run_with_retry, run_with_retry_rng};
