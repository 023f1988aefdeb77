//! Reduce a raw transport failure to a retry-relevant category.

use super::error::{ClassifiedError, ErrorCategory, TransportError};

/// Cause chains deeper than this are treated as `Unknown` instead of being
/// followed further; a transport that produces one is misbehaving.
const MAX_CAUSE_DEPTH: usize = 32;

/// Follows the cause chain to the innermost failure, or `None` when the
/// chain exceeds [`MAX_CAUSE_DEPTH`] hops.
fn unwind(error: &TransportError) -> Option<&TransportError> {
    let mut current = error;
    for _ in 0..=MAX_CAUSE_DEPTH {
        match current.cause() {
            Some(inner) => current = inner,
            None => return Some(current),
        }
    }
    None
}

fn categorize(innermost: &TransportError) -> ErrorCategory {
    match innermost {
        // Transports frequently bury the real network failure under wrapper
        // types; by the time we get here the chain is already unwound, so a
        // recognized code is authoritative.
        TransportError::Network { .. } => ErrorCategory::NetworkTransient,
        TransportError::DeadlineElapsed => ErrorCategory::Timeout,
        TransportError::Status { status, .. } if (400..600).contains(status) => {
            // 4xx deliberately included: the server answered, so retrying is
            // at least well-defined. See ErrorCategory::ClientError.
            ErrorCategory::ServerError(*status)
        }
        TransportError::Status { .. } | TransportError::Wrapped { .. } | TransportError::Other(_) => {
            ErrorCategory::Unknown
        }
    }
}

/// Classifies a transport failure for retry purposes.
///
/// Unwinds the cause chain first: the retry decision is based on the
/// innermost, most specific failure, while the returned [`ClassifiedError`]
/// keeps the outermost failure (context intact) as its cause. Pure and
/// infallible: every input maps to some category, `Unknown` being the
/// conservative default.
pub fn classify(error: TransportError) -> ClassifiedError {
    let category = match unwind(&error) {
        Some(innermost) => categorize(innermost),
        None => ErrorCategory::Unknown,
    };
    ClassifiedError {
        category,
        retryable: category.retryable(),
        cause: error,
    }
}
