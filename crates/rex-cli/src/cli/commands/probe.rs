//! `rex probe` – check endpoint reachability (HEAD) through the retry path.

use anyhow::{Context, Result};
use rex_core::retry::{run_with_retry, Outcome, RetryPolicy};

use crate::cli::transport;

pub async fn run_probe(url: &str, policy: RetryPolicy) -> Result<()> {
    let outcome = run_with_retry(&policy, || {
        let url = url.to_string();
        let timeout = policy.per_attempt_timeout;
        async move {
            tokio::task::spawn_blocking(move || transport::head_status(&url, timeout))
                .await
                .map_err(|e| {
                    rex_core::retry::TransportError::Other(format!("transport task failed: {e}"))
                })?
        }
    })
    .await;

    match outcome {
        Outcome::Success(status) => {
            println!("{url}: reachable (HTTP {status})");
            Ok(())
        }
        Outcome::Failure(error) => {
            Err(anyhow::Error::new(error)).with_context(|| format!("probe of {url} failed"))
        }
    }
}
