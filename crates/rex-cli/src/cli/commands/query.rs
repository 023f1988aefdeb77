//! `rex query <DOC>` – send a GraphQL query with retries and print the response.

use anyhow::{Context, Result};
use rex_core::retry::{run_with_retry, Outcome, RetryPolicy};

use crate::cli::transport;

pub async fn run_query(url: &str, query: &str, policy: RetryPolicy) -> Result<()> {
    let body = serde_json::json!({ "query": query });

    let outcome = run_with_retry(&policy, || {
        let url = url.to_string();
        let body = body.clone();
        let timeout = policy.per_attempt_timeout;
        async move {
            tokio::task::spawn_blocking(move || transport::post_json(&url, &body, timeout))
                .await
                .map_err(|e| {
                    rex_core::retry::TransportError::Other(format!("transport task failed: {e}"))
                })?
        }
    })
    .await;

    match outcome {
        Outcome::Success(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Outcome::Failure(error) => {
            let gave_up = if error.retryable {
                "gave up after retries"
            } else {
                "not retryable"
            };
            Err(anyhow::Error::new(error))
                .with_context(|| format!("query against {url} failed ({gave_up})"))
        }
    }
}
