pub mod analyze;
pub mod diarize;
pub mod pipeline;
pub mod rewrite;

pub use analyze::*;
pub use diarize::*;
pub use pipeline::*;
pub use rewrite::*;

use std::time::Duration;

use tracing::warn;

use crate::llm::{GenerateError, TextGenerator};

/// Bounded retry around a generation call, applied only to rate-limit
/// failures. Every other failure aborts the branch on first occurrence.
pub(crate) async fn generate_with_retry<G: TextGenerator>(
    client: &G,
    prompt: &str,
    max_retries: u32,
) -> Result<String, GenerateError> {
    let mut attempt = 0u32;
    loop {
        match client.generate(prompt).await {
            Err(GenerateError::RateLimited) if attempt < max_retries => {
                attempt += 1;
                let delay = Duration::from_millis(500u64 << attempt);
                warn!(
                    "Rate limited, retrying in {:?} (attempt {} of {})",
                    delay, attempt, max_retries
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}
