use anyhow::{Context, Result};
use tracing::info;

use crate::knowledge::RetrievedChunk;
use crate::llm::{TextGenerator, build_ideal_call_prompt};
use crate::models::{AnalysisReport, SpeakerLabels};

use super::generate_with_retry;

/// Execute the ideal-call rewrite stage: augment the prompt with the
/// retrieved knowledge and generate the rewritten script.
pub async fn execute_rewrite<G: TextGenerator>(
    client: &G,
    transcript: &str,
    report: &AnalysisReport,
    retrieved: &[RetrievedChunk],
    labels: &SpeakerLabels,
    max_retries: u32,
) -> Result<String> {
    info!(
        "Building ideal-call prompt with {} knowledge chunk(s)",
        retrieved.len()
    );
    let prompt = build_ideal_call_prompt(transcript, report, retrieved, labels);

    generate_with_retry(client, &prompt, max_retries)
        .await
        .context("Ideal call generation failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::testing::MockGenerator;

    #[tokio::test]
    async fn test_rewrite_returns_model_text() {
        let script = "AGENT: Hello, thank you for calling, my name is Dana.\nPATIENT: Hi.";
        let client = MockGenerator::new(vec![Ok(script.to_string())]);

        let rewritten = execute_rewrite(
            &client,
            "AGENT: Hey.\nPATIENT: Hi.",
            &AnalysisReport::default(),
            &[],
            &SpeakerLabels::default(),
            0,
        )
        .await
        .unwrap();

        assert_eq!(rewritten, script);
        assert_eq!(client.call_count(), 1);
    }
}
