use anyhow::{Context, Result, bail};
use tracing::info;

use crate::io::parse_dialogue;
use crate::llm::{TextGenerator, build_diarization_prompt};
use crate::models::SpeakerLabels;

use super::generate_with_retry;

/// Execute the diarization stage: format raw speech-to-text output into
/// speaker-labeled dialogue.
///
/// The model output is validated by parsing it: a response with no
/// recognizable labeled line is a failure, not a transcript.
pub async fn execute_diarization<G: TextGenerator>(
    client: &G,
    raw_text: &str,
    labels: &SpeakerLabels,
    max_retries: u32,
) -> Result<String> {
    if raw_text.trim().is_empty() {
        bail!("No raw transcript text provided for diarization");
    }

    let prompt = build_diarization_prompt(raw_text, labels);
    let formatted = generate_with_retry(client, &prompt, max_retries)
        .await
        .context("Diarization generation failed")?;
    let formatted = formatted.trim();

    let dialogue = parse_dialogue(formatted, labels);
    if dialogue.is_empty() {
        bail!(
            "Diarization output contains no '{}' or '{}' labeled lines",
            labels.agent,
            labels.patient
        );
    }

    info!(
        "Diarization produced {} labeled utterance(s)",
        dialogue.len()
    );

    Ok(formatted.to_string())
}
