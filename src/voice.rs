use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::io::parse_dialogue;
use crate::models::{Speaker, SpeakerLabels};

const ELEVENLABS_ENDPOINT: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// Configuration for the ElevenLabs TTS client
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// API key (from ELEVENLABS_API_KEY env var)
    pub api_key: String,
    /// Voice identity used for agent lines (AGENT_VOICE_ID)
    pub agent_voice_id: String,
    /// Voice identity used for patient lines (PATIENT_VOICE_ID)
    pub patient_voice_id: String,
    /// TTS model identifier
    pub model_id: String,
}

impl VoiceConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ELEVENLABS_API_KEY")
            .context("ELEVENLABS_API_KEY environment variable not set")?;
        let agent_voice_id = std::env::var("AGENT_VOICE_ID")
            .context("AGENT_VOICE_ID environment variable not set")?;
        let patient_voice_id = std::env::var("PATIENT_VOICE_ID")
            .context("PATIENT_VOICE_ID environment variable not set")?;
        let model_id = std::env::var("ELEVENLABS_MODEL")
            .unwrap_or_else(|_| "eleven_multilingual_v2".to_string());

        Ok(Self {
            api_key,
            agent_voice_id,
            patient_voice_id,
            model_id,
        })
    }

    fn voice_for(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Agent => &self.agent_voice_id,
            Speaker::Patient => &self.patient_voice_id,
        }
    }
}

/// Thin adapter over the text-to-speech service: text plus a voice identity
/// in, audio bytes out.
pub struct VoiceClient {
    client: reqwest::Client,
    config: VoiceConfig,
}

impl VoiceClient {
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Synthesize one utterance with the given voice
    pub async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>> {
        let request = SynthesisRequest {
            text: text.to_string(),
            model_id: self.config.model_id.clone(),
        };

        let response = self
            .client
            .post(format!("{ELEVENLABS_ENDPOINT}/{voice_id}"))
            .header("xi-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to ElevenLabs API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("ElevenLabs API error: {} - {}", status, body);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio bytes from response")?;
        Ok(bytes.to_vec())
    }

    /// Synthesize a full labeled script into a single audio file.
    ///
    /// Each utterance is voiced with its speaker's configured voice and the
    /// audio bytes are appended in dialogue order. Unlabeled and empty
    /// lines are skipped by the turn parser; a failed utterance is logged
    /// and skipped rather than aborting the whole render. Fails only when
    /// no segment at all could be generated.
    pub async fn synthesize_dialogue(
        &self,
        script: &str,
        labels: &SpeakerLabels,
        output: &Path,
    ) -> Result<usize> {
        let dialogue = parse_dialogue(script, labels);
        if dialogue.is_empty() {
            bail!(
                "Script contains no '{}' or '{}' labeled lines",
                labels.agent,
                labels.patient
            );
        }

        let mut file = std::fs::File::create(output)
            .with_context(|| format!("Failed to create audio file {:?}", output))?;

        let mut segments = 0usize;
        for (index, utterance) in dialogue.utterances.iter().enumerate() {
            let voice_id = self.config.voice_for(utterance.speaker);
            info!(
                "Generating audio for utterance {} of {} ({:?})",
                index + 1,
                dialogue.len(),
                utterance.speaker
            );

            match self.synthesize(voice_id, &utterance.text).await {
                Ok(bytes) if bytes.is_empty() => {
                    warn!("Received no audio for utterance {}", index + 1);
                }
                Ok(bytes) => {
                    file.write_all(&bytes).with_context(|| {
                        format!("Failed to append audio to {:?}", output)
                    })?;
                    segments += 1;
                }
                Err(e) => {
                    warn!("Skipping utterance {} after TTS error: {}", index + 1, e);
                }
            }
        }

        if segments == 0 {
            bail!("No audio segments were successfully generated");
        }

        info!("Wrote {} audio segment(s) to {:?}", segments, output);
        Ok(segments)
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest {
    text: String,
    model_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> VoiceConfig {
        VoiceConfig {
            api_key: "key".to_string(),
            agent_voice_id: "voice-a".to_string(),
            patient_voice_id: "voice-p".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
        }
    }

    #[test]
    fn test_voice_selection_per_speaker() {
        let config = config();
        assert_eq!(config.voice_for(Speaker::Agent), "voice-a");
        assert_eq!(config.voice_for(Speaker::Patient), "voice-p");
    }

    #[tokio::test]
    async fn test_unlabeled_script_is_rejected_without_io() {
        let dir = tempfile::tempdir().unwrap();
        let client = VoiceClient::new(config());

        let result = client
            .synthesize_dialogue(
                "no labels anywhere in this text",
                &SpeakerLabels::default(),
                &dir.path().join("out.mp3"),
            )
            .await;

        assert!(result.is_err());
        assert!(!dir.path().join("out.mp3").exists());
    }
}
