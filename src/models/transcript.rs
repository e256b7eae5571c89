use serde::{Deserialize, Serialize};

/// The two fixed roles in a coaching call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The customer support representative being graded
    Agent,
    /// The counterparty on the call
    Patient,
}

/// Speaker label prefixes recognized in transcript files
///
/// Label matching is case-sensitive and exact. The defaults match the
/// diarization output format (`AGENT:` / `PATIENT:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLabels {
    pub agent: String,
    pub patient: String,
}

impl Default for SpeakerLabels {
    fn default() -> Self {
        Self {
            agent: "AGENT".to_string(),
            patient: "PATIENT".to_string(),
        }
    }
}

impl SpeakerLabels {
    pub fn new(agent: impl Into<String>, patient: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            patient: patient.into(),
        }
    }

    /// The label text for a speaker, without the separator
    pub fn label_for(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Agent => &self.agent,
            Speaker::Patient => &self.patient,
        }
    }
}

/// A single speaker-attributed line of dialogue
///
/// The text is trimmed and non-empty; empty or unlabeled lines are dropped
/// at parse time, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
}

/// An ordered, immutable sequence of utterances parsed from one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub utterances: Vec<Utterance>,
}

impl Dialogue {
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Number of utterances attributed to the given speaker
    pub fn count_for(&self, speaker: Speaker) -> usize {
        self.utterances
            .iter()
            .filter(|u| u.speaker == speaker)
            .count()
    }

    /// Render the dialogue back to `LABEL: text` lines, one per utterance
    pub fn render(&self, labels: &SpeakerLabels) -> String {
        let mut output = String::new();
        for utterance in &self.utterances {
            output.push_str(labels.label_for(utterance.speaker));
            output.push_str(": ");
            output.push_str(&utterance.text);
            output.push('\n');
        }
        output
    }
}
