use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::models::{Dialogue, Speaker, SpeakerLabels, Utterance};

/// Load a transcript file into a single text blob.
///
/// Fails explicitly when the file is absent or unreadable; no pipeline
/// stage runs without a transcript.
pub fn load_transcript(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("Transcript file not found at {:?}", path);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript file {:?}", path))
}

/// Split raw transcript text into speaker-attributed utterances.
///
/// A line is kept only if, after trimming, it starts with a recognized
/// label followed by `:` and has non-empty remaining text. Label matching
/// is case-sensitive and exact. Malformed lines are dropped, never stored
/// and never an error. Pure function, no side effects beyond diagnostics.
pub fn parse_dialogue(text: &str, labels: &SpeakerLabels) -> Dialogue {
    let agent_prefix = format!("{}:", labels.agent);
    let patient_prefix = format!("{}:", labels.patient);

    let mut utterances = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (speaker, rest) = if let Some(rest) = line.strip_prefix(&agent_prefix) {
            (Speaker::Agent, rest)
        } else if let Some(rest) = line.strip_prefix(&patient_prefix) {
            (Speaker::Patient, rest)
        } else {
            debug!(
                "Skipping line {} (no speaker label): '{}'",
                line_num + 1,
                truncate(line, 60)
            );
            continue;
        };

        let utterance = rest.trim();
        if utterance.is_empty() {
            debug!(
                "Skipping line {} (empty utterance after label)",
                line_num + 1
            );
            continue;
        }

        utterances.push(Utterance {
            speaker,
            text: utterance.to_string(),
        });
    }

    Dialogue { utterances }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_dialogue() {
        let text = "AGENT: Hello, thank you for calling.\nPATIENT: Hi, I need an appointment.\n";
        let dialogue = parse_dialogue(text, &SpeakerLabels::default());

        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue.utterances[0].speaker, Speaker::Agent);
        assert_eq!(dialogue.utterances[0].text, "Hello, thank you for calling.");
        assert_eq!(dialogue.utterances[1].speaker, Speaker::Patient);
    }

    #[test]
    fn test_unlabeled_and_empty_lines_dropped() {
        let text = "\nsome stray narration\nAGENT: Hi.\n\nNURSE: not a known label\nPATIENT: Hello.\n";
        let dialogue = parse_dialogue(text, &SpeakerLabels::default());

        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue.utterances[0].text, "Hi.");
        assert_eq!(dialogue.utterances[1].text, "Hello.");
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        let text = "agent: lowercase label\nAGENT: proper label\n";
        let dialogue = parse_dialogue(text, &SpeakerLabels::default());

        assert_eq!(dialogue.len(), 1);
        assert_eq!(dialogue.utterances[0].text, "proper label");
    }

    #[test]
    fn test_labeled_line_with_empty_text_skipped() {
        let text = "AGENT:\nAGENT:    \nPATIENT: Real text.\n";
        let dialogue = parse_dialogue(text, &SpeakerLabels::default());

        assert_eq!(dialogue.len(), 1);
        assert_eq!(dialogue.utterances[0].speaker, Speaker::Patient);
    }

    #[test]
    fn test_custom_labels() {
        let labels = SpeakerLabels::new("Rep", "Caller");
        let text = "Rep: Hello.\nCaller: Hi.\nAGENT: ignored now\n";
        let dialogue = parse_dialogue(text, &labels);

        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue.utterances[0].speaker, Speaker::Agent);
    }

    #[test]
    fn test_parse_render_roundtrip_is_idempotent() {
        let labels = SpeakerLabels::default();
        let text = "AGENT: Hello there.\n\njunk line\nPATIENT:   spaced out   \nAGENT: Bye.\n";

        let once = parse_dialogue(text, &labels);
        let twice = parse_dialogue(&once.render(&labels), &labels);

        assert_eq!(once, twice);
    }
}
