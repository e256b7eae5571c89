use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Path of the analysis artifact for a transcript: `<stem>_analysis.json`
/// next to the input file.
pub fn analysis_path(transcript: &Path) -> PathBuf {
    sibling_with_suffix(transcript, "_analysis.json")
}

/// Path of the rewrite artifact: `<stem>_ideal_call_rag.txt`.
pub fn ideal_call_path(transcript: &Path) -> PathBuf {
    sibling_with_suffix(transcript, "_ideal_call_rag.txt")
}

/// Path of the diarization artifact: `<stem>_diarized.txt`.
pub fn diarized_path(raw: &Path) -> PathBuf {
    sibling_with_suffix(raw, "_diarized.txt")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!("{stem}{suffix}"))
}

/// Serialize a value as pretty-printed UTF-8 JSON and write it atomically.
///
/// Non-ASCII characters are preserved unescaped. The write goes to a
/// sibling temp file first and is renamed into place, so a failed run
/// leaves either the previous artifact or nothing, never a torn file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize artifact")?;
    write_text_atomic(path, &json)
}

/// Write plain text atomically via a sibling temp file and rename.
pub fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let tmp = tmp_path(path);
    std::fs::write(&tmp, text)
        .with_context(|| format!("Failed to write temporary file {:?}", tmp))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move artifact into place at {:?}", path))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!("{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let input = Path::new("calls/sample_transcript1.txt");
        assert_eq!(
            analysis_path(input),
            Path::new("calls/sample_transcript1_analysis.json")
        );
        assert_eq!(
            ideal_call_path(input),
            Path::new("calls/sample_transcript1_ideal_call_rag.txt")
        );
        assert_eq!(
            diarized_path(input),
            Path::new("calls/sample_transcript1_diarized.txt")
        );
    }

    #[test]
    fn test_write_text_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        write_text_atomic(&target, "hello").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_json_preserves_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.json");

        write_json_atomic(&target, &serde_json::json!({"summary": "très bien"})).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.contains("très bien"));
        assert!(!written.contains("\\u"));
    }

    #[test]
    fn test_overwrite_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        write_text_atomic(&target, "first").unwrap();
        write_text_atomic(&target, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
    }
}
