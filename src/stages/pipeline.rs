use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::io::{
    analysis_path, ideal_call_path, load_transcript, parse_dialogue, write_json_atomic,
    write_text_atomic,
};
use crate::knowledge::KeywordRetriever;
use crate::llm::TextGenerator;
use crate::models::{AnalysisReport, DEFAULT_KPI_CATALOG, Speaker, SpeakerLabels};

use super::{execute_analysis, execute_rewrite};

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Speaker label prefixes recognized in the transcript
    pub labels: SpeakerLabels,
    /// Maximum distinct knowledge documents passed to the rewrite prompt
    pub max_retrieval_chunks: usize,
    /// Bounded retries for rate-limited generation calls
    pub max_retries: u32,
    /// Stop after persisting the analysis report
    pub skip_rewrite: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            labels: SpeakerLabels::default(),
            max_retrieval_chunks: 3,
            max_retries: 2,
            skip_rewrite: false,
        }
    }
}

/// Result of a completed pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: AnalysisReport,
    pub analysis_path: PathBuf,
    /// None when the rewrite branch was skipped
    pub ideal_call_path: Option<PathBuf>,
}

/// Run the end-to-end coaching pipeline for one transcript file.
///
/// Stage order: load → analysis prompt → generate → parse → persist report
/// → retrieve → ideal-call prompt → generate → persist rewrite. Every arrow
/// is a hard dependency; a failure aborts the remainder of the run and
/// propagates. The analysis artifact is persisted before the rewrite branch
/// starts, so a partially completed run still leaves a usable report.
pub async fn run_pipeline<G: TextGenerator>(
    client: &G,
    retriever: &KeywordRetriever,
    transcript_path: &Path,
    config: &PipelineConfig,
) -> Result<PipelineOutcome> {
    info!("Starting analysis for {:?}", transcript_path);
    let transcript = load_transcript(transcript_path)?;

    let dialogue = parse_dialogue(&transcript, &config.labels);
    if dialogue.is_empty() {
        warn!(
            "Transcript has no '{}' or '{}' labeled lines; analysis quality will suffer",
            config.labels.agent, config.labels.patient
        );
    } else {
        info!(
            "Loaded {} utterances ({} agent, {} patient)",
            dialogue.len(),
            dialogue.count_for(Speaker::Agent),
            dialogue.count_for(Speaker::Patient)
        );
    }

    let outcome = execute_analysis(
        client,
        &transcript,
        DEFAULT_KPI_CATALOG,
        &config.labels,
        config.max_retries,
    )
    .await?;

    let analysis_path = analysis_path(transcript_path);
    write_json_atomic(&analysis_path, &outcome.raw_json)?;
    info!("Analysis saved to {:?}", analysis_path);

    if config.skip_rewrite {
        return Ok(PipelineOutcome {
            report: outcome.report,
            analysis_path,
            ideal_call_path: None,
        });
    }

    info!("Retrieving relevant knowledge based on analysis findings");
    let retrieved = retriever.retrieve(&outcome.report, config.max_retrieval_chunks);

    let ideal_call = execute_rewrite(
        client,
        &transcript,
        &outcome.report,
        &retrieved,
        &config.labels,
        config.max_retries,
    )
    .await?;

    let ideal_path = ideal_call_path(transcript_path);
    write_text_atomic(&ideal_path, &ideal_call)?;
    info!("Ideal call suggestions saved to {:?}", ideal_path);

    Ok(PipelineOutcome {
        report: outcome.report,
        analysis_path,
        ideal_call_path: Some(ideal_path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeStore;
    use crate::llm::GenerateError;
    use crate::models::KpiStatus;
    use crate::stages::testing::MockGenerator;

    const SAMPLE_ANALYSIS: &str = r#"{"kpi_analysis":[{"kpi":"Did the representative introduce themselves?","status":"Met","reason":"Introduced as Alex."}],"overall_assessment":{"summary":"Good open.","strengths":[],"mistakes_and_improvement_areas":[],"soft_skills_evaluation":{}}}"#;

    fn write_transcript(dir: &Path) -> PathBuf {
        let path = dir.join("call.txt");
        std::fs::write(&path, "AGENT: Hi, I'm Alex.\nPATIENT: Hi.\n").unwrap();
        path
    }

    fn retriever_in(dir: &Path) -> KeywordRetriever {
        KeywordRetriever::new(KnowledgeStore::new(dir.join("knowledge_base")))
    }

    #[tokio::test]
    async fn test_full_run_persists_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path());
        let client = MockGenerator::new(vec![
            Ok(SAMPLE_ANALYSIS.to_string()),
            Ok("AGENT: Hello, thank you for calling, my name is Alex.\nPATIENT: Hi.".to_string()),
        ]);

        let outcome = run_pipeline(
            &client,
            &retriever_in(dir.path()),
            &transcript,
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(client.call_count(), 2);
        assert_eq!(outcome.report.count_with_status(KpiStatus::Met), 1);

        // The persisted report round-trips to the same JSON value
        let written = std::fs::read_to_string(&outcome.analysis_path).unwrap();
        let persisted: serde_json::Value = serde_json::from_str(&written).unwrap();
        let expected: serde_json::Value = serde_json::from_str(SAMPLE_ANALYSIS).unwrap();
        assert_eq!(persisted, expected);

        let ideal = std::fs::read_to_string(outcome.ideal_call_path.unwrap()).unwrap();
        assert!(ideal.starts_with("AGENT: Hello, thank you for calling"));
    }

    #[tokio::test]
    async fn test_missing_transcript_aborts_before_any_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let client = MockGenerator::new(vec![Ok(SAMPLE_ANALYSIS.to_string())]);

        let result = run_pipeline(
            &client,
            &retriever_in(dir.path()),
            &dir.path().join("does_not_exist.txt"),
            &PipelineConfig::default(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_failure_leaves_no_artifact_and_skips_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path());
        let client = MockGenerator::new(vec![Ok("I cannot grade this call, sorry.".to_string())]);

        let result = run_pipeline(
            &client,
            &retriever_in(dir.path()),
            &transcript,
            &PipelineConfig::default(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(client.call_count(), 1);
        assert!(!analysis_path(&transcript).exists());
        assert!(!ideal_call_path(&transcript).exists());
    }

    #[tokio::test]
    async fn test_rewrite_failure_preserves_analysis_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path());
        let client = MockGenerator::new(vec![
            Ok(SAMPLE_ANALYSIS.to_string()),
            Err(GenerateError::Blocked {
                reason: "SAFETY".to_string(),
            }),
        ]);

        let result = run_pipeline(
            &client,
            &retriever_in(dir.path()),
            &transcript,
            &PipelineConfig::default(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(client.call_count(), 2);
        assert!(analysis_path(&transcript).exists());
        assert!(!ideal_call_path(&transcript).exists());
    }

    #[tokio::test]
    async fn test_skip_rewrite_stops_after_report() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path());
        let client = MockGenerator::new(vec![Ok(SAMPLE_ANALYSIS.to_string())]);

        let config = PipelineConfig {
            skip_rewrite: true,
            ..Default::default()
        };
        let outcome = run_pipeline(&client, &retriever_in(dir.path()), &transcript, &config)
            .await
            .unwrap();

        assert_eq!(client.call_count(), 1);
        assert!(outcome.ideal_call_path.is_none());
        assert!(outcome.analysis_path.exists());
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path());
        let client = MockGenerator::new(vec![
            Err(GenerateError::RateLimited),
            Ok(SAMPLE_ANALYSIS.to_string()),
        ]);

        let config = PipelineConfig {
            max_retries: 1,
            skip_rewrite: true,
            ..Default::default()
        };
        let outcome = run_pipeline(&client, &retriever_in(dir.path()), &transcript, &config)
            .await
            .unwrap();

        assert_eq!(client.call_count(), 2);
        assert_eq!(outcome.report.kpi_analysis.len(), 1);
    }
}
