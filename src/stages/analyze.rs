use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{error, info};

use crate::llm::{TextGenerator, build_analysis_prompt, extract_json_object};
use crate::models::{AnalysisReport, SpeakerLabels};

use super::generate_with_retry;

/// Result of the analysis stage.
///
/// `raw_json` is the JSON value exactly as recovered from the model
/// response; it is what gets persisted, so fields outside the typed report
/// shape survive into the artifact.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub raw_json: Value,
}

/// Execute the analysis stage: prompt → generate → recover JSON → validate
/// against the report shape.
///
/// On parse failure the raw model output is retained in the error
/// diagnostics for manual inspection.
pub async fn execute_analysis<G: TextGenerator>(
    client: &G,
    transcript: &str,
    kpis: &[&str],
    labels: &SpeakerLabels,
    max_retries: u32,
) -> Result<AnalysisOutcome> {
    info!("Building analysis prompt ({} KPIs)", kpis.len());
    let prompt = build_analysis_prompt(transcript, kpis, labels);

    let raw = generate_with_retry(client, &prompt, max_retries)
        .await
        .context("Analysis generation failed")?;

    let raw_json = match extract_json_object(&raw) {
        Ok(value) => value,
        Err(e) => {
            error!(
                "Could not recover a JSON object from the analysis response; \
                 raw output retained below:\n{raw}"
            );
            return Err(anyhow!(e).context("Failed to parse analysis response"));
        }
    };

    let report: AnalysisReport = match serde_json::from_value(raw_json.clone()) {
        Ok(report) => report,
        Err(e) => {
            error!(
                "Analysis JSON did not match the report shape; raw output retained below:\n{raw}"
            );
            return Err(anyhow!(e).context("Analysis JSON did not match the expected report shape"));
        }
    };

    info!(
        "Analysis parsed: {} KPI finding(s)",
        report.kpi_analysis.len()
    );

    Ok(AnalysisOutcome { report, raw_json })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_KPI_CATALOG, KpiStatus};
    use crate::stages::testing::MockGenerator;

    #[tokio::test]
    async fn test_analysis_parses_fenced_response() {
        let response = "Here you go:\n```json\n{\"kpi_analysis\": [{\"kpi\": \"Q?\", \"status\": \"Met\", \"reason\": \"yes\"}]}\n```";
        let client = MockGenerator::new(vec![Ok(response.to_string())]);

        let outcome = execute_analysis(
            &client,
            "AGENT: Hi.",
            DEFAULT_KPI_CATALOG,
            &SpeakerLabels::default(),
            0,
        )
        .await
        .unwrap();

        assert_eq!(outcome.report.kpi_analysis.len(), 1);
        assert_eq!(outcome.report.kpi_analysis[0].status, Some(KpiStatus::Met));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analysis_fails_on_unparseable_response() {
        let client = MockGenerator::new(vec![Ok("I am unable to grade this call.".to_string())]);

        let result = execute_analysis(
            &client,
            "AGENT: Hi.",
            DEFAULT_KPI_CATALOG,
            &SpeakerLabels::default(),
            0,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(client.call_count(), 1);
    }
}
