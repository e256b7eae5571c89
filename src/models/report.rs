use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Verdict for a single KPI - restricted set with a tolerance variant,
/// since the status strings come from free-text model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum KpiStatus {
    Met,
    #[serde(rename = "Not Met")]
    NotMet,
    #[serde(rename = "N/A")]
    NotApplicable,
    /// Anything outside the requested vocabulary
    Unknown,
}

impl From<String> for KpiStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            "Met" => KpiStatus::Met,
            "Not Met" | "NotMet" => KpiStatus::NotMet,
            "N/A" | "NA" | "Not Applicable" => KpiStatus::NotApplicable,
            _ => KpiStatus::Unknown,
        }
    }
}

/// One checklist entry of the analysis report
///
/// Every field may be absent or malformed in the model's output; consumers
/// must handle absence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KpiFinding {
    #[serde(default)]
    pub kpi: String,
    #[serde(default)]
    pub status: Option<KpiStatus>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Free-text assessment block of the analysis report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallAssessment {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub mistakes_and_improvement_areas: Vec<String>,
    #[serde(default)]
    pub soft_skills_evaluation: BTreeMap<String, String>,
}

/// Structured output of the analysis stage
///
/// Created once per run, serialized to the `_analysis.json` artifact
/// immediately, never mutated afterward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub kpi_analysis: Vec<KpiFinding>,
    #[serde(default)]
    pub overall_assessment: Option<OverallAssessment>,
}

impl AnalysisReport {
    /// KPI texts the model graded as "Not Met", in report order
    pub fn missed_kpis(&self) -> Vec<&str> {
        self.kpi_analysis
            .iter()
            .filter(|f| f.status == Some(KpiStatus::NotMet))
            .map(|f| f.kpi.as_str())
            .collect()
    }

    /// Listed improvement areas, empty when the assessment block is absent
    pub fn improvement_areas(&self) -> &[String] {
        self.overall_assessment
            .as_ref()
            .map(|a| a.mistakes_and_improvement_areas.as_slice())
            .unwrap_or(&[])
    }

    /// Count of findings with the given status
    pub fn count_with_status(&self, status: KpiStatus) -> usize {
        self.kpi_analysis
            .iter()
            .filter(|f| f.status == Some(status))
            .count()
    }
}
