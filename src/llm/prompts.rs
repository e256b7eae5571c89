use crate::knowledge::RetrievedChunk;
use crate::models::{AnalysisReport, SpeakerLabels};

/// Marker used when an optional report section has no entries
const NONE_IDENTIFIED: &str = "None identified.";

/// Requested response shape for the analysis call. Embedded verbatim so the
/// model sees the exact field names the report parser expects.
const ANALYSIS_OUTPUT_STRUCTURE: &str = r#"```json
{
  "kpi_analysis": [
    {
      "kpi": "KPI text (e.g., Did the representative introduce themselves?)",
      "status": "Met | Not Met | N/A",
      "reason": "Brief justification based on the agent's dialogue in the transcript."
    }
  ],
  "overall_assessment": {
    "summary": "A brief overall summary of the agent's performance.",
    "strengths": [
      "Key strengths observed in the agent's performance."
    ],
    "mistakes_and_improvement_areas": [
      "Specific mistake or area needing improvement, referencing the transcript where possible."
    ],
    "soft_skills_evaluation": {
      "confidence": "Assessment (e.g., Confident, Hesitant, Average)",
      "positivity_tone": "Assessment (e.g., Consistently Positive, Neutral, Fluctuated)",
      "energy_level": "Assessment (e.g., Consistent, High, Low, Variable)",
      "enthusiasm": "Assessment (e.g., Enthusiastic, Neutral, Lacking, Forced)",
      "empathy_relatability": "Assessment (e.g., Highly Empathetic, Neutral, Lacked Empathy)",
      "conversation_steering": "Assessment (e.g., Effectively Guided Conversation, Lost Control at Times)",
      "genuineness": "Assessment (e.g., Sounded Genuine, Sounded Scripted, Rushed)",
      "conversation_flow": "Assessment (e.g., Smooth and Natural, Some Awkward Pauses, Frequent Dead Space)"
    }
  }
}
```"#;

/// Build the KPI analysis prompt for a labeled transcript.
///
/// Deterministic for identical inputs. The KPI catalog is embedded as a
/// numbered checklist and the model is told to return one entry per KPI
/// inside a single JSON object with nothing around it.
pub fn build_analysis_prompt(transcript: &str, kpis: &[&str], labels: &SpeakerLabels) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "**Objective:** Analyze the performance of the customer support representative \
         ('{agent}') in the following call transcript with a patient ('{patient}'). \
         Evaluate adherence to KPIs, identify mistakes, and assess communication skills.\n\n",
        agent = labels.agent,
        patient = labels.patient
    ));

    prompt.push_str("**Call Transcript:**\n```\n");
    prompt.push_str(transcript);
    prompt.push_str("\n```\n\n");

    prompt.push_str("**Instructions:**\n\n");
    prompt.push_str(&format!(
        "1. **KPI Analysis:** Review the transcript focusing on the actions and dialogue \
         of the '{agent}'. For each KPI in the checklist below, determine whether it was \
         'Met', 'Not Met', or 'N/A' based only on the provided transcript, with a concise \
         justification. Include exactly one entry for every KPI in the checklist; do not \
         omit any.\n",
        agent = labels.agent
    ));
    prompt.push_str(&format!(
        "2. **Mistake Identification:** Identify specific mistakes made by the '{agent}' \
         or areas needing improvement, referencing specific phrases from the transcript \
         where possible.\n",
        agent = labels.agent
    ));
    prompt.push_str(&format!(
        "3. **Soft Skills Evaluation:** Assess the '{agent}'s' soft skills based on the \
         interaction.\n",
        agent = labels.agent
    ));
    prompt.push_str(
        "4. **Output Format:** Structure your entire response strictly as a single JSON \
         object. Do not include any text before or after the JSON object.\n\n",
    );

    prompt.push_str("**KPI Checklist:**\n");
    for (index, kpi) in kpis.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", index + 1, kpi));
    }
    prompt.push('\n');

    prompt.push_str("**Requested JSON Output Structure:**\n");
    prompt.push_str(ANALYSIS_OUTPUT_STRUCTURE);
    prompt.push('\n');

    prompt
}

/// Build the diarization prompt for raw speech-to-text output.
///
/// Asks for the input re-emitted as alternating `LABEL: utterance` lines
/// with no commentary, with one illustrative input/output pair.
pub fn build_diarization_prompt(raw_text: &str, labels: &SpeakerLabels) -> String {
    let agent = &labels.agent;
    let patient = &labels.patient;
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "**Objective:** Convert the following raw, unstructured call transcript into a \
         structured dialogue with speaker labels. The call is between a clinic customer \
         support representative ({agent}) and a patient ({patient}).\n\n"
    ));

    prompt.push_str("**Raw Transcript:**\n```\n");
    prompt.push_str(raw_text);
    prompt.push_str("\n```\n\n");

    prompt.push_str("**Task:**\n");
    prompt.push_str(&format!(
        "1. Identify the distinct utterances for each speaker ({agent} and {patient}).\n"
    ));
    prompt.push_str(&format!(
        "2. Prefix each utterance with its speaker label ({agent}: or {patient}:), one \
         utterance per line.\n"
    ));
    prompt.push_str(
        "3. Output only the formatted dialogue. Do not add introductions, summaries, \
         explanations, or markdown fences.\n\n",
    );

    prompt.push_str("**Example Input:**\n```\n");
    prompt.push_str(
        "Hello this is Clinic XYZ how can I help? Hi I need to make an appointment. \
         Okay what's your name? Jane Doe. Thanks Jane.\n",
    );
    prompt.push_str("```\n\n**Example Output:**\n");
    prompt.push_str(&format!("{agent}: Hello this is Clinic XYZ how can I help?\n"));
    prompt.push_str(&format!("{patient}: Hi I need to make an appointment.\n"));
    prompt.push_str(&format!("{agent}: Okay what's your name?\n"));
    prompt.push_str(&format!("{patient}: Jane Doe.\n"));
    prompt.push_str(&format!("{agent}: Thanks Jane.\n\n"));

    prompt.push_str("**Now process the provided raw transcript and generate the structured dialogue:**\n");

    prompt
}

/// Build the retrieval-augmented ideal-call rewrite prompt.
///
/// Missing report sections degrade to an explicit "None identified." marker;
/// retrieved chunks are embedded verbatim with their source filenames.
pub fn build_ideal_call_prompt(
    transcript: &str,
    report: &AnalysisReport,
    retrieved: &[RetrievedChunk],
    labels: &SpeakerLabels,
) -> String {
    let agent = &labels.agent;
    let patient = &labels.patient;

    let missed = bulleted_or_none(&report.missed_kpis());
    let improvements = bulleted_or_none(
        &report
            .improvement_areas()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
    );

    let knowledge = if retrieved.is_empty() {
        "No specific knowledge chunks were retrieved for this task.".to_string()
    } else {
        retrieved
            .iter()
            .map(|chunk| {
                format!(
                    "--- Relevant Knowledge: {} ---\n{}\n--- End Knowledge ---",
                    chunk.filename, chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let mut prompt = String::new();

    prompt.push_str(&format!(
        "**Objective:** Generate an improved version of the following patient call script \
         for the customer support representative ('{agent}'). The rewritten script serves \
         as a training example that addresses the weaknesses identified in the analysis by \
         incorporating the provided best practices and examples.\n\n"
    ));

    prompt.push_str("**Original Call Transcript:**\n```\n");
    prompt.push_str(transcript);
    prompt.push_str("\n```\n\n");

    prompt.push_str("**Analysis Summary (Weaknesses Identified):**\n\n");
    prompt.push_str("*   **Missed KPIs:**\n");
    prompt.push_str(&missed);
    prompt.push_str("\n*   **Specific Mistakes / Areas for Improvement:**\n");
    prompt.push_str(&improvements);
    prompt.push('\n');

    prompt.push_str("**Retrieved Knowledge (Best Practices / Examples):**\n");
    prompt.push_str(&knowledge);
    prompt.push_str("\n\n");

    prompt.push_str("**Task:**\n");
    prompt.push_str(&format!(
        "1. **Rewrite Agent Dialogue:** Rewrite the dialogue for '{agent}' to address the \
         missed KPIs and the listed mistakes, using the guidance and examples in the \
         Retrieved Knowledge section to inform phrasing, questions asked, and overall \
         approach.\n"
    ));
    prompt.push_str(
        "2. **Demonstrate Soft Skills:** The rewritten dialogue should show positive tone, \
         confidence, empathy, clarity, and effective conversation control.\n",
    );
    prompt.push_str(&format!(
        "3. **Maintain Context:** Keep the '{patient}' dialogue essentially the same as the \
         original transcript so the script shows how the agent should have responded; minor \
         adjustments are acceptable for flow.\n"
    ));
    prompt.push_str(&format!(
        "4. **Format:** Present the output as a revised script with each line prefixed by \
         '{agent}:' or '{patient}:'. Do not output JSON.\n\n"
    ));

    prompt.push_str(&format!(
        "Generate the improved script now. If the '{agent}' requests personal details \
         (such as a phone number, zip code, address, or email) and the transcript does not \
         contain real data, invent a realistic fictitious value (e.g., \"Sure, my phone \
         number is 312-555-7842\") instead of inserting placeholder tokens like (Provides \
         Phone Number). The conversation must read naturally, as a real dialogue would.\n"
    ));

    prompt
}

fn bulleted_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        format!("{NONE_IDENTIFIED}\n")
    } else {
        let mut out = String::new();
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
        out
    }
}
