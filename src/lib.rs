pub mod io;
pub mod knowledge;
pub mod llm;
pub mod models;
pub mod stages;
pub mod voice;

pub use io::{analysis_path, ideal_call_path, load_transcript, parse_dialogue};
pub use knowledge::{KeywordRetriever, KnowledgeStore, RetrievedChunk};
pub use llm::{GeminiClient, GeminiConfig, GenerateError, TextGenerator, extract_json_object};
pub use models::{
    AnalysisReport, DEFAULT_KPI_CATALOG, Dialogue, KpiFinding, KpiStatus, Speaker, SpeakerLabels,
    Utterance,
};
pub use stages::{
    PipelineConfig, PipelineOutcome, execute_analysis, execute_diarization, execute_rewrite,
    run_pipeline,
};
pub use voice::{VoiceClient, VoiceConfig};
