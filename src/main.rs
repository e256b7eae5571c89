use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use debrief::io::{diarized_path, write_text_atomic};
use debrief::{
    GeminiClient, GeminiConfig, KeywordRetriever, KnowledgeStore, KpiStatus, PipelineConfig,
    Speaker, SpeakerLabels, VoiceClient, VoiceConfig, execute_diarization, load_transcript,
    parse_dialogue, run_pipeline,
};

#[derive(Parser)]
#[command(name = "debrief")]
#[command(author, version, about = "Call-coaching pipeline: KPI analysis and retrieval-augmented call rewriting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transcript and generate the ideal-call rewrite
    Process {
        /// Input transcript file (speaker-labeled text)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding the coaching knowledge files
        #[arg(long, default_value = "knowledge_base")]
        knowledge_dir: PathBuf,

        /// Maximum distinct knowledge documents in the rewrite prompt
        #[arg(long, default_value = "3")]
        max_chunks: usize,

        /// Label prefix for agent lines
        #[arg(long, default_value = "AGENT")]
        agent_label: String,

        /// Label prefix for patient lines
        #[arg(long, default_value = "PATIENT")]
        patient_label: String,

        /// Generation model to use
        #[arg(long)]
        model: Option<String>,

        /// Generation temperature (0-1)
        #[arg(long, default_value = "0.2")]
        temperature: f64,

        /// Maximum tokens per generated response
        #[arg(long, default_value = "8192")]
        max_output_tokens: u32,

        /// Bounded retries for rate-limited generation calls
        #[arg(long, default_value = "2")]
        max_retries: u32,

        /// Stop after persisting the analysis report
        #[arg(long)]
        skip_rewrite: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a transcript and print turn statistics, without any network call
    Inspect {
        /// Input transcript file (speaker-labeled text)
        #[arg(short, long)]
        input: PathBuf,

        /// Label prefix for agent lines
        #[arg(long, default_value = "AGENT")]
        agent_label: String,

        /// Label prefix for patient lines
        #[arg(long, default_value = "PATIENT")]
        patient_label: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Turn raw speech-to-text output into a speaker-labeled transcript
    Diarize {
        /// Input file with raw, unlabeled transcript text
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to <input-stem>_diarized.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Label prefix for agent lines
        #[arg(long, default_value = "AGENT")]
        agent_label: String,

        /// Label prefix for patient lines
        #[arg(long, default_value = "PATIENT")]
        patient_label: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a labeled script to audio with per-speaker voices
    Synthesize {
        /// Input script file (speaker-labeled text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file (defaults to <input-stem>_audio.mp3)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Label prefix for agent lines
        #[arg(long, default_value = "AGENT")]
        agent_label: String,

        /// Label prefix for patient lines
        #[arg(long, default_value = "PATIENT")]
        patient_label: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Seed the knowledge directory and write a sample transcript
    Scaffold {
        /// Directory to seed with coaching knowledge files
        #[arg(long, default_value = "knowledge_base")]
        knowledge_dir: PathBuf,

        /// Path for the sample transcript
        #[arg(long, default_value = "sample_transcript.txt")]
        transcript: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            knowledge_dir,
            max_chunks,
            agent_label,
            patient_label,
            model,
            temperature,
            max_output_tokens,
            max_retries,
            skip_rewrite,
            verbose,
        } => {
            setup_logging(verbose);

            let mut api_config = GeminiConfig::from_env()?;
            if let Some(model) = model {
                api_config.model = model;
            }
            api_config.temperature = temperature;
            api_config.max_output_tokens = max_output_tokens;
            let client = GeminiClient::new(api_config);

            let retriever = KeywordRetriever::new(KnowledgeStore::new(knowledge_dir));
            let config = PipelineConfig {
                labels: SpeakerLabels::new(agent_label, patient_label),
                max_retrieval_chunks: max_chunks,
                max_retries,
                skip_rewrite,
            };

            let outcome = run_pipeline(&client, &retriever, &input, &config).await?;

            info!(
                "Complete: {} KPIs met, {} not met, {} n/a",
                outcome.report.count_with_status(KpiStatus::Met),
                outcome.report.count_with_status(KpiStatus::NotMet),
                outcome.report.count_with_status(KpiStatus::NotApplicable)
            );
            info!("Analysis report: {:?}", outcome.analysis_path);
            if let Some(path) = outcome.ideal_call_path {
                info!("Ideal call script: {:?}", path);
            }
            Ok(())
        }

        Commands::Inspect {
            input,
            agent_label,
            patient_label,
            verbose,
        } => {
            setup_logging(verbose);
            inspect_transcript(input, SpeakerLabels::new(agent_label, patient_label))
        }

        Commands::Diarize {
            input,
            output,
            agent_label,
            patient_label,
            verbose,
        } => {
            setup_logging(verbose);

            let client = GeminiClient::new(GeminiConfig::from_env()?);
            let labels = SpeakerLabels::new(agent_label, patient_label);
            let raw = load_transcript(&input)?;

            let formatted = execute_diarization(&client, &raw, &labels, 2).await?;

            let output = output.unwrap_or_else(|| diarized_path(&input));
            write_text_atomic(&output, &formatted)?;
            info!("Labeled transcript written to {:?}", output);
            Ok(())
        }

        Commands::Synthesize {
            input,
            output,
            agent_label,
            patient_label,
            verbose,
        } => {
            setup_logging(verbose);

            let client = VoiceClient::new(VoiceConfig::from_env()?);
            let labels = SpeakerLabels::new(agent_label, patient_label);
            let script = load_transcript(&input)?;

            let output = output.unwrap_or_else(|| {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "output".to_string());
                input.with_file_name(format!("{stem}_audio.mp3"))
            });

            let segments = client.synthesize_dialogue(&script, &labels, &output).await?;
            info!("Wrote {} segment(s) to {:?}", segments, output);
            Ok(())
        }

        Commands::Scaffold {
            knowledge_dir,
            transcript,
        } => {
            setup_logging(false);

            let store = KnowledgeStore::new(knowledge_dir);
            let written = store.seed()?;
            info!("Seeded {} knowledge file(s) in {:?}", written, store.root());

            if transcript.exists() {
                info!("Keeping existing transcript {:?}", transcript);
            } else {
                std::fs::write(&transcript, SAMPLE_TRANSCRIPT)
                    .with_context(|| format!("Failed to write {:?}", transcript))?;
                info!("Sample transcript written to {:?}", transcript);
            }
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn inspect_transcript(input: PathBuf, labels: SpeakerLabels) -> Result<()> {
    let text = load_transcript(&input)?;
    let dialogue = parse_dialogue(&text, &labels);

    let total_lines = text.lines().filter(|l| !l.trim().is_empty()).count();

    println!("Transcript Analysis");
    println!("===================");
    println!("Non-empty lines: {}", total_lines);
    println!("Labeled utterances: {}", dialogue.len());
    println!("Dropped lines: {}", total_lines - dialogue.len());
    println!();
    println!("Utterances per speaker");
    println!("----------------------");
    for speaker in [Speaker::Agent, Speaker::Patient] {
        let count = dialogue.count_for(speaker);
        let words: usize = dialogue
            .utterances
            .iter()
            .filter(|u| u.speaker == speaker)
            .map(|u| u.text.split_whitespace().count())
            .sum();
        println!(
            "{}: {} utterances, {} words",
            labels.label_for(speaker),
            count,
            words
        );
    }

    Ok(())
}

/// Sample intake call with deliberate gaps (no lead source question, no
/// out-of-network disclosure) so a demo run produces Not Met findings and
/// exercises retrieval.
const SAMPLE_TRANSCRIPT: &str = "\
AGENT: Hello, thank you for calling Healthy Clinic, my name is Ben. May I start with your full name, please?
PATIENT: Hi Ben, it's Sarah Miller.
AGENT: Okay Sarah, thanks. Could you spell your last name for me?
PATIENT: Sure, M-I-L-L-E-R.
AGENT: Got it. And what's the best phone number to reach you?
PATIENT: 555-987-6543.
AGENT: Okay, 555-987-6543. So, what brings you in today?
PATIENT: My left shoulder has been really stiff and painful for about two weeks.
AGENT: Your left shoulder, okay. Besides stiff and painful, are there any other symptoms like clicking, grinding, or weakness?
PATIENT: It's mainly the stiffness, and I definitely feel weaker when I try to lift things overhead.
AGENT: And this started about two weeks ago? Has it been constant, or does it come and go?
PATIENT: It's been pretty constant since it started.
AGENT: Alright. Is this related to any specific injury, like a fall, car accident, or anything at work?
PATIENT: No, not that I can think of. It just kind of started.
AGENT: Have you had any prior treatment or seen any other doctors for this specific shoulder issue before?
PATIENT: No, this is the first time.
AGENT: Okay. Let's look at insurance. Do you have health insurance you'd like to use?
PATIENT: Yes, I have Aetna.
AGENT: Okay, Aetna. Could I get the Member ID number from your card?
PATIENT: It's W123456789.
AGENT: W123456789. Is there a group number as well?
PATIENT: Yes, GRP-ABC.
AGENT: And are you the subscriber, the main person on the policy?
PATIENT: Yes.
AGENT: Do you have any secondary insurance coverage?
PATIENT: No, just the Aetna.
AGENT: Okay, thanks for that information. Let me check the schedule... It looks like Dr. Davis has an opening this Friday at 10:30 AM. Would that time work for you?
PATIENT: Yes, Friday at 10:30 is perfect.
AGENT: Great. So that's booked. Friday at 10:30 AM with Dr. Davis at our main clinic on 456 Health Drive. We'll send you a text message with a link to our online new patient portal to complete your paperwork beforehand.
PATIENT: Okay, sounds good.
AGENT: Do you have any other questions right now?
PATIENT: No, thank you.
AGENT: Alright then, Sarah. We look forward to seeing you on Friday. Have a good day!
PATIENT: Thanks, you too. Bye.
";
