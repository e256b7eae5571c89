use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// A coaching document from the knowledge directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    /// Filename within the store, the retrieval key
    pub filename: String,
    pub content: String,
}

/// File-backed corpus of coaching documents, read-only during a run.
///
/// Filenames are the key space; there is no index beyond the retriever's
/// static keyword map.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    root: PathBuf,
}

impl KnowledgeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load one document by filename.
    ///
    /// A missing or unreadable file is a recoverable miss: it reduces
    /// retrieval coverage but never aborts the run.
    pub fn load(&self, filename: &str) -> Option<KnowledgeDocument> {
        let path = self.root.join(filename);
        if !path.exists() {
            warn!("Knowledge file not found: {:?}", path);
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Loaded knowledge file {:?}", path);
                Some(KnowledgeDocument {
                    filename: filename.to_string(),
                    content,
                })
            }
            Err(e) => {
                warn!("Error reading knowledge file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write the default coaching corpus into the store directory.
    ///
    /// Existing files are left untouched. Returns the number of files
    /// written.
    pub fn seed(&self) -> Result<usize> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create knowledge directory {:?}", self.root))?;

        let mut written = 0;
        for (filename, content) in DEFAULT_KNOWLEDGE {
            let path = self.root.join(filename);
            if path.exists() {
                debug!("Keeping existing knowledge file {:?}", path);
                continue;
            }
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write knowledge file {:?}", path))?;
            info!("Seeded knowledge file {:?}", path);
            written += 1;
        }
        Ok(written)
    }
}

/// Seed corpus: one document per coaching topic the default keyword map
/// points at.
pub const DEFAULT_KNOWLEDGE: &[(&str, &str)] = &[
    (
        "sop_introduction.txt",
        "Best Practice: Start calls professionally and clearly state your name and the \
         clinic's name. Engage the patient politely from the first sentence.\n\
         \n\
         Example opening:\n\
         'Thank you for calling, my name is [Agent Name]. To help you best today, could I \
         please start with your full name?'\n\
         \n\
         Key elements:\n\
         - Greeting (Thank you for calling...)\n\
         - Clinic name\n\
         - Agent name\n\
         - Polite request for patient identification\n",
    ),
    (
        "sop_verification.txt",
        "Best Practice: Verify essential contact and identifying information early in the \
         call, typically right after obtaining the patient's name.\n\
         \n\
         Verification checklist:\n\
         1. Full name spelling: 'Could you please spell your last name for me so I have it \
         correct?'\n\
         2. Phone number: 'And could you verify the best phone number to reach you at?'\n\
         3. Date of birth, if clinic protocol requires it for identification.\n\
         \n\
         Optional, based on call flow: email address, physical address.\n",
    ),
    (
        "examples_empathy.txt",
        "Best Practice: Actively listen and acknowledge the patient's situation, pain, or \
         frustration to build rapport. Use validating, supportive language.\n\
         \n\
         When the patient describes pain or discomfort:\n\
         - 'I'm really sorry to hear you're experiencing that pain. That sounds very \
         uncomfortable.'\n\
         - 'I understand that must be difficult to deal with.'\n\
         \n\
         When the patient expresses frustration:\n\
         - 'I can understand why you would feel frustrated in that situation.'\n\
         - 'Let's work together to get you the help you need.'\n\
         \n\
         General acknowledgement:\n\
         - 'Thank you for sharing that with me.'\n",
    ),
    (
        "checklist_mva.txt",
        "Best Practice: If the patient indicates the condition may relate to a Motor \
         Vehicle Accident (MVA) or Workers Compensation (W/C), systematically gather the \
         details those case types require.\n\
         \n\
         Initial question: 'Is this condition related to an accident, either a car \
         accident or an incident at work?'\n\
         \n\
         If MVA:\n\
         - Date of the accident, and in which state it occurred\n\
         - The patient's role (driver, passenger, pedestrian)\n\
         - Airbags deployed? Seatbelt worn?\n\
         - Transported to a healthcare facility? Which one?\n\
         - Claim information (insurer, claim number, adjuster contact)\n\
         - Attorney involvement and contact details\n\
         \n\
         If W/C:\n\
         - Date of the work injury and employer at the time\n\
         - Claim information (insurer, claim number, adjuster contact)\n\
         - Attorney involvement and contact details\n",
    ),
    (
        "info_out_of_network.txt",
        "Best Practice: Clearly and proactively disclose out-of-network (OON) status \
         before confirming an appointment, ideally during or immediately after the \
         insurance discussion, so the patient's cost expectations are set early.\n\
         \n\
         Example disclosure:\n\
         'I do want to let you know that we are an out-of-network practice with your \
         insurance. We will provide you with the documentation you need, and I'm happy to \
         walk through what that means for your visit costs.'\n",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(dir.path());
        assert!(store.load("nope.txt").is_none());
    }

    #[test]
    fn test_load_reads_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.txt"), "some coaching text").unwrap();

        let store = KnowledgeStore::new(dir.path());
        let doc = store.load("doc.txt").unwrap();
        assert_eq!(doc.filename, "doc.txt");
        assert_eq!(doc.content, "some coaching text");
    }

    #[test]
    fn test_seed_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(dir.path().join("kb"));

        let written = store.seed().unwrap();
        assert_eq!(written, DEFAULT_KNOWLEDGE.len());
        assert!(store.load("examples_empathy.txt").is_some());

        // Second seed keeps existing files
        let written = store.seed().unwrap();
        assert_eq!(written, 0);
    }
}
