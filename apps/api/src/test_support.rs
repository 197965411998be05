//! Fakes and fixtures shared by orchestrator, extractor and handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::embeddings::{Embedder, EmbeddingError};
use crate::llm_client::{ChatPrompt, Generation, Generator, LlmError, TextGenerator};
use crate::models::{Candidate, CandidateStatus, Job};
use crate::screening::scoring::RelevanceScorer;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const PERSONA_REPLY: &str = "A pragmatic systems engineer.";
pub const TASKS_REPLY: &str =
    "Here are the tasks:\n1. Implement an LRU cache\n2. Explain MVCC\n3. Debug a deadlock";
pub const REVIEW_REPLY: &str =
    r#"{"review": "Strong fundamentals.", "metrics": {"technical_skills": 86, "communication": "72"}}"#;
pub const INSIGHT_REPLY: &str = "The pool is strong on backend fundamentals.";

#[derive(Clone, Copy)]
enum Script {
    Happy,
    FailingReview,
    RateLimited,
}

/// Answers each prompt kind with a canned reply, recognised by its template.
pub struct ScriptedGenerator {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn with(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn happy() -> Arc<Self> {
        Self::with(Script::Happy)
    }

    /// The performance-review call fails with a provider error.
    pub fn failing_review() -> Arc<Self> {
        Self::with(Script::FailingReview)
    }

    /// Every call is rejected with HTTP 429.
    pub fn rate_limited() -> Arc<Self> {
        Self::with(Script::RateLimited)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<Generation, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let user = prompt.user.as_str();

        if let Script::RateLimited = self.script {
            return Err(LlmError::RateLimited("slow down".to_string()));
        }

        let reply = if user.starts_with("Analyze the following") {
            PERSONA_REPLY
        } else if user.contains("numbered list") {
            TASKS_REPLY
        } else if user.contains("generate a JSON object") {
            if let Script::FailingReview = self.script {
                return Err(LlmError::Api {
                    status: 500,
                    message: "upstream exploded".to_string(),
                });
            }
            REVIEW_REPLY
        } else {
            INSIGHT_REPLY
        };
        Ok(Generation::from_text(reply))
    }
}

/// Resume text points along x and every requirement along y, so semantic
/// similarity is always 0 and only keyword hits move the score.
pub struct OrthogonalEmbedder;

#[async_trait]
impl Embedder for OrthogonalEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(inputs
            .iter()
            .map(|text| {
                if text.starts_with("Resume") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    generator: Arc<ScriptedGenerator>,
}

impl TestHarness {
    pub fn new(jobs: Vec<Job>, generator: Arc<ScriptedGenerator>) -> Self {
        let store = Arc::new(MemoryStore::with_jobs(jobs));
        let state = AppState {
            store: store.clone(),
            generator: Generator::new(generator.clone(), Duration::from_millis(5500)),
            scorer: RelevanceScorer::new(Arc::new(OrthogonalEmbedder)),
        };
        Self {
            state,
            store,
            generator,
        }
    }

    pub fn generator_calls(&self) -> usize {
        self.generator.calls.load(Ordering::SeqCst)
    }
}

pub fn job(job_id: &str) -> Job {
    Job {
        job_id: job_id.to_string(),
        title: "Backend Engineer".to_string(),
        description: "Build and run our data services.".to_string(),
        requirements: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        created_at: Utc::now(),
    }
}

pub fn candidate(
    candidate_id: &str,
    job_id: &str,
    score: Option<f64>,
    status: CandidateStatus,
) -> Candidate {
    let now = Utc::now();
    Candidate {
        candidate_id: candidate_id.to_string(),
        name: format!("Candidate {candidate_id}"),
        job_id: job_id.to_string(),
        resume_text: Some("Resume: Rust services".to_string()),
        status,
        score,
        persona: None,
        interview_tasks: None,
        performance_review: None,
        performance_metrics: None,
        task_evaluation: None,
        created_at: now,
        updated_at: now,
    }
}

/// A minimal, well-formed PDF with one Helvetica text line per page.
/// Page text must not contain parentheses or backslashes.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    // 1: catalog, 2: page tree, 3: font, then (page, content) pairs from 4.
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            (0..pages.len())
                .map(|i| format!("{} 0 R", 4 + 2 * i))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.extend_from_slice(xref.as_bytes());
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}
