// All LLM prompt templates for the screening module.
// Reuses cross-cutting fragments from llm_client::prompts.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, RECRUITER_SYSTEM};
use crate::llm_client::ChatPrompt;
use crate::models::Job;

/// Persona detection. Replace: {title}, {description}, {requirements}, {resume}
pub const PERSONA_PROMPT_TEMPLATE: &str = r#"Analyze the following candidate's resume and the job context. Summarize the candidate's professional persona in one concise sentence, focusing on their strengths, work style, and fit for the role.

Job Title: {title}
Job Description: {description}
Requirements: {requirements}

Candidate Resume:
{resume}"#;

/// Interview tasks. Replace: {title}, {description}, {requirements}, {resume}
pub const INTERVIEW_TASKS_PROMPT_TEMPLATE: &str = r#"Given the following job description and candidate resume, generate a numbered list of 3 concise, technical interview tasks that directly assess the candidate's fit for this role. Each task should be clear and actionable.

Job Title: {title}
Job Description: {description}
Requirements: {requirements}

Candidate Resume:
{resume}"#;

/// Performance review. Replace: {title}, {description}, {requirements}, {resume}
pub const PERFORMANCE_REVIEW_PROMPT_TEMPLATE: &str = r#"Given the job description and the candidate's resume, generate a JSON object with:
- "review": a unique, detailed, and professional performance review (string, 5-8 sentences).
- "metrics": an object with numeric scores (0-100) for "technical_skills", "communication", "problem_solving", and "team_collaboration".

Job Title: {title}
Job Description: {description}
Requirements: {requirements}

Candidate Resume:
{resume}"#;

/// Hiring-manager insight summary. Replace: {title}, {requirements}, {candidates_json}
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"Given the following job description and candidate data, generate a concise, professional insight summary (4-6 sentences) for a hiring manager. Highlight strengths, weaknesses, and trends in the candidate pool, and suggest actionable recommendations.

Job Title: {title}
Job Requirements: {requirements}

Candidates:
{candidates_json}"#;

pub fn persona_prompt(job: &Job, resume: &str) -> ChatPrompt {
    ChatPrompt {
        system: format!("{RECRUITER_SYSTEM} Answer with a single sentence and nothing else."),
        user: fill_candidate_template(PERSONA_PROMPT_TEMPLATE, job, resume),
    }
}

pub fn interview_tasks_prompt(job: &Job, resume: &str) -> ChatPrompt {
    ChatPrompt {
        system: RECRUITER_SYSTEM.to_string(),
        user: fill_candidate_template(INTERVIEW_TASKS_PROMPT_TEMPLATE, job, resume),
    }
}

pub fn performance_review_prompt(job: &Job, resume: &str) -> ChatPrompt {
    ChatPrompt {
        system: format!("{RECRUITER_SYSTEM} {JSON_ONLY_INSTRUCTION}"),
        user: fill_candidate_template(PERFORMANCE_REVIEW_PROMPT_TEMPLATE, job, resume),
    }
}

pub fn insights_prompt(job: &Job, candidates_json: &str) -> ChatPrompt {
    ChatPrompt {
        system: RECRUITER_SYSTEM.to_string(),
        user: fill_template(
            INSIGHTS_PROMPT_TEMPLATE,
            &[
                ("title", job.title.as_str()),
                ("requirements", job.requirements.join(", ").as_str()),
                ("candidates_json", candidates_json),
            ],
        ),
    }
}

/// `{name}` placeholders in a template.
static TEMPLATE_SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid template slot regex"));

fn fill_candidate_template(template: &str, job: &Job, resume: &str) -> String {
    fill_template(
        template,
        &[
            ("title", job.title.as_str()),
            ("description", job.description.as_str()),
            ("requirements", job.requirements.join(", ").as_str()),
            ("resume", resume),
        ],
    )
}

/// Single pass over the template: substituted values are never rescanned, so
/// a job field or resume containing `{...}` stays literal. Unknown slots are
/// left as written.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    TEMPLATE_SLOT
        .replace_all(template, |caps: &Captures| {
            slots
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
