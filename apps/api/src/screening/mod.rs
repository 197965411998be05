//! Resume screening: extraction, scoring, generation and normalization,
//! tied together by the orchestrator.

pub mod extractor;
pub mod handlers;
pub mod normalize;
pub mod orchestrator;
pub mod prompts;
pub mod scoring;
