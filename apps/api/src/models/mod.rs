pub mod candidate;
pub mod job;

pub use candidate::{Candidate, CandidateStatus, NewCandidate, PerformanceMetrics};
pub use job::{Job, NewJob};
