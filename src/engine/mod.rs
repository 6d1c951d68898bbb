pub mod heuristic;
pub mod judgment;
pub mod llm;
pub mod orchestrator;

pub use judgment::PriorityJudgment;
