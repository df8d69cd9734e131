pub mod ai;
pub mod assistant;
pub mod churn;
pub mod guardrails;
pub mod prompts;
pub mod sessions;
