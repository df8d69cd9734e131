use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;
use uuid::Uuid;

// ── Enums ──

/// Template family used to turn a user query into a model prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum PromptStrategy {
    #[serde(rename = "Zero-Shot", alias = "zero_shot", alias = "zero-shot")]
    #[strum(to_string = "Zero-Shot", serialize = "zero_shot", serialize = "zero-shot")]
    ZeroShot,
    #[serde(rename = "Few-Shot", alias = "few_shot", alias = "few-shot")]
    #[strum(to_string = "Few-Shot", serialize = "few_shot", serialize = "few-shot")]
    FewShot,
    #[serde(
        rename = "Chain-of-Thought",
        alias = "chain_of_thought",
        alias = "chain-of-thought"
    )]
    #[strum(
        to_string = "Chain-of-Thought",
        serialize = "chain_of_thought",
        serialize = "chain-of-thought"
    )]
    ChainOfThought,
    #[serde(
        rename = "Fixed-Instruction",
        alias = "fixed_instruction",
        alias = "fixed-instruction"
    )]
    #[strum(
        to_string = "Fixed-Instruction",
        serialize = "fixed_instruction",
        serialize = "fixed-instruction"
    )]
    FixedInstruction,
}

impl PromptStrategy {
    /// Techniques offered by the prompt lab's selector.
    pub fn techniques() -> Vec<Self> {
        Self::iter()
            .filter(|s| *s != Self::FixedInstruction)
            .collect()
    }

    pub fn is_technique(&self) -> bool {
        *self != Self::FixedInstruction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
pub enum TenureGroup {
    #[serde(rename = "0-12M")]
    #[strum(to_string = "0-12M")]
    Months0To12,
    #[serde(rename = "13-24M")]
    #[strum(to_string = "13-24M")]
    Months13To24,
    #[serde(rename = "25-48M")]
    #[strum(to_string = "25-48M")]
    Months25To48,
    #[serde(rename = "49-60M")]
    #[strum(to_string = "49-60M")]
    Months49To60,
    #[serde(rename = "61-72M")]
    #[strum(to_string = "61-72M")]
    Months61To72,
}

impl TenureGroup {
    /// Bin edges are right-inclusive with the first bin also closed on the left:
    /// [0,12], (12,24], (24,48], (48,60], (60,72]. Anything outside has no group.
    pub fn from_tenure(months: i32) -> Option<Self> {
        match months {
            0..=12 => Some(Self::Months0To12),
            13..=24 => Some(Self::Months13To24),
            25..=48 => Some(Self::Months25To48),
            49..=60 => Some(Self::Months49To60),
            61..=72 => Some(Self::Months61To72),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
pub enum ChurnLabel {
    Churn,
    Stay,
}

impl ChurnLabel {
    pub const THRESHOLD: f64 = 0.5;

    pub fn from_probability(probability: f64) -> Self {
        if probability > Self::THRESHOLD {
            Self::Churn
        } else {
            Self::Stay
        }
    }
}

// ── Sessions ──

/// One submitted query and the answer it produced.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub query: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technique: Option<PromptStrategy>,
    pub created_at: NaiveDateTime,
}
