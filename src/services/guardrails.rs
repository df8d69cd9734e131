use strum::EnumString;

pub const EMERGENCY_RESPONSE: &str = "If you believe you are experiencing a medical emergency, please dial your local emergency number (e.g., 911 in the US) immediately or go to the nearest emergency room. This service is for informational purposes only and cannot handle medical emergencies.";

pub const DISCLAIMER: &str = "Disclaimer: This is for informational purposes only and does not constitute medical advice. Please consult a healthcare professional for any health concerns.";

/// Marker the chain-of-thought scaffold asks the model to answer after.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

const DISCLAIMER_KEYWORD: &str = "disclaimer";

pub const STANDARD_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "want to die",
    "chest pain",
    "can't breathe",
    "stroke",
    "unconscious",
    "severe bleeding",
    "heart attack",
    "poison",
];

pub const EXTENDED_KEYWORDS: &[&str] = &["overdose", "seizure", "choking", "i am hurt"];

/// Keyword screen for queries that describe a possible emergency.
///
/// Matching is a plain substring test on the lower-cased query. False positives
/// are accepted: "strokes of a brush" is still routed to the emergency message.
#[derive(Debug, Clone)]
pub struct SensitivityClassifier {
    keywords: Vec<&'static str>,
}

impl SensitivityClassifier {
    /// Keyword set used by the prompt lab.
    pub fn standard() -> Self {
        Self {
            keywords: STANDARD_KEYWORDS.to_vec(),
        }
    }

    /// Standard set plus the extra phrases screened by the fine-tuned assistant.
    pub fn extended() -> Self {
        Self {
            keywords: STANDARD_KEYWORDS
                .iter()
                .chain(EXTENDED_KEYWORDS)
                .copied()
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    pub fn is_sensitive(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// How strictly the output guardrail decides a disclaimer is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisclaimerPolicy {
    /// The word "disclaimer" anywhere in the answer counts.
    #[default]
    Keyword,
    /// Only the full disclaimer text counts.
    Verbatim,
}

impl DisclaimerPolicy {
    pub fn is_satisfied(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        match self {
            Self::Keyword => lowered.contains(DISCLAIMER_KEYWORD),
            Self::Verbatim => lowered.contains(&DISCLAIMER.to_lowercase()),
        }
    }
}

/// Output guardrail with the default keyword policy.
pub fn postprocess(raw: &str) -> String {
    postprocess_with(raw, DisclaimerPolicy::Keyword)
}

/// Keep the text after the last "Final Answer:" marker, trim it, and make sure
/// the disclaimer is present.
pub fn postprocess_with(raw: &str, policy: DisclaimerPolicy) -> String {
    let answer = match raw.rfind(FINAL_ANSWER_MARKER) {
        Some(idx) => &raw[idx + FINAL_ANSWER_MARKER.len()..],
        None => raw,
    }
    .trim();

    if answer.is_empty() {
        return DISCLAIMER.to_string();
    }
    if policy.is_satisfied(answer) {
        return answer.to_string();
    }
    format!("{answer}\n\n{DISCLAIMER}")
}
