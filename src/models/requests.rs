use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::entities::PromptStrategy;

static SESSION_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

pub fn is_valid_session_id(session_id: &str) -> bool {
    SESSION_ID_REGEX.is_match(session_id)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AskRequest {
    /// User query
    #[validate(length(max = 4000, message = "text exceeds 4000 characters"))]
    #[schema(example = "What are the symptoms of the flu?")]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LabAskRequest {
    #[validate(length(max = 4000, message = "text exceeds 4000 characters"))]
    #[schema(example = "What causes seasonal allergies?")]
    pub text: String,

    /// Prompting technique; the lab default is used when omitted.
    #[schema(value_type = Option<String>, example = "Chain-of-Thought")]
    pub technique: Option<String>,
}

impl LabAskRequest {
    /// Resolve the requested technique. Unknown names and techniques the lab
    /// does not offer are rejected rather than defaulted.
    pub fn parsed_technique(&self) -> Result<Option<PromptStrategy>, String> {
        let Some(raw) = self.technique.as_deref() else {
            return Ok(None);
        };
        let strategy: PromptStrategy = raw
            .trim()
            .parse()
            .map_err(|_| format!("Unknown technique '{raw}'"))?;
        if !strategy.is_technique() {
            return Err(format!("Technique '{strategy}' is not available in the prompt lab"));
        }
        Ok(Some(strategy))
    }
}

/// Customer record scored by the churn endpoint. Field names follow the
/// training dataset's column names.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CustomerData {
    #[schema(example = "Male")]
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    #[validate(range(min = 0, max = 1, message = "SeniorCitizen must be 0 or 1"))]
    #[schema(example = 0)]
    pub senior_citizen: i32,
    #[serde(rename = "Partner")]
    #[schema(example = "Yes")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    #[schema(example = "No")]
    pub dependents: String,
    #[schema(example = 24)]
    pub tenure: i32,
    #[serde(rename = "PhoneService")]
    #[schema(example = "Yes")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    #[schema(example = "No")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    #[schema(example = "DSL")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    #[schema(example = "Yes")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    #[schema(example = "No")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    #[schema(example = "Yes")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    #[schema(example = "No")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    #[schema(example = "No")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    #[schema(example = "No")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    #[schema(example = "One year")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    #[schema(example = "Yes")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    #[schema(example = "Mailed check")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    #[validate(range(min = 0.0, message = "MonthlyCharges must be non-negative"))]
    #[schema(example = 59.9)]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    #[validate(range(min = 0.0, message = "TotalCharges must be non-negative"))]
    #[schema(example = 1400.55)]
    pub total_charges: f64,
}

impl CustomerData {
    /// Values of the add-on service columns, in dataset order.
    pub fn service_flags(&self) -> [&str; 6] {
        [
            self.online_security.as_str(),
            self.online_backup.as_str(),
            self.device_protection.as_str(),
            self.tech_support.as_str(),
            self.streaming_tv.as_str(),
            self.streaming_movies.as_str(),
        ]
    }

    pub fn numeric_fields(&self) -> [(&'static str, f64); 4] {
        [
            ("SeniorCitizen", self.senior_citizen as f64),
            ("tenure", self.tenure as f64),
            ("MonthlyCharges", self.monthly_charges),
            ("TotalCharges", self.total_charges),
        ]
    }

    pub fn categorical_fields(&self) -> [(&'static str, &str); 15] {
        [
            ("gender", self.gender.as_str()),
            ("Partner", self.partner.as_str()),
            ("Dependents", self.dependents.as_str()),
            ("PhoneService", self.phone_service.as_str()),
            ("MultipleLines", self.multiple_lines.as_str()),
            ("InternetService", self.internet_service.as_str()),
            ("OnlineSecurity", self.online_security.as_str()),
            ("OnlineBackup", self.online_backup.as_str()),
            ("DeviceProtection", self.device_protection.as_str()),
            ("TechSupport", self.tech_support.as_str()),
            ("StreamingTV", self.streaming_tv.as_str()),
            ("StreamingMovies", self.streaming_movies.as_str()),
            ("Contract", self.contract.as_str()),
            ("PaperlessBilling", self.paperless_billing.as_str()),
            ("PaymentMethod", self.payment_method.as_str()),
        ]
    }
}
