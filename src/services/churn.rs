use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::entities::{ChurnLabel, TenureGroup};
use crate::models::requests::CustomerData;

/// A fitted binary classifier over the encoded feature vector.
pub trait ChurnClassifier: Send + Sync {
    /// Probability of the positive (churn) class, in [0, 1].
    fn predict_proba(&self, features: &[f64]) -> f64;
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl ChurnClassifier for LogisticRegression {
    fn predict_proba(&self, features: &[f64]) -> f64 {
        let z: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk export of the training pipeline: column layout, scaler and weights.
#[derive(Debug, Deserialize)]
struct ChurnArtifact {
    model_columns: Vec<String>,
    numerical_cols: Vec<String>,
    scaler: StandardScaler,
    model: LogisticRegression,
}

/// Features computed from the raw record before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatures {
    pub tenure_group: Option<TenureGroup>,
    pub services_count: u32,
}

impl DerivedFeatures {
    pub fn from_customer(data: &CustomerData) -> Self {
        let services_count = data
            .service_flags()
            .iter()
            .filter(|flag| **flag == "Yes")
            .count() as u32;

        Self {
            tenure_group: TenureGroup::from_tenure(data.tenure),
            services_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChurnPrediction {
    pub churn_probability: f64,
    pub prediction: ChurnLabel,
    pub features: DerivedFeatures,
}

/// Encoding layout plus classifier; everything needed to score one customer.
#[derive(Clone)]
pub struct ChurnModel {
    model_columns: Vec<String>,
    /// (position in `model_columns`, mean, scale) per numerical column.
    scaled: Vec<(usize, f64, f64)>,
    classifier: Arc<dyn ChurnClassifier>,
}

impl ChurnModel {
    pub fn new(
        model_columns: Vec<String>,
        numerical_cols: &[String],
        scaler: StandardScaler,
        classifier: Arc<dyn ChurnClassifier>,
    ) -> anyhow::Result<Self> {
        if scaler.mean.len() != numerical_cols.len() || scaler.scale.len() != numerical_cols.len() {
            bail!(
                "scaler has {} means and {} scales for {} numerical columns",
                scaler.mean.len(),
                scaler.scale.len(),
                numerical_cols.len()
            );
        }

        let positions: HashMap<&str, usize> = model_columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let scaled = numerical_cols
            .iter()
            .zip(scaler.mean.iter().zip(&scaler.scale))
            .map(|(col, (&mean, &scale))| {
                let idx = *positions
                    .get(col.as_str())
                    .with_context(|| format!("numerical column '{col}' missing from model columns"))?;
                // sklearn stores 1.0 for zero-variance features
                let scale = if scale == 0.0 { 1.0 } else { scale };
                Ok((idx, mean, scale))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            model_columns,
            scaled,
            classifier,
        })
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let artifact: ChurnArtifact =
            serde_json::from_str(json).context("invalid churn model artifact")?;

        if artifact.model.coefficients.len() != artifact.model_columns.len() {
            bail!(
                "model has {} coefficients for {} columns",
                artifact.model.coefficients.len(),
                artifact.model_columns.len()
            );
        }

        Self::new(
            artifact.model_columns,
            &artifact.numerical_cols,
            artifact.scaler,
            Arc::new(artifact.model),
        )
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read churn model from {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn model_columns(&self) -> &[String] {
        &self.model_columns
    }

    /// One-hot encode, align to the model's columns and scale.
    ///
    /// Categoricals become `<field>_<value>` indicator columns; any column the
    /// model knows but the record does not produce is zero, and record columns
    /// the model never saw are dropped.
    pub fn encode(&self, data: &CustomerData, derived: &DerivedFeatures) -> Vec<f64> {
        let mut values: HashMap<String, f64> = HashMap::new();
        for (name, value) in data.numeric_fields() {
            values.insert(name.to_string(), value);
        }
        values.insert("services_count".into(), derived.services_count as f64);
        for (name, value) in data.categorical_fields() {
            values.insert(format!("{name}_{value}"), 1.0);
        }
        if let Some(group) = derived.tenure_group {
            values.insert(format!("tenure_group_{group}"), 1.0);
        }

        let mut row: Vec<f64> = self
            .model_columns
            .iter()
            .map(|col| values.get(col).copied().unwrap_or(0.0))
            .collect();

        for &(idx, mean, scale) in &self.scaled {
            row[idx] = (row[idx] - mean) / scale;
        }
        row
    }

    /// Score one customer. Extreme inputs can overflow the linear score; those
    /// are rejected instead of labelled.
    pub fn predict(&self, data: &CustomerData) -> Result<ChurnPrediction, AppError> {
        let features = DerivedFeatures::from_customer(data);
        let row = self.encode(data, &features);
        let raw = self.classifier.predict_proba(&row);
        if !raw.is_finite() {
            tracing::warn!(score = %raw, "Churn score is not finite");
            return Err(AppError::validation_error(
                "customer record produces a non-finite churn score",
            ));
        }
        let churn_probability = raw.clamp(0.0, 1.0);

        tracing::debug!(
            tenure_group = ?features.tenure_group,
            services_count = features.services_count,
            churn_probability,
            "Churn scored"
        );

        Ok(ChurnPrediction {
            churn_probability,
            prediction: ChurnLabel::from_probability(churn_probability),
            features,
        })
    }
}
