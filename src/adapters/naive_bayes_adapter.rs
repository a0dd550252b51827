//! Multinomial naive-Bayes classifier loaded from a fitted JSON artifact.
//!
//! The artifact carries the fitted parameters only:
//!
//! ```json
//! {
//!   "classes": [0, 1, 2, 3, 4, 5],
//!   "class_log_prior": [-1.79, ...],
//!   "feature_log_prob": [[-1.1, -1.1, -1.1], ...]
//! }
//! ```
//!
//! The prediction for a window `x` is the class maximising
//! `class_log_prior[c] + sum_j x[j] * feature_log_prob[c][j]`; ties go to the
//! class listed first.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::error::TickstratError;
use crate::domain::return_category::ReturnCategory;
use crate::ports::classifier_port::ClassifierPort;

#[derive(Debug, Deserialize)]
struct Artifact {
    classes: Vec<u8>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct ClassParams {
    category: ReturnCategory,
    log_prior: f64,
    feature_log_prob: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct NaiveBayesAdapter {
    classes: Vec<ClassParams>,
}

impl NaiveBayesAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TickstratError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TickstratError::ModelLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let model = Self::from_json(&content).map_err(|reason| TickstratError::ModelLoad {
            path: path.display().to_string(),
            reason,
        })?;
        info!(path = %path.display(), classes = model.classes.len(), "loaded classifier");
        Ok(model)
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        let artifact: Artifact = serde_json::from_str(content).map_err(|e| e.to_string())?;

        if artifact.classes.is_empty() {
            return Err("model has no classes".into());
        }
        if artifact.class_log_prior.len() != artifact.classes.len()
            || artifact.feature_log_prob.len() != artifact.classes.len()
        {
            return Err(format!(
                "expected {} priors and feature rows, got {} and {}",
                artifact.classes.len(),
                artifact.class_log_prior.len(),
                artifact.feature_log_prob.len()
            ));
        }

        let mut classes = Vec::with_capacity(artifact.classes.len());
        for ((label, log_prior), row) in artifact
            .classes
            .iter()
            .zip(&artifact.class_log_prior)
            .zip(&artifact.feature_log_prob)
        {
            let category = ReturnCategory::from_label(*label)
                .ok_or_else(|| format!("class label {} is outside 0..=5", label))?;
            let feature_log_prob: [f64; 3] = row
                .as_slice()
                .try_into()
                .map_err(|_| format!("class {} has {} features, expected 3", label, row.len()))?;
            if !log_prior.is_finite() || feature_log_prob.iter().any(|v| !v.is_finite()) {
                return Err(format!("class {} has non-finite parameters", label));
            }
            classes.push(ClassParams {
                category,
                log_prior: *log_prior,
                feature_log_prob,
            });
        }

        Ok(Self { classes })
    }

    /// Joint log-likelihood of `window` under each class, in class order.
    pub fn joint_log_likelihood(&self, window: &[f64; 3]) -> Vec<(ReturnCategory, f64)> {
        self.classes
            .iter()
            .map(|c| {
                let evidence: f64 = window
                    .iter()
                    .zip(c.feature_log_prob.iter())
                    .map(|(x, p)| x * p)
                    .sum();
                (c.category, c.log_prior + evidence)
            })
            .collect()
    }
}

impl ClassifierPort for NaiveBayesAdapter {
    fn predict(&self, window: &[f64; 3]) -> ReturnCategory {
        let mut best: Option<(ReturnCategory, f64)> = None;
        for (category, score) in self.joint_log_likelihood(window) {
            match best {
                Some((_, top)) if !(score > top) => {}
                _ => best = Some((category, score)),
            }
        }
        best.map(|(category, _)| category)
            .unwrap_or(ReturnCategory::SmallLoss)
    }
}
