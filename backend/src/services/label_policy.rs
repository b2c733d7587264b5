//! Label Policy
//!
//! Maps the labels of a linked issue to the number of points a merged pull
//! request is worth. Rules are evaluated in the order they are listed and the
//! first label present wins; points are never summed across labels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::LabelSet;

/// Errors raised while parsing a rule table such as `hard=20,medium=10,easy=5`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelPolicyError {
    #[error("rule table is empty")]
    Empty,

    #[error("malformed rule {0:?}, expected label=points")]
    MalformedRule(String),

    #[error("invalid points for label {label:?}: {value:?}")]
    InvalidPoints { label: String, value: String },

    #[error("label {0:?} appears more than once")]
    DuplicateLabel(String),
}

/// A single `label -> points` rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    pub label: String,
    pub points: u32,
}

/// Ordered rule table; earlier rules take precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPolicy {
    rules: Vec<LabelRule>,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                LabelRule {
                    label: "hard".to_string(),
                    points: 20,
                },
                LabelRule {
                    label: "medium".to_string(),
                    points: 10,
                },
                LabelRule {
                    label: "easy".to_string(),
                    points: 5,
                },
            ],
        }
    }
}

impl LabelPolicy {
    pub fn new(rules: Vec<LabelRule>) -> Result<Self, LabelPolicyError> {
        if rules.is_empty() {
            return Err(LabelPolicyError::Empty);
        }

        let mut normalized: Vec<LabelRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            let label = rule.label.trim().to_lowercase();
            if label.is_empty() {
                return Err(LabelPolicyError::MalformedRule(rule.label));
            }
            if normalized.iter().any(|r| r.label == label) {
                return Err(LabelPolicyError::DuplicateLabel(label));
            }
            normalized.push(LabelRule {
                label,
                points: rule.points,
            });
        }

        Ok(Self { rules: normalized })
    }

    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    /// Points awarded for an issue carrying `labels`.
    ///
    /// Labels are expected lower-cased, which is how the issue resolver
    /// returns them.
    pub fn points_for(&self, labels: &LabelSet) -> u32 {
        self.rules
            .iter()
            .find(|rule| labels.contains(&rule.label))
            .map_or(0, |rule| rule.points)
    }
}

impl FromStr for LabelPolicy {
    type Err = LabelPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rules = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, value) = entry
                .split_once('=')
                .ok_or_else(|| LabelPolicyError::MalformedRule(entry.to_string()))?;
            let points = value
                .trim()
                .parse::<u32>()
                .map_err(|_| LabelPolicyError::InvalidPoints {
                    label: label.trim().to_string(),
                    value: value.trim().to_string(),
                })?;
            rules.push(LabelRule {
                label: label.to_string(),
                points,
            });
        }
        Self::new(rules)
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .rules
            .iter()
            .map(|r| format!("{}={}", r.label, r.points))
            .collect();
        write!(f, "{}", rendered.join(","))
    }
}
