//! Per-property binding outcomes.

use crate::values::SubmittedValue;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Why a field failed to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No binding exists and none could be created.
    UnboundProperty,
    /// The submitted text could not be converted, including the case where
    /// no formatter is available for the property.
    Conversion,
    /// The model rejected the coerced value.
    PropertyAccess,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnboundProperty => "unbound_property",
            Self::Conversion => "conversion",
            Self::PropertyAccess => "property_access",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingFailure {
    kind: FailureKind,
    message: String,
}

impl BindingFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BindingOutcome {
    /// The coerced value now on the model.
    Success { value: Value },
    Failure(BindingFailure),
}

/// Outcome for one submitted field. The submitted value is kept in both
/// cases, so failed input can be redisplayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingResult {
    property: String,
    submitted: SubmittedValue,
    #[serde(flatten)]
    outcome: BindingOutcome,
}

impl BindingResult {
    pub fn bound(property: impl Into<String>, submitted: SubmittedValue, value: Value) -> Self {
        Self {
            property: property.into(),
            submitted,
            outcome: BindingOutcome::Success { value },
        }
    }

    pub fn rejected(
        property: impl Into<String>,
        submitted: SubmittedValue,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            submitted,
            outcome: BindingOutcome::Failure(BindingFailure::new(kind, message)),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn submitted(&self) -> &SubmittedValue {
        &self.submitted
    }

    pub fn outcome(&self) -> &BindingOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BindingOutcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The coerced value, for successful results.
    pub fn value(&self) -> Option<&Value> {
        match &self.outcome {
            BindingOutcome::Success { value } => Some(value),
            BindingOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&BindingFailure> {
        match &self.outcome {
            BindingOutcome::Success { .. } => None,
            BindingOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure().map(BindingFailure::kind)
    }

    /// The text as submitted; multiple values are comma-joined.
    pub fn original_text(&self) -> String {
        self.submitted.to_string()
    }
}

/// All results of one bind, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BindingResults {
    results: Vec<BindingResult>,
}

impl BindingResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BindingResult> {
        self.results.iter()
    }

    /// Returns the first result for `property`.
    pub fn get(&self, property: &str) -> Option<&BindingResult> {
        self.results.iter().find(|r| r.property == property)
    }

    pub fn successes(&self) -> impl Iterator<Item = &BindingResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &BindingResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(BindingResult::is_failure)
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn into_vec(self) -> Vec<BindingResult> {
        self.results
    }
}

impl From<Vec<BindingResult>> for BindingResults {
    fn from(results: Vec<BindingResult>) -> Self {
        Self { results }
    }
}

impl FromIterator<BindingResult> for BindingResults {
    fn from_iter<I: IntoIterator<Item = BindingResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BindingResults {
    type Item = BindingResult;
    type IntoIter = std::vec::IntoIter<BindingResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BindingResults {
    type Item = &'a BindingResult;
    type IntoIter = std::slice::Iter<'a, BindingResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
