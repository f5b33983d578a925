//! Configuration errors raised while building rules and rule sets.

use crate::core::ValueKind;
use thiserror::Error;

/// Errors caused by a defect in the rule declarations, not by the data
/// being validated. These are never reported as violations.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("No field of type `{field_type}` found in record `{record}`")]
    FieldNotFound {
        record: &'static str,
        field_type: &'static str,
    },

    #[error("Rule `{rule}` does not support {kind} field `{field}`")]
    UnsupportedKind {
        rule: &'static str,
        kind: ValueKind,
        field: String,
    },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Rule export failed: {0}")]
    Export(#[from] serde_json::Error),
}
