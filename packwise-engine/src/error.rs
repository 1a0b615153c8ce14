//! Error types for rule evaluation.
//!
//! None of these abort a packing-list computation; the engine turns them into
//! [`crate::Diagnostic`]s and drops the affected contribution.

use packwise_model::Operator;
use thiserror::Error;

/// Which entity a condition is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Person,
    Day,
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Person => write!(f, "person"),
            Subject::Day => write!(f, "day"),
        }
    }
}

/// `ConditionTypeMismatch`: a condition applied to the wrong or a missing
/// entity, or whose operator/value does not fit the field it reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("{0} condition evaluated without a {0}")]
    MissingSubject(Subject),

    #[error("operator {operator:?} does not apply to field {field}")]
    UnsupportedOperator {
        field: &'static str,
        operator: Operator,
    },

    #[error("field {field} expects a {expected} value")]
    ValueType {
        field: &'static str,
        expected: &'static str,
    },
}

/// A calculation contribution that could not be computed. Counts as zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("no matched person has field {0} set")]
    MissingField(&'static str),

    #[error("increment condition failed: {0}")]
    Condition(#[from] ConditionError),
}
