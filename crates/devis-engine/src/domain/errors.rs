//! Error types for the devis pricing engine
//!
//! Fatal errors abort the whole computation for a quote; a devis must
//! never display a total computed from only some of its adjustments.
//! Placement problems are the one non-fatal case and are collected as
//! warnings next to a still-valid result.

use super::value_objects::{Scope, SiblingRef, SpecialLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All fatal errors that can occur while pricing a devis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A base reference would require the referencing line's own
    /// unresolved value
    #[error("Cycle detected: special line '{description}' ({line}) references a total that depends on it")]
    CycleDetected {
        line: SpecialLineId,
        description: String,
    },

    /// Base reference points at a deleted or unknown node
    #[error("Base reference target not found for special line '{description}' ({line}): {label}")]
    TargetNotFound {
        line: SpecialLineId,
        description: String,
        /// Human-readable label of the dangling reference
        label: String,
    },

    /// Percentage outside [0, 100]; rejected, never clamped
    #[error("Invalid percentage {value} on special line '{description}' ({line}): must be in [0, 100]")]
    InvalidPercentage {
        line: SpecialLineId,
        description: String,
        value: Decimal,
    },

    /// Negative value committed; sign is derived from the line type
    #[error("Negative value {value} on special line '{description}' ({line}): the sign comes from the line type")]
    NegativeValue {
        line: SpecialLineId,
        description: String,
        value: Decimal,
    },

    /// Percentage line committed without a base reference
    #[error("Special line '{description}' ({line}) is a percentage but has no base reference")]
    MissingBaseRef {
        line: SpecialLineId,
        description: String,
    },

    /// Special line attached to a scope that is not in the tree
    #[error("Special line '{description}' ({line}) is attached to unknown scope {scope}")]
    ScopeNotFound {
        line: SpecialLineId,
        description: String,
        scope: Scope,
    },

    /// A scope was requested that is not in the tree
    #[error("Unknown scope {scope}")]
    UnknownScope { scope: Scope },

    /// Ligne count exceeded limits (anti-DoS)
    #[error("Devis too large: {lignes} lignes > {max}")]
    DevisTooLarge { lignes: usize, max: usize },

    /// Special line count exceeded limits (anti-DoS)
    #[error("Too many special lines: {count} > {max}")]
    TooManySpecialLines { count: usize, max: usize },

    /// Storage collaborator failure surfaced through the pricing pipeline
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Non-fatal placement degradation, collected alongside a valid ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementWarning {
    pub line: SpecialLineId,
    pub description: String,
    /// The anchor sibling that no longer exists
    pub missing_sibling: Option<SiblingRef>,
}

/// Errors from the storage collaborator behind the outbound port
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Devis not found: {0}")]
    NotFound(String),

    #[error("Backend failure: {0}")]
    Backend(String),
}

impl From<RepositoryError> for PricingError {
    fn from(err: RepositoryError) -> Self {
        PricingError::Repository(err.to_string())
    }
}
