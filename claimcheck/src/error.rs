//! Error types for claim setup and trial execution.
//!
//! Errors come in two tiers. A [`CombinatorError`] is a mistake in how a
//! signature was put together and is returned by the combinator constructors
//! before any trial runs. Everything that goes wrong *during* a trial is
//! captured as a [`LostCause`] and recorded as data on the claim summary.

use std::fmt;

use thiserror::Error;

/// Malformed combinator arguments, detected at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombinatorError {
    /// `wun_of` needs at least one element to choose from
    #[error("wun_of requires a non-empty list of choices")]
    EmptyChoices,

    /// Weighted `wun_of` needs exactly one weight per element
    #[error("wun_of got {weights} weights for {items} choices")]
    WeightCountMismatch { items: usize, weights: usize },

    /// A weight was negative, NaN or infinite
    #[error("wun_of weight {weight} at index {index} is not a finite non-negative number")]
    InvalidWeight { index: usize, weight: f64 },

    /// Every weight was zero, so nothing is reachable
    #[error("wun_of weights sum to zero")]
    ZeroTotalWeight,

    /// `sequence` needs at least one element to cycle through
    #[error("sequence requires a non-empty list of elements")]
    EmptySequence,

    /// `character_from` needs at least one character
    #[error("character alphabet is empty")]
    EmptyAlphabet,

    /// `object_cycling` needs at least one value to cycle through
    #[error("object values to cycle through are empty")]
    EmptyObjectValues,

    /// `object_with` was called with a subject/value combination it cannot build
    #[error("object cannot be built from a {subject} subject {}", value_clause(.with_value))]
    UnsupportedObjectShape {
        subject: &'static str,
        with_value: bool,
    },
}

fn value_clause(with_value: &bool) -> &'static str {
    if *with_value {
        "with a value specifier"
    } else {
        "without a value specifier"
    }
}

/// A generator could not produce a value for one trial
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// A length or repeat count did not resolve to a non-negative integer
    #[error("length must be a non-negative integer, got {value}")]
    InvalidLength { value: String },

    /// A length or repeat count exceeds the per-value limit
    #[error("length {count} exceeds the limit of {limit}")]
    LengthTooLarge { count: usize, limit: usize },

    /// A drawn code point is not a Unicode scalar value
    #[error("code point {code} is not a valid character")]
    InvalidCodePoint { code: i64 },

    /// A specifier resolved to a value the combinator cannot use
    #[error("expected {expected}, got {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    /// Raised by a user-supplied generator
    #[error("{0}")]
    Custom(String),
}

impl GenerationError {
    /// Create a generation error with a free-form message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// The error half of a predicate's outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which part of a trial was running when it was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generation,
    Classification,
    Predicate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generation => write!(f, "generation"),
            Stage::Classification => write!(f, "classification"),
            Stage::Predicate => write!(f, "predicate"),
        }
    }
}

/// Why a trial could not be evaluated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LostCause {
    /// A generator in the signature returned an error
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The predicate returned an error
    #[error("predicate raised: {0}")]
    Predicate(#[from] PredicateError),

    /// Something panicked
    #[error("{stage} panicked: {message}")]
    Panicked { stage: Stage, message: String },
}

impl LostCause {
    pub(crate) fn panicked(stage: Stage, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked { stage, message }
    }

    pub fn stage(&self) -> Stage {
        match self {
            LostCause::Generation(_) => Stage::Generation,
            LostCause::Predicate(_) => Stage::Predicate,
            LostCause::Panicked { stage, .. } => *stage,
        }
    }
}
