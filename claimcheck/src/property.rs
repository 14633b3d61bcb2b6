//! Predicates and classifiers: the user-supplied halves of a claim.
//!
//! Closures are accepted directly. A predicate closure may return a plain
//! `bool`, a [`Verdict`] (to attach a classification label), or a `Result`
//! of either whose error is recorded as a lost case.

use std::fmt::Display;

use crate::error::PredicateError;
use crate::value::Value;

/// The outcome a predicate reports for one trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    /// Overrides the classifier's label for this trial
    pub label: Option<String>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            label: None,
        }
    }

    pub fn fail() -> Self {
        Self {
            passed: false,
            label: None,
        }
    }

    /// Attach a classification label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        Self {
            passed,
            label: None,
        }
    }
}

/// Conversion from a predicate closure's return type into a verdict
pub trait IntoVerdict {
    fn into_verdict(self) -> Result<Verdict, PredicateError>;
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Result<Verdict, PredicateError> {
        Ok(Verdict::from(self))
    }
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Result<Verdict, PredicateError> {
        Ok(self)
    }
}

impl<E: Display> IntoVerdict for Result<bool, E> {
    fn into_verdict(self) -> Result<Verdict, PredicateError> {
        self.map(Verdict::from)
            .map_err(|e| PredicateError::new(e.to_string()))
    }
}

impl<E: Display> IntoVerdict for Result<Verdict, E> {
    fn into_verdict(self) -> Result<Verdict, PredicateError> {
        self.map_err(|e| PredicateError::new(e.to_string()))
    }
}

/// The property under test.
///
/// Implemented for every `FnMut(&[Value]) -> R + Send` where `R` is one of
/// the [`IntoVerdict`] types.
pub trait Predicate: Send {
    fn evaluate(&mut self, args: &[Value]) -> Result<Verdict, PredicateError>;
}

impl<F, R> Predicate for F
where
    F: FnMut(&[Value]) -> R + Send,
    R: IntoVerdict,
{
    fn evaluate(&mut self, args: &[Value]) -> Result<Verdict, PredicateError> {
        self(args).into_verdict()
    }
}

/// Assigns a classification label to a trial's arguments.
///
/// Returning `None` rejects the arguments: the attempt is discarded and does
/// not count as a trial.
pub trait Classifier: Send {
    fn classify(&mut self, args: &[Value]) -> Option<String>;
}

impl<F, L> Classifier for F
where
    F: FnMut(&[Value]) -> Option<L> + Send,
    L: Into<String>,
{
    fn classify(&mut self, args: &[Value]) -> Option<String> {
        self(args).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate<P: Predicate>(mut predicate: P, args: &[Value]) -> Result<Verdict, PredicateError> {
        predicate.evaluate(args)
    }

    #[test]
    fn test_bool_closure() {
        let even = |args: &[Value]| args[0].as_i64().is_some_and(|n| n % 2 == 0);
        assert_eq!(evaluate(even, &[4.into()]), Ok(Verdict::pass()));
        assert_eq!(evaluate(even, &[3.into()]), Ok(Verdict::fail()));
    }

    #[test]
    fn test_verdict_closure_carries_label() {
        let labelled = |args: &[Value]| Verdict::pass().with_label(args[0].type_name());
        assert_eq!(
            evaluate(labelled, &["x".into()]).unwrap().label.as_deref(),
            Some("string")
        );
    }

    #[test]
    fn test_result_closures() {
        let parse = |args: &[Value]| -> Result<bool, std::num::ParseIntError> {
            let n: i64 = args[0].as_str().unwrap_or_default().parse()?;
            Ok(n > 0)
        };
        assert_eq!(evaluate(parse, &["12".into()]), Ok(Verdict::pass()));
        assert_eq!(
            evaluate(parse, &["twelve".into()]),
            Err(PredicateError::new("invalid digit found in string"))
        );

        let labelled = |_args: &[Value]| -> Result<Verdict, String> { Err("nope".to_string()) };
        assert_eq!(
            evaluate(labelled, &[]).unwrap_err().message(),
            "nope"
        );
    }

    #[test]
    fn test_stateful_predicate() {
        let mut calls = 0;
        let mut counting = move |_args: &[Value]| {
            calls += 1;
            calls < 3
        };
        assert!(counting.evaluate(&[]).unwrap().passed);
        assert!(counting.evaluate(&[]).unwrap().passed);
        assert!(!counting.evaluate(&[]).unwrap().passed);
    }

    #[test]
    fn test_classifier_closure() {
        let mut sign = |args: &[Value]| {
            let n = args[0].as_f64()?;
            Some(if n < 0.0 { "negative" } else { "non-negative" })
        };
        assert_eq!(sign.classify(&[(-1).into()]), Some("negative".to_string()));
        assert_eq!(sign.classify(&["x".into()]), None);
    }
}
