//! Claims and the registry that checks them.

use std::fmt;
use std::sync::Arc;

use crate::config::{CheckConfig, ConfigError, Detail};
use crate::execution::{CheckObserver, NoopObserver, run_claim};
use crate::generator::Specifier;
use crate::performance::{ParallelConfig, run_parallel};
use crate::property::{Classifier, Predicate};
use crate::rng::{derive_seed, entropy_seed};
use crate::statistics::{CheckReport, ClaimSummary};

/// A named predicate together with the signature its arguments are drawn
/// from and an optional classifier
pub struct Claim {
    name: String,
    pub(crate) predicate: Box<dyn Predicate>,
    pub(crate) signature: Vec<Specifier>,
    pub(crate) classifier: Option<Box<dyn Classifier>>,
}

impl Claim {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
        signature: Vec<Specifier>,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
            signature,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claim")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("classified", &self.classifier.is_some())
            .finish()
    }
}

/// Registry of claims awaiting a check run.
///
/// # Examples
///
/// ```rust
/// use claimcheck::{CheckConfig, Checker, Value, integer_between, specs};
///
/// let mut checker = Checker::new();
/// checker.claim(
///     "addition commutes",
///     |args: &[Value]| {
///         let (a, b) = (args[0].to_number(), args[1].to_number());
///         a + b == b + a
///     },
///     specs![integer_between(-100, 100), integer_between(-100, 100)],
/// );
///
/// let report = checker.check(&CheckConfig::default().with_seed(7)).unwrap();
/// assert!(report.ok());
/// assert_eq!(report.claims[0].cases(), 100);
/// ```
pub struct Checker {
    claims: Vec<Claim>,
    observer: Arc<dyn CheckObserver>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        Self {
            claims: Vec::new(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replace the observer notified during checks
    pub fn with_observer(mut self, observer: impl CheckObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Register a claim
    pub fn claim(
        &mut self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
        signature: Vec<Specifier>,
    ) -> &mut Self {
        self.register(Claim::new(name, predicate, signature))
    }

    /// Register a claim whose trials are bucketed by `classifier`
    pub fn claim_classified(
        &mut self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
        signature: Vec<Specifier>,
        classifier: impl Classifier + 'static,
    ) -> &mut Self {
        self.register(Claim::new(name, predicate, signature).with_classifier(classifier))
    }

    /// Register a prepared claim. Repeated names are kept and reported
    /// separately.
    pub fn register(&mut self, claim: Claim) -> &mut Self {
        if self.claims.iter().any(|existing| existing.name == claim.name) {
            tracing::warn!(claim = %claim.name, "claim name registered more than once");
        }
        self.claims.push(claim);
        self
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.claims.iter().map(Claim::name)
    }

    /// Run every registered claim in registration order, draining the
    /// registry.
    pub fn check(&mut self, config: &CheckConfig) -> Result<CheckReport, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let observer = Arc::clone(&self.observer);

        let summaries: Vec<ClaimSummary> = self
            .claims
            .drain(..)
            .enumerate()
            .map(|(index, mut claim)| {
                run_claim(&mut claim, config, derive_seed(seed, index), observer.as_ref())
            })
            .collect();

        Ok(self.finish(config, seed, summaries))
    }

    /// Like [`check`](Self::check), but distributes whole claims across
    /// threads. With the same seed the report equals the sequential one.
    pub fn check_parallel(
        &mut self,
        config: &CheckConfig,
        parallel: &ParallelConfig,
    ) -> Result<CheckReport, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let observer = Arc::clone(&self.observer);
        let claims: Vec<Claim> = self.claims.drain(..).collect();

        let summaries = run_parallel(claims, config, seed, observer.as_ref(), parallel);
        Ok(self.finish(config, seed, summaries))
    }

    fn finish(&self, config: &CheckConfig, seed: u64, summaries: Vec<ClaimSummary>) -> CheckReport {
        let report = CheckReport::new(seed, summaries);
        if config.detail > Detail::Silent {
            self.observer.on_report(&report.render(config.detail));
        }
        self.observer.on_result(&report.total, report.ok());
        tracing::info!(
            seed,
            claims = report.claims.len(),
            pass = report.total.pass,
            fail = report.total.fail,
            lost = report.total.lost,
            "check finished"
        );
        report
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}
