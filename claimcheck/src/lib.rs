//! # claimcheck - Claim-Based Property Testing for Rust
//!
//! claimcheck lets you state a *claim*, a predicate that should hold for
//! every input of a declared shape, and then checks it against many randomly
//! generated inputs. Every trial ends as a pass, a fail, or a *lost* case
//! (the input could not be evaluated because a generator or the predicate
//! raised), and the outcomes can be bucketed by a classification label.
//!
//! Input shapes are written with specifier combinators. A [`Specifier`] is
//! either a literal [`Value`] or a [`Generator`], and every combinator takes
//! specifiers as parameters, so generators nest freely.
//!
//! ## Quick Start
//!
//! ```rust
//! use claimcheck::{CheckConfig, Checker, Value, Verdict, integer_between, specs, string};
//!
//! let mut checker = Checker::new();
//! checker.claim(
//!     "repeat length",
//!     |args: &[Value]| {
//!         let text = args[0].as_str().unwrap_or_default();
//!         let times = args[1].as_i64().unwrap_or_default() as usize;
//!         let passed = text.repeat(times).len() == text.len() * times;
//!         Verdict::from(passed).with_label(if text.is_empty() { "empty" } else { "text" })
//!     },
//!     specs![string(), integer_between(0, 5)],
//! );
//!
//! let report = checker.check(&CheckConfig::default().with_seed(42)).unwrap();
//! assert!(report.ok());
//! println!("{}", report);
//! ```

// Public modules
pub mod claim;
pub mod collections;
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
mod macros;
pub mod performance;
pub mod primitives;
pub mod property;
pub mod report;
pub mod rng;
pub mod selection;
pub mod statistics;
pub mod value;

// Re-export the main public API
pub use claim::{Checker, Claim};
pub use collections::{
    ArrayGenerator, ArrayShape, KeyedValues, MAX_LENGTH, ObjectGenerator, ObjectShape,
    StringGenerator, any, array, array_of, array_sized, object, object_cycling, object_keyed,
    object_of, object_sized, object_with, string, string_of,
};
pub use config::{CheckConfig, CheckOptions, ConfigError, Detail};
pub use error::{CombinatorError, GenerationError, LostCause, PredicateError, Stage};
pub use execution::{CheckObserver, NoopObserver};
pub use generator::{BoxedGenerator, FnGenerator, Generator, Specifier, from_fn, resolve, thunk};
pub use performance::ParallelConfig;
pub use primitives::*;
pub use property::{Classifier, IntoVerdict, Predicate, Verdict};
pub use report::JsonFormatter;
pub use report::{ReportFormatter, TextFormatter};
pub use rng::{DefaultRngProvider, RngProvider, create_seeded_rng};
pub use selection::{Sequence, WunOf, falsy, falsy_values, sequence, wun_of, wun_of_weighted};
pub use statistics::{Bucket, CheckReport, ClaimSummary, LostCase, Outcome, Tally, Trial};
pub use value::Value;
