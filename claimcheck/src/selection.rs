//! Selection combinators: `wun_of`, `sequence` and `falsy`.

use rand::RngCore;

use crate::error::{CombinatorError, GenerationError};
use crate::generator::{Generator, Specifier};
use crate::rng::{index, unit};
use crate::value::Value;

enum Choice {
    Uniform,
    /// Inverse-CDF table: normalized partial sums, plus the raw weights so
    /// zero-weight slots can be skipped
    Weighted {
        cumulative: Vec<f64>,
        weights: Vec<f64>,
        fallback: usize,
    },
}

/// Picks one of its elements per call and resolves it
pub struct WunOf {
    items: Vec<Specifier>,
    choice: Choice,
}

impl WunOf {
    /// Uniform choice over a list already known to be non-empty
    pub(crate) fn uniform(items: Vec<Specifier>) -> Self {
        debug_assert!(!items.is_empty());
        Self {
            items,
            choice: Choice::Uniform,
        }
    }

    fn pick(&self, rng: &mut dyn RngCore) -> usize {
        match &self.choice {
            Choice::Uniform => index(rng, self.items.len()),
            Choice::Weighted {
                cumulative,
                weights,
                fallback,
            } => {
                let x = unit(rng);
                cumulative
                    .iter()
                    .zip(weights)
                    .position(|(&c, &w)| c >= x && w > 0.0)
                    .unwrap_or(*fallback)
            }
        }
    }
}

impl Generator for WunOf {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let chosen = self.pick(rng);
        self.items[chosen].resolve(rng, &[])
    }
}

/// Choose uniformly among `items`, resolving the chosen one
///
/// # Examples
///
/// ```rust
/// use claimcheck::{specs, wun_of, integer_between};
///
/// let mut spec = wun_of(specs!["red", "green", integer_between(1, 3)]).unwrap();
/// let mut rng = claimcheck::rng::create_seeded_rng(5);
/// let value = spec.resolve(&mut rng, &[]).unwrap();
/// assert!(value.as_str().is_some() || value.as_i64().is_some());
/// ```
pub fn wun_of(items: Vec<Specifier>) -> Result<Specifier, CombinatorError> {
    if items.is_empty() {
        return Err(CombinatorError::EmptyChoices);
    }
    Ok(Specifier::generator(WunOf::uniform(items)))
}

/// Choose among `items` with probability proportional to `weights`.
///
/// A zero weight makes its element unreachable. When a draw lands exactly on
/// a cumulative boundary the lower index wins.
pub fn wun_of_weighted(
    items: Vec<Specifier>,
    weights: Vec<f64>,
) -> Result<Specifier, CombinatorError> {
    if items.is_empty() {
        return Err(CombinatorError::EmptyChoices);
    }
    if weights.len() != items.len() {
        return Err(CombinatorError::WeightCountMismatch {
            items: items.len(),
            weights: weights.len(),
        });
    }
    if let Some((index, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(CombinatorError::InvalidWeight { index, weight });
    }
    let largest = weights.iter().copied().fold(0.0, f64::max);
    if largest <= 0.0 {
        return Err(CombinatorError::ZeroTotalWeight);
    }

    // scale by the largest weight so the sum stays finite
    let total: f64 = weights.iter().map(|w| w / largest).sum();
    let mut base = 0.0;
    let cumulative = weights
        .iter()
        .map(|w| {
            base += w / largest;
            base / total
        })
        .collect();
    let fallback = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);

    Ok(Specifier::generator(WunOf {
        items,
        choice: Choice::Weighted {
            cumulative,
            weights,
            fallback,
        },
    }))
}

/// Deterministic cycling through a fixed list
pub struct Sequence {
    items: Vec<Specifier>,
    cursor: usize,
}

impl Generator for Sequence {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let current = self.cursor;
        self.cursor = (self.cursor + 1) % self.items.len();
        self.items[current].resolve(rng, &[])
    }
}

/// Yield the elements of `items` in order, wrapping back to the first after
/// the last. The cursor belongs to the returned generator alone.
pub fn sequence(items: Vec<Specifier>) -> Result<Specifier, CombinatorError> {
    if items.is_empty() {
        return Err(CombinatorError::EmptySequence);
    }
    Ok(Specifier::generator(Sequence { items, cursor: 0 }))
}

/// The falsy values, for building custom selections
pub fn falsy_values() -> Vec<Value> {
    vec![
        Value::Bool(false),
        Value::Null,
        Value::Undefined,
        Value::from(""),
        Value::from(0),
        Value::nan(),
    ]
}

/// One of `false`, `null`, `undefined`, `""`, `0` or `NaN`
pub fn falsy() -> Specifier {
    Specifier::generator(WunOf::uniform(
        falsy_values().into_iter().map(Specifier::Value).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::integer_between;
    use crate::rng::create_seeded_rng;
    use crate::specs;

    fn draw(spec: &mut Specifier, n: usize) -> Vec<Value> {
        let mut rng = create_seeded_rng(77);
        (0..n).map(|_| spec.resolve(&mut rng, &[]).unwrap()).collect()
    }

    #[test]
    fn test_wun_of_rejects_empty() {
        assert_eq!(wun_of(vec![]).unwrap_err(), CombinatorError::EmptyChoices);
        assert_eq!(
            wun_of_weighted(vec![], vec![]).unwrap_err(),
            CombinatorError::EmptyChoices
        );
    }

    #[test]
    fn test_wun_of_rejects_mismatched_weights() {
        assert_eq!(
            wun_of_weighted(specs![1, 2, 3], vec![1.0, 2.0]).unwrap_err(),
            CombinatorError::WeightCountMismatch {
                items: 3,
                weights: 2
            }
        );
    }

    #[test]
    fn test_wun_of_rejects_bad_weights() {
        assert_eq!(
            wun_of_weighted(specs![1, 2], vec![1.0, -1.0]).unwrap_err(),
            CombinatorError::InvalidWeight {
                index: 1,
                weight: -1.0
            }
        );
        assert!(matches!(
            wun_of_weighted(specs![1, 2], vec![f64::NAN, 1.0]).unwrap_err(),
            CombinatorError::InvalidWeight { index: 0, .. }
        ));
        assert_eq!(
            wun_of_weighted(specs![1, 2], vec![0.0, 0.0]).unwrap_err(),
            CombinatorError::ZeroTotalWeight
        );
    }

    #[test]
    fn test_wun_of_uniform_covers_all() {
        let mut spec = wun_of(specs!["a", "b", "c"]).unwrap();
        let values = draw(&mut spec, 300);
        for letter in ["a", "b", "c"] {
            assert!(values.contains(&Value::from(letter)));
        }
    }

    #[test]
    fn test_wun_of_resolves_nested_specifiers() {
        let mut spec = wun_of(specs![integer_between(10, 20)]).unwrap();
        for value in draw(&mut spec, 100) {
            assert!((10..=20).contains(&value.as_i64().unwrap()));
        }
    }

    #[test]
    fn test_zero_weights_are_never_chosen() {
        let mut spec = wun_of_weighted(
            specs!["never", "a", "never", "b", "never"],
            vec![0.0, 1.0, 0.0, 3.0, 0.0],
        )
        .unwrap();
        let values = draw(&mut spec, 10_000);
        assert!(values.iter().all(|v| *v != Value::from("never")));

        let a = values.iter().filter(|v| **v == Value::from("a")).count() as f64;
        let fraction = a / values.len() as f64;
        assert!((fraction - 0.25).abs() < 0.02, "fraction of a: {}", fraction);
    }

    #[test]
    fn test_huge_weights_keep_proportions() {
        let mut spec = wun_of_weighted(specs!["a", "b"], vec![f64::MAX, f64::MAX]).unwrap();
        let values = draw(&mut spec, 10_000);
        let a = values.iter().filter(|v| **v == Value::from("a")).count() as f64;
        let fraction = a / values.len() as f64;
        assert!((fraction - 0.5).abs() < 0.03, "fraction of a: {}", fraction);

        let mut spec = wun_of_weighted(specs!["tiny", "huge"], vec![1.0, f64::MAX]).unwrap();
        assert!(draw(&mut spec, 1000).iter().all(|v| *v == Value::from("huge")));
    }

    #[test]
    fn test_weighted_pick_boundaries() {
        // a leading zero weight stays unreachable even for a draw of exactly 0
        let weighted = WunOf {
            items: specs!["zero", "one"],
            choice: Choice::Weighted {
                cumulative: vec![0.0, 1.0],
                weights: vec![0.0, 1.0],
                fallback: 1,
            },
        };
        struct ZeroRng;
        impl RngCore for ZeroRng {
            fn next_u32(&mut self) -> u32 {
                0
            }
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }
        assert_eq!(weighted.pick(&mut ZeroRng), 1);
    }

    #[test]
    fn test_sequence_cycles_exactly() {
        let mut spec = sequence(specs!["a", "b", "c"]).unwrap();
        let values = draw(&mut spec, 7);
        let expected: Vec<Value> = ["a", "b", "c", "a", "b", "c", "a"]
            .iter()
            .map(|s| Value::from(*s))
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_sequence_instances_have_independent_cursors() {
        let mut first = sequence(specs![1, 2]).unwrap();
        let mut second = sequence(specs![1, 2]).unwrap();
        assert_eq!(draw(&mut first, 3), vec![1.into(), 2.into(), 1.into()]);
        assert_eq!(draw(&mut second, 1), vec![1.into()]);
        assert_eq!(draw(&mut first, 1), vec![2.into()]);
    }

    #[test]
    fn test_sequence_rejects_empty() {
        assert_eq!(sequence(vec![]).unwrap_err(), CombinatorError::EmptySequence);
    }

    #[test]
    fn test_falsy_only_yields_falsy_values() {
        let mut spec = falsy();
        let values = draw(&mut spec, 600);
        assert!(values.iter().all(Value::is_falsy));
        assert!(values.iter().any(|v| v.as_f64().is_some_and(f64::is_nan)));
        assert!(values.contains(&Value::Undefined));
        assert!(values.contains(&Value::Null));
    }
}
