//! Scalar combinators: literal, boolean, number, integer and character.

use std::sync::OnceLock;

use rand::RngCore;

use crate::error::{CombinatorError, GenerationError};
use crate::generator::{Generator, Settled, Specifier};
use crate::rng::{index, unit};
use crate::value::Value;

/// Generator that re-resolves a wrapped specifier on every call
pub struct Literal {
    inner: Specifier,
}

impl Generator for Literal {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        args: &[Value],
    ) -> Result<Value, GenerationError> {
        self.inner.resolve(rng, args)
    }
}

/// Always produces `value`, resolving it lazily if it is itself a generator
pub fn literal(value: impl Into<Specifier>) -> Specifier {
    Specifier::generator(Literal {
        inner: value.into(),
    })
}

/// Generator for biased booleans
pub struct BoolGenerator {
    bias: Settled<f64>,
}

impl Generator for BoolGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let bias = self.bias.get(rng, Value::to_number)?;
        Ok(Value::Bool(unit(rng) < bias))
    }
}

/// Fair coin
pub fn boolean() -> Specifier {
    boolean_with_bias(0.5)
}

/// `true` with probability `bias`.
///
/// A generator bias is resolved once, the first time a value is drawn, and
/// then stays fixed for the lifetime of this generator.
pub fn boolean_with_bias(bias: impl Into<Specifier>) -> Specifier {
    Specifier::generator(BoolGenerator {
        bias: Settled::new(bias.into(), Value::to_number),
    })
}

/// Generator for uniform reals in a half-open range
pub struct NumberGenerator {
    from: Settled<f64>,
    to: Settled<f64>,
}

impl Generator for NumberGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let mut from = self.from.get(rng, Value::to_number)?;
        let mut to = self.to.get(rng, Value::to_number)?;
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }
        Ok(Value::Number(unit(rng) * (to - from) + from))
    }
}

/// Uniform reals in `[0, 1)`
pub fn number() -> Specifier {
    number_between(1, 0)
}

/// Uniform reals in `[from, to)`; inverted bounds are swapped
pub fn number_between(from: impl Into<Specifier>, to: impl Into<Specifier>) -> Specifier {
    Specifier::generator(NumberGenerator {
        from: Settled::new(from.into(), Value::to_number),
        to: Settled::new(to.into(), Value::to_number),
    })
}

/// Coerce a bound: numbers floor, strings give their first code point,
/// anything else is 1
pub(crate) fn integer_bound(value: &Value) -> i64 {
    match value {
        Value::Number(n) if n.is_finite() => n.floor() as i64,
        Value::String(s) => s.chars().next().map_or(1, |c| c as i64),
        _ => 1,
    }
}

fn primes() -> &'static [i64] {
    static PRIMES: OnceLock<Vec<i64>> = OnceLock::new();
    PRIMES.get_or_init(|| {
        let mut sieve = vec![true; 1000];
        sieve[0] = false;
        sieve[1] = false;
        let mut i = 2;
        while i * i < sieve.len() {
            if sieve[i] {
                let mut j = i * i;
                while j < sieve.len() {
                    sieve[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        sieve
            .iter()
            .enumerate()
            .filter(|(_, is_prime)| **is_prime)
            .map(|(n, _)| n as i64)
            .collect()
    })
}

enum IntegerShape {
    Primes,
    Between { low: Settled<i64>, high: Settled<i64> },
}

/// Generator for uniform integers
pub struct IntegerGenerator {
    shape: IntegerShape,
}

impl IntegerGenerator {
    fn between(low: Specifier, high: Specifier) -> Self {
        Self {
            shape: IntegerShape::Between {
                low: Settled::new(low, integer_bound),
                high: Settled::new(high, integer_bound),
            },
        }
    }

    fn draw(&mut self, rng: &mut dyn RngCore) -> Result<i64, GenerationError> {
        match &mut self.shape {
            IntegerShape::Primes => {
                let table = primes();
                Ok(table[index(rng, table.len())])
            }
            IntegerShape::Between { low, high } => {
                let mut i = low.get(rng, integer_bound)?;
                let mut j = high.get(rng, integer_bound)?;
                if i > j {
                    std::mem::swap(&mut i, &mut j);
                }
                let span = (j as f64) - (i as f64) + 1.0;
                let drawn = (unit(rng) * span).floor() as i64;
                Ok(i.saturating_add(drawn).min(j))
            }
        }
    }
}

impl Generator for IntegerGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        Ok(Value::from(self.draw(rng)?))
    }
}

/// A prime below 1000, chosen uniformly
pub fn integer() -> Specifier {
    Specifier::generator(IntegerGenerator {
        shape: IntegerShape::Primes,
    })
}

/// Uniform integers in `[1, n]`
pub fn integer_up_to(n: impl Into<Specifier>) -> Specifier {
    Specifier::generator(IntegerGenerator::between(Specifier::from(1), n.into()))
}

/// Uniform integers in `[i, j]`, swapping inverted bounds.
///
/// Bounds are coerced once: numbers are floored, a string contributes its
/// first code point and anything else counts as 1.
pub fn integer_between(i: impl Into<Specifier>, j: impl Into<Specifier>) -> Specifier {
    Specifier::generator(IntegerGenerator::between(i.into(), j.into()))
}

enum CharShape {
    Alphabet(Vec<char>),
    Range(IntegerGenerator),
}

/// Generator for single-character strings
pub struct CharGenerator {
    shape: CharShape,
}

impl Generator for CharGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let c = match &mut self.shape {
            CharShape::Alphabet(chars) => chars[index(rng, chars.len())],
            CharShape::Range(codes) => {
                let code = codes.draw(rng)?;
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(GenerationError::InvalidCodePoint { code })?
            }
        };
        Ok(Value::from(c))
    }
}

/// A printable ASCII character, code points 32 through 126
pub fn character() -> Specifier {
    character_between(32, 126)
}

/// A character drawn uniformly from `alphabet`
pub fn character_from(alphabet: &str) -> Result<Specifier, CombinatorError> {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return Err(CombinatorError::EmptyAlphabet);
    }
    Ok(Specifier::generator(CharGenerator {
        shape: CharShape::Alphabet(chars),
    }))
}

/// A character whose code point lies in `[i, j]`; string bounds contribute
/// their first code point
pub fn character_between(i: impl Into<Specifier>, j: impl Into<Specifier>) -> Specifier {
    Specifier::generator(CharGenerator {
        shape: CharShape::Range(IntegerGenerator::between(i.into(), j.into())),
    })
}
