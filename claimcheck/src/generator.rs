//! Core generator trait and the specifier resolution protocol.
//!
//! A [`Specifier`] is either a concrete [`Value`] or a [`Generator`]. The
//! combinators accept specifiers everywhere, so "a constant" and "a rule for
//! producing values" can be used interchangeably, and [`resolve`] is the one
//! place that tells them apart.

use std::fmt;

use rand::RngCore;

use crate::error::GenerationError;
use crate::value::Value;

/// Produces a fresh value each time it is called.
///
/// `args` carries extra resolution arguments; most generators ignore them,
/// `object_keyed` passes the key's position.
pub trait Generator: Send {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        args: &[Value],
    ) -> Result<Value, GenerationError>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        args: &[Value],
    ) -> Result<Value, GenerationError> {
        (**self).generate(rng, args)
    }
}

/// A type-erased generator
pub type BoxedGenerator = Box<dyn Generator>;

/// A literal value or a generator
pub enum Specifier {
    Value(Value),
    Generator(BoxedGenerator),
}

impl Specifier {
    /// Wrap a generator
    pub fn generator<G: Generator + 'static>(generator: G) -> Self {
        Specifier::Generator(Box::new(generator))
    }

    pub fn is_generator(&self) -> bool {
        matches!(self, Specifier::Generator(_))
    }

    /// The literal value, if this is not a generator
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Specifier::Value(value) => Some(value),
            Specifier::Generator(_) => None,
        }
    }

    /// Whether this is the literal `undefined`
    pub(crate) fn is_undefined(&self) -> bool {
        matches!(self, Specifier::Value(Value::Undefined))
    }

    /// Resolve this specifier; see [`resolve`]
    pub fn resolve(
        &mut self,
        rng: &mut dyn RngCore,
        args: &[Value],
    ) -> Result<Value, GenerationError> {
        match self {
            Specifier::Value(value) => Ok(value.clone()),
            Specifier::Generator(generator) => generator.generate(rng, args),
        }
    }
}

/// Turn a specifier into a concrete value: generators are invoked with
/// `args`, literals are returned unchanged.
pub fn resolve(
    spec: &mut Specifier,
    rng: &mut dyn RngCore,
    args: &[Value],
) -> Result<Value, GenerationError> {
    spec.resolve(rng, args)
}

impl fmt::Debug for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specifier::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Specifier::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

impl From<BoxedGenerator> for Specifier {
    fn from(generator: BoxedGenerator) -> Self {
        Specifier::Generator(generator)
    }
}

macro_rules! impl_specifier_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Specifier {
                fn from(value: $t) -> Self {
                    Specifier::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_specifier_from_value!(
    Value, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, &str, String, char,
    Vec<Value>
);

/// A generator backed by a closure
pub struct FnGenerator<F> {
    f: F,
}

impl<F> Generator for FnGenerator<F>
where
    F: FnMut(&mut dyn RngCore, &[Value]) -> Result<Value, GenerationError> + Send,
{
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        args: &[Value],
    ) -> Result<Value, GenerationError> {
        (self.f)(rng, args)
    }
}

/// Build a specifier from a fallible closure that sees the RNG and the
/// extra resolution arguments
///
/// # Examples
///
/// ```rust
/// use claimcheck::{thunk, GenerationError, Value};
///
/// let mut even = thunk(|rng, _args| {
///     let n = claimcheck::rng::unit(rng) * 100.0;
///     Ok::<_, GenerationError>(Value::from((n as i64) * 2))
/// });
/// let mut rng = claimcheck::rng::create_seeded_rng(1);
/// let value = even.resolve(&mut rng, &[]).unwrap();
/// assert_eq!(value.as_i64().unwrap() % 2, 0);
/// ```
pub fn thunk<F>(f: F) -> Specifier
where
    F: FnMut(&mut dyn RngCore, &[Value]) -> Result<Value, GenerationError> + Send + 'static,
{
    Specifier::generator(FnGenerator { f })
}

/// Build a specifier from an infallible closure over the RNG
pub fn from_fn<F, V>(mut f: F) -> Specifier
where
    F: FnMut(&mut dyn RngCore) -> V + Send + 'static,
    V: Into<Value>,
{
    thunk(move |rng, _args| Ok(f(rng).into()))
}

/// A specifier that is resolved once, on first use, and then cached.
///
/// Used for combinator parameters (bias, bounds) that are fixed for the
/// lifetime of the generator rather than redrawn per trial. Literal
/// parameters settle immediately.
pub(crate) enum Settled<T> {
    Pending(Specifier),
    Ready(T),
}

impl<T: Copy> Settled<T> {
    pub(crate) fn new(spec: Specifier, coerce: impl FnOnce(&Value) -> T) -> Self {
        match spec {
            Specifier::Value(value) => Settled::Ready(coerce(&value)),
            pending => Settled::Pending(pending),
        }
    }

    pub(crate) fn get(
        &mut self,
        rng: &mut dyn RngCore,
        coerce: impl FnOnce(&Value) -> T,
    ) -> Result<T, GenerationError> {
        let value = match self {
            Settled::Ready(value) => return Ok(*value),
            Settled::Pending(spec) => coerce(&spec.resolve(rng, &[])?),
        };
        *self = Settled::Ready(value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_seeded_rng;

    #[test]
    fn test_literal_resolves_to_itself() {
        let mut rng = create_seeded_rng(1);
        let mut spec = Specifier::from("hello");
        for _ in 0..3 {
            assert_eq!(resolve(&mut spec, &mut rng, &[]).unwrap(), Value::from("hello"));
        }
        assert!(!spec.is_generator());
    }

    #[test]
    fn test_generator_receives_extra_args() {
        let mut rng = create_seeded_rng(1);
        let mut spec = thunk(|_rng, args| Ok(Value::Array(args.to_vec())));
        let value = spec
            .resolve(&mut rng, &[Value::from(3), Value::from("k")])
            .unwrap();
        assert_eq!(value, Value::Array(vec![3.into(), "k".into()]));
        assert!(spec.is_generator());
    }

    #[test]
    fn test_generator_errors_propagate() {
        let mut rng = create_seeded_rng(1);
        let mut spec = thunk(|_rng, _args| Err(GenerationError::custom("nope")));
        assert_eq!(
            spec.resolve(&mut rng, &[]),
            Err(GenerationError::Custom("nope".to_string()))
        );
    }

    #[test]
    fn test_from_fn_keeps_state_between_calls() {
        let mut rng = create_seeded_rng(1);
        let mut counter = 0;
        let mut spec = from_fn(move |_rng| {
            counter += 1;
            counter
        });
        assert_eq!(spec.resolve(&mut rng, &[]).unwrap(), Value::from(1));
        assert_eq!(spec.resolve(&mut rng, &[]).unwrap(), Value::from(2));
    }

    #[test]
    fn test_settled_resolves_once() {
        let mut rng = create_seeded_rng(1);
        let mut calls = 0;
        let spec = from_fn(move |_rng| {
            calls += 1;
            calls * 10
        });
        let mut settled = Settled::new(spec, Value::to_number);
        assert_eq!(settled.get(&mut rng, Value::to_number).unwrap(), 10.0);
        assert_eq!(settled.get(&mut rng, Value::to_number).unwrap(), 10.0);
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Specifier::from(1)), "Value(Number(1.0))");
        assert_eq!(format!("{:?}", from_fn(|_rng| 1)), "Generator(..)");
    }
}
