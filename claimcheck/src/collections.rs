//! Composite combinators: `array`, `string`, `object` and `any`.
//!
//! Each combinator decides its call shape once, when it is constructed, and
//! stores it as a small tagged enum; generation never re-inspects argument
//! types.

use std::collections::BTreeMap;
use std::f64::consts::{E, PI};

use rand::RngCore;

use crate::error::{CombinatorError, GenerationError};
use crate::generator::{Generator, Specifier};
use crate::primitives::{character, integer, integer_between, integer_up_to, number};
use crate::selection::{WunOf, falsy};
use crate::value::Value;

/// Largest length, repeat count or entry count a composite generator will
/// build in one call
pub const MAX_LENGTH: usize = 1 << 20;

/// Read a resolved length, rejecting anything that is not a non-negative
/// integer up to [`MAX_LENGTH`]
fn bounded_length(value: &Value) -> Result<usize, GenerationError> {
    let count = value.as_count().ok_or_else(|| GenerationError::InvalidLength {
        value: value.to_json(),
    })?;
    within_limit(count)
}

fn within_limit(count: usize) -> Result<usize, GenerationError> {
    if count > MAX_LENGTH {
        return Err(GenerationError::LengthTooLarge {
            count,
            limit: MAX_LENGTH,
        });
    }
    Ok(count)
}

/// How an array generator decides its elements
pub enum ArrayShape {
    /// Fixed length; every element is resolved on each call
    Elements(Vec<Specifier>),
    /// Length resolved on each call; every slot resolved independently
    Repeat { length: Specifier, value: Specifier },
}

/// Generator for arrays
pub struct ArrayGenerator {
    shape: ArrayShape,
}

impl ArrayGenerator {
    pub fn new(shape: ArrayShape) -> Self {
        Self { shape }
    }
}

impl Generator for ArrayGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        match &mut self.shape {
            ArrayShape::Elements(elements) => elements
                .iter_mut()
                .map(|element| element.resolve(rng, &[]))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            ArrayShape::Repeat { length, value } => {
                let dimension = bounded_length(&length.resolve(rng, &[])?)?;
                (0..dimension)
                    .map(|_| value.resolve(rng, &[]))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }
}

/// One to four default integers
pub fn array() -> Specifier {
    array_sized(integer_up_to(4), integer())
}

/// `length` elements, each an independent resolution of `value`.
///
/// A literal array passed as `length` is treated as a fixed list of
/// elements instead, like [`array_of`].
pub fn array_sized(length: impl Into<Specifier>, value: impl Into<Specifier>) -> Specifier {
    let shape = match length.into() {
        Specifier::Value(Value::Array(items)) => {
            ArrayShape::Elements(items.into_iter().map(Specifier::Value).collect())
        }
        length => ArrayShape::Repeat {
            length,
            value: value.into(),
        },
    };
    Specifier::generator(ArrayGenerator::new(shape))
}

/// A fixed-length array whose elements are resolved afresh on every call
pub fn array_of(elements: Vec<Specifier>) -> Specifier {
    Specifier::generator(ArrayGenerator::new(ArrayShape::Elements(elements)))
}

/// Generator that concatenates its parameters into a string
pub struct StringGenerator {
    params: Vec<Specifier>,
}

impl Generator for StringGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let mut text = String::new();
        let mut position = 0;
        while position < self.params.len() {
            let value = self.params[position].resolve(rng, &[])?;
            position += 1;
            if value.is_undefined() {
                break;
            }
            let repeated = match self.params.get_mut(position) {
                Some(next) if !next.is_undefined() => value.as_count().map(|count| (count, next)),
                _ => None,
            };
            match repeated {
                Some((count, next)) => {
                    let count = within_limit(count)?;
                    for _ in 0..count {
                        text.push_str(&next.resolve(rng, &[])?.to_string());
                    }
                    position += 1;
                }
                None => text.push_str(&value.to_string()),
            }
        }
        Ok(Value::String(text))
    }
}

/// A string of zero to nine printable ASCII characters
pub fn string() -> Specifier {
    string_of(vec![integer_between(0, 9), character()])
}

/// Build a string from `params`.
///
/// Parameters are resolved left to right. A non-negative integer followed by
/// another parameter repeats that parameter's resolution that many times;
/// any other value is appended in its display form. Resolving `undefined`
/// ends the string.
///
/// # Examples
///
/// ```rust
/// use claimcheck::{specs, string_of};
///
/// let mut spec = string_of(specs![3, "x", "-", 2, "y"]);
/// let mut rng = claimcheck::rng::create_seeded_rng(0);
/// assert_eq!(spec.resolve(&mut rng, &[]).unwrap().as_str(), Some("xxx-yy"));
/// ```
pub fn string_of(params: Vec<Specifier>) -> Specifier {
    Specifier::generator(StringGenerator { params })
}

/// Where an object's values come from when its keys are given
pub enum KeyedValues {
    /// Resolve one specifier for the first key. An array result is cycled
    /// through for all keys; otherwise the specifier is resolved again for
    /// every further key, receiving the key's position.
    Each(Specifier),
    /// Cycle positionally through a list
    Cycle(Vec<Specifier>),
}

/// How an object generator decides its entries
pub enum ObjectShape {
    /// Resolve a count, then draw that many random keys and values
    Count(Specifier),
    /// Fixed keys, each value resolved on every call
    Copy(Vec<(String, Specifier)>),
    /// Fixed keys with values drawn from `values`
    Keyed {
        keys: Vec<String>,
        values: KeyedValues,
    },
}

/// Generator for objects
pub struct ObjectGenerator {
    shape: ObjectShape,
    keys: Specifier,
    values: Specifier,
}

impl ObjectGenerator {
    pub fn new(shape: ObjectShape) -> Self {
        Self {
            shape,
            keys: string(),
            values: any(),
        }
    }
}

impl Generator for ObjectGenerator {
    fn generate(
        &mut self,
        rng: &mut dyn RngCore,
        _args: &[Value],
    ) -> Result<Value, GenerationError> {
        let mut result = BTreeMap::new();
        match &mut self.shape {
            ObjectShape::Count(count) => {
                let resolved = count.resolve(rng, &[])?;
                let Value::Number(n) = resolved else {
                    return Err(GenerationError::UnexpectedValue {
                        expected: "a number of entries",
                        found: resolved.type_name(),
                    });
                };
                // fractional counts round up, negative ones yield no entries
                let entries = if n > 0.0 { n.ceil() } else { 0.0 };
                for _ in 0..bounded_length(&Value::from(entries))? {
                    let key = self.keys.resolve(rng, &[])?.to_string();
                    let value = self.values.resolve(rng, &[])?;
                    result.insert(key, value);
                }
            }
            ObjectShape::Copy(fields) => {
                for (key, value) in fields.iter_mut() {
                    result.insert(key.clone(), value.resolve(rng, &[])?);
                }
            }
            ObjectShape::Keyed { keys, .. } if keys.is_empty() => {}
            ObjectShape::Keyed {
                keys,
                values: KeyedValues::Each(spec),
            } => match spec.resolve(rng, &[Value::from(0)])? {
                Value::Array(items) if !items.is_empty() => {
                    for (position, key) in keys.iter().enumerate() {
                        result.insert(key.clone(), items[position % items.len()].clone());
                    }
                }
                first => {
                    result.insert(keys[0].clone(), first);
                    for (position, key) in keys.iter().enumerate().skip(1) {
                        let value = spec.resolve(rng, &[Value::from(position)])?;
                        result.insert(key.clone(), value);
                    }
                }
            },
            ObjectShape::Keyed {
                keys,
                values: KeyedValues::Cycle(list),
            } => {
                for (position, key) in keys.iter().enumerate() {
                    let slot = position % list.len();
                    let value = list[slot].resolve(rng, &[Value::from(position)])?;
                    result.insert(key.clone(), value);
                }
            }
        }
        Ok(Value::Object(result))
    }
}

/// One to four random entries
pub fn object() -> Specifier {
    object_sized(integer_up_to(4))
}

/// `count` entries with random string keys and values from [`any`]
pub fn object_sized(count: impl Into<Specifier>) -> Specifier {
    Specifier::generator(ObjectGenerator::new(ObjectShape::Count(count.into())))
}

/// Copy the given keys, resolving each value on every call
pub fn object_of<K: Into<String>>(fields: Vec<(K, Specifier)>) -> Specifier {
    let fields = fields
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect();
    Specifier::generator(ObjectGenerator::new(ObjectShape::Copy(fields)))
}

/// Map every key to a resolution of `value`, which receives the key's
/// position as an extra argument.
///
/// `value` is resolved once per call first; when that yields a non-empty
/// array, its elements are cycled through positionally instead. This holds
/// for literal arrays and for generators producing arrays alike.
pub fn object_keyed<K: Into<String>>(keys: Vec<K>, value: impl Into<Specifier>) -> Specifier {
    let keys = keys.into_iter().map(Into::into).collect();
    Specifier::generator(ObjectGenerator::new(ObjectShape::Keyed {
        keys,
        values: KeyedValues::Each(value.into()),
    }))
}

/// Map keys to values cycled positionally from `values`
pub fn object_cycling<K: Into<String>>(
    keys: Vec<K>,
    values: Vec<Specifier>,
) -> Result<Specifier, CombinatorError> {
    if values.is_empty() {
        return Err(CombinatorError::EmptyObjectValues);
    }
    let keys = keys.into_iter().map(Into::into).collect();
    Ok(Specifier::generator(ObjectGenerator::new(
        ObjectShape::Keyed {
            keys,
            values: KeyedValues::Cycle(values),
        },
    )))
}

/// Pick the object shape from the runtime type of `subject`.
///
/// | subject            | value   | shape                                   |
/// |--------------------|---------|-----------------------------------------|
/// | generator / number | any     | `Count`                                 |
/// | object             | none    | `Copy` of its entries                   |
/// | array              | none    | `Copy`, keyed by index                  |
/// | array of keys      | given   | `Keyed`                                 |
///
/// Every other combination is rejected.
pub fn object_with(
    subject: impl Into<Specifier>,
    value: Option<Specifier>,
) -> Result<Specifier, CombinatorError> {
    let subject = subject.into();
    let with_value = value.is_some();
    let shape = match (subject, value) {
        (Specifier::Generator(count), _) => ObjectShape::Count(Specifier::Generator(count)),
        (Specifier::Value(Value::Number(n)), _) => ObjectShape::Count(Specifier::from(n)),
        (Specifier::Value(Value::Object(map)), None) => ObjectShape::Copy(
            map.into_iter()
                .map(|(key, value)| (key, Specifier::Value(value)))
                .collect(),
        ),
        (Specifier::Value(Value::Array(items)), None) => ObjectShape::Copy(
            items
                .into_iter()
                .enumerate()
                .map(|(i, value)| (i.to_string(), Specifier::Value(value)))
                .collect(),
        ),
        (Specifier::Value(Value::Array(keys)), Some(value)) => {
            let keys: Vec<String> = keys.iter().map(Value::to_string).collect();
            return Ok(object_keyed(keys, value));
        }
        (Specifier::Value(other), _) => {
            return Err(CombinatorError::UnsupportedObjectShape {
                subject: other.type_name(),
                with_value,
            });
        }
    };
    Ok(Specifier::generator(ObjectGenerator::new(shape)))
}

fn misc_values() -> Vec<Specifier> {
    vec![
        Specifier::from(true),
        Specifier::from(f64::INFINITY),
        Specifier::from(f64::NEG_INFINITY),
        falsy(),
        Specifier::from(PI),
        Specifier::from(E),
        Specifier::from(f64::EPSILON),
    ]
}

/// An integer, a number, a string, or one of `true`, `±∞`, a falsy value,
/// `π`, `e` and the machine epsilon
pub fn any() -> Specifier {
    Specifier::generator(WunOf::uniform(vec![
        integer(),
        number(),
        string(),
        Specifier::generator(WunOf::uniform(misc_values())),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::from_fn;
    use crate::rng::create_seeded_rng;
    use crate::selection::sequence;
    use crate::specs;

    fn draw(spec: &mut Specifier, n: usize) -> Vec<Value> {
        let mut rng = create_seeded_rng(31);
        (0..n).map(|_| spec.resolve(&mut rng, &[]).unwrap()).collect()
    }

    #[test]
    fn test_array_default_shape() {
        let mut spec = array();
        for value in draw(&mut spec, 300) {
            let items = value.as_array().unwrap();
            assert!((1..=4).contains(&items.len()));
            assert!(items.iter().all(|v| v.as_i64().is_some()));
        }
    }

    #[test]
    fn test_array_of_regenerates_each_element() {
        let mut spec = array_of(specs![integer_between(0, 1000), "fixed"]);
        let values = draw(&mut spec, 20);
        assert!(values.iter().all(|v| v.as_array().unwrap().len() == 2));
        assert!(values.iter().all(|v| v.as_array().unwrap()[1] == Value::from("fixed")));
        assert!(values.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_array_slots_draw_independently() {
        let mut spec = array_sized(50, integer_between(0, 1_000_000));
        let value = draw(&mut spec, 1).remove(0);
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 50);
        assert!(items.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_array_sized_literal_array_is_fixed_elements() {
        let mut spec = array_sized(Value::Array(vec![1.into(), 2.into()]), "ignored");
        assert_eq!(
            draw(&mut spec, 1),
            vec![Value::Array(vec![1.into(), 2.into()])]
        );
    }

    #[test]
    fn test_array_invalid_length_is_generation_error() {
        let mut spec = array_sized(-2, 0);
        let mut rng = create_seeded_rng(1);
        assert_eq!(
            spec.resolve(&mut rng, &[]),
            Err(GenerationError::InvalidLength {
                value: "-2".to_string()
            })
        );
    }

    #[test]
    fn test_string_repeat() {
        let mut spec = string_of(specs![3, "x"]);
        assert!(draw(&mut spec, 10).iter().all(|v| *v == Value::from("xxx")));
    }

    #[test]
    fn test_string_default_length_and_alphabet() {
        let mut spec = string();
        let values = draw(&mut spec, 2000);
        let mut lengths = std::collections::BTreeSet::new();
        for value in &values {
            let s = value.as_str().unwrap();
            lengths.insert(s.chars().count());
            assert!(s.chars().count() < 10);
            assert!(s.chars().all(|c| (32..=126).contains(&(c as u32))));
        }
        assert!(lengths.contains(&0));
        assert!(lengths.contains(&9));
    }

    #[test]
    fn test_string_display_coercion_and_termination() {
        let mut spec = string_of(specs![
            "n=",
            1.5,
            true,
            Value::Null,
            Value::Undefined,
            "never"
        ]);
        assert_eq!(draw(&mut spec, 1), vec![Value::from("n=1.5truenull")]);
    }

    #[test]
    fn test_string_trailing_count_is_appended() {
        let mut spec = string_of(specs!["a", 7]);
        assert_eq!(draw(&mut spec, 1), vec![Value::from("a7")]);
    }

    #[test]
    fn test_string_repeat_resolves_each_piece() {
        let mut spec = string_of(specs![4, sequence(specs!["a", "b"]).unwrap()]);
        assert_eq!(draw(&mut spec, 1), vec![Value::from("abab")]);
    }

    #[test]
    fn test_object_of_literals_is_deterministic() {
        let mut spec = object_of(vec![("a", Specifier::from(1)), ("b", Specifier::from(2))]);
        let mut expected = BTreeMap::new();
        expected.insert("a".to_string(), Value::from(1));
        expected.insert("b".to_string(), Value::from(2));
        for value in draw(&mut spec, 5) {
            assert_eq!(value, Value::Object(expected.clone()));
        }
    }

    #[test]
    fn test_object_sized() {
        let mut spec = object_sized(3);
        for value in draw(&mut spec, 50) {
            // random keys may collide
            let len = value.as_object().unwrap().len();
            assert!((1..=3).contains(&len));
        }
    }

    #[test]
    fn test_object_default() {
        let mut spec = object();
        for value in draw(&mut spec, 50) {
            assert!(value.as_object().unwrap().len() <= 4);
        }
    }

    #[test]
    fn test_object_keyed_passes_position() {
        let mut spec = object_keyed(
            vec!["x", "y", "z"],
            crate::generator::thunk(|_rng, args| Ok(args[0].clone())),
        );
        let value = draw(&mut spec, 1).remove(0);
        let map = value.as_object().unwrap();
        assert_eq!(map["x"], Value::from(0));
        assert_eq!(map["y"], Value::from(1));
        assert_eq!(map["z"], Value::from(2));
    }

    #[test]
    fn test_object_keyed_cycles_literal_array() {
        let mut spec = object_keyed(
            vec!["a", "b", "c"],
            Value::Array(vec![true.into(), false.into()]),
        );
        let value = draw(&mut spec, 1).remove(0);
        let map = value.as_object().unwrap();
        assert_eq!(map["a"], Value::Bool(true));
        assert_eq!(map["b"], Value::Bool(false));
        assert_eq!(map["c"], Value::Bool(true));
    }

    #[test]
    fn test_object_keyed_cycles_generated_array() {
        let mut spec = object_keyed(
            vec!["a", "b", "c"],
            from_fn(|_rng| Value::Array(vec!["x".into(), "y".into()])),
        );
        let value = draw(&mut spec, 1).remove(0);
        let map = value.as_object().unwrap();
        assert_eq!(map["a"], Value::from("x"));
        assert_eq!(map["b"], Value::from("y"));
        assert_eq!(map["c"], Value::from("x"));
    }

    #[test]
    fn test_oversized_lengths_are_generation_errors() {
        let mut rng = create_seeded_rng(1);
        let too_large = Err(GenerationError::LengthTooLarge {
            count: MAX_LENGTH + 1,
            limit: MAX_LENGTH,
        });

        let mut spec = array_sized(MAX_LENGTH + 1, 0);
        assert_eq!(spec.resolve(&mut rng, &[]), too_large);

        let mut spec = object_sized(MAX_LENGTH + 1);
        assert_eq!(spec.resolve(&mut rng, &[]), too_large);

        let mut spec = string_of(specs![crate::value::MAX_SAFE_INTEGER, "x"]);
        assert_eq!(
            spec.resolve(&mut rng, &[]),
            Err(GenerationError::LengthTooLarge {
                count: crate::value::MAX_SAFE_INTEGER as usize,
                limit: MAX_LENGTH,
            })
        );

        let mut spec = object_sized(f64::INFINITY);
        assert_eq!(
            spec.resolve(&mut rng, &[]),
            Err(GenerationError::InvalidLength {
                value: "null".to_string()
            })
        );
    }

    #[test]
    fn test_object_sized_fractional_and_negative_counts() {
        let mut spec = object_sized(-3);
        assert!(draw(&mut spec, 5).iter().all(|v| v.as_object().unwrap().is_empty()));

        let mut spec = object_sized(0.5);
        for value in draw(&mut spec, 5) {
            assert_eq!(value.as_object().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_object_cycling_rejects_empty() {
        assert_eq!(
            object_cycling(vec!["a"], vec![]).unwrap_err(),
            CombinatorError::EmptyObjectValues
        );
        let mut spec = object_cycling(vec!["a", "b"], specs![integer_between(5, 5)]).unwrap();
        let value = draw(&mut spec, 1).remove(0);
        assert_eq!(value.as_object().unwrap()["b"], Value::from(5));
    }

    #[test]
    fn test_object_with_dispatch() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), Value::from("v"));
        let mut copy = object_with(Value::Object(map.clone()), None).unwrap();
        assert_eq!(draw(&mut copy, 1), vec![Value::Object(map)]);

        let mut by_index =
            object_with(Value::Array(vec!["p".into(), "q".into()]), None).unwrap();
        let value = draw(&mut by_index, 1).remove(0);
        assert_eq!(value.as_object().unwrap()["1"], Value::from("q"));

        let mut keyed =
            object_with(Value::Array(vec!["p".into()]), Some(Specifier::from(9))).unwrap();
        let value = draw(&mut keyed, 1).remove(0);
        assert_eq!(value.as_object().unwrap()["p"], Value::from(9));

        let mut counted = object_with(2, None).unwrap();
        assert!(draw(&mut counted, 1)[0].as_object().is_some());
    }

    #[test]
    fn test_object_with_rejects_unsupported_shapes() {
        assert_eq!(
            object_with("text", None).unwrap_err(),
            CombinatorError::UnsupportedObjectShape {
                subject: "string",
                with_value: false
            }
        );
        assert_eq!(
            object_with(Value::Object(BTreeMap::new()), Some(Specifier::from(1))).unwrap_err(),
            CombinatorError::UnsupportedObjectShape {
                subject: "object",
                with_value: true
            }
        );
    }

    #[test]
    fn test_object_count_generator_must_yield_number() {
        let mut spec = object_with(from_fn(|_rng| "three"), None).unwrap();
        let mut rng = create_seeded_rng(1);
        assert_eq!(
            spec.resolve(&mut rng, &[]),
            Err(GenerationError::UnexpectedValue {
                expected: "a number of entries",
                found: "string"
            })
        );
    }

    #[test]
    fn test_any_produces_mixed_values() {
        let mut spec = any();
        let values = draw(&mut spec, 2000);
        assert!(values.iter().any(|v| v.as_str().is_some()));
        assert!(values.iter().any(|v| v.as_i64().is_some()));
        assert!(values.iter().any(|v| v.as_f64() == Some(f64::INFINITY)));
        assert!(values.iter().any(|v| v.as_f64() == Some(f64::EPSILON)));
        assert!(values.iter().any(|v| v.as_bool() == Some(true)));
    }
}
