//! The dynamically-typed value universe produced by generators.
//!
//! Claims are checked against argument lists whose shape is only known at
//! runtime, so every generator produces a [`Value`]. The variants mirror the
//! small set of primitive and compound values a claim author needs: the two
//! "absent" sentinels, booleans, IEEE-754 numbers, strings, arrays and
//! string-keyed objects.

use std::collections::BTreeMap;
use std::fmt;

/// Largest integer that survives a round trip through an `f64`
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A generated value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// An absent value (no value was produced)
    #[default]
    Undefined,
    /// An explicit null
    Null,
    /// A boolean
    Bool(bool),
    /// A number; integers are represented as integral floats
    Number(f64),
    /// A string
    String(String),
    /// An ordered list of values
    Array(Vec<Value>),
    /// String-keyed values, ordered by key
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// The not-a-number sentinel
    pub fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is one of the falsy values: `false`, `null`, `undefined`,
    /// `""`, `0` (either sign) or `NaN`
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0 || n.is_nan(),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !self.is_falsy()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as an `i64` when it is integral and within the safe range
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if is_safe_integer(*n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Numeric coercion: booleans become 0/1, `null` and `""` become 0,
    /// numeric strings are parsed, everything else is `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    match trimmed {
                        "Infinity" | "+Infinity" => f64::INFINITY,
                        "-Infinity" => f64::NEG_INFINITY,
                        _ => trimmed.parse().unwrap_or(f64::NAN),
                    }
                }
            }
            Value::Undefined | Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// The count a value denotes when used as a repeat prefix: a
    /// non-negative safe integer
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Value::Number(n) if *n >= 0.0 && is_safe_integer(*n) => Some(*n as usize),
            _ => None,
        }
    }

    /// Render as JSON. `undefined` and non-finite numbers render as `null`,
    /// object entries holding `undefined` are skipped.
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self).to_string()
    }
}

/// Whether `n` is an integer that an `f64` represents exactly
pub fn is_safe_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

/// Render an argument list the way reports show it: `(a,b,c)`
pub fn format_args_list(args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(Value::to_json).collect();
    format!("({})", rendered.join(","))
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // negative zero displays as 0
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// Display coercion, used when values are concatenated into strings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if !matches!(item, Value::Undefined | Value::Null) {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
        }
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => match value.as_i64() {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => items.iter().map(serde_json::Value::from).collect(),
            Value::Object(map) => map
                .iter()
                .filter(|(_, item)| !item.is_undefined())
                .map(|(key, item)| (key.clone(), serde_json::Value::from(item)))
                .collect(),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&serde_json::Value::from(self), serializer)
    }
}
