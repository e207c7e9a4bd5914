//! Typed Element Values
//!
//! An element version stores a `(value_type, value_json)` pair on the wire. On the client
//! the pair is folded into a single [`TypedValue`] sum type so that a value can never
//! disagree with its declared kind.
//!
//! Each [`ValueType`] carries its own raw-text contract for the editing UI:
//!
//! | type       | JSON domain       | raw text  | validator                              |
//! |------------|-------------------|-----------|----------------------------------------|
//! | `none`     | `null`            | no        | always valid                           |
//! | `bool`     | `true` / `false`  | no        | always valid                           |
//! | `int`      | integer           | yes       | `^-?[0-9]+$`, no exponent form         |
//! | `float`    | number            | yes       | `^-?[0-9]+(\.[0-9]+)?$`, no exponent   |
//! | `str`      | string            | yes       | always valid                           |
//! | `datetime` | ISO-8601 string   | yes       | ISO-8601 date, optional time/offset    |
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::models::{TypedValue, ValueType};
//!
//! assert!(ValueType::Int.validate("-42"));
//! assert!(!ValueType::Int.validate("4.2"));
//! assert_eq!(ValueType::Int.decode("-42"), Some(TypedValue::Int(-42)));
//! assert_eq!(ValueType::Bool.default_value(), TypedValue::Bool(false));
//! ```

use crate::models::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const INT_PATTERN: &str = r"^-?[0-9]+$";
const FLOAT_PATTERN: &str = r"^-?[0-9]+(\.[0-9]+)?$";
const DATETIME_PATTERN: &str = r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])([T ]([01]\d|2[0-3]):[0-5]\d(:[0-5]\d(\.\d+)?)?(Z|[+-]([01]\d|2[0-3]):?[0-5]\d)?)?$";

/// Raw text shown for a JSON `null`
pub const NULL_TEXT: &str = "null";

/// Magnitudes at or above this bound are printed in exponent form by JSON number formatters
const EXPONENT_UPPER_BOUND: f64 = 1e21;

/// Non-zero magnitudes below this bound are printed in exponent form
const EXPONENT_LOWER_BOUND: f64 = 1e-6;

fn int_regex() -> &'static Regex {
    static INT_REGEX: OnceLock<Regex> = OnceLock::new();
    INT_REGEX.get_or_init(|| Regex::new(INT_PATTERN).unwrap())
}

fn float_regex() -> &'static Regex {
    static FLOAT_REGEX: OnceLock<Regex> = OnceLock::new();
    FLOAT_REGEX.get_or_init(|| Regex::new(FLOAT_PATTERN).unwrap())
}

fn datetime_regex() -> &'static Regex {
    static DATETIME_REGEX: OnceLock<Regex> = OnceLock::new();
    DATETIME_REGEX.get_or_init(|| Regex::new(DATETIME_PATTERN).unwrap())
}

/// JSON number for an integer value
///
/// Integers beyond both `i64` and `u64` are sent as the nearest float.
fn int_to_json(value: i128) -> Value {
    if let Ok(value) = i64::try_from(value) {
        return Value::from(value);
    }
    if let Ok(value) = u64::try_from(value) {
        return Value::from(value);
    }
    serde_json::Number::from_f64(value as f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Whether a number's canonical string form would switch to scientific notation
fn needs_exponent_form(number: f64) -> bool {
    let magnitude = number.abs();
    magnitude != 0.0 && (magnitude >= EXPONENT_UPPER_BOUND || magnitude < EXPONENT_LOWER_BOUND)
}

/// Closed set of value kinds an element version may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    None,
    Bool,
    Int,
    Float,
    Str,
    Datetime,
}

impl ValueType {
    /// Every value type, in menu order
    pub const ALL: [ValueType; 6] = [
        ValueType::None,
        ValueType::Bool,
        ValueType::Int,
        ValueType::Float,
        ValueType::Str,
        ValueType::Datetime,
    ];

    /// Wire name of the type (`"none"`, `"bool"`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::Datetime => "datetime",
        }
    }

    /// Value used when an edit session switches into this type
    ///
    /// `bool → false`, `int/float → 0`, `str/datetime → ""`, `none → null`.
    pub fn default_value(self) -> TypedValue {
        match self {
            ValueType::None => TypedValue::Null,
            ValueType::Bool => TypedValue::Bool(false),
            ValueType::Int => TypedValue::Int(0),
            ValueType::Float => TypedValue::Float(0.0),
            ValueType::Str => TypedValue::Str(String::new()),
            ValueType::Datetime => TypedValue::Datetime(String::new()),
        }
    }

    /// Whether values of this type are edited through free text
    ///
    /// `none` has nothing to edit and `bool` is edited with a toggle.
    pub fn is_text_editable(self) -> bool {
        match self {
            ValueType::None | ValueType::Bool => false,
            ValueType::Int | ValueType::Float | ValueType::Str | ValueType::Datetime => true,
        }
    }

    /// Validate raw text against this type's textual contract
    ///
    /// Numeric types require both the pattern match and a canonical form without
    /// exponent notation. Types without a raw-text path (`none`, `bool`) and `str` are
    /// always valid.
    pub fn validate(self, raw: &str) -> bool {
        match self {
            ValueType::None | ValueType::Bool | ValueType::Str => true,
            ValueType::Int => {
                int_regex().is_match(raw)
                    && raw
                        .parse::<f64>()
                        .is_ok_and(|number| !needs_exponent_form(number))
            }
            ValueType::Float => {
                float_regex().is_match(raw)
                    && raw
                        .parse::<f64>()
                        .is_ok_and(|number| !needs_exponent_form(number))
            }
            ValueType::Datetime => datetime_regex().is_match(raw),
        }
    }

    /// Decode raw text into a value of this type
    ///
    /// Returns `None` when the text fails [`ValueType::validate`] or when the type has
    /// no raw-text path. Callers keep their previous committed value in that case.
    pub fn decode(self, raw: &str) -> Option<TypedValue> {
        if !self.is_text_editable() || !self.validate(raw) {
            return None;
        }

        match self {
            ValueType::Int => raw.parse().ok().map(TypedValue::Int),
            ValueType::Float => raw.parse().ok().map(TypedValue::Float),
            ValueType::Str => Some(TypedValue::Str(raw.to_string())),
            ValueType::Datetime => Some(TypedValue::Datetime(raw.to_string())),
            ValueType::None | ValueType::Bool => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|value_type| value_type.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownValueType(s.to_string()))
    }
}

/// A value together with its kind
///
/// Equality is structural, so comparing two values compares both the kind and the
/// payload. `Int` is wide enough for every integer text below the exponent bound.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
    Datetime(String),
}

impl TypedValue {
    /// The kind of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::Null => ValueType::None,
            TypedValue::Bool(_) => ValueType::Bool,
            TypedValue::Int(_) => ValueType::Int,
            TypedValue::Float(_) => ValueType::Float,
            TypedValue::Str(_) => ValueType::Str,
            TypedValue::Datetime(_) => ValueType::Datetime,
        }
    }

    /// Canonical text form, as shown in a text field
    ///
    /// # Examples
    ///
    /// ```rust
    /// use densedia_core::models::TypedValue;
    ///
    /// assert_eq!(TypedValue::Float(2.0).to_raw_text(), "2");
    /// assert_eq!(TypedValue::Float(0.25).to_raw_text(), "0.25");
    /// assert_eq!(TypedValue::Null.to_raw_text(), "null");
    /// ```
    pub fn to_raw_text(&self) -> String {
        match self {
            TypedValue::Null => NULL_TEXT.to_string(),
            TypedValue::Bool(value) => value.to_string(),
            TypedValue::Int(value) => value.to_string(),
            // -0.0 prints as "0" like every other zero
            TypedValue::Float(value) if *value == 0.0 => "0".to_string(),
            TypedValue::Float(value) => value.to_string(),
            TypedValue::Str(value) | TypedValue::Datetime(value) => value.clone(),
        }
    }

    /// JSON payload for the `value_json` wire field
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::Bool(value) => Value::Bool(*value),
            TypedValue::Int(value) => int_to_json(*value),
            TypedValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            TypedValue::Str(value) | TypedValue::Datetime(value) => Value::String(value.clone()),
        }
    }

    /// Build a value from its wire pair, checking that the JSON shape matches the type
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ValueShapeMismatch` when `value_json` does not belong
    /// to the domain of `value_type` (for instance a string tagged `int`).
    pub fn from_json(value_type: ValueType, value_json: &Value) -> Result<Self, ValidationError> {
        let value = match (value_type, value_json) {
            (ValueType::None, Value::Null) => Some(TypedValue::Null),
            (ValueType::Bool, Value::Bool(value)) => Some(TypedValue::Bool(*value)),
            (ValueType::Int, Value::Number(number)) => number
                .as_i64()
                .map(i128::from)
                .or_else(|| number.as_u64().map(i128::from))
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|value| value.fract() == 0.0 && value.abs() < EXPONENT_UPPER_BOUND)
                        .map(|value| value as i128)
                })
                .map(TypedValue::Int),
            (ValueType::Float, Value::Number(number)) => number.as_f64().map(TypedValue::Float),
            (ValueType::Str, Value::String(value)) => Some(TypedValue::Str(value.clone())),
            (ValueType::Datetime, Value::String(value)) => Some(TypedValue::Datetime(value.clone())),
            _ => None,
        };

        value.ok_or_else(|| ValidationError::ValueShapeMismatch {
            value_type,
            value_json: value_json.to_string(),
        })
    }
}

/// Free-function form of [`ValueType::default_value`]
pub fn default_for(value_type: ValueType) -> TypedValue {
    value_type.default_value()
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
