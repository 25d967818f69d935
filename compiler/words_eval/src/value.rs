//! Runtime values and the coercion rules between them.
//!
//! `Value` is what expressions evaluate to. `Property` is the narrower
//! storage kind used for class/object property maps and scope bindings; a
//! missing binding is always `Property::Nothing`, never an absent entry
//! leaking out to evaluation code.
//!
//! # Coercion
//!
//! - Number -> String: fixed six-decimal formatting (`3` becomes `"3.000000"`).
//! - String -> Number: numeric parse; on failure the value is left untouched.
//! - Objects, directions and positions never coerce to or from anything.

use std::cmp::Ordering;
use std::fmt;

use words_ir::{BinaryOp, Direction, Position};

use crate::errors::{invalid_type, invariant, EvalError};
use crate::object::ObjectId;

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    /// Non-owning reference to a world object; equality is identity.
    Object(ObjectId),
    Direction(Direction),
    Position(Position),
    Now,
    Nothing,
    /// Result of a relational, equality or predicate node. Never stored.
    Bool(bool),
}

/// Discriminant of a `Value`, used in type errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Num,
    Str,
    Object,
    Direction,
    Position,
    Now,
    Nothing,
    Bool,
}

impl ValueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Num => "num",
            Self::Str => "string",
            Self::Object => "object",
            Self::Direction => "direction",
            Self::Position => "position",
            Self::Now => "now",
            Self::Nothing => "nothing",
            Self::Bool => "boolean",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a number the way string coercion does.
pub fn format_number(n: f64) -> String {
    format!("{n:.6}")
}

/// Parse a string the way number coercion does.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Clamp a whole magnitude into a count; negatives and NaN give zero.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to the u32 range before the cast"
)]
pub(crate) fn to_count(n: f64) -> u64 {
    if n.is_nan() {
        return 0;
    }
    n.clamp(0.0, f64::from(u32::MAX)) as u64
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Num(_) => ValueKind::Num,
            Value::Str(_) => ValueKind::Str,
            Value::Object(_) => ValueKind::Object,
            Value::Direction(_) => ValueKind::Direction,
            Value::Position(_) => ValueKind::Position,
            Value::Now => ValueKind::Now,
            Value::Nothing => ValueKind::Nothing,
            Value::Bool(_) => ValueKind::Bool,
        }
    }

    /// Coerce a string to a number if it parses; anything else is returned as is.
    #[must_use]
    pub fn coerce_to_number(self) -> Value {
        if let Value::Str(s) = &self {
            if let Some(n) = parse_number(s) {
                return Value::Num(n);
            }
        }
        self
    }

    /// Coerce a number to its fixed-decimal string; anything else is returned as is.
    #[must_use]
    pub fn coerce_to_string(self) -> Value {
        match self {
            Value::Num(n) => Value::Str(format_number(n)),
            other => other,
        }
    }

    /// Coerce to a number, failing with `InvalidType` if that is impossible.
    pub fn into_number(self) -> Result<f64, EvalError> {
        match self.coerce_to_number() {
            Value::Num(n) => Ok(n),
            other => Err(invalid_type(ValueKind::Num, other.kind())),
        }
    }

    /// Coerce to a string, failing with `InvalidType` if that is impossible.
    pub fn into_string(self) -> Result<String, EvalError> {
        match self.coerce_to_string() {
            Value::Str(s) => Ok(s),
            other => Err(invalid_type(ValueKind::Str, other.kind())),
        }
    }

    /// Unwrap a predicate result.
    ///
    /// The grammar only feeds predicates into logical operators and
    /// conditions, so a non-boolean here is an invariant violation.
    pub fn into_bool(self, context: &str) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(invariant(format!(
                "{context} expected a predicate, got {}",
                other.kind()
            ))),
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Value::Nothing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(id) => write!(f, "{id}"),
            Value::Direction(d) => write!(f, "{d}"),
            Value::Position(p) => write!(f, "{p}"),
            Value::Now => f.write_str("now"),
            Value::Nothing => f.write_str("nothing"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Language equality (`=`).
///
/// `nothing` equals only `nothing`; objects compare by identity and never
/// equal a non-object. A number/string pair is unified by parsing the string
/// first and, failing that, formatting the number.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nothing, Value::Nothing) | (Value::Now, Value::Now) => true,
        (Value::Nothing, _) | (_, Value::Nothing) => false,
        (Value::Object(x), Value::Object(y)) => x == y,
        (Value::Object(_), _) | (_, Value::Object(_)) => false,
        (Value::Num(x), Value::Num(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Str(s), Value::Num(n)) | (Value::Num(n), Value::Str(s)) => match parse_number(s) {
            Some(parsed) => parsed == *n,
            None => *s == format_number(*n),
        },
        (Value::Direction(x), Value::Direction(y)) => x == y,
        (Value::Position(x), Value::Position(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        _ => false,
    }
}

/// Relational comparison (`< <= > >=`).
///
/// Both operands must already be numbers or both strings; strings compare
/// lexicographically by code point.
pub fn compare_values(a: &Value, b: &Value, op: BinaryOp) -> Result<bool, EvalError> {
    let ordering = match (a, b) {
        (Value::Num(x), Value::Num(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        _ => {
            return Err(invalid_type(
                "two numbers or two strings",
                format_args!("{} and {}", a.kind(), b.kind()),
            ))
        }
    };
    // NaN compares false against everything
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    match op {
        BinaryOp::Less => Ok(ordering == Ordering::Less),
        BinaryOp::LessEq => Ok(ordering != Ordering::Greater),
        BinaryOp::Greater => Ok(ordering == Ordering::Greater),
        BinaryOp::GreaterEq => Ok(ordering != Ordering::Less),
        other => Err(invariant(format!(
            "operator `{}` is not relational",
            other.as_symbol()
        ))),
    }
}

/// Storage kind for property maps and scope bindings.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Property {
    Num(f64),
    Str(String),
    Object(ObjectId),
    #[default]
    Nothing,
}

impl Property {
    pub fn to_value(&self) -> Value {
        match self {
            Property::Num(n) => Value::Num(*n),
            Property::Str(s) => Value::Str(s.clone()),
            Property::Object(id) => Value::Object(*id),
            Property::Nothing => Value::Nothing,
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Property::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Property::Nothing)
    }
}

impl From<Property> for Value {
    fn from(property: Property) -> Self {
        match property {
            Property::Num(n) => Value::Num(n),
            Property::Str(s) => Value::Str(s),
            Property::Object(id) => Value::Object(id),
            Property::Nothing => Value::Nothing,
        }
    }
}

impl TryFrom<Value> for Property {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Num(n) => Ok(Property::Num(n)),
            Value::Str(s) => Ok(Property::Str(s)),
            Value::Object(id) => Ok(Property::Object(id)),
            Value::Nothing => Ok(Property::Nothing),
            other => Err(invalid_type("num, string, object or nothing", other.kind())),
        }
    }
}
