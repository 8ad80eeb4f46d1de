//! Numeric results returned by measured operations
//!
//! The harness only accepts operations whose result is an integer or a
//! floating-point scalar. The check happens at run time through
//! [`ResultValue::to_numeric`], so a type like `serde_json::Value` can be
//! accepted or rejected depending on what it actually holds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric scalar captured from one iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Value widened to `f64`
    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Int(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Numeric::Int(v) => Some(v),
            Numeric::Float(_) => None,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Capability check applied to every value an operation returns
pub trait ResultValue {
    /// `Some` when the value is an integer or float scalar
    fn to_numeric(&self) -> Option<Numeric>;

    /// Name reported when the value is rejected
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

macro_rules! impl_int {
    ($($t:ty),*) => {
        $(impl ResultValue for $t {
            fn to_numeric(&self) -> Option<Numeric> {
                Some(Numeric::Int(i64::from(*self)))
            }
        })*
    };
}

// Wider than i64: kept exact when it fits, widened to f64 otherwise
macro_rules! impl_wide_int {
    ($($t:ty),*) => {
        $(impl ResultValue for $t {
            fn to_numeric(&self) -> Option<Numeric> {
                Some(match i64::try_from(*self) {
                    Ok(v) => Numeric::Int(v),
                    Err(_) => Numeric::Float(*self as f64),
                })
            }
        })*
    };
}

impl_int!(i8, i16, i32, i64, u8, u16, u32);
impl_wide_int!(isize, usize, u64, i128, u128);

impl ResultValue for f32 {
    fn to_numeric(&self) -> Option<Numeric> {
        Some(Numeric::Float(f64::from(*self)))
    }
}

impl ResultValue for f64 {
    fn to_numeric(&self) -> Option<Numeric> {
        Some(Numeric::Float(*self))
    }
}

impl ResultValue for Numeric {
    fn to_numeric(&self) -> Option<Numeric> {
        Some(*self)
    }
}

macro_rules! impl_rejected {
    ($($t:ty),*) => {
        $(impl ResultValue for $t {
            fn to_numeric(&self) -> Option<Numeric> {
                None
            }
        })*
    };
}

impl_rejected!(bool, char, (), str, String);

impl<T: ResultValue> ResultValue for Option<T> {
    fn to_numeric(&self) -> Option<Numeric> {
        self.as_ref().and_then(ResultValue::to_numeric)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Some(v) => v.type_name(),
            None => "None",
        }
    }
}

impl<T: ResultValue> ResultValue for Vec<T> {
    fn to_numeric(&self) -> Option<Numeric> {
        None
    }
}

impl<T: ResultValue + ?Sized> ResultValue for &T {
    fn to_numeric(&self) -> Option<Numeric> {
        (**self).to_numeric()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

impl ResultValue for serde_json::Value {
    fn to_numeric(&self) -> Option<Numeric> {
        match self {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Numeric::Int)
                .or_else(|| n.as_f64().map(Numeric::Float)),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}
