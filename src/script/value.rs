use std::collections::BTreeMap;
use std::fmt;
use serde_json::Number;
use crate::error::Error;
use super::checked::Async;
use super::function::Function;
use super::promise::Promise;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Function(Function),
    Async(Async),
    Promise(Promise),
    Error(Thrown),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thrown {
    pub name:    String,
    pub message: String,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined   => "undefined",
            Self::Null        => "null",
            Self::Bool(_)     => "boolean",
            Self::Number(_)   => "number",
            Self::String(_)   => "string",
            Self::Function(_) => "function",
            Self::Array(_)
            | Self::Object(_)
            | Self::Async(_)
            | Self::Promise(_)
            | Self::Error(_)  => "object",
        }
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Property lookup; anything that is not an object yields `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Self::Object(map) => map.get(key).cloned().unwrap_or(Self::Undefined),
            _                 => Self::Undefined,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _               => None,
        }
    }

    pub fn as_thrown(&self) -> Option<&Thrown> {
        match self {
            Self::Error(e) => Some(e),
            _              => None,
        }
    }

    /// Plain data converts; functions, promises and computations do not.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        Some(match self {
            Self::Undefined | Self::Null => Json::Null,
            Self::Bool(b)   => Json::Bool(*b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => Json::from(*n as i64),
            Self::Number(n) => Json::Number(Number::from_f64(*n)?),
            Self::String(s) => Json::String(s.clone()),
            Self::Array(vs) => Json::Array(vs.iter().map(Self::to_json).collect::<Option<_>>()?),
            Self::Object(m) => Json::Object(m.iter().map(|(k, v)| {
                Some((k.clone(), v.to_json()?))
            }).collect::<Option<_>>()?),
            Self::Function(_) | Self::Async(_) | Self::Promise(_) | Self::Error(_) => return None,
        })
    }
}

impl Thrown {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined,   Self::Undefined)   => true,
            (Self::Null,        Self::Null)        => true,
            (Self::Bool(a),     Self::Bool(b))     => a == b,
            (Self::Number(a),   Self::Number(b))   => a == b,
            (Self::String(a),   Self::String(b))   => a == b,
            (Self::Array(a),    Self::Array(b))    => a == b,
            (Self::Object(a),   Self::Object(b))   => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            (Self::Async(a),    Self::Async(b))    => a.ptr_eq(b),
            (Self::Promise(a),  Self::Promise(b))  => a.ptr_eq(b),
            (Self::Error(a),    Self::Error(b))    => a == b,
            _                                      => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null      => Self::Null,
            Json::Bool(b)   => Self::Bool(b),
            Json::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Self::String(s),
            Json::Array(vs) => Self::Array(vs.into_iter().map(Self::from).collect()),
            Json::Object(m) => Self::Object(m.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<Error> for Value {
    fn from(error: Error) -> Self {
        let thrown = match error {
            e @ Error::TypeMismatch { .. } => Thrown::type_error(e.to_string()),
            e                              => Thrown::error(e.to_string()),
        };
        Self::Error(thrown)
    }
}

impl From<anyhow::Error> for Value {
    fn from(error: anyhow::Error) -> Self {
        Self::Error(Thrown::error(format!("{error:#}")))
    }
}

impl From<Thrown> for Value {
    fn from(thrown: Thrown) -> Self {
        Self::Error(thrown)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(vs: Vec<Value>) -> Self {
        Self::Array(vs)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None    => Self::Null,
        }
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<Async> for Value {
    fn from(a: Async) -> Self {
        Self::Async(a)
    }
}

impl From<Promise> for Value {
    fn from(p: Promise) -> Self {
        Self::Promise(p)
    }
}
