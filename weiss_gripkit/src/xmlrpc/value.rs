use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::RpcError;

/// Positional parameters of a method call.
pub type Params = Vec<Value>;

/// An XML-RPC value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Double(f64),
    String(String),
    Struct(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Nil,
}

impl Value {
    /// Builds a struct value from `(name, value)` pairs.
    pub fn from_members<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Integer flags are common on the Kassow side, so `0`/`1` count as booleans too.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Looks up a struct member. `None` for missing members and non-struct values.
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.as_struct().and_then(|members| members.get(name))
    }

    /// Reads an integer struct member. Booleans are read as `0`/`1`.
    pub fn int_member(&self, name: &str) -> Result<i64, RpcError> {
        let member = self
            .member(name)
            .ok_or_else(|| RpcError::MalformedReply(format!("missing member `{}`", name)))?;
        match *member {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            ref other => Err(RpcError::MalformedReply(format!(
                "member `{}` is not an integer: {:?}",
                name, other
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "boolean",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Struct(_) => "struct",
            Value::Array(_) => "array",
            Value::Nil => "nil",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
