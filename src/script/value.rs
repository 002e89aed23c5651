//! Script-side value model
//!
//! The bridge only needs a small slice of a script runtime's object model:
//! primitive values, plain objects used as records, opaque pointers, and
//! callable functions. Values are owned; handing a value to script code
//! hands over a copy, so the bridge never extends a record's lifetime.

use crate::core::types::{NativePointer, ScriptError};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Largest integer a script number holds exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Anything script code can call
pub trait Callable {
    fn call(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError>;
}

impl<F> Callable for F
where
    F: Fn(&[ScriptValue]) -> Result<ScriptValue, ScriptError>,
{
    fn call(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError> {
        self(args)
    }
}

/// Reference-counted handle to a script function.
///
/// Single-threaded by construction, like the runtime it stands in for.
#[derive(Clone)]
pub struct ScriptFunction(Rc<dyn Callable>);

impl ScriptFunction {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&[ScriptValue]) -> Result<ScriptValue, ScriptError> + 'static,
    {
        ScriptFunction(Rc::new(function))
    }

    pub fn call(&self, args: &[ScriptValue]) -> Result<ScriptValue, ScriptError> {
        self.0.call(args)
    }

    /// True when both handles refer to the same function
    pub fn ptr_eq(&self, other: &ScriptFunction) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[function]")
    }
}

/// A plain object with insertion-ordered properties
#[derive(Debug, Clone, Default)]
pub struct ScriptObject {
    properties: Vec<(String, ScriptValue)>,
}

impl ScriptObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ScriptValue>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((key, value)),
        }
    }

    /// Builder form of [`ScriptObject::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ScriptValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PartialEq for ScriptObject {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .properties
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl Serialize for ScriptObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A script value
#[derive(Debug, Clone, Default)]
pub enum ScriptValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Pointer(NativePointer),
    Object(ScriptObject),
    Function(ScriptFunction),
}

impl ScriptValue {
    /// Name of the value's type, as used in argument errors
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Undefined => "undefined",
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Pointer(_) => "pointer",
            ScriptValue::Object(_) => "object",
            ScriptValue::Function(_) => "function",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&NativePointer> {
        match self {
            ScriptValue::Pointer(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ScriptObject> {
        match self {
            ScriptValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&ScriptFunction> {
        match self {
            ScriptValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Converts to the value's textual form. Never fails.
    pub fn to_display_string(&self) -> String {
        match self {
            ScriptValue::Undefined => "undefined".to_string(),
            ScriptValue::Null => "null".to_string(),
            ScriptValue::Bool(b) => b.to_string(),
            ScriptValue::Number(n) => format_number(*n),
            ScriptValue::String(s) => s.clone(),
            ScriptValue::Pointer(p) => p.to_string(),
            ScriptValue::Object(_) => "[object Object]".to_string(),
            ScriptValue::Function(_) => "function () { [native code] }".to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // covers -0
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        n.to_string()
    }
}

impl PartialEq for ScriptValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScriptValue::Undefined, ScriptValue::Undefined) => true,
            (ScriptValue::Null, ScriptValue::Null) => true,
            (ScriptValue::Bool(a), ScriptValue::Bool(b)) => a == b,
            (ScriptValue::Number(a), ScriptValue::Number(b)) => a == b,
            (ScriptValue::String(a), ScriptValue::String(b)) => a == b,
            (ScriptValue::Pointer(a), ScriptValue::Pointer(b)) => a == b,
            (ScriptValue::Object(a), ScriptValue::Object(b)) => a == b,
            (ScriptValue::Function(a), ScriptValue::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Serialize for ScriptValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScriptValue::Undefined | ScriptValue::Null | ScriptValue::Function(_) => {
                serializer.serialize_none()
            }
            ScriptValue::Bool(b) => serializer.serialize_bool(*b),
            ScriptValue::Number(n) => serializer.serialize_f64(*n),
            ScriptValue::String(s) => serializer.serialize_str(s),
            ScriptValue::Pointer(p) => p.serialize(serializer),
            ScriptValue::Object(o) => o.serialize(serializer),
        }
    }
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> Self {
        ScriptValue::String(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> Self {
        ScriptValue::String(value)
    }
}

impl From<bool> for ScriptValue {
    fn from(value: bool) -> Self {
        ScriptValue::Bool(value)
    }
}

impl From<f64> for ScriptValue {
    fn from(value: f64) -> Self {
        ScriptValue::Number(value)
    }
}

/// Script numbers are doubles: integers up to [`MAX_SAFE_INTEGER`] convert
/// exactly, larger ones round to the nearest representable number.
impl From<u64> for ScriptValue {
    fn from(value: u64) -> Self {
        ScriptValue::Number(value as f64)
    }
}

impl From<NativePointer> for ScriptValue {
    fn from(value: NativePointer) -> Self {
        ScriptValue::Pointer(value)
    }
}

impl From<ScriptObject> for ScriptValue {
    fn from(value: ScriptObject) -> Self {
        ScriptValue::Object(value)
    }
}

impl From<ScriptFunction> for ScriptValue {
    fn from(value: ScriptFunction) -> Self {
        ScriptValue::Function(value)
    }
}

impl<T: Into<ScriptValue>> From<Option<T>> for ScriptValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ScriptValue::Null, Into::into)
    }
}
