use std::{error::Error, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{args::ArgumentList, limits::BindingLimits};

/// An opaque reference to an object owned by a [`HostRuntime`].
///
/// The binding layer never looks inside a handle; only the runtime that minted it can.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

/// A runtime value as seen by the binding layer.
///
/// `Undefined` doubles as "argument absent" when marshaling calls, and is kept distinct from an
/// explicit `Null`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
  #[default]
  Undefined,
  Null,
  Bool(bool),
  Number(f64),
  String(Arc<str>),
  Object(Handle),
}

impl Value {
  pub fn string(s: impl Into<Arc<str>>) -> Self {
    Value::String(s.into())
  }

  pub fn is_undefined(&self) -> bool {
    matches!(self, Value::Undefined)
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// `null` or `undefined`.
  pub fn is_nullish(&self) -> bool {
    matches!(self, Value::Undefined | Value::Null)
  }

  pub fn is_object(&self) -> bool {
    matches!(self, Value::Object(_))
  }

  pub fn as_object(&self) -> Option<Handle> {
    match self {
      Value::Object(h) => Some(*h),
      _ => None,
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Value::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(&**s),
      _ => None,
    }
  }

  /// The `typeof`-style name of this value, for diagnostics.
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Undefined => "undefined",
      Value::Null => "null",
      Value::Bool(_) => "boolean",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Object(_) => "object",
    }
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Number(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.into())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value.into())
  }
}

impl From<Handle> for Value {
  fn from(value: Handle) -> Self {
    Value::Object(value)
  }
}

/// An implementation-defined code attached to a runtime failure.
///
/// The named constants follow the legacy `DOMException` code numbering, which is what the modeled
/// DOM/XSLT operations report; runtimes are free to use other values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
  pub const UNKNOWN: ErrorCode = ErrorCode(0);
  pub const INDEX_SIZE: ErrorCode = ErrorCode(1);
  pub const INVALID_CHARACTER: ErrorCode = ErrorCode(5);
  pub const NOT_FOUND: ErrorCode = ErrorCode(8);
  pub const NOT_SUPPORTED: ErrorCode = ErrorCode(9);
  pub const INVALID_STATE: ErrorCode = ErrorCode(11);
  pub const SYNTAX: ErrorCode = ErrorCode(12);
  pub const NAMESPACE: ErrorCode = ErrorCode(14);
  pub const TYPE_MISMATCH: ErrorCode = ErrorCode(17);

  pub fn name(self) -> Option<&'static str> {
    Some(match self {
      ErrorCode::UNKNOWN => "UnknownError",
      ErrorCode::INDEX_SIZE => "IndexSizeError",
      ErrorCode::INVALID_CHARACTER => "InvalidCharacterError",
      ErrorCode::NOT_FOUND => "NotFoundError",
      ErrorCode::NOT_SUPPORTED => "NotSupportedError",
      ErrorCode::INVALID_STATE => "InvalidStateError",
      ErrorCode::SYNTAX => "SyntaxError",
      ErrorCode::NAMESPACE => "NamespaceError",
      ErrorCode::TYPE_MISMATCH => "TypeMismatchError",
      _ => return None,
    })
  }
}

impl fmt::Display for ErrorCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.name() {
      Some(name) => write!(f, "{name} ({})", self.0),
      None => write!(f, "error code {}", self.0),
    }
  }
}

/// An error reported by a [`HostRuntime`].
pub trait RuntimeFault: Error + Send + Sync + 'static {
  fn code(&self) -> ErrorCode {
    ErrorCode::UNKNOWN
  }
}

/// Abstraction over the object graph that bindings are resolved against.
///
/// This is intentionally narrow: property reads and writes, method calls and construction, all
/// keyed by plain names. The ambient global object is exposed explicitly so that resolving a global
/// member is a function of the runtime passed in, not of hidden state.
pub trait HostRuntime {
  type Error: RuntimeFault;

  /// Limits configured by the embedding.
  fn limits(&self) -> BindingLimits {
    BindingLimits::default()
  }

  /// The ambient root that global members are resolved against.
  fn global_object(&self) -> Handle;

  fn get(&mut self, object: Handle, name: &str) -> Result<Value, Self::Error>;

  fn set(&mut self, object: Handle, name: &str, value: Value) -> Result<(), Self::Error>;

  /// Calls the method `name` on `object` with positional arguments.
  fn call(&mut self, object: Handle, name: &str, args: &ArgumentList) -> Result<Value, Self::Error>;

  /// Equivalent of `new object[name](...args)`.
  fn construct(
    &mut self,
    object: Handle,
    name: &str,
    args: &ArgumentList,
  ) -> Result<Value, Self::Error>;
}
