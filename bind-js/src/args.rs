//! Positional argument marshaling.
//!
//! Runtime calls are positional, so an [`ArgumentList`] keeps exactly what was added, in order:
//! no deduplication, no reordering, and no implicit padding. [`Absent`] (`undefined`) and an
//! explicit `null` are different values and stay that way.

use std::{slice, sync::Arc};

use crate::{
  proxy::{Opaque, Proxy},
  runtime::{Handle, Value},
};

/// Marker for an omitted argument. Marshals to `undefined`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Absent;

/// Conversion of a host value into a positional call argument.
pub trait ToArg {
  fn to_arg(self) -> Value;
}

impl ToArg for Value {
  fn to_arg(self) -> Value {
    self
  }
}

impl ToArg for &Value {
  fn to_arg(self) -> Value {
    self.clone()
  }
}

impl ToArg for Absent {
  fn to_arg(self) -> Value {
    Value::Undefined
  }
}

impl ToArg for () {
  fn to_arg(self) -> Value {
    Value::Undefined
  }
}

impl ToArg for bool {
  fn to_arg(self) -> Value {
    Value::Bool(self)
  }
}

macro_rules! impl_number_to_arg {
  ($($t:ty),* $(,)?) => {
    $(
      impl ToArg for $t {
        fn to_arg(self) -> Value {
          Value::Number(self as f64)
        }
      }
    )*
  };
}

impl_number_to_arg!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize, f32, f64);

impl ToArg for &str {
  fn to_arg(self) -> Value {
    Value::String(self.into())
  }
}

impl ToArg for String {
  fn to_arg(self) -> Value {
    Value::String(self.into())
  }
}

impl ToArg for Arc<str> {
  fn to_arg(self) -> Value {
    Value::String(self)
  }
}

impl ToArg for Handle {
  fn to_arg(self) -> Value {
    Value::Object(self)
  }
}

impl ToArg for Proxy {
  fn to_arg(self) -> Value {
    self.into_underlying()
  }
}

impl ToArg for &Proxy {
  fn to_arg(self) -> Value {
    self.underlying().clone()
  }
}

impl<T: Opaque> ToArg for &T {
  fn to_arg(self) -> Value {
    self.proxy().underlying().clone()
  }
}

/// `None` is an explicit `null`, not an omitted argument.
impl<T: ToArg> ToArg for Option<T> {
  fn to_arg(self) -> Value {
    match self {
      Some(v) => v.to_arg(),
      None => Value::Null,
    }
  }
}

/// An immutable, ordered list of call arguments.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ArgumentList {
  values: Vec<Value>,
}

impl ArgumentList {
  /// Starts building an argument list.
  pub fn build() -> ArgumentsBuilder {
    ArgumentsBuilder::default()
  }

  /// The argument list of a niladic call.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Value> {
    self.values.get(index)
  }

  /// Whether position `index` holds `undefined` or lies past the end of the list.
  pub fn is_absent(&self, index: usize) -> bool {
    self.values.get(index).map_or(true, Value::is_undefined)
  }

  pub fn iter(&self) -> slice::Iter<'_, Value> {
    self.values.iter()
  }

  pub fn as_slice(&self) -> &[Value] {
    &self.values
  }
}

impl<'a> IntoIterator for &'a ArgumentList {
  type Item = &'a Value;
  type IntoIter = slice::Iter<'a, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.values.iter()
  }
}

/// Builder for [`ArgumentList`]. Each [`add`](ArgumentsBuilder::add) appends exactly one position.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct ArgumentsBuilder {
  values: Vec<Value>,
}

impl ArgumentsBuilder {
  pub fn add(mut self, value: impl ToArg) -> Self {
    self.values.push(value.to_arg());
    self
  }

  pub fn extend<T: ToArg>(mut self, values: impl IntoIterator<Item = T>) -> Self {
    self.values.extend(values.into_iter().map(ToArg::to_arg));
    self
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn finish(self) -> ArgumentList {
    ArgumentList {
      values: self.values,
    }
  }
}

impl From<ArgumentsBuilder> for ArgumentList {
  fn from(builder: ArgumentsBuilder) -> Self {
    builder.finish()
  }
}

/// Builds an [`ArgumentList`] from a comma-separated list of [`ToArg`] values.
///
/// ```
/// use bind_js::{args, Absent};
///
/// let list = args!["a", Absent, None::<&str>, 3];
/// assert_eq!(list.len(), 4);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
  () => {
    $crate::ArgumentList::empty()
  };
  ($($value:expr),+ $(,)?) => {
    $crate::ArgumentList::build()$(.add($value))+.finish()
  };
}
