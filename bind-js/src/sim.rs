//! A small in-process object model implementing [`HostRuntime`].
//!
//! This stands in for a real DOM engine when exercising bindings from the host: objects are plain
//! property bags, lists expose a live `length` and `item(i)`, and methods are Rust closures. Every
//! call is recorded so tests can inspect exactly what arguments reached the runtime.

use std::{fmt, rc::Rc};

use crate::{
  args::ArgumentList,
  ident::{intern, Ident},
  limits::BindingLimits,
  runtime::{ErrorCode, Handle, HostRuntime, RuntimeFault, Value},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct SimError {
  pub code: ErrorCode,
  pub message: String,
}

impl SimError {
  pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }
}

impl RuntimeFault for SimError {
  fn code(&self) -> ErrorCode {
    self.code
  }
}

/// A native method. Receives the runtime, the `this` object and the call's arguments.
pub type NativeFn = Rc<dyn Fn(&mut SimRuntime, Handle, &ArgumentList) -> Result<Value, SimError>>;

#[derive(Clone, Default)]
pub enum SimObjectKind {
  #[default]
  Ordinary,
  /// A live list with a read-only `length` and an `item(index)` accessor.
  List(Vec<Value>),
  Function(NativeFn),
}

impl fmt::Debug for SimObjectKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SimObjectKind::Ordinary => f.write_str("Ordinary"),
      SimObjectKind::List(items) => f.debug_tuple("List").field(items).finish(),
      SimObjectKind::Function(_) => f.write_str("Function"),
    }
  }
}

#[derive(Clone, Debug, Default)]
pub struct SimObject {
  pub kind: SimObjectKind,
  pub props: Vec<(Ident, Value)>,
}

impl SimObject {
  pub fn prop(&self, name: Ident) -> Option<&Value> {
    self.props.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
  }

  fn set_prop(&mut self, name: Ident, value: Value) {
    if let Some((_, v)) = self.props.iter_mut().find(|(k, _)| *k == name) {
      *v = value;
      return;
    }
    self.props.push((name, value));
  }
}

/// A call observed by [`SimRuntime`].
#[derive(Clone, Debug, PartialEq)]
pub struct CallRecord {
  pub target: Handle,
  pub name: String,
  pub args: ArgumentList,
  pub construct: bool,
}

pub struct SimRuntime {
  objects: Vec<SimObject>,
  global: Handle,
  limits: BindingLimits,
  calls: Vec<CallRecord>,
}

impl Default for SimRuntime {
  fn default() -> Self {
    Self::with_limits(BindingLimits::default())
  }
}

impl SimRuntime {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_limits(limits: BindingLimits) -> Self {
    Self {
      objects: vec![SimObject::default()],
      global: Handle(0),
      limits,
      calls: Vec::new(),
    }
  }

  pub fn global(&self) -> Handle {
    self.global
  }

  fn alloc(&mut self, kind: SimObjectKind) -> Handle {
    let idx = self.objects.len();
    self.objects.push(SimObject {
      kind,
      props: Vec::new(),
    });
    Handle(idx as u32)
  }

  pub fn alloc_object(&mut self) -> Handle {
    self.alloc(SimObjectKind::Ordinary)
  }

  pub fn alloc_list(&mut self, items: impl IntoIterator<Item = Value>) -> Handle {
    self.alloc(SimObjectKind::List(items.into_iter().collect()))
  }

  pub fn object(&self, handle: Handle) -> Option<&SimObject> {
    self.objects.get(handle.0 as usize)
  }

  fn object_ref(&self, handle: Handle) -> Result<&SimObject, SimError> {
    self
      .object(handle)
      .ok_or_else(|| SimError::new(ErrorCode::NOT_FOUND, format!("no object {}", handle.0)))
  }

  fn object_mut(&mut self, handle: Handle) -> Result<&mut SimObject, SimError> {
    self
      .objects
      .get_mut(handle.0 as usize)
      .ok_or_else(|| SimError::new(ErrorCode::NOT_FOUND, format!("no object {}", handle.0)))
  }

  fn list_mut(&mut self, list: Handle) -> Result<&mut Vec<Value>, SimError> {
    match &mut self.object_mut(list)?.kind {
      SimObjectKind::List(items) => Ok(items),
      _ => Err(SimError::new(ErrorCode::TYPE_MISMATCH, "not a list")),
    }
  }

  pub fn list_items(&self, list: Handle) -> Option<&[Value]> {
    match &self.object(list)?.kind {
      SimObjectKind::List(items) => Some(items),
      _ => None,
    }
  }

  pub fn push_item(&mut self, list: Handle, value: Value) -> Result<(), SimError> {
    self.list_mut(list)?.push(value);
    Ok(())
  }

  pub fn remove_item(&mut self, list: Handle, index: usize) -> Result<Value, SimError> {
    let items = self.list_mut(list)?;
    if index >= items.len() {
      return Err(SimError::new(ErrorCode::INDEX_SIZE, format!("index {index} out of range")));
    }
    Ok(items.remove(index))
  }

  /// Defines a data property, bypassing read-only checks.
  pub fn define(&mut self, object: Handle, name: &str, value: Value) -> Result<(), SimError> {
    self.object_mut(object)?.set_prop(intern(name), value);
    Ok(())
  }

  /// Defines a native method `name` on `object` and returns the function object.
  pub fn define_fn(
    &mut self,
    object: Handle,
    name: &str,
    f: impl Fn(&mut SimRuntime, Handle, &ArgumentList) -> Result<Value, SimError> + 'static,
  ) -> Result<Handle, SimError> {
    self.object_ref(object)?;
    let func = self.alloc(SimObjectKind::Function(Rc::new(f)));
    self.define(object, name, Value::Object(func))?;
    Ok(func)
  }

  pub fn calls(&self) -> &[CallRecord] {
    &self.calls
  }

  pub fn take_calls(&mut self) -> Vec<CallRecord> {
    std::mem::take(&mut self.calls)
  }

  fn method(&self, object: Handle, name: &str) -> Result<Option<NativeFn>, SimError> {
    let data = self.object_ref(object)?;
    let Some(Value::Object(callee)) = Ident::lookup(name).and_then(|n| data.prop(n)) else {
      return Ok(None);
    };
    match &self.object_ref(*callee)?.kind {
      SimObjectKind::Function(f) => Ok(Some(f.clone())),
      _ => Ok(None),
    }
  }

  fn list_item(&self, list: Handle, args: &ArgumentList) -> Result<Value, SimError> {
    let Some(items) = self.list_items(list) else {
      return Err(SimError::new(ErrorCode::TYPE_MISMATCH, "not a list"));
    };
    let index = match args.get(0) {
      Some(Value::Number(n)) => *n,
      Some(Value::Undefined) | None => 0.0,
      Some(other) => {
        return Err(SimError::new(
          ErrorCode::TYPE_MISMATCH,
          format!("item index must be a number, got {}", other.type_name()),
        ));
      }
    };
    if index.is_nan() || index < 0.0 || index.fract() != 0.0 {
      return Ok(Value::Null);
    }
    Ok(items.get(index as usize).cloned().unwrap_or(Value::Null))
  }

  fn record(&mut self, target: Handle, name: &str, args: &ArgumentList, construct: bool) {
    self.calls.push(CallRecord {
      target,
      name: name.to_string(),
      args: args.clone(),
      construct,
    });
  }
}

impl HostRuntime for SimRuntime {
  type Error = SimError;

  fn limits(&self) -> BindingLimits {
    self.limits
  }

  fn global_object(&self) -> Handle {
    self.global
  }

  fn get(&mut self, object: Handle, name: &str) -> Result<Value, Self::Error> {
    let data = self.object_ref(object)?;
    if let Some(v) = Ident::lookup(name).and_then(|n| data.prop(n)) {
      return Ok(v.clone());
    }
    if let SimObjectKind::List(items) = &data.kind {
      if name == "length" {
        return Ok(Value::Number(items.len() as f64));
      }
    }
    Ok(Value::Undefined)
  }

  fn set(&mut self, object: Handle, name: &str, value: Value) -> Result<(), Self::Error> {
    let data = self.object_mut(object)?;
    if matches!(data.kind, SimObjectKind::List(_)) && name == "length" {
      return Err(SimError::new(ErrorCode::NOT_SUPPORTED, "`length` is read-only"));
    }
    data.set_prop(intern(name), value);
    Ok(())
  }

  fn call(&mut self, object: Handle, name: &str, args: &ArgumentList) -> Result<Value, Self::Error> {
    self.record(object, name, args, false);
    if let Some(f) = self.method(object, name)? {
      return f(self, object, args);
    }
    if name == "item" && self.list_items(object).is_some() {
      return self.list_item(object, args);
    }
    Err(SimError::new(
      ErrorCode::NOT_SUPPORTED,
      format!("`{name}` is not a function"),
    ))
  }

  fn construct(
    &mut self,
    object: Handle,
    name: &str,
    args: &ArgumentList,
  ) -> Result<Value, Self::Error> {
    self.record(object, name, args, true);
    let Some(f) = self.method(object, name)? else {
      return Err(SimError::new(
        ErrorCode::NOT_SUPPORTED,
        format!("`{name}` is not a constructor"),
      ));
    };
    let this = self.alloc_object();
    match f(self, this, args)? {
      Value::Object(h) => Ok(Value::Object(h)),
      _ => Ok(Value::Object(this)),
    }
  }
}
