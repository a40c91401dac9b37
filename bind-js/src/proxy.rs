use std::fmt;

use crate::{
  args::ArgumentList,
  error::{BindError, BindLimit, BindResult},
  generic::ElementBinding,
  ident::{intern, Ident},
  runtime::{Handle, HostRuntime, Value},
};

/// Name of the indexed accessor used by [`Proxy::element_at`].
pub const INDEXED_ACCESSOR: &str = "item";
/// Name of the live size property used by [`Proxy::length`].
pub const LENGTH_PROPERTY: &str = "length";

/// The declared binding type of a proxy.
///
/// Tags are never checked against the runtime object; they record what the declaring binding says
/// the value is.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(Ident);

impl TypeTag {
  pub fn named(name: &str) -> Self {
    Self(intern(name))
  }

  /// The tag of an untyped proxy.
  pub fn object() -> Self {
    Self::named("Object")
  }

  pub fn ident(self) -> Ident {
    self.0
  }

  pub fn name(self) -> &'static str {
    self.0.as_str()
  }
}

impl fmt::Debug for TypeTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeTag({})", self.name())
  }
}

impl fmt::Display for TypeTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// An opaque stand-in for a runtime value.
///
/// A proxy is bound to one underlying value for its whole life. Casting produces a new proxy over
/// the same value; nothing is ever mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Proxy {
  underlying: Value,
  tag: TypeTag,
  element: Option<ElementBinding>,
}

impl Proxy {
  /// The universal cast constructor. Never inspects `underlying`.
  pub fn wrap(underlying: impl Into<Value>) -> Self {
    Self::with_tag(underlying.into(), TypeTag::object())
  }

  pub fn with_tag(underlying: Value, tag: TypeTag) -> Self {
    Self {
      underlying,
      tag,
      element: None,
    }
  }

  pub fn parameterized(underlying: Value, tag: TypeTag, element: ElementBinding) -> Self {
    Self {
      underlying,
      tag,
      element: Some(element),
    }
  }

  /// Attaches an element binding, keeping the same underlying value and tag.
  pub fn with_element(mut self, element: ElementBinding) -> Self {
    self.element = Some(element);
    self
  }

  /// Rewraps the same underlying value under another binding type.
  pub fn cast(&self, tag: TypeTag) -> Proxy {
    Proxy::with_tag(self.underlying.clone(), tag)
  }

  /// The primitive value of this proxy.
  ///
  /// Objects have no separate primitive value and primitives are their own, so this is an
  /// equivalent proxy over the same underlying value.
  pub fn value_of(&self) -> Proxy {
    self.clone()
  }

  pub fn underlying(&self) -> &Value {
    &self.underlying
  }

  pub fn into_underlying(self) -> Value {
    self.underlying
  }

  pub fn tag(&self) -> TypeTag {
    self.tag
  }

  pub fn element_binding(&self) -> Option<ElementBinding> {
    self.element
  }

  /// Whether both proxies wrap the same underlying value, regardless of tag.
  pub fn denotes_same(&self, other: &Proxy) -> bool {
    self.underlying == other.underlying
  }

  pub fn handle(&self) -> Option<Handle> {
    self.underlying.as_object()
  }

  pub fn is_nullish(&self) -> bool {
    self.underlying.is_nullish()
  }

  pub fn as_number(&self) -> Option<f64> {
    self.underlying.as_number()
  }

  pub fn as_bool(&self) -> Option<bool> {
    self.underlying.as_bool()
  }

  pub fn as_str(&self) -> Option<&str> {
    self.underlying.as_str()
  }

  /// Invokes the method `name` on the underlying object.
  pub fn invoke<R: HostRuntime>(
    &self,
    cx: &mut R,
    name: Ident,
    args: &ArgumentList,
    returns: ReturnType,
  ) -> BindResult<Invoked> {
    let address = format!("{}.{}", self.tag, name);
    call_on(cx, &self.underlying, &address, name.as_str(), args, returns)
  }

  /// Reads element `index` of a parameterized proxy through the indexed accessor.
  ///
  /// Collections are live: nothing is cached between calls. An index outside the collection's
  /// current bounds yields `Ok(None)`.
  pub fn element_at<R: HostRuntime>(&self, cx: &mut R, index: u32) -> BindResult<Option<Proxy>> {
    let Some(element) = self.element else {
      return Err(BindError::NotParameterized { tag: self.tag });
    };
    let address = format!("{}.{}", self.tag, INDEXED_ACCESSOR);
    let args = ArgumentList::build().add(index).finish();
    let raw = call_on(
      cx,
      &self.underlying,
      &address,
      INDEXED_ACCESSOR,
      &args,
      ReturnType::Primitive,
    )?
    .into_value();
    if raw.is_nullish() {
      tracing::trace!(target: "bind_js::proxy", %address, index, "element absent");
      return Ok(None);
    }
    Ok(Some(element.wrap(raw)))
  }

  /// Reads the live `length` of a parameterized proxy.
  pub fn length<R: HostRuntime>(&self, cx: &mut R) -> BindResult<u32> {
    if self.element.is_none() {
      return Err(BindError::NotParameterized { tag: self.tag });
    }
    let address = format!("{}.{}", self.tag, LENGTH_PROPERTY);
    let Some(object) = self.handle() else {
      return Err(BindError::unresolvable(address, "receiver is not an object"));
    };
    let raw = cx
      .get(object, LENGTH_PROPERTY)
      .map_err(|e| BindError::runtime(address.as_str(), e))?;
    match raw.as_number() {
      Some(n) if n >= 0.0 && n <= u32::MAX as f64 && n.fract() == 0.0 => Ok(n as u32),
      _ => Err(BindError::unresolvable(address, "length is not an array index")),
    }
  }
}

/// Calls `name` on `target`, which must be an object, and shapes the result per `returns`.
pub(crate) fn call_on<R: HostRuntime>(
  cx: &mut R,
  target: &Value,
  address: &str,
  name: &str,
  args: &ArgumentList,
  returns: ReturnType,
) -> BindResult<Invoked> {
  let max = cx.limits().max_arguments;
  if args.len() > max {
    return Err(BindError::limit_exceeded(BindLimit::Arguments, args.len(), max));
  }
  let Some(object) = target.as_object() else {
    return Err(BindError::unresolvable(address, "receiver is not an object"));
  };
  tracing::trace!(target: "bind_js::proxy", address, argc = args.len(), "invoke");
  let raw = cx
    .call(object, name, args)
    .map_err(|e| BindError::runtime(address, e))?;
  Ok(returns.shape(raw))
}

/// Declared return type of an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnType {
  /// The result is discarded by the binding; any value is passed through as a primitive.
  Void,
  Primitive,
  Object(TypeTag),
  Parameterized(TypeTag, ElementBinding),
}

impl ReturnType {
  pub fn object<T: Opaque>() -> Self {
    ReturnType::Object(T::type_tag())
  }

  pub(crate) fn shape(self, raw: Value) -> Invoked {
    match self {
      ReturnType::Void | ReturnType::Primitive => Invoked::Primitive(raw),
      ReturnType::Object(tag) => Invoked::Proxy(Proxy::with_tag(raw, tag)),
      ReturnType::Parameterized(tag, element) => {
        Invoked::Proxy(Proxy::parameterized(raw, tag, element))
      }
    }
  }
}

/// Result of an invocation: a proxy for object-like declared types, a plain value otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Invoked {
  Proxy(Proxy),
  Primitive(Value),
}

impl Invoked {
  pub fn into_value(self) -> Value {
    match self {
      Invoked::Proxy(p) => p.into_underlying(),
      Invoked::Primitive(v) => v,
    }
  }

  pub fn into_proxy(self) -> Option<Proxy> {
    match self {
      Invoked::Proxy(p) => Some(p),
      Invoked::Primitive(_) => None,
    }
  }

  /// Wraps the result as binding `T`, or `None` if it is `null`/`undefined`.
  pub fn into_opaque<T: Opaque>(self) -> Option<T> {
    let value = self.into_value();
    if value.is_nullish() {
      None
    } else {
      Some(T::wrap(value))
    }
  }
}

/// A statically typed binding over a [`Proxy`].
///
/// Implementors are thin newtypes; [`Opaque::from_proxy`] is their cast constructor and must not
/// inspect the runtime value.
pub trait Opaque: Sized {
  const TYPE_NAME: &'static str;

  fn from_proxy(proxy: Proxy) -> Self;

  fn proxy(&self) -> &Proxy;

  fn type_tag() -> TypeTag {
    TypeTag::named(Self::TYPE_NAME)
  }

  fn wrap(value: Value) -> Self {
    Self::from_proxy(Proxy::with_tag(value, Self::type_tag()))
  }

  /// Reinterprets this binding as `T` over the same underlying value.
  fn cast<T: Opaque>(&self) -> T {
    T::wrap(self.proxy().underlying().clone())
  }

  fn value_of(&self) -> Self {
    Self::from_proxy(self.proxy().value_of())
  }
}
