//! Element-type bindings for parameterized proxies.
//!
//! A collection's element type is fixed where the binding is declared (`NodeList<Node>`), but the
//! runtime's indexed accessor hands back an untyped value. [`ElementBinding`] is the erased form
//! carried by a [`Proxy`]; [`ElementWrapper`] is the typed form used by binding structs. Both wrap
//! through the element type's cast constructor and nothing else.

use std::{fmt, marker::PhantomData};

use crate::{
  proxy::{Opaque, Proxy, TypeTag},
  runtime::Value,
};

/// Erased descriptor of a parameterized proxy's element type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementBinding {
  element: TypeTag,
}

impl ElementBinding {
  pub fn new(element: TypeTag) -> Self {
    Self { element }
  }

  pub fn of<E: Opaque>() -> Self {
    Self::new(E::type_tag())
  }

  pub fn element(self) -> TypeTag {
    self.element
  }

  /// Wraps a raw extracted value as a proxy of the element type.
  pub fn wrap(self, value: Value) -> Proxy {
    Proxy::with_tag(value, self.element)
  }
}

impl fmt::Debug for ElementBinding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ElementBinding<{}>", self.element)
  }
}

/// Typed element wrapper for binding type `E`.
pub struct ElementWrapper<E> {
  _element: PhantomData<fn() -> E>,
}

impl<E: Opaque> ElementWrapper<E> {
  pub fn new() -> Self {
    Self {
      _element: PhantomData,
    }
  }

  pub fn binding(&self) -> ElementBinding {
    ElementBinding::of::<E>()
  }

  pub fn wrap(&self, value: Value) -> E {
    E::wrap(value)
  }

  /// Rewraps an element proxy produced by the erased layer.
  pub fn wrap_proxy(&self, proxy: Proxy) -> E {
    E::from_proxy(proxy.cast(E::type_tag()))
  }
}

impl<E: Opaque> Default for ElementWrapper<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> Clone for ElementWrapper<E> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<E> Copy for ElementWrapper<E> {}

impl<E: Opaque> fmt::Debug for ElementWrapper<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ElementWrapper<{}>", E::TYPE_NAME)
  }
}
