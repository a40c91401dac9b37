//! Symbolic member declarations.
//!
//! A [`MemberTable`] is an arena of [`MemberNode`]s. Each node names one runtime property or method
//! and points at its owner by index, so a qualifier chain like `document.implementation` is a pair
//! of nodes where the second refers to the first. Nodes are immutable once pushed and carry no
//! per-instance state; one table serves every proxy it is resolved against.
//!
//! Resolution is a function of the member, the runtime (which supplies the ambient global object)
//! and the receiver proxy:
//!
//! - [`Owner::Global`] members ignore the receiver and read off the global object.
//! - [`Owner::Receiver`] members read off the receiver proxy.
//! - [`Owner::Member`] members read off whatever their qualifier resolves to.

use std::fmt;

use crate::{
  args::{ArgumentList, ToArg},
  error::{BindError, BindLimit, BindResult},
  generic::ElementBinding,
  ident::Ident,
  limits::BindingLimits,
  proxy::{call_on, Invoked, Proxy, ReturnType, TypeTag},
  runtime::{Handle, HostRuntime, Value},
};

/// Index of a node in a [`MemberTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub(crate) u32);

impl MemberId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// What a member is read off of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
  /// No qualifier; a free-standing identifier on the global object.
  Global,
  /// No qualifier; a field of whichever proxy the member is resolved against.
  Receiver,
  /// Qualified by another member of the same table.
  Member(MemberId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberNode {
  name: Ident,
  owner: Owner,
  ty: TypeTag,
  element: Option<ElementBinding>,
  depth: u32,
}

impl MemberNode {
  pub fn name(&self) -> Ident {
    self.name
  }

  pub fn owner(&self) -> Owner {
    self.owner
  }

  pub fn qualifier(&self) -> Option<MemberId> {
    match self.owner {
      Owner::Member(q) => Some(q),
      Owner::Global | Owner::Receiver => None,
    }
  }

  /// Whether this node has no qualifier and addresses the global object.
  pub fn is_global(&self) -> bool {
    self.owner == Owner::Global
  }

  /// The declared binding type of the resolved value.
  pub fn ty(&self) -> TypeTag {
    self.ty
  }

  pub fn element_binding(&self) -> Option<ElementBinding> {
    self.element
  }

  /// Number of qualifiers above this node.
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// How a call to this member shapes its result. Members declared as plain `Object` return
  /// primitives untouched.
  pub fn return_type(&self) -> ReturnType {
    match self.element {
      Some(element) => ReturnType::Parameterized(self.ty, element),
      None if self.ty == TypeTag::object() => ReturnType::Primitive,
      None => ReturnType::Object(self.ty),
    }
  }

  fn wrap(&self, value: Value) -> Proxy {
    match self.element {
      Some(element) => Proxy::parameterized(value, self.ty, element),
      None => Proxy::with_tag(value, self.ty),
    }
  }
}

#[derive(Clone, Debug, Default)]
pub struct MemberTable {
  nodes: Vec<MemberNode>,
  limits: BindingLimits,
}

impl MemberTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_limits(limits: BindingLimits) -> Self {
    Self {
      nodes: Vec::new(),
      limits,
    }
  }

  pub fn limits(&self) -> BindingLimits {
    self.limits
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn get(&self, id: MemberId) -> Option<&MemberNode> {
    self.nodes.get(id.index())
  }

  pub fn node(&self, id: MemberId) -> BindResult<&MemberNode> {
    self.get(id).ok_or(BindError::UnknownMember(id))
  }

  pub fn iter(&self) -> impl Iterator<Item = (MemberId, &MemberNode)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(i, n)| (MemberId(i as u32), n))
  }

  fn push(
    &mut self,
    name: Ident,
    owner: Owner,
    ty: TypeTag,
    element: Option<ElementBinding>,
  ) -> BindResult<MemberId> {
    let depth = match owner {
      Owner::Global | Owner::Receiver => 0,
      Owner::Member(q) => self.node(q)?.depth + 1,
    };
    if depth as usize > self.limits.max_qualifier_depth {
      return Err(BindError::limit_exceeded(
        BindLimit::QualifierDepth,
        depth as usize,
        self.limits.max_qualifier_depth,
      ));
    }
    let id = MemberId(self.nodes.len() as u32);
    self.nodes.push(MemberNode {
      name,
      owner,
      ty,
      element,
      depth,
    });
    Ok(id)
  }

  fn push_root(
    &mut self,
    name: Ident,
    owner: Owner,
    ty: TypeTag,
    element: Option<ElementBinding>,
  ) -> MemberId {
    let id = MemberId(self.nodes.len() as u32);
    self.nodes.push(MemberNode {
      name,
      owner,
      ty,
      element,
      depth: 0,
    });
    id
  }

  /// Declares a free-standing identifier on the global object, e.g. a constructor.
  pub fn global(&mut self, name: Ident, ty: TypeTag) -> MemberId {
    self.push_root(name, Owner::Global, ty, None)
  }

  pub fn global_parameterized(
    &mut self,
    name: Ident,
    ty: TypeTag,
    element: ElementBinding,
  ) -> MemberId {
    self.push_root(name, Owner::Global, ty, Some(element))
  }

  /// Declares a field of the receiver.
  pub fn receiver(&mut self, name: Ident, ty: TypeTag) -> MemberId {
    self.push_root(name, Owner::Receiver, ty, None)
  }

  pub fn receiver_parameterized(
    &mut self,
    name: Ident,
    ty: TypeTag,
    element: ElementBinding,
  ) -> MemberId {
    self.push_root(name, Owner::Receiver, ty, Some(element))
  }

  /// Declares `name` as a member of `qualifier`, which must already be in this table.
  pub fn qualified(&mut self, qualifier: MemberId, name: Ident, ty: TypeTag) -> BindResult<MemberId> {
    self.push(name, Owner::Member(qualifier), ty, None)
  }

  pub fn qualified_parameterized(
    &mut self,
    qualifier: MemberId,
    name: Ident,
    ty: TypeTag,
    element: ElementBinding,
  ) -> BindResult<MemberId> {
    self.push(name, Owner::Member(qualifier), ty, Some(element))
  }

  /// Iterates from `id` up through its qualifiers, leaf first.
  pub fn ancestors(&self, id: MemberId) -> Ancestors<'_> {
    Ancestors {
      table: self,
      next: Some(id),
    }
  }

  /// The dot-joined address of `id`, root first. Formatting does not allocate.
  pub fn address(&self, id: MemberId) -> BindResult<Address<'_>> {
    self.node(id)?;
    Ok(Address { table: self, id })
  }

  pub fn address_string(&self, id: MemberId) -> BindResult<String> {
    Ok(self.address(id)?.to_string())
  }

  /// Resolves `id` against `proxy`, producing a proxy of the member's declared type.
  pub fn resolve<R: HostRuntime>(
    &self,
    id: MemberId,
    cx: &mut R,
    proxy: &Proxy,
  ) -> BindResult<Proxy> {
    let node = self.node(id)?;
    let value = self.read(id, cx, proxy)?;
    Ok(node.wrap(value))
  }

  /// Resolves a global-rooted member without a receiver.
  pub fn resolve_global<R: HostRuntime>(&self, id: MemberId, cx: &mut R) -> BindResult<Proxy> {
    self.resolve(id, cx, &Proxy::wrap(Value::Undefined))
  }

  /// Calls `id` as a method, shaping the result by the member's declared type.
  pub fn invoke_declared<R: HostRuntime>(
    &self,
    id: MemberId,
    cx: &mut R,
    proxy: &Proxy,
    args: &ArgumentList,
  ) -> BindResult<Invoked> {
    let returns = self.node(id)?.return_type();
    self.invoke(id, cx, proxy, args, returns)
  }

  /// Calls `id` as a method on the object its qualifier denotes. `returns` overrides the
  /// member's declared type.
  pub fn invoke<R: HostRuntime>(
    &self,
    id: MemberId,
    cx: &mut R,
    proxy: &Proxy,
    args: &ArgumentList,
    returns: ReturnType,
  ) -> BindResult<Invoked> {
    let node = self.node(id)?;
    let base = self.base(id, node.owner, cx, proxy)?;
    let address = self.address_string(id)?;
    call_on(cx, &base, &address, node.name.as_str(), args, returns)
  }

  /// Calls `id` as a constructor, i.e. `new qualifier.name(...args)`.
  pub fn construct<R: HostRuntime>(
    &self,
    id: MemberId,
    cx: &mut R,
    proxy: &Proxy,
    args: &ArgumentList,
  ) -> BindResult<Proxy> {
    let node = self.node(id)?;
    let max = cx.limits().max_arguments;
    if args.len() > max {
      return Err(BindError::limit_exceeded(BindLimit::Arguments, args.len(), max));
    }
    let base = self.base(id, node.owner, cx, proxy)?;
    let address = self.address_string(id)?;
    let object = self.expect_object(id, &base)?;
    tracing::trace!(target: "bind_js::member", %address, argc = args.len(), "construct");
    let value = cx
      .construct(object, node.name.as_str(), args)
      .map_err(|e| BindError::runtime(address, e))?;
    Ok(node.wrap(value))
  }

  /// Writes `value` to the property `id` addresses.
  pub fn assign<R: HostRuntime>(
    &self,
    id: MemberId,
    cx: &mut R,
    proxy: &Proxy,
    value: impl ToArg,
  ) -> BindResult<()> {
    let node = self.node(id)?;
    let base = self.base(id, node.owner, cx, proxy)?;
    let object = self.expect_object(id, &base)?;
    tracing::trace!(target: "bind_js::member", member = id.0, name = %node.name, "assign");
    cx.set(object, node.name.as_str(), value.to_arg())
      .map_err(|e| BindError::runtime(self.address_lossy(id), e))
  }

  /// Reads the value `id` addresses.
  fn read<R: HostRuntime>(&self, id: MemberId, cx: &mut R, proxy: &Proxy) -> BindResult<Value> {
    let node = self.node(id)?;
    let base = self.base(id, node.owner, cx, proxy)?;
    let object = self.expect_object(id, &base)?;
    tracing::trace!(target: "bind_js::member", member = id.0, name = %node.name, "read");
    cx.get(object, node.name.as_str())
      .map_err(|e| BindError::runtime(self.address_lossy(id), e))
  }

  /// The value `id`'s name is looked up on.
  fn base<R: HostRuntime>(
    &self,
    id: MemberId,
    owner: Owner,
    cx: &mut R,
    proxy: &Proxy,
  ) -> BindResult<Value> {
    match owner {
      Owner::Global => Ok(Value::Object(cx.global_object())),
      Owner::Receiver => Ok(proxy.underlying().clone()),
      Owner::Member(q) => {
        // Qualifiers always precede their members, so this recursion is bounded by the depth
        // limit checked at declaration time.
        debug_assert!(q < id);
        self.read(q, cx, proxy)
      }
    }
  }

  fn expect_object(&self, id: MemberId, base: &Value) -> BindResult<Handle> {
    base.as_object().ok_or_else(|| {
      let owner = match self.get(id).map(MemberNode::owner) {
        Some(Owner::Member(q)) => self.address_lossy(q),
        Some(Owner::Receiver) => "this".to_string(),
        _ => "globalThis".to_string(),
      };
      tracing::trace!(target: "bind_js::member", %owner, found = base.type_name(), "non-object qualifier");
      BindError::unresolvable(owner, "qualifier does not resolve to an object")
    })
  }

  fn address_lossy(&self, id: MemberId) -> String {
    self
      .address_string(id)
      .unwrap_or_else(|_| format!("<unknown member {}>", id.0))
  }
}

/// Leaf-to-root iterator over a member's qualifier chain.
pub struct Ancestors<'a> {
  table: &'a MemberTable,
  next: Option<MemberId>,
}

impl<'a> Iterator for Ancestors<'a> {
  type Item = (MemberId, &'a MemberNode);

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.next?;
    let node = self.table.get(id)?;
    self.next = node.qualifier();
    Some((id, node))
  }
}

/// Displayable address of a member, e.g. `document.implementation`.
#[derive(Clone, Copy)]
pub struct Address<'a> {
  table: &'a MemberTable,
  id: MemberId,
}

impl Address<'_> {
  pub fn member(&self) -> MemberId {
    self.id
  }

  /// Identifiers from root to leaf.
  pub fn segments(&self) -> Vec<Ident> {
    let mut out: Vec<Ident> = self.table.ancestors(self.id).map(|(_, n)| n.name).collect();
    out.reverse();
    out
  }

  fn write_from(&self, id: MemberId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(node) = self.table.get(id) else {
      return Ok(());
    };
    if let Some(q) = node.qualifier() {
      self.write_from(q, f)?;
      f.write_str(".")?;
    }
    f.write_str(node.name.as_str())
  }
}

impl fmt::Display for Address<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.write_from(self.id, f)
  }
}

impl fmt::Debug for Address<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Address({self})")
  }
}
