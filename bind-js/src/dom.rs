//! Sample bindings for a slice of the DOM and XSLT surface.
//!
//! Every binding here is the same pattern: a newtype over [`Proxy`], members declared once in the
//! shared [`DomCatalog`], and methods that marshal their arguments into an [`ArgumentList`].

use once_cell::sync::Lazy;

use crate::{
  args::{ArgumentList, ToArg},
  error::{BindError, BindResult},
  generic::{ElementBinding, ElementWrapper},
  ident::intern,
  member::{MemberId, MemberTable},
  proxy::{Invoked, Opaque, Proxy, TypeTag},
  runtime::{HostRuntime, Value},
};

/// Member declarations for the DOM bindings in this module.
pub struct DomCatalog {
  pub table: MemberTable,
  pub document: MemberId,
  pub xslt_processor: MemberId,
  pub document_implementation: MemberId,
  pub implementation: MemberId,
  pub length: MemberId,
  pub node_name: MemberId,
  pub node_type: MemberId,
  pub text_content: MemberId,
  pub first_child: MemberId,
  pub child_nodes: MemberId,
  pub document_element: MemberId,
  pub has_feature: MemberId,
  pub create_document: MemberId,
  pub import_stylesheet: MemberId,
  pub transform_to_fragment: MemberId,
  pub transform_to_document: MemberId,
  pub set_parameter: MemberId,
  pub get_parameter: MemberId,
  pub remove_parameter: MemberId,
  pub clear_parameters: MemberId,
  pub reset: MemberId,
}

static CATALOG: Lazy<DomCatalog> = Lazy::new(DomCatalog::build);

/// The process-wide DOM member catalog.
pub fn catalog() -> &'static DomCatalog {
  &CATALOG
}

impl DomCatalog {
  fn build() -> Self {
    let mut t = MemberTable::new();
    let node = Node::type_tag();
    let node_list = NodeList::<Node>::type_tag();
    let document_tag = Document::type_tag();
    let implementation_tag = DomImplementation::type_tag();
    let any = TypeTag::object();

    let document = t.global(intern("document"), document_tag);
    let xslt_processor = t.global(intern("XSLTProcessor"), XsltProcessor::type_tag());
    let document_implementation = t
      .qualified(document, intern("implementation"), implementation_tag)
      .expect("`document` is declared above");

    DomCatalog {
      document,
      xslt_processor,
      document_implementation,
      implementation: t.receiver(intern("implementation"), implementation_tag),
      length: t.receiver(intern("length"), any),
      node_name: t.receiver(intern("nodeName"), any),
      node_type: t.receiver(intern("nodeType"), any),
      text_content: t.receiver(intern("textContent"), any),
      first_child: t.receiver(intern("firstChild"), node),
      child_nodes: t.receiver_parameterized(
        intern("childNodes"),
        node_list,
        ElementBinding::of::<Node>(),
      ),
      document_element: t.receiver(intern("documentElement"), node),
      has_feature: t.receiver(intern("hasFeature"), any),
      create_document: t.receiver(intern("createDocument"), document_tag),
      import_stylesheet: t.receiver(intern("importStylesheet"), any),
      transform_to_fragment: t.receiver(intern("transformToFragment"), node),
      transform_to_document: t.receiver(intern("transformToDocument"), document_tag),
      set_parameter: t.receiver(intern("setParameter"), any),
      get_parameter: t.receiver(intern("getParameter"), any),
      remove_parameter: t.receiver(intern("removeParameter"), any),
      clear_parameters: t.receiver(intern("clearParameters"), any),
      reset: t.receiver(intern("reset"), any),
      table: t,
    }
  }

  fn read<R: HostRuntime>(&self, member: MemberId, cx: &mut R, on: &Proxy) -> BindResult<Value> {
    Ok(self.table.resolve(member, cx, on)?.into_underlying())
  }

  fn call<R: HostRuntime>(
    &self,
    member: MemberId,
    cx: &mut R,
    on: &Proxy,
    args: ArgumentList,
  ) -> BindResult<Invoked> {
    self.table.invoke_declared(member, cx, on, &args)
  }
}

fn nullable<T: Opaque>(value: Value) -> Option<T> {
  if value.is_nullish() {
    None
  } else {
    Some(T::wrap(value))
  }
}

fn string(value: Value) -> Option<String> {
  value.as_str().map(str::to_string)
}

macro_rules! opaque {
  ($(#[$meta:meta])* $name:ident = $js:literal) => {
    $(#[$meta])*
    #[derive(Clone, Debug, PartialEq)]
    pub struct $name {
      proxy: Proxy,
    }

    impl Opaque for $name {
      const TYPE_NAME: &'static str = $js;

      fn from_proxy(proxy: Proxy) -> Self {
        Self { proxy }
      }

      fn proxy(&self) -> &Proxy {
        &self.proxy
      }
    }
  };
}

opaque!(
  /// `Node`.
  Node = "Node"
);
opaque!(Document = "Document");
opaque!(
  /// `DOMImplementation`, reachable as `document.implementation`.
  DomImplementation = "DOMImplementation"
);
opaque!(XsltProcessor = "XSLTProcessor");

impl Node {
  pub fn node_name<R: HostRuntime>(&self, cx: &mut R) -> BindResult<Option<String>> {
    let c = catalog();
    Ok(string(c.read(c.node_name, cx, &self.proxy)?))
  }

  pub fn node_type<R: HostRuntime>(&self, cx: &mut R) -> BindResult<Option<u16>> {
    let c = catalog();
    let value = c.read(c.node_type, cx, &self.proxy)?;
    match value {
      Value::Undefined | Value::Null => Ok(None),
      Value::Number(n) if n >= 0.0 && n <= u16::MAX as f64 && n.fract() == 0.0 => {
        Ok(Some(n as u16))
      }
      _ => Err(BindError::unresolvable(
        format!("{}.nodeType", Self::TYPE_NAME),
        "nodeType is not an unsigned short",
      )),
    }
  }

  pub fn text_content<R: HostRuntime>(&self, cx: &mut R) -> BindResult<Option<String>> {
    let c = catalog();
    Ok(string(c.read(c.text_content, cx, &self.proxy)?))
  }

  /// Sets `textContent`; `None` writes an explicit `null`.
  pub fn set_text_content<R: HostRuntime>(
    &self,
    cx: &mut R,
    value: Option<&str>,
  ) -> BindResult<()> {
    let c = catalog();
    c.table.assign(c.text_content, cx, &self.proxy, value)
  }

  pub fn first_child<R: HostRuntime>(&self, cx: &mut R) -> BindResult<Option<Node>> {
    let c = catalog();
    Ok(nullable(c.read(c.first_child, cx, &self.proxy)?))
  }

  pub fn child_nodes<R: HostRuntime>(&self, cx: &mut R) -> BindResult<NodeList<Node>> {
    let c = catalog();
    Ok(NodeList::from_proxy(c.table.resolve(c.child_nodes, cx, &self.proxy)?))
  }
}

/// A live, ordered collection of `E`.
pub struct NodeList<E> {
  proxy: Proxy,
  element: ElementWrapper<E>,
}

impl<E: Opaque> Opaque for NodeList<E> {
  const TYPE_NAME: &'static str = "NodeList";

  fn from_proxy(proxy: Proxy) -> Self {
    let element = ElementWrapper::<E>::new();
    Self {
      proxy: proxy.with_element(element.binding()),
      element,
    }
  }

  fn proxy(&self) -> &Proxy {
    &self.proxy
  }
}

impl<E: Opaque> NodeList<E> {
  /// The live number of entries.
  pub fn length<R: HostRuntime>(&self, cx: &mut R) -> BindResult<u32> {
    self.proxy.length(cx)
  }

  /// Entry `index`, or `None` if it is outside the list's current bounds.
  pub fn item<R: HostRuntime>(&self, cx: &mut R, index: u32) -> BindResult<Option<E>> {
    Ok(
      self
        .proxy
        .element_at(cx, index)?
        .map(|p| self.element.wrap_proxy(p)),
    )
  }
}

impl<E> Clone for NodeList<E> {
  fn clone(&self) -> Self {
    Self {
      proxy: self.proxy.clone(),
      element: self.element,
    }
  }
}

impl<E: Opaque> std::fmt::Debug for NodeList<E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodeList")
      .field("proxy", &self.proxy)
      .field("element", &self.element)
      .finish()
  }
}

impl Document {
  /// The global `document`.
  pub fn current<R: HostRuntime>(cx: &mut R) -> BindResult<Document> {
    let c = catalog();
    Ok(Document::from_proxy(c.table.resolve_global(c.document, cx)?))
  }

  pub fn implementation<R: HostRuntime>(&self, cx: &mut R) -> BindResult<DomImplementation> {
    let c = catalog();
    Ok(DomImplementation::from_proxy(
      c.table.resolve(c.implementation, cx, &self.proxy)?,
    ))
  }

  pub fn document_element<R: HostRuntime>(&self, cx: &mut R) -> BindResult<Option<Node>> {
    let c = catalog();
    Ok(nullable(c.read(c.document_element, cx, &self.proxy)?))
  }

  pub fn as_node(&self) -> Node {
    self.cast()
  }
}

impl DomImplementation {
  /// `document.implementation` of the global document.
  pub fn current<R: HostRuntime>(cx: &mut R) -> BindResult<DomImplementation> {
    let c = catalog();
    Ok(DomImplementation::from_proxy(
      c.table.resolve_global(c.document_implementation, cx)?,
    ))
  }

  /// `hasFeature(feature, version)`; an omitted version is passed as absent, not `null`.
  pub fn has_feature<R: HostRuntime>(
    &self,
    cx: &mut R,
    feature: &str,
    version: Option<&str>,
  ) -> BindResult<bool> {
    let c = catalog();
    let args = match version {
      Some(version) => ArgumentList::build().add(feature).add(version),
      None => ArgumentList::build().add(feature),
    }
    .finish();
    let result = c.call(c.has_feature, cx, &self.proxy, args)?.into_value();
    Ok(result.as_bool().unwrap_or(false))
  }

  /// `createDocument(namespaceURI, qualifiedName, doctype)`.
  pub fn create_document<R: HostRuntime>(
    &self,
    cx: &mut R,
    namespace: Option<&str>,
    qualified_name: Option<&str>,
    doctype: Option<&Node>,
  ) -> BindResult<Document> {
    let c = catalog();
    let args = ArgumentList::build()
      .add(namespace)
      .add(qualified_name)
      .add(doctype)
      .finish();
    let result = c.call(c.create_document, cx, &self.proxy, args)?;
    Ok(Document::wrap(result.into_value()))
  }
}

impl XsltProcessor {
  /// `new XSLTProcessor()`.
  pub fn new<R: HostRuntime>(cx: &mut R) -> BindResult<XsltProcessor> {
    let c = catalog();
    let proxy = c.table.construct(
      c.xslt_processor,
      cx,
      &Proxy::wrap(Value::Undefined),
      &ArgumentList::empty(),
    )?;
    Ok(XsltProcessor::from_proxy(proxy))
  }

  pub fn import_stylesheet<R: HostRuntime>(&self, cx: &mut R, style: &Node) -> BindResult<()> {
    let c = catalog();
    let args = ArgumentList::build().add(style).finish();
    c.call(c.import_stylesheet, cx, &self.proxy, args)?;
    Ok(())
  }

  pub fn transform_to_fragment<R: HostRuntime>(
    &self,
    cx: &mut R,
    source: &Node,
    output: &Document,
  ) -> BindResult<Option<Node>> {
    let c = catalog();
    let args = ArgumentList::build().add(source).add(output).finish();
    let result = c.call(c.transform_to_fragment, cx, &self.proxy, args)?;
    Ok(result.into_opaque())
  }

  pub fn transform_to_document<R: HostRuntime>(
    &self,
    cx: &mut R,
    source: &Node,
  ) -> BindResult<Option<Document>> {
    let c = catalog();
    let args = ArgumentList::build().add(source).finish();
    let result = c.call(c.transform_to_document, cx, &self.proxy, args)?;
    Ok(result.into_opaque())
  }

  /// `setParameter(namespaceURI, localName, value)`; a `None` namespace is an explicit `null`.
  pub fn set_parameter<R: HostRuntime>(
    &self,
    cx: &mut R,
    namespace: Option<&str>,
    local_name: &str,
    value: impl ToArg,
  ) -> BindResult<()> {
    let c = catalog();
    let args = ArgumentList::build()
      .add(namespace)
      .add(local_name)
      .add(value)
      .finish();
    c.call(c.set_parameter, cx, &self.proxy, args)?;
    Ok(())
  }

  pub fn get_parameter<R: HostRuntime>(
    &self,
    cx: &mut R,
    namespace: Option<&str>,
    local_name: &str,
  ) -> BindResult<Value> {
    let c = catalog();
    let args = ArgumentList::build().add(namespace).add(local_name).finish();
    Ok(c.call(c.get_parameter, cx, &self.proxy, args)?.into_value())
  }

  pub fn remove_parameter<R: HostRuntime>(
    &self,
    cx: &mut R,
    namespace: Option<&str>,
    local_name: &str,
  ) -> BindResult<()> {
    let c = catalog();
    let args = ArgumentList::build().add(namespace).add(local_name).finish();
    c.call(c.remove_parameter, cx, &self.proxy, args)?;
    Ok(())
  }

  pub fn clear_parameters<R: HostRuntime>(&self, cx: &mut R) -> BindResult<()> {
    let c = catalog();
    c.call(c.clear_parameters, cx, &self.proxy, ArgumentList::empty())?;
    Ok(())
  }

  pub fn reset<R: HostRuntime>(&self, cx: &mut R) -> BindResult<()> {
    let c = catalog();
    c.call(c.reset, cx, &self.proxy, ArgumentList::empty())?;
    Ok(())
  }
}
