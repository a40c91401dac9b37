mod common;

use bind_js::sim::SimRuntime;
use bind_js::{
  intern, BindError, Handle, MemberTable, Owner, Proxy, TypeTag, Value,
};

fn any() -> TypeTag {
  TypeTag::object()
}

#[test]
fn qualified_address_is_dot_join_for_every_chain_length() {
  let names = ["a", "bb", "c", "dd", "e", "ff", "g", "hh"];
  for n in 1..=names.len() {
    let mut t = MemberTable::new();
    let mut id = t.global(intern(names[0]), any());
    for name in &names[1..n] {
      id = t.qualified(id, intern(name), any()).unwrap();
    }
    assert_eq!(t.address_string(id).unwrap(), names[..n].join("."));
    let segments: Vec<_> = t
      .address(id)
      .unwrap()
      .segments()
      .into_iter()
      .map(|i| i.as_str())
      .collect();
    assert_eq!(segments, names[..n].to_vec());
  }
}

#[test]
fn receiver_rooted_chain_address_starts_at_the_field() {
  let mut t = MemberTable::new();
  let style = t.receiver(intern("style"), any());
  let color = t.qualified(style, intern("color"), any()).unwrap();
  assert_eq!(t.address_string(color).unwrap(), "style.color");
  let node = t.node(color).unwrap();
  assert_eq!(node.owner(), Owner::Member(style));
  assert!(!node.is_global());
  assert!(!t.node(style).unwrap().is_global());
}

#[test]
fn global_resolution_ignores_the_receiver() {
  let mut f = common::dom();
  let mut t = MemberTable::new();
  let document = t.global(intern("document"), TypeTag::named("Document"));

  let p1 = Proxy::wrap(Value::Object(f.nodes[0]));
  let p2 = Proxy::wrap(Value::Number(42.0));
  let r1 = t.resolve(document, &mut f.rt, &p1).unwrap();
  let r2 = t.resolve(document, &mut f.rt, &p2).unwrap();
  assert!(r1.denotes_same(&r2));
  assert_eq!(r1.handle(), Some(f.document));
  assert_eq!(r1.tag().name(), "Document");
}

#[test]
fn qualified_resolution_reads_through_the_chain() {
  let mut f = common::dom();
  let mut t = MemberTable::new();
  let document = t.global(intern("document"), any());
  let root = t.qualified(document, intern("documentElement"), any()).unwrap();
  let first = t.qualified(root, intern("firstChild"), any()).unwrap();
  let name = t.qualified(first, intern("nodeName"), any()).unwrap();

  let resolved = t.resolve_global(name, &mut f.rt).unwrap();
  assert_eq!(resolved.as_str(), Some("A"));
  assert_eq!(t.address_string(name).unwrap(), "document.documentElement.firstChild.nodeName");
}

#[test]
fn receiver_members_read_off_the_passed_proxy() {
  let mut f = common::dom();
  let mut t = MemberTable::new();
  let name = t.receiver(intern("nodeName"), any());

  let b = Proxy::wrap(f.nodes[1]);
  let c = Proxy::wrap(f.nodes[2]);
  assert_eq!(t.resolve(name, &mut f.rt, &b).unwrap().as_str(), Some("B"));
  assert_eq!(t.resolve(name, &mut f.rt, &c).unwrap().as_str(), Some("C"));
}

#[test]
fn missing_property_resolves_to_undefined_not_an_error() {
  let mut f = common::dom();
  let mut t = MemberTable::new();
  let missing = t.receiver(intern("noSuchThing"), any());
  let p = t.resolve(missing, &mut f.rt, &Proxy::wrap(f.html)).unwrap();
  assert_eq!(p.underlying(), &Value::Undefined);
}

#[test]
fn non_object_intermediate_is_an_address_resolution_error() {
  let mut f = common::dom();
  let mut t = MemberTable::new();
  let document = t.global(intern("document"), any());
  let node_name = t.qualified(document, intern("nodeName"), any()).unwrap();
  let length = t.qualified(node_name, intern("length"), any()).unwrap();

  let err = t.resolve_global(length, &mut f.rt).unwrap_err();
  match err {
    BindError::AddressResolution { address, .. } => assert_eq!(address, "document.nodeName"),
    other => panic!("expected address resolution error, got {other:?}"),
  }
}

#[test]
fn receiver_member_on_primitive_proxy_fails_to_resolve() {
  let mut rt = SimRuntime::new();
  let mut t = MemberTable::new();
  let field = t.receiver(intern("field"), any());
  let err = t.resolve(field, &mut rt, &Proxy::wrap(Value::Null)).unwrap_err();
  assert!(matches!(err, BindError::AddressResolution { ref address, .. } if address == "this"));
}

#[test]
fn member_ids_from_another_table_are_rejected() {
  let mut rt = SimRuntime::new();
  let mut big = MemberTable::new();
  big.global(intern("a"), any());
  let foreign = big.global(intern("b"), any());

  let small = MemberTable::new();
  let err = small
    .resolve(foreign, &mut rt, &Proxy::wrap(Handle(0)))
    .unwrap_err();
  assert!(matches!(err, BindError::UnknownMember(id) if id == foreign));
  assert!(small.address(foreign).is_err());
}

#[test]
fn one_table_serves_many_runtimes() {
  let mut t = MemberTable::new();
  let document = t.global(intern("document"), any());
  let name = t.qualified(document, intern("nodeName"), any()).unwrap();

  let mut first = common::dom();
  let mut second = SimRuntime::new();
  let doc = second.alloc_object();
  second.define(doc, "nodeName", Value::string("other")).unwrap();
  let global = second.global();
  second.define(global, "document", Value::Object(doc)).unwrap();

  assert_eq!(t.resolve_global(name, &mut first.rt).unwrap().as_str(), Some("#document"));
  assert_eq!(t.resolve_global(name, &mut second).unwrap().as_str(), Some("other"));
}
