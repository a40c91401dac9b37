mod common;

use bind_js::dom::{Node, XsltProcessor};
use bind_js::sim::SimRuntime;
use bind_js::{
  args, intern, Absent, ArgumentList, BindError, BindLimit, BindingLimits, MemberTable, Opaque,
  Proxy, ReturnType, TypeTag, Value,
};

#[test]
fn order_and_explicit_nulls_are_preserved() {
  let list = ArgumentList::build().add("A").add(None::<&str>).add("B").finish();
  assert_eq!(list.len(), 3);
  assert_eq!(
    list.iter().cloned().collect::<Vec<_>>(),
    vec![Value::string("A"), Value::Null, Value::string("B")]
  );
}

#[test]
fn trailing_absent_and_null_are_kept_in_position() {
  let list = args![1, Absent, None::<bool>, Absent];
  assert_eq!(list.len(), 4);
  assert_eq!(list.get(1), Some(&Value::Undefined));
  assert_eq!(list.get(2), Some(&Value::Null));
  assert_eq!(list.get(3), Some(&Value::Undefined));
}

#[test]
fn duplicates_are_not_collapsed() {
  let list = args!["x", "x", "x"];
  assert_eq!(list.len(), 3);
}

#[test]
fn niladic_reset_issues_an_empty_argument_list() {
  let mut f = common::dom();
  let processor = XsltProcessor::new(&mut f.rt).unwrap();
  f.rt.take_calls();

  processor.reset(&mut f.rt).unwrap();
  let calls = f.rt.calls();
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0].name, "reset");
  assert_eq!(calls[0].args.len(), 0);
  assert_eq!(calls[0].args, ArgumentList::empty());
}

#[test]
fn explicit_null_namespace_reaches_the_runtime_positionally() {
  let mut f = common::dom();
  let processor = XsltProcessor::new(&mut f.rt).unwrap();
  f.rt.take_calls();

  processor.set_parameter(&mut f.rt, None, "title", "Report").unwrap();
  let call = &f.rt.calls()[0];
  assert_eq!(call.name, "setParameter");
  assert_eq!(
    call.args.as_slice(),
    &[Value::Null, Value::string("title"), Value::string("Report")]
  );
}

#[test]
fn opaque_bindings_marshal_as_their_handle() {
  let f = common::dom();
  let node = Node::wrap(Value::Object(f.nodes[1]));
  let list = ArgumentList::build().add(&node).add(Some(&node)).finish();
  assert_eq!(list.get(0), Some(&Value::Object(f.nodes[1])));
  assert_eq!(list.get(1), Some(&Value::Object(f.nodes[1])));
}

#[test]
fn argument_count_limit_is_enforced_before_calling() {
  let mut rt = SimRuntime::with_limits(BindingLimits {
    max_arguments: 2,
    ..BindingLimits::default()
  });
  let global = rt.global();
  rt.define_fn(global, "f", |_, _, _| Ok(Value::Undefined)).unwrap();

  let mut t = MemberTable::new();
  let f = t.global(intern("f"), TypeTag::object());
  let receiver = Proxy::wrap(Value::Undefined);

  t.invoke(f, &mut rt, &receiver, &args![1, 2], ReturnType::Void)
    .unwrap();
  let err = t
    .invoke(f, &mut rt, &receiver, &args![1, 2, 3], ReturnType::Void)
    .unwrap_err();
  assert!(matches!(
    err,
    BindError::LimitExceeded {
      limit: BindLimit::Arguments,
      got: 3,
      max: 2
    }
  ));
  assert_eq!(rt.calls().len(), 1);
}
