#![allow(dead_code)]

use bind_js::sim::{SimError, SimRuntime};
use bind_js::{ArgumentList, ErrorCode, Handle, HostRuntime, Value};

/// A simulated document:
///
/// ```text
/// document
///   implementation { hasFeature, createDocument }
///   documentElement = html
///     childNodes = [a, b, c]
///     firstChild = a
/// XSLTProcessor (constructor)
/// ```
pub struct Fixture {
  pub rt: SimRuntime,
  pub document: Handle,
  pub implementation: Handle,
  pub html: Handle,
  pub children: Handle,
  pub nodes: Vec<Handle>,
}

pub fn node(rt: &mut SimRuntime, name: &str, text: &str) -> Handle {
  let h = rt.alloc_object();
  rt.define(h, "nodeName", Value::string(name)).unwrap();
  rt.define(h, "nodeType", Value::Number(1.0)).unwrap();
  rt.define(h, "textContent", Value::string(text)).unwrap();
  h
}

pub fn dom() -> Fixture {
  let mut rt = SimRuntime::new();
  let global = rt.global();

  let nodes: Vec<Handle> = ["A", "B", "C"]
    .iter()
    .map(|name| node(&mut rt, name, &name.to_lowercase()))
    .collect();
  let children = rt.alloc_list(nodes.iter().map(|h| Value::Object(*h)));

  let html = node(&mut rt, "HTML", "abc");
  rt.define(html, "childNodes", Value::Object(children)).unwrap();
  rt.define(html, "firstChild", Value::Object(nodes[0])).unwrap();

  let implementation = rt.alloc_object();
  rt.define_fn(implementation, "hasFeature", |_rt, _this, args| {
    Ok(Value::Bool(args.get(0).and_then(Value::as_str) == Some("XML")))
  })
  .unwrap();
  rt.define_fn(implementation, "createDocument", |rt, _this, args| {
    if let Some(Value::String(qn)) = args.get(1) {
      if qn.contains(' ') {
        return Err(SimError::new(
          ErrorCode::INVALID_CHARACTER,
          format!("invalid qualified name {qn:?}"),
        ));
      }
      if qn.contains(':') && args.get(0).map_or(true, Value::is_nullish) {
        return Err(SimError::new(ErrorCode::NAMESPACE, "prefix without namespace"));
      }
    }
    let doc = rt.alloc_object();
    rt.define(doc, "nodeName", Value::string("#document"))?;
    rt.define(doc, "nodeType", Value::Number(9.0))?;
    Ok(Value::Object(doc))
  })
  .unwrap();

  let document = rt.alloc_object();
  rt.define(document, "nodeName", Value::string("#document")).unwrap();
  rt.define(document, "nodeType", Value::Number(9.0)).unwrap();
  rt.define(document, "implementation", Value::Object(implementation)).unwrap();
  rt.define(document, "documentElement", Value::Object(html)).unwrap();
  rt.define(global, "document", Value::Object(document)).unwrap();

  rt.define_fn(global, "XSLTProcessor", |rt, this, _args| {
    install_xslt_processor(rt, this)?;
    Ok(Value::Undefined)
  })
  .unwrap();

  Fixture {
    rt,
    document,
    implementation,
    html,
    children,
    nodes,
  }
}

fn param_key(args: &ArgumentList) -> String {
  let ns = args.get(0).and_then(Value::as_str).unwrap_or("");
  let name = args.get(1).and_then(Value::as_str).unwrap_or("");
  format!("{{{ns}}}{name}")
}

fn params(rt: &mut SimRuntime, this: Handle) -> Result<Handle, SimError> {
  match rt.get(this, "__params")? {
    Value::Object(h) => Ok(h),
    _ => {
      let h = rt.alloc_object();
      rt.define(this, "__params", Value::Object(h))?;
      Ok(h)
    }
  }
}

fn install_xslt_processor(rt: &mut SimRuntime, this: Handle) -> Result<(), SimError> {
  rt.define(this, "stylesheet", Value::Null)?;
  rt.define_fn(this, "importStylesheet", |rt, this, args| {
    let style = args.get(0).cloned().unwrap_or_default();
    if !style.is_object() {
      return Err(SimError::new(ErrorCode::TYPE_MISMATCH, "stylesheet must be a node"));
    }
    rt.define(this, "stylesheet", style)?;
    Ok(Value::Undefined)
  })?;
  rt.define_fn(this, "setParameter", |rt, this, args| {
    let key = param_key(args);
    let p = params(rt, this)?;
    rt.define(p, &key, args.get(2).cloned().unwrap_or_default())?;
    Ok(Value::Undefined)
  })?;
  rt.define_fn(this, "getParameter", |rt, this, args| {
    let key = param_key(args);
    let p = params(rt, this)?;
    match rt.get(p, &key)? {
      Value::Undefined => Ok(Value::Null),
      v => Ok(v),
    }
  })?;
  rt.define_fn(this, "removeParameter", |rt, this, args| {
    let key = param_key(args);
    let p = params(rt, this)?;
    rt.define(p, &key, Value::Undefined)?;
    Ok(Value::Undefined)
  })?;
  rt.define_fn(this, "clearParameters", |rt, this, _args| {
    let fresh = rt.alloc_object();
    rt.define(this, "__params", Value::Object(fresh))?;
    Ok(Value::Undefined)
  })?;
  rt.define_fn(this, "reset", |rt, this, _args| {
    let fresh = rt.alloc_object();
    rt.define(this, "__params", Value::Object(fresh))?;
    rt.define(this, "stylesheet", Value::Null)?;
    Ok(Value::Undefined)
  })?;
  rt.define_fn(this, "transformToFragment", |rt, this, _args| {
    if rt.get(this, "stylesheet")?.is_nullish() {
      return Ok(Value::Null);
    }
    let frag = node(rt, "#document-fragment", "");
    Ok(Value::Object(frag))
  })?;
  rt.define_fn(this, "transformToDocument", |rt, this, _args| {
    if rt.get(this, "stylesheet")?.is_nullish() {
      return Ok(Value::Null);
    }
    let doc = node(rt, "#document", "");
    Ok(Value::Object(doc))
  })?;
  Ok(())
}
