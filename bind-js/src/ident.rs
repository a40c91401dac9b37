//! Process-wide identifier interning.
//!
//! Many members across many binding types name the same runtime property (`length`, `item`,
//! `nodeName`, ...). Interning gives each distinct name a single [`Ident`] that compares by
//! identity and a single `'static` allocation for its text.

use std::fmt;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// An interned member name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(u32);

#[derive(Default)]
struct IdentTable {
  names: Vec<&'static str>,
  map: AHashMap<&'static str, Ident>,
}

impl IdentTable {
  fn lookup(&self, name: &str) -> Option<Ident> {
    self.map.get(name).copied()
  }

  fn intern(&mut self, name: &str) -> Ident {
    if let Some(existing) = self.lookup(name) {
      return existing;
    }
    let id = Ident(self.names.len() as u32);
    // Append-only: the text lives for the rest of the process.
    let text: &'static str = Box::leak(name.to_owned().into_boxed_str());
    self.names.push(text);
    self.map.insert(text, id);
    id
  }
}

static TABLE: Lazy<RwLock<IdentTable>> = Lazy::new(|| RwLock::new(IdentTable::default()));

/// Interns `name`, returning the canonical [`Ident`] for it.
///
/// Interning the same text twice returns the same identifier.
pub fn intern(name: impl AsRef<str>) -> Ident {
  let name = name.as_ref();
  if let Some(id) = TABLE.read().lookup(name) {
    tracing::trace!(target: "bind_js::ident", cache_hit = true, name);
    return id;
  }
  let id = TABLE.write().intern(name);
  tracing::trace!(target: "bind_js::ident", cache_hit = false, name, id = id.0);
  id
}

impl Ident {
  /// Returns the identifier for `name` if it has already been interned.
  pub fn lookup(name: &str) -> Option<Ident> {
    TABLE.read().lookup(name)
  }

  pub fn as_str(self) -> &'static str {
    // Idents are only minted by the table, so the slot always exists.
    TABLE.read().names[self.0 as usize]
  }
}

impl From<&str> for Ident {
  fn from(name: &str) -> Self {
    intern(name)
  }
}

impl fmt::Debug for Ident {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Ident").field(&self.as_str()).finish()
  }
}

impl fmt::Display for Ident {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
