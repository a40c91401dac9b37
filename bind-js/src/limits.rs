use serde::{Deserialize, Serialize};

/// Resource limits for member declaration and invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingLimits {
  /// Maximum number of qualifiers above a member, e.g. `a.b.c` has depth 2.
  pub max_qualifier_depth: usize,
  /// Maximum number of positional arguments passed to a single call.
  pub max_arguments: usize,
}

impl Default for BindingLimits {
  fn default() -> Self {
    Self {
      max_qualifier_depth: 64,
      max_arguments: 255,
    }
  }
}
