use std::error::Error;

use crate::{
  member::MemberId,
  proxy::TypeTag,
  runtime::{ErrorCode, RuntimeFault},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindLimit {
  QualifierDepth,
  Arguments,
}

/// Errors surfaced by member resolution and invocation.
///
/// Nothing here is retried or recovered from locally; every failure goes straight back to the
/// caller.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
  /// A qualifier chain could not be evaluated, e.g. an intermediate member is not an object.
  #[error("cannot resolve `{address}`: {reason}")]
  AddressResolution {
    address: String,
    reason: &'static str,
  },

  /// The runtime rejected a property access or call.
  #[error("runtime rejected `{address}` with {code}: {source}")]
  RuntimeOperation {
    address: String,
    code: ErrorCode,
    source: Box<dyn Error + Send + Sync + 'static>,
  },

  /// A member id that does not belong to the table it was used with.
  #[error("unknown member {0:?}")]
  UnknownMember(MemberId),

  /// Indexed element access on a proxy that has no element binding.
  #[error("`{tag}` is not parameterized over an element type")]
  NotParameterized { tag: TypeTag },

  #[error("binding limit exceeded ({limit:?}): got {got}, max {max}")]
  LimitExceeded {
    limit: BindLimit,
    got: usize,
    max: usize,
  },
}

pub type BindResult<T> = Result<T, BindError>;

impl BindError {
  pub(crate) fn runtime<E: RuntimeFault>(address: impl Into<String>, e: E) -> Self {
    let address = address.into();
    let code = e.code();
    tracing::debug!(target: "bind_js::proxy", %address, %code, error = %e, "runtime operation failed");
    Self::RuntimeOperation {
      address,
      code,
      source: Box::new(e),
    }
  }

  pub(crate) fn unresolvable(address: impl Into<String>, reason: &'static str) -> Self {
    Self::AddressResolution {
      address: address.into(),
      reason,
    }
  }

  pub(crate) fn limit_exceeded(limit: BindLimit, got: usize, max: usize) -> Self {
    Self::LimitExceeded { limit, got, max }
  }

  /// The runtime-reported code, for [`BindError::RuntimeOperation`].
  pub fn code(&self) -> Option<ErrorCode> {
    match self {
      BindError::RuntimeOperation { code, .. } => Some(*code),
      _ => None,
    }
  }
}
