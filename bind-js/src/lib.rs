//! Symbolic member addressing and call marshaling for opaque JavaScript object bindings.
//!
//! A binding type never holds a live object. It holds a [`Proxy`]: an opaque, tagged [`Value`]
//! that some [`HostRuntime`] understands. Members (properties and methods) are declared once in a
//! [`MemberTable`] as a chain of interned names, either rooted at the ambient global object or at
//! the receiver, and are resolved against a proxy on demand. The same table can be exported as a
//! [`BindingManifest`] for tooling that rewrites member accesses into native JS.
//!
//! The runtime surface is kept abstract via [`HostRuntime`]; [`sim::SimRuntime`] is a small
//! in-process object model implementing it for host-side tests.

pub mod args;
pub mod dom;
pub mod error;
pub mod generic;
pub mod ident;
pub mod limits;
pub mod manifest;
pub mod member;
pub mod proxy;
pub mod runtime;
pub mod sim;

pub use args::{Absent, ArgumentList, ArgumentsBuilder, ToArg};
pub use error::{BindError, BindLimit, BindResult};
pub use generic::{ElementBinding, ElementWrapper};
pub use ident::{intern, Ident};
pub use limits::BindingLimits;
pub use manifest::{BindingManifest, MemberDescriptor, OwnerDescriptor};
pub use member::{Address, MemberId, MemberNode, MemberTable, Owner};
pub use proxy::{Invoked, Opaque, Proxy, ReturnType, TypeTag};
pub use runtime::{ErrorCode, Handle, HostRuntime, RuntimeFault, Value};
