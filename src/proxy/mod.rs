//! Transparent dispatch proxy
//!
//! Wraps a target so that every call made through one of its capabilities
//! is executed by an interactor. Capabilities are discovered once, when the
//! proxy is built, from static descriptors produced by `capability!` and
//! `concrete!`.

pub mod capability;
pub mod dispatch;
mod macros;

pub use capability::{descriptor_of, CapabilitySet, Described, TypeDescriptor, TypeKind};
pub use dispatch::{DispatchProxy, DispatchTable, MethodId};
