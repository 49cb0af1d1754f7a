//! Transparent dispatch proxy
//!
//! A proxy stands in for a target under one or more capabilities. Every
//! capability method called on it is routed through the proxy's interactor
//! with the proxy's context. The target's own methods and results come
//! back unchanged, and so do its failures.

use crate::errors::{InteractError, Result};
use crate::interactor::Interactor;
use crate::proxy::capability::{CapabilitySet, Described, TypeDescriptor};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Identity of one capability method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId {
    /// Path of the declaring capability
    pub capability: &'static str,

    /// Method name
    pub method: &'static str,
}

impl MethodId {
    /// Create method id
    pub fn new(capability: &'static TypeDescriptor, method: &'static str) -> Self {
        Self {
            capability: capability.path,
            method,
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.capability, self.method)
    }
}

/// Methods reachable through a proxy, resolved once at construction
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    methods: HashMap<MethodId, &'static TypeDescriptor>,
}

impl DispatchTable {
    /// Index every method declared by the capabilities in `set`
    pub fn build(set: &CapabilitySet) -> Self {
        let methods = set
            .iter()
            .flat_map(|capability| {
                capability
                    .methods
                    .iter()
                    .map(move |method| (MethodId::new(capability, *method), capability))
            })
            .collect();

        Self { methods }
    }

    /// Look up the capability declaring `method`
    pub fn resolve(
        &self,
        capability: &'static TypeDescriptor,
        method: &'static str,
    ) -> Option<&'static TypeDescriptor> {
        self.methods.get(&MethodId::new(capability, method)).copied()
    }

    /// Number of routable methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if no methods are routable
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Stand-in for `target` that routes capability calls through `interactor`.
///
/// Capability traits declared with `capability!` are implemented for
/// `DispatchProxy` automatically, so a proxy can be used wherever the
/// target's capabilities are expected. The capability set and the dispatch
/// table are immutable once the proxy exists; the proxy can be shared
/// across threads when its parts can.
pub struct DispatchProxy<T: ?Sized, C: ?Sized, I: ?Sized> {
    target: Arc<T>,
    context: Arc<C>,
    interactor: Arc<I>,
    capabilities: CapabilitySet,
    table: DispatchTable,
}

impl<T: ?Sized, C: ?Sized, I: ?Sized> DispatchProxy<T, C, I> {
    /// Proxy exposing capability `Cap` and everything it inherits
    pub fn for_capability<Cap>(target: Arc<T>, context: Arc<C>, interactor: Arc<I>) -> Result<Self>
    where
        Cap: ?Sized + Described,
    {
        let capabilities = CapabilitySet::of_capability(Cap::DESCRIPTOR)?;
        Ok(Self::assemble(target, context, interactor, capabilities))
    }

    /// Proxy exposing every capability the target's type implements
    pub fn from_implementation(target: Arc<T>, context: Arc<C>, interactor: Arc<I>) -> Result<Self>
    where
        T: Described,
    {
        let capabilities = CapabilitySet::of_implementation(T::DESCRIPTOR)?;
        Ok(Self::assemble(target, context, interactor, capabilities))
    }

    /// Proxy exposing an explicit list of capabilities
    pub fn with_capabilities(
        target: Arc<T>,
        context: Arc<C>,
        interactor: Arc<I>,
        capabilities: &[&'static TypeDescriptor],
    ) -> Result<Self> {
        let capabilities = CapabilitySet::explicit(capabilities)?;
        Ok(Self::assemble(target, context, interactor, capabilities))
    }

    fn assemble(
        target: Arc<T>,
        context: Arc<C>,
        interactor: Arc<I>,
        capabilities: CapabilitySet,
    ) -> Self {
        let table = DispatchTable::build(&capabilities);
        trace!(
            owner = capabilities.owner(),
            capabilities = ?capabilities.names(),
            methods = table.len(),
            "dispatch proxy created"
        );

        Self {
            target,
            context,
            interactor,
            capabilities,
            table,
        }
    }

    /// Capabilities this proxy exposes
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Check whether capability `Cap` is exposed
    pub fn exposes<Cap: ?Sized + Described>(&self) -> bool {
        self.capabilities.includes::<Cap>()
    }

    /// Get the wrapped target
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// Get the interaction context
    pub fn context(&self) -> &Arc<C> {
        &self.context
    }

    /// Get the interactor
    pub fn interactor(&self) -> &Arc<I> {
        &self.interactor
    }

    /// Route one capability method call through the interactor.
    ///
    /// Called by the impls that `capability!` generates.
    #[doc(hidden)]
    pub fn dispatch<R, E, F>(
        &self,
        capability: &'static TypeDescriptor,
        method: &'static str,
        mut call: F,
    ) -> std::result::Result<R, E>
    where
        I: Interactor<C, E>,
        E: From<InteractError>,
        F: FnMut(&T) -> std::result::Result<R, E>,
    {
        if self.table.resolve(capability, method).is_none() {
            return Err(InteractError::CapabilityNotExposed {
                capability: capability.name.to_string(),
                method: method.to_string(),
            }
            .into());
        }

        trace!(capability = capability.name, method, "dispatching through interactor");
        let target = &*self.target;
        <I as Interactor<C, E>>::interact(&*self.interactor, &*self.context, || call(target))
    }
}

impl<T: ?Sized, C: ?Sized, I: ?Sized> Clone for DispatchProxy<T, C, I> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            context: Arc::clone(&self.context),
            interactor: Arc::clone(&self.interactor),
            capabilities: self.capabilities.clone(),
            table: self.table.clone(),
        }
    }
}

impl<T: ?Sized, C: ?Sized, I: ?Sized> fmt::Debug for DispatchProxy<T, C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchProxy")
            .field("capabilities", &self.capabilities.names())
            .field("methods", &self.table.len())
            .finish_non_exhaustive()
    }
}
