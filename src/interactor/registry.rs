//! Interactor registry keyed by interaction-context type
//!
//! Maps each context type to the interactor that governs it. Web-view and
//! native-view contexts, for instance, get independent policies. Lookup
//! happens once, when a proxy is built.

use crate::errors::{InteractError, Result};
use crate::interactor::{DynInteractor, Interactor};
use crate::proxy::{Described, DispatchProxy, TypeDescriptor};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Shared erased interactor for context `C`
pub type SharedInteractor<C, E> = Arc<dyn DynInteractor<C, E>>;

struct Entry {
    context: &'static str,
    interactor: Box<dyn Any + Send + Sync>,
}

/// Context type → interactor mapping for failures of type `E`
pub struct InteractorRegistry<E> {
    entries: HashMap<TypeId, Entry>,
    _error: PhantomData<fn() -> E>,
}

impl<E: 'static> InteractorRegistry<E> {
    /// Create empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            _error: PhantomData,
        }
    }

    /// Register the interactor for context type `C`, replacing any previous one
    pub fn register<C, I>(&mut self, interactor: I) -> &mut Self
    where
        C: ?Sized + 'static,
        I: Interactor<C, E> + Send + Sync + 'static,
    {
        let shared: SharedInteractor<C, E> = Arc::new(interactor);
        self.register_shared(shared)
    }

    /// Register an already erased interactor for context type `C`
    pub fn register_shared<C>(&mut self, interactor: SharedInteractor<C, E>) -> &mut Self
    where
        C: ?Sized + 'static,
    {
        self.entries.insert(
            TypeId::of::<C>(),
            Entry {
                context: type_name::<C>(),
                interactor: Box::new(interactor),
            },
        );
        self
    }

    /// Resolve the interactor for context type `C`
    pub fn resolve<C>(&self) -> Result<SharedInteractor<C, E>>
    where
        C: ?Sized + 'static,
    {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|entry| entry.interactor.downcast_ref::<SharedInteractor<C, E>>())
            .cloned()
            .ok_or_else(|| InteractError::NoInteractor {
                context: type_name::<C>().to_string(),
            })
    }

    /// Check whether context type `C` has an interactor
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<C>())
    }

    /// Registered context type names
    pub fn context_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|entry| entry.context).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered context types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a proxy exposing capability `Cap`, governed by `C`'s interactor
    pub fn proxy_for_capability<Cap, T, C>(
        &self,
        target: Arc<T>,
        context: Arc<C>,
    ) -> Result<DispatchProxy<T, C, dyn DynInteractor<C, E>>>
    where
        Cap: ?Sized + Described,
        T: ?Sized,
        C: ?Sized + 'static,
    {
        DispatchProxy::for_capability::<Cap>(target, context, self.resolve::<C>()?)
    }

    /// Build a proxy exposing every capability of `T`, governed by `C`'s interactor
    pub fn proxy_from_implementation<T, C>(
        &self,
        target: Arc<T>,
        context: Arc<C>,
    ) -> Result<DispatchProxy<T, C, dyn DynInteractor<C, E>>>
    where
        T: ?Sized + Described,
        C: ?Sized + 'static,
    {
        DispatchProxy::from_implementation(target, context, self.resolve::<C>()?)
    }

    /// Build a proxy over an explicit capability list, governed by `C`'s interactor
    pub fn proxy_with_capabilities<T, C>(
        &self,
        target: Arc<T>,
        context: Arc<C>,
        capabilities: &[&'static TypeDescriptor],
    ) -> Result<DispatchProxy<T, C, dyn DynInteractor<C, E>>>
    where
        T: ?Sized,
        C: ?Sized + 'static,
    {
        DispatchProxy::with_capabilities(target, context, self.resolve::<C>()?, capabilities)
    }
}

impl<E: 'static> Default for InteractorRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for InteractorRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contexts: Vec<_> = self.entries.values().map(|entry| entry.context).collect();
        f.debug_struct("InteractorRegistry")
            .field("contexts", &contexts)
            .finish()
    }
}
