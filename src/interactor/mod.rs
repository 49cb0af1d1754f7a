//! Interactor contract and composition
//!
//! An interactor decides how a deferred action is executed against an
//! interaction context: directly, retried, recovered, or observed.
//! Policies are stateless; every piece of per-call state lives on the stack
//! of a single `interact` call.

pub mod observed;
pub mod recovery;
pub mod registry;
pub mod retry;
pub mod stack;

use crate::errors::InteractError;
use std::sync::Arc;

pub use observed::ObservedInteractor;
pub use recovery::{Corrective, FailureClass, RecoveryInteractor, ScrollIntoView};
pub use registry::InteractorRegistry;
pub use retry::{RetryInteractor, RetryPolicy};
pub use stack::build_interactor;

/// Executes an action against an interaction context.
///
/// `action` may be invoked more than once by retrying policies, so callers
/// must supply actions that are safe to repeat.
pub trait Interactor<C: ?Sized, E> {
    /// Run `action` under this policy and return the accepted result.
    fn interact<R, F>(&self, context: &C, action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>;
}

impl<C: ?Sized, E, I: Interactor<C, E> + ?Sized> Interactor<C, E> for &I {
    fn interact<R, F>(&self, context: &C, action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        (**self).interact(context, action)
    }
}

impl<C: ?Sized, E, I: Interactor<C, E> + ?Sized> Interactor<C, E> for Box<I> {
    fn interact<R, F>(&self, context: &C, action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        (**self).interact(context, action)
    }
}

impl<C: ?Sized, E, I: Interactor<C, E> + ?Sized> Interactor<C, E> for Arc<I> {
    fn interact<R, F>(&self, context: &C, action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        (**self).interact(context, action)
    }
}

/// Runs the action exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectInteractor;

impl<C: ?Sized, E> Interactor<C, E> for DirectInteractor {
    fn interact<R, F>(&self, _context: &C, mut action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        action()
    }
}

/// Two interactors nested: `outer` sees every run of `inner` as one action.
#[derive(Debug, Clone)]
pub struct Chain<O, N> {
    outer: O,
    inner: N,
}

impl<O, N> Chain<O, N> {
    /// Create a chain where `outer` wraps `inner`
    pub fn new(outer: O, inner: N) -> Self {
        Self { outer, inner }
    }

    /// Get the outer interactor
    pub fn outer(&self) -> &O {
        &self.outer
    }

    /// Get the inner interactor
    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<C, E, O, N> Interactor<C, E> for Chain<O, N>
where
    C: ?Sized,
    O: Interactor<C, E>,
    N: Interactor<C, E>,
{
    fn interact<R, F>(&self, context: &C, mut action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        self.outer
            .interact(context, || self.inner.interact(context, &mut action))
    }
}

/// Composition helpers available on every interactor
pub trait InteractorExt: Sized {
    /// Wrap `inner` so that `self` runs outermost
    fn around<N>(self, inner: N) -> Chain<Self, N> {
        Chain::new(self, inner)
    }
}

impl<T: Sized> InteractorExt for T {}

/// Object-safe form of [`Interactor`].
///
/// The action's value is carried out of band, which lets differently typed
/// calls share one `Arc<dyn DynInteractor<C, E>>`.
pub trait DynInteractor<C: ?Sized, E>: Send + Sync {
    /// Run an erased action under this policy
    fn interact_dyn(
        &self,
        context: &C,
        action: &mut dyn FnMut() -> Result<(), E>,
    ) -> Result<(), E>;
}

impl<C, E, I> DynInteractor<C, E> for I
where
    C: ?Sized,
    I: Interactor<C, E> + Send + Sync,
{
    fn interact_dyn(
        &self,
        context: &C,
        action: &mut dyn FnMut() -> Result<(), E>,
    ) -> Result<(), E> {
        self.interact(context, action)
    }
}

impl<'a, C, E> Interactor<C, E> for dyn DynInteractor<C, E> + 'a
where
    C: ?Sized,
    E: From<InteractError>,
{
    fn interact<R, F>(&self, context: &C, mut action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        let mut produced = None;
        self.interact_dyn(context, &mut || {
            produced = Some(action()?);
            Ok(())
        })?;
        produced.ok_or_else(|| InteractError::MissingActionResult.into())
    }
}
