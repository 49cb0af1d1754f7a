//! Retry-with-corrective-action policy
//!
//! Attempt the action; on a recoverable failure run one corrective
//! sub-interaction against the same context and retry exactly once.
//! When recovery does not work out, the first failure is what the caller
//! sees. Secondary failures are logged and dropped.

use crate::interactor::Interactor;
use std::fmt;
use tracing::debug;

/// How a failure is treated by the recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Matches the configured recoverable kind; triggers recovery
    Recoverable,

    /// Any other failure of the primary action; propagated immediately
    Unrecoverable,

    /// Failure of the corrective step or of the retried action
    RecoveryAttempt,
}

impl FailureClass {
    /// Get class name
    pub fn name(&self) -> &'static str {
        match self {
            FailureClass::Recoverable => "recoverable",
            FailureClass::Unrecoverable => "unrecoverable",
            FailureClass::RecoveryAttempt => "recovery_attempt",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Corrective sub-interaction performed against a context
pub trait Corrective<C: ?Sized, E> {
    /// Try to bring the context into a state where the action can succeed
    fn correct(&self, context: &C) -> Result<(), E>;
}

impl<C, E, F> Corrective<C, E> for F
where
    C: ?Sized,
    F: Fn(&C) -> Result<(), E>,
{
    fn correct(&self, context: &C) -> Result<(), E> {
        self(context)
    }
}

/// Contexts that can scroll their element into the visible area
pub trait ScrollIntoView {
    /// Failure type of the scroll interaction
    type Error;

    /// Scroll the element into view
    fn scroll_into_view(&self) -> Result<(), Self::Error>;
}

/// Corrective step used by [`RecoveryInteractor::autoscroll`]
pub type ScrollCorrective<C, E> = fn(&C) -> Result<(), E>;

/// Recovery policy: one corrective sub-interaction, one retry.
///
/// `P` decides which failures are recoverable; `K` is the corrective step.
#[derive(Clone)]
pub struct RecoveryInteractor<P, K> {
    is_recoverable: P,
    corrective: K,
}

impl<P, K> RecoveryInteractor<P, K> {
    /// Create recovery policy from a predicate and a corrective step
    pub fn new(is_recoverable: P, corrective: K) -> Self {
        Self {
            is_recoverable,
            corrective,
        }
    }

    /// Classify a failure of the primary action
    pub fn classify<E>(&self, error: &E) -> FailureClass
    where
        P: Fn(&E) -> bool,
    {
        if (self.is_recoverable)(error) {
            FailureClass::Recoverable
        } else {
            FailureClass::Unrecoverable
        }
    }
}

impl<P> RecoveryInteractor<P, ()> {
    /// Recovery policy that scrolls the context into view before retrying
    pub fn autoscroll<C, E>(is_recoverable: P) -> RecoveryInteractor<P, ScrollCorrective<C, E>>
    where
        C: ScrollIntoView<Error = E>,
        P: Fn(&E) -> bool,
    {
        RecoveryInteractor::new(is_recoverable, C::scroll_into_view as ScrollCorrective<C, E>)
    }
}

impl<P, K> fmt::Debug for RecoveryInteractor<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryInteractor").finish_non_exhaustive()
    }
}

/// Policy progress within one `interact` call
enum Phase<R, E> {
    Attempting,
    Recovering { original: E },
    Done(Result<R, E>),
}

impl<C, E, P, K> Interactor<C, E> for RecoveryInteractor<P, K>
where
    C: ?Sized,
    E: fmt::Debug,
    P: Fn(&E) -> bool,
    K: Corrective<C, E>,
{
    fn interact<R, F>(&self, context: &C, mut action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        let mut phase = Phase::Attempting;

        loop {
            phase = match phase {
                Phase::Attempting => match action() {
                    Ok(value) => Phase::Done(Ok(value)),
                    Err(error) => match self.classify(&error) {
                        FailureClass::Recoverable => {
                            debug!(error = ?error, "recoverable failure, running corrective interaction");
                            Phase::Recovering { original: error }
                        }
                        _ => Phase::Done(Err(error)),
                    },
                },
                Phase::Recovering { original } => {
                    let retried = self.corrective.correct(context).and_then(|()| action());
                    match retried {
                        Ok(value) => {
                            debug!("action succeeded after recovery");
                            Phase::Done(Ok(value))
                        }
                        Err(secondary) => {
                            debug!(
                                class = %FailureClass::RecoveryAttempt,
                                error = ?secondary,
                                "recovery failed, surfacing original failure"
                            );
                            Phase::Done(Err(original))
                        }
                    }
                }
                Phase::Done(outcome) => return outcome,
            };
        }
    }
}
