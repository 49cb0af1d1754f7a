//! Telemetry decorator for interactors

use crate::interactor::Interactor;
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use std::time::Instant;

/// Records started/attempt/completed events around an inner interactor
#[derive(Clone)]
pub struct ObservedInteractor<I> {
    inner: I,
    collector: TelemetryCollector,
    label: String,
}

impl<I> ObservedInteractor<I> {
    /// Observe `inner`, tagging events with `label`
    pub fn new(inner: I, collector: TelemetryCollector, label: impl Into<String>) -> Self {
        Self {
            inner,
            collector,
            label: label.into(),
        }
    }

    /// Get collector
    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }
}

impl<C, E, I> Interactor<C, E> for ObservedInteractor<I>
where
    C: ?Sized,
    I: Interactor<C, E>,
{
    fn interact<R, F>(&self, context: &C, mut action: F) -> Result<R, E>
    where
        F: FnMut() -> Result<R, E>,
    {
        let started = Instant::now();
        self.collector.record(TelemetryEvent::InteractionStarted {
            label: self.label.clone(),
            timestamp: started,
        });

        let mut attempts = 0u32;
        let outcome = self.inner.interact(context, || {
            attempts += 1;
            let result = action();
            if result.is_err() {
                self.collector.record(TelemetryEvent::AttemptFailed {
                    label: self.label.clone(),
                    attempt: attempts,
                    timestamp: Instant::now(),
                });
            }
            result
        });

        self.collector.record(TelemetryEvent::InteractionCompleted {
            label: self.label.clone(),
            attempts,
            success: outcome.is_ok(),
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Instant::now(),
        });

        outcome
    }
}
