//! Interactor stack assembly from configuration
//!
//! Layers, innermost first: recovery (or direct execution), flaky-safety
//! retry, telemetry. Each layer sees every run of the one below it as a
//! single action.

use crate::config::Config;
use crate::errors::InteractError;
use crate::interactor::registry::SharedInteractor;
use crate::interactor::{
    Chain, Corrective, DirectInteractor, ObservedInteractor, RecoveryInteractor, RetryInteractor,
};
use crate::telemetry::TelemetryCollector;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Build the configured interactor for context `C`.
///
/// `is_recoverable` selects failures handled by recovery and, when retry
/// is enabled, by the retry layer as well.
pub fn build_interactor<C, E, P, K>(
    config: &Config,
    is_recoverable: P,
    corrective: K,
    telemetry: Option<TelemetryCollector>,
    label: &str,
) -> SharedInteractor<C, E>
where
    C: ?Sized + 'static,
    E: fmt::Debug + From<InteractError> + 'static,
    P: Fn(&E) -> bool + Clone + Send + Sync + 'static,
    K: Corrective<C, E> + Send + Sync + 'static,
{
    debug!(
        recovery = config.recovery.enabled,
        retry = config.retry.enabled,
        telemetry = telemetry.is_some(),
        label,
        "building interactor stack"
    );

    let base: SharedInteractor<C, E> = if config.recovery.enabled {
        Arc::new(RecoveryInteractor::new(is_recoverable.clone(), corrective))
    } else {
        Arc::new(DirectInteractor)
    };

    let retried: SharedInteractor<C, E> = if config.retry.enabled {
        let retry = RetryInteractor::new(config.retry.policy(), is_recoverable);
        Arc::new(Chain::new(retry, base))
    } else {
        base
    };

    match telemetry {
        Some(collector) => Arc::new(ObservedInteractor::new(retried, collector, label)),
        None => retried,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactor::Interactor;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum UiError {
        Hidden,
        Gone,
        Internal(String),
    }

    impl From<InteractError> for UiError {
        fn from(err: InteractError) -> Self {
            UiError::Internal(err.to_string())
        }
    }

    fn hidden(err: &UiError) -> bool {
        *err == UiError::Hidden
    }

    fn no_op(_: &()) -> Result<(), UiError> {
        Ok(())
    }

    fn fail_times(limit: u32, calls: &AtomicU32) -> Result<u32, UiError> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= limit {
            Err(UiError::Hidden)
        } else {
            Ok(n)
        }
    }

    fn instant_retry(config: &mut Config) {
        config.retry.enabled = true;
        config.retry.base_delay_ms = 0;
        config.retry.jitter = false;
    }

    #[test]
    fn test_default_stack_recovers_once() {
        let interactor = build_interactor(&Config::default(), hidden, no_op, None, "click");
        let calls = AtomicU32::new(0);

        assert_eq!(interactor.interact(&(), || fail_times(1, &calls)), Ok(2));

        calls.store(0, Ordering::SeqCst);
        assert_eq!(interactor.interact(&(), || fail_times(2, &calls)), Err(UiError::Hidden));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_direct_stack_when_recovery_disabled() {
        let mut config = Config::default();
        config.recovery.enabled = false;
        let interactor = build_interactor(&config, hidden, no_op, None, "click");
        let calls = AtomicU32::new(0);

        assert_eq!(interactor.interact(&(), || fail_times(1, &calls)), Err(UiError::Hidden));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retry_wraps_recovery() {
        let mut config = Config::default();
        instant_retry(&mut config);
        config.retry.max_attempts = 3;
        let interactor = build_interactor(&config, hidden, no_op, None, "click");
        let calls = AtomicU32::new(0);

        // Three retry attempts, each a recovery pair of two runs
        assert_eq!(interactor.interact(&(), || fail_times(5, &calls)), Ok(6));

        calls.store(0, Ordering::SeqCst);
        assert_eq!(interactor.interact(&(), || fail_times(6, &calls)), Err(UiError::Hidden));
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_unrecoverable_passes_through_all_layers() {
        let mut config = Config::default();
        instant_retry(&mut config);
        let collector = TelemetryCollector::new();
        let interactor = build_interactor(&config, hidden, no_op, Some(collector.clone()), "assert");

        let result: Result<(), UiError> = interactor.interact(&(), || Err(UiError::Gone));
        assert_eq!(result, Err(UiError::Gone));

        let stats = collector.get_stats();
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_telemetry_layer_sees_every_run() {
        let collector = TelemetryCollector::new();
        let interactor =
            build_interactor(&Config::default(), hidden, no_op, Some(collector.clone()), "click");
        let calls = AtomicU32::new(0);

        assert_eq!(interactor.interact(&(), || fail_times(1, &calls)), Ok(2));
        let stats = collector.get_stats();
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.recovered, 1);
    }
}
