//! Integration tests for safeinteract
//!
//! Exercises the registry, configured stacks, telemetry and the scripted
//! simulation together.

use safeinteract::config::Config;
use safeinteract::interactor::{build_interactor, InteractorRegistry, ScrollIntoView};
use safeinteract::simulation::{
    run_simulation, Clickable, Scenario, SimulatedElement, SimulatedError, TextField,
};
use safeinteract::telemetry::{TelemetryCollector, TelemetryDisplay};
use safeinteract::InteractError;
use std::sync::Arc;

/// Web contexts get no recovery, element contexts get the configured stack
struct WebView;

fn registry(config: &Config, collector: &TelemetryCollector) -> InteractorRegistry<SimulatedError> {
    let mut registry = InteractorRegistry::new();
    registry.register_shared::<SimulatedElement>(build_interactor(
        config,
        SimulatedError::is_recoverable,
        <SimulatedElement as ScrollIntoView>::scroll_into_view,
        Some(collector.clone()),
        "element",
    ));
    registry.register::<WebView, _>(safeinteract::DirectInteractor);
    registry
}

#[test]
fn test_registry_backed_proxy_recovers() {
    let collector = TelemetryCollector::new();
    let registry = registry(&Config::default(), &collector);

    let element = Arc::new(SimulatedElement::new("login", &Scenario::default()));
    let proxy = registry
        .proxy_from_implementation::<SimulatedElement, SimulatedElement>(
            Arc::clone(&element),
            Arc::clone(&element),
        )
        .unwrap();

    assert_eq!(proxy.click(), Ok(1));
    proxy.type_text("user").unwrap();
    assert_eq!(proxy.text(), Ok("user".to_string()));
    assert_eq!(element.scrolls(), 1);

    let stats = collector.get_stats();
    assert_eq!(stats.interactions, 3);
    assert_eq!(stats.recovered, 1);
}

#[test]
fn test_context_selects_policy() {
    let collector = TelemetryCollector::new();
    let registry = registry(&Config::default(), &collector);

    // Same element, but governed by the web-view context's direct interactor
    let element = Arc::new(SimulatedElement::new("login", &Scenario::default()));
    let proxy = registry
        .proxy_for_capability::<dyn Clickable, SimulatedElement, WebView>(
            Arc::clone(&element),
            Arc::new(WebView),
        )
        .unwrap();

    assert!(matches!(proxy.click(), Err(SimulatedError::NotDisplayed(_))));
    assert_eq!(element.scrolls(), 0);
    assert_eq!(collector.event_count(), 0);
}

#[test]
fn test_unregistered_context() {
    struct Unknown;
    let registry = InteractorRegistry::<SimulatedError>::new();
    let element = Arc::new(SimulatedElement::new("x", &Scenario::default()));

    let result = registry.proxy_for_capability::<dyn Clickable, SimulatedElement, Unknown>(
        element,
        Arc::new(Unknown),
    );
    assert!(matches!(result, Err(InteractError::NoInteractor { .. })));
}

#[test]
fn test_retry_layer_outlasts_long_hiding() {
    let mut config = Config::default();
    config.retry.enabled = true;
    config.retry.base_delay_ms = 0;
    config.retry.jitter = false;

    let report = run_simulation(
        &config,
        &Scenario {
            hidden_calls: 5,
            ..Scenario::default()
        },
    )
    .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.action_runs, 6);
    assert_eq!(report.scrolls, 3);
}

#[test]
fn test_simulation_summary_renders() {
    colored::control::set_override(false);
    let report = run_simulation(
        &Config::default(),
        &Scenario {
            calls: 3,
            ..Scenario::default()
        },
    )
    .unwrap();

    assert_eq!(report.succeeded(), 3);
    let collector = report.collector.clone().unwrap();
    let summary = TelemetryDisplay::new(collector, 5).render_summary();
    assert!(summary.contains("Interactions:      3"));
    assert!(summary.contains("Recovered:         1"));
}
