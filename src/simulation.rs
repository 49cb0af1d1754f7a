//! Scripted flaky UI element
//!
//! A simulated element that is off-screen for a number of action runs, can
//! be detached for good, and can refuse to scroll. Driving it through a
//! configured proxy shows how the interactor stack treats each failure.

use crate::config::Config;
use crate::errors::{InteractError, Result};
use crate::interactor::{build_interactor, InteractorRegistry, ScrollIntoView};
use crate::telemetry::{TelemetryCollector, TelemetryStats};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::info;

/// Failures of the simulated element
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatedError {
    /// Element exists but is outside the visible area
    #[error("Element '{0}' is not displayed")]
    NotDisplayed(String),

    /// Element is gone from the page
    #[error("Element '{0}' is detached from the page")]
    Detached(String),

    /// The scroll interaction itself failed
    #[error("Could not scroll '{0}' into view")]
    ScrollFailed(String),

    /// Raised by the proxy machinery
    #[error("{0}")]
    Interact(String),
}

impl SimulatedError {
    /// Only visibility problems are worth a corrective scroll
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimulatedError::NotDisplayed(_))
    }
}

impl From<InteractError> for SimulatedError {
    fn from(err: InteractError) -> Self {
        SimulatedError::Interact(err.to_string())
    }
}

crate::capability! {
    /// Anything rendered on the page
    pub trait Element {
        fn describe(&self) -> Result<String, SimulatedError>;
    }
}

crate::capability! {
    /// Elements accepting clicks
    pub trait Clickable: Element {
        /// Click and return the total click count
        fn click(&self) -> Result<u32, SimulatedError>;
    }
}

crate::capability! {
    /// Elements accepting typed text
    pub trait TextField: Element {
        fn type_text(&self, text: &str) -> Result<(), SimulatedError>;
        fn text(&self) -> Result<String, SimulatedError>;
    }
}

/// Failure script for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Action runs that fail with "not displayed" before the element shows up
    pub hidden_calls: u32,

    /// Every action run fails with "detached"
    pub fatal: bool,

    /// Scrolling into view always fails
    pub corrective_fails: bool,

    /// Number of clicks to perform
    pub calls: u32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            hidden_calls: 1,
            fatal: false,
            corrective_fails: false,
            calls: 1,
        }
    }
}

#[derive(Debug, Default)]
struct ElementState {
    hidden_remaining: u32,
    runs: u32,
    scrolls: u32,
    clicks: u32,
    text: String,
}

/// Button-like text input driven by a [`Scenario`]
#[derive(Debug)]
pub struct SimulatedElement {
    name: String,
    fatal: bool,
    corrective_fails: bool,
    state: Mutex<ElementState>,
}

impl SimulatedElement {
    /// Create element following `scenario`
    pub fn new(name: impl Into<String>, scenario: &Scenario) -> Self {
        Self {
            name: name.into(),
            fatal: scenario.fatal,
            corrective_fails: scenario.corrective_fails,
            state: Mutex::new(ElementState {
                hidden_remaining: scenario.hidden_calls,
                ..ElementState::default()
            }),
        }
    }

    /// Action runs attempted against this element
    pub fn runs(&self) -> u32 {
        self.state().runs
    }

    /// Scroll interactions performed
    pub fn scrolls(&self) -> u32 {
        self.state().scrolls
    }

    fn state(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gate every mutating action on the scripted failures
    fn actionable(&self, state: &mut ElementState) -> std::result::Result<(), SimulatedError> {
        state.runs += 1;
        if self.fatal {
            return Err(SimulatedError::Detached(self.name.clone()));
        }
        if state.hidden_remaining > 0 {
            state.hidden_remaining -= 1;
            return Err(SimulatedError::NotDisplayed(self.name.clone()));
        }
        Ok(())
    }
}

impl Element for SimulatedElement {
    fn describe(&self) -> std::result::Result<String, SimulatedError> {
        Ok(format!("<{}>", self.name))
    }
}

impl Clickable for SimulatedElement {
    fn click(&self) -> std::result::Result<u32, SimulatedError> {
        let mut state = self.state();
        self.actionable(&mut state)?;
        state.clicks += 1;
        Ok(state.clicks)
    }
}

impl TextField for SimulatedElement {
    fn type_text(&self, text: &str) -> std::result::Result<(), SimulatedError> {
        let mut state = self.state();
        self.actionable(&mut state)?;
        state.text.push_str(text);
        Ok(())
    }

    fn text(&self) -> std::result::Result<String, SimulatedError> {
        Ok(self.state().text.clone())
    }
}

impl ScrollIntoView for SimulatedElement {
    type Error = SimulatedError;

    fn scroll_into_view(&self) -> std::result::Result<(), SimulatedError> {
        self.state().scrolls += 1;
        if self.corrective_fails {
            Err(SimulatedError::ScrollFailed(self.name.clone()))
        } else {
            Ok(())
        }
    }
}

crate::concrete!(SimulatedElement: dyn Clickable, dyn TextField);

/// Outcome of one click
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutcome {
    pub call: u32,
    pub success: bool,
    pub clicks: Option<u32>,
    pub error: Option<String>,
}

/// Everything observed during a simulation run
#[derive(Serialize)]
pub struct SimulationReport {
    pub scenario: Scenario,
    pub capabilities: Vec<String>,
    pub calls: Vec<CallOutcome>,
    pub action_runs: u32,
    pub scrolls: u32,
    pub stats: Option<TelemetryStats>,

    #[serde(skip)]
    pub collector: Option<TelemetryCollector>,
}

impl SimulationReport {
    /// Number of successful clicks
    pub fn succeeded(&self) -> usize {
        self.calls.iter().filter(|outcome| outcome.success).count()
    }
}

/// Click the scripted element `scenario.calls` times through a configured proxy
pub fn run_simulation(config: &Config, scenario: &Scenario) -> Result<SimulationReport> {
    let collector = config
        .telemetry
        .enabled
        .then(|| TelemetryCollector::with_capacity(config.telemetry.recent_events));
    let element = Arc::new(SimulatedElement::new("submit", scenario));

    let mut registry = InteractorRegistry::<SimulatedError>::new();
    registry.register_shared::<SimulatedElement>(build_interactor(
        config,
        SimulatedError::is_recoverable,
        <SimulatedElement as ScrollIntoView>::scroll_into_view,
        collector.clone(),
        "click",
    ));

    let proxy = registry
        .proxy_from_implementation::<SimulatedElement, SimulatedElement>(
            Arc::clone(&element),
            Arc::clone(&element),
        )?;
    info!(capabilities = ?proxy.capabilities().names(), "simulated element proxied");

    let calls = (1..=scenario.calls)
        .map(|call| match proxy.click() {
            Ok(clicks) => CallOutcome {
                call,
                success: true,
                clicks: Some(clicks),
                error: None,
            },
            Err(err) => CallOutcome {
                call,
                success: false,
                clicks: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    Ok(SimulationReport {
        scenario: *scenario,
        capabilities: proxy
            .capabilities()
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
        calls,
        action_runs: element.runs(),
        scrolls: element.scrolls(),
        stats: collector.as_ref().map(TelemetryCollector::get_stats),
        collector,
    })
}
