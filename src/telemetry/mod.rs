//! Telemetry system for safeinteract
//!
//! Collects interaction events and derived statistics, and renders a
//! terminal summary. Only outcome kinds, attempt counts and timings are
//! recorded; results and failure values never enter the collector.

use colored::Colorize;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    /// An interaction entered the pipeline
    InteractionStarted {
        label: String,
        timestamp: Instant,
    },

    /// One run of the action failed
    AttemptFailed {
        label: String,
        attempt: u32,
        timestamp: Instant,
    },

    /// An interaction left the pipeline
    InteractionCompleted {
        label: String,
        attempts: u32,
        success: bool,
        duration_ms: u64,
        timestamp: Instant,
    },
}

impl TelemetryEvent {
    /// Label of the interaction this event belongs to
    pub fn label(&self) -> &str {
        match self {
            TelemetryEvent::InteractionStarted { label, .. }
            | TelemetryEvent::AttemptFailed { label, .. }
            | TelemetryEvent::InteractionCompleted { label, .. } => label,
        }
    }
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelemetryStats {
    pub interactions: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub attempts: usize,
    pub failed_attempts: usize,
    /// Succeeded only after at least one failed attempt
    pub recovered: usize,
    pub total_duration_ms: u64,
}

/// Events kept by a collector created with `new`
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Telemetry collector
///
/// Stats are running totals over every event. Only the newest `capacity`
/// events are retained.
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    capacity: usize,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a collector retaining at most `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            capacity,
            start_time: Instant::now(),
        }
    }

    /// Maximum number of retained events
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
            match &event {
                TelemetryEvent::InteractionStarted { .. } => {
                    stats.interactions += 1;
                }
                TelemetryEvent::AttemptFailed { .. } => {
                    stats.failed_attempts += 1;
                }
                TelemetryEvent::InteractionCompleted {
                    attempts,
                    success,
                    duration_ms,
                    ..
                } => {
                    stats.attempts += *attempts as usize;
                    stats.total_duration_ms += duration_ms;
                    if *success {
                        stats.succeeded += 1;
                        if *attempts > 1 {
                            stats.recovered += 1;
                        }
                    } else {
                        stats.failed += 1;
                    }
                }
            }
        }

        if self.capacity == 0 {
            return;
        }

        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get retained event count
    pub fn event_count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }

    /// Calculate interaction success rate
    pub fn success_rate(&self) -> f64 {
        let stats = self.get_stats();
        let total = stats.succeeded + stats.failed;
        if total == 0 {
            1.0
        } else {
            stats.succeeded as f64 / total as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal summary of a collector
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    recent_events: usize,
}

impl TelemetryDisplay {
    /// Create a new display
    pub fn new(collector: TelemetryCollector, recent_events: usize) -> Self {
        Self {
            collector,
            recent_events,
        }
    }

    /// Render summary statistics
    pub fn render_summary(&self) -> String {
        let stats = self.collector.get_stats();
        let rate = self.collector.success_rate() * 100.0;
        let rate_text = format!("{:.1}%", rate);
        let rate_text = if stats.failed == 0 {
            rate_text.as_str().green()
        } else {
            rate_text.as_str().yellow()
        };

        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "Interaction Summary".bold()));
        out.push_str("─────────────────────────────────────\n");
        out.push_str(&format!("Duration:          {:?}\n", self.collector.elapsed()));
        out.push_str(&format!("Interactions:      {}\n", stats.interactions));
        out.push_str(&format!("Success rate:      {}\n", rate_text));
        out.push_str(&format!("Attempts:          {}\n", stats.attempts));
        out.push_str(&format!("Failed attempts:   {}\n", stats.failed_attempts));
        out.push_str(&format!("Recovered:         {}\n", stats.recovered));

        let recent = self.collector.recent_events(self.recent_events);
        if !recent.is_empty() {
            out.push_str(&format!("\n{}\n", "Recent events".bold()));
            for event in recent {
                out.push_str(&format!("  {}\n", describe(&event)));
            }
        }
        out
    }

    /// Print summary statistics
    pub fn display_summary(&self) {
        println!("{}", self.render_summary());
    }
}

fn describe(event: &TelemetryEvent) -> String {
    match event {
        TelemetryEvent::InteractionStarted { label, .. } => format!("{} started", label),
        TelemetryEvent::AttemptFailed { label, attempt, .. } => {
            format!("{} attempt {} {}", label, attempt, "failed".red())
        }
        TelemetryEvent::InteractionCompleted {
            label,
            attempts,
            success,
            duration_ms,
            ..
        } => {
            let outcome = if *success { "ok".green() } else { "failed".red() };
            format!("{} {} after {} attempt(s) in {}ms", label, outcome, attempts, duration_ms)
        }
    }
}
