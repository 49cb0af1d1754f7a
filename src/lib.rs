//! safeinteract - resilient UI interaction
//!
//! Wraps UI elements in transparent proxies whose capability calls run
//! through a configurable interactor: recover from "not actionable"
//! failures with one corrective interaction, retry flaky actions with
//! bounded backoff, and record telemetry, while callers keep using the
//! element's own capability traits.

pub mod cli;
pub mod config;
pub mod errors;
pub mod interactor;
pub mod logging;
pub mod proxy;
pub mod simulation;
pub mod telemetry;

pub use errors::{InteractError, Result};
pub use interactor::{DirectInteractor, Interactor, InteractorRegistry, RecoveryInteractor};
pub use proxy::{CapabilitySet, Described, DispatchProxy};
