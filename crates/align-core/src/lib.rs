//! # Align Core
//!
//! Session facade for the value-alignment demo. Loads the manifest once,
//! picks a resolution strategy and answers decision queries.
//!
//! ## Strategies
//!
//! | Strategy | Backing | On load failure |
//! |----------|---------|-----------------|
//! | `manifest` | nearest experiment | every query fails with [`CoreError::Load`] |
//! | `rule_table` | embedded table | never loads |
//! | `auto` | nearest experiment | unreadable file: rule table; malformed: [`CoreError::Load`] |
//!
//! ## Architecture
//!
//! ```text
//!  EngineConfig ──▶ AlignService::start
//!                        │
//!                        │ spawn
//!                        ▼
//!               ┌─────────────────┐
//!               │ manifest loader │
//!               └────────┬────────┘
//!                        │ settles once
//!                        ▼
//!               ┌─────────────────┐   wait()     decide / compare
//!               │   ReadyGate     │◀────────────  (queue)
//!               │                 │◀────────────  try_decide
//!               └─────────────────┘   try_get()  (fail fast)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use align_core::{AlignService, Decider, EngineConfig};
//!
//! # async fn run() -> align_core::Result<()> {
//! let service = AlignService::start(EngineConfig::default());
//! let baseline = service
//!     .decide("exposed-casualty", Decider::Baseline, None)
//!     .await?;
//! println!("{}", baseline);
//! # Ok(())
//! # }
//! ```

mod comparison;
mod config;
mod error;
mod gate;
mod service;

pub use comparison::DecisionComparison;
pub use config::{EngineConfig, GlobalConfig, ManifestConfig, ResolverConfig, Strategy};
pub use error::CoreError;
pub use gate::{GateSignal, ReadyGate};
pub use service::{AlignService, SharedResolver};

// Re-export the types every caller needs
pub use align_engine::{
    Decider, DecisionResult, ManifestResolver, ResolveError, Resolver, RuleTableResolver,
};
pub use align_manifest::{Catalog, Level, ManifestSource, Preset, Scenario, ValueProfile};

/// Core result type for facade operations.
pub type Result<T> = std::result::Result<T, CoreError>;
