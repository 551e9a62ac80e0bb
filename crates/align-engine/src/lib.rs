//! # Align Engine
//!
//! Decision resolution for the value-alignment demo. Given a scenario, a
//! decider (`baseline` or `aligned`) and a value profile, return the
//! decision, its justification and the choice identifier actually
//! selected.
//!
//! ## Strategies
//!
//! Two strategies sit behind one [`Resolver`] trait and are chosen at
//! construction time:
//!
//! | Strategy | Type | Data |
//! |----------|------|------|
//! | Nearest experiment | [`ManifestResolver`] | precomputed experiments from the manifest |
//! | Rule table | [`RuleTableResolver`] | embedded threshold table |
//!
//! ## Architecture
//!
//! ```text
//!   scenario, decider, profile
//!              │
//!              ▼
//!     ┌─────────────────┐
//!     │  dyn Resolver   │
//!     └────────┬────────┘
//!        ┌─────┴──────────────────┐
//!        ▼                        ▼
//! ┌──────────────┐        ┌──────────────┐
//! │ level encoder│        │  rule table  │
//! │      +       │        │ (flip at     │
//! │ nearest match│        │   "high")    │
//! └──────┬───────┘        └──────┬───────┘
//!        └──────────┬────────────┘
//!                   ▼
//!           DecisionResult
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use align_engine::{Decider, Resolver, RuleTableResolver};
//! use align_manifest::ValueProfile;
//!
//! let resolver = RuleTableResolver::builtin();
//! let profile = ValueProfile::new().with("personal_safety", "high");
//!
//! let result = resolver
//!     .decide("exposed-casualty", Decider::Aligned, Some(&profile))
//!     .unwrap();
//! assert_eq!(result.choice_id.as_deref(), Some("wait-in-cover"));
//! ```
//!
//! ## Notes
//!
//! - Resolution is pure and synchronous; there is no shared mutable state.
//! - "No data" is the not-found [`DecisionResult`], never an error.
//! - Usage errors ([`ResolveError`]) fail fast.

mod builtin;
pub mod error;
pub mod level;
pub mod matcher;
pub mod resolver;
pub mod result;
pub mod rules;

pub use error::ResolveError;
pub use level::{level_to_numeric, profile_target};
pub use matcher::{nearest_experiment, ManifestResolver, Match};
pub use resolver::Resolver;
pub use result::{Decider, DecisionResult, NOT_FOUND_DECISION};
pub use rules::{LevelTexts, RuleEntry, RuleTableResolver};

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
