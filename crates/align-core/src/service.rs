//! The decision facade.
//!
//! [`AlignService`] owns the configured strategy behind a [`ReadyGate`] and
//! is the single entry point the CLI (or any host) talks to.

use crate::{
    comparison::DecisionComparison,
    config::{EngineConfig, Strategy},
    gate::ReadyGate,
    Result,
};

use align_engine::{Decider, DecisionResult, ManifestResolver, Resolver, RuleTableResolver};
use align_manifest::{load, Catalog, Manifest, ManifestError, ManifestSource, ValueProfile};

use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared handle to whichever strategy backs the session.
pub type SharedResolver = Arc<dyn Resolver>;

/// Decision facade over a lazily loaded resolver.
///
/// The manifest is read once, in the background. Queries go through one of
/// two entry points:
///
/// - [`decide`](Self::decide) and [`compare`](Self::compare) wait for the
///   load, so a query issued early is answered exactly as if it had been
///   issued after the load.
/// - [`try_decide`](Self::try_decide) answers only if the load is done and
///   fails with [`CoreError::NotReady`](crate::CoreError::NotReady)
///   otherwise.
///
/// A failed load is reported to every waiter as the same
/// [`CoreError::Load`](crate::CoreError::Load); nothing answers with a
/// partial manifest.
///
/// # Example
///
/// ```rust,no_run
/// use align_core::{AlignService, Decider, EngineConfig};
/// use align_manifest::ValueProfile;
///
/// # async fn run() -> align_core::Result<()> {
/// let service = AlignService::start(EngineConfig::default());
/// let profile = ValueProfile::new().with("merit", "high");
///
/// let cmp = service.compare("shooter-vs-victim", &profile).await?;
/// println!("{}", cmp);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AlignService {
    /// Configuration.
    config: EngineConfig,

    /// Resolver, once the load settles.
    gate: ReadyGate<SharedResolver>,
}

impl AlignService {
    /// Starts a session reading the manifest at `config.manifest.path`.
    ///
    /// Returns immediately. For strategies that read the manifest the load
    /// runs on a spawned task, so this must be called inside a Tokio
    /// runtime.
    pub fn start(config: EngineConfig) -> Self {
        let source = ManifestSource::Path(config.manifest.path.clone());
        Self::start_with_source(config, source)
    }

    /// Starts a session reading the manifest from `source`.
    pub fn start_with_source(config: EngineConfig, source: ManifestSource) -> Self {
        let strategy = config.resolver.strategy;

        let gate = if strategy.needs_manifest() {
            let (signal, gate) = ReadyGate::pending();
            tokio::spawn(async move {
                signal.resolve(load_resolver(&source, strategy).await);
            });
            gate
        } else {
            info!("Using built-in rule table");
            ReadyGate::ready(Arc::new(RuleTableResolver::builtin()) as SharedResolver)
        };

        Self { config, gate }
    }

    /// Creates a ready session over an already parsed manifest.
    pub fn with_manifest(config: EngineConfig, manifest: Manifest) -> Self {
        Self::with_resolver(config, Arc::new(ManifestResolver::new(Arc::new(manifest))))
    }

    /// Creates a ready session over any resolver.
    pub fn with_resolver(config: EngineConfig, resolver: SharedResolver) -> Self {
        Self {
            config,
            gate: ReadyGate::ready(resolver),
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Waits for the load and returns the resolver.
    pub async fn ready(&self) -> Result<SharedResolver> {
        self.gate.wait().await
    }

    /// True once the resolver can answer without waiting.
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Waits for the load and returns the catalog the resolver offers.
    pub async fn catalog(&self) -> Result<Catalog> {
        Ok(self.ready().await?.catalog().clone())
    }

    /// Resolves one decision, waiting for the load if needed.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Load`](crate::CoreError::Load) if the manifest failed
    ///   to load
    /// - [`CoreError::Resolve`](crate::CoreError::Resolve) for an unknown
    ///   scenario or an aligned query without a profile
    pub async fn decide(
        &self,
        scenario_id: &str,
        decider: Decider,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        let resolver = self.ready().await?;
        self.resolve_with(resolver.as_ref(), scenario_id, decider, profile)
    }

    /// Resolves one decision by decider name, waiting for the load if needed.
    pub async fn decide_named(
        &self,
        scenario_id: &str,
        decider: &str,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        let decider: Decider = decider.parse()?;
        self.decide(scenario_id, decider, profile).await
    }

    /// Resolves one decision without waiting.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotReady`](crate::CoreError::NotReady) while the
    /// manifest is loading, otherwise as [`decide`](Self::decide).
    pub fn try_decide(
        &self,
        scenario_id: &str,
        decider: Decider,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        let resolver = self.gate.try_get()?;
        self.resolve_with(resolver.as_ref(), scenario_id, decider, profile)
    }

    /// Resolves baseline and aligned decisions for one scenario.
    pub async fn compare(
        &self,
        scenario_id: &str,
        profile: &ValueProfile,
    ) -> Result<DecisionComparison> {
        let resolver = self.ready().await?;
        let baseline = self.resolve_with(resolver.as_ref(), scenario_id, Decider::Baseline, None)?;
        let aligned =
            self.resolve_with(resolver.as_ref(), scenario_id, Decider::Aligned, Some(profile))?;

        let comparison = DecisionComparison::new(baseline, aligned);
        debug!("Comparison for '{}': {}", scenario_id, comparison.status());
        Ok(comparison)
    }

    fn resolve_with(
        &self,
        resolver: &dyn Resolver,
        scenario_id: &str,
        decider: Decider,
        profile: Option<&ValueProfile>,
    ) -> Result<DecisionResult> {
        let result = resolver.decide(scenario_id, decider, profile)?;

        if self.config.global.audit_logging {
            info!(
                "[{}] {} decider on '{}' -> {}",
                resolver.name(),
                decider,
                scenario_id,
                result.choice_id.as_deref().unwrap_or("<none>")
            );
        }
        if result.is_not_found() {
            warn!("No data for '{}': {}", scenario_id, result.justification);
        }

        Ok(result)
    }
}

async fn load_resolver(
    source: &ManifestSource,
    strategy: Strategy,
) -> std::result::Result<SharedResolver, ManifestError> {
    match load(source).await {
        Ok(manifest) => Ok(Arc::new(ManifestResolver::new(Arc::new(manifest)))),
        Err(e @ ManifestError::Io { .. }) if strategy == Strategy::Auto => {
            warn!("Manifest unavailable ({}), using built-in rule table", e);
            Ok(Arc::new(RuleTableResolver::builtin()))
        }
        Err(e) => {
            error!("Manifest load failed: {}", e);
            Err(e)
        }
    }
}
