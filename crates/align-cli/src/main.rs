//! Align CLI - command-line front end for the value-alignment demo

use align_core::{
    AlignService, Catalog, Decider, DecisionComparison, DecisionResult, EngineConfig, Level,
    ManifestSource, Strategy, ValueProfile,
};
use align_manifest::{load, LoadReport};
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "align")]
#[command(about = "Align - compare baseline and value-aligned triage decisions")]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Manifest path, overriding the configuration
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Resolution strategy: manifest, rule_table or auto
    #[arg(short, long, global = true)]
    strategy: Option<Strategy>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List scenarios
    Scenarios,
    /// List presets and their levels
    Presets,
    /// Show one scenario in full
    Show {
        /// Scenario id
        scenario: String,
    },
    /// Resolve one decider's decision
    Decide {
        /// Scenario id
        scenario: String,

        /// Which decider answers: baseline or aligned
        #[arg(short, long, default_value = "aligned")]
        decider: Decider,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resolve both deciders and report whether the choice changed
    Compare {
        /// Scenario id
        scenario: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Load the manifest and print a report
    Check,
}

#[derive(Args)]
struct ProfileArgs {
    /// Start from a preset
    #[arg(short, long)]
    preset: Option<String>,

    /// Set one dimension, e.g. `--level merit=high` or `--level merit=100`.
    /// Repeatable.
    #[arg(short, long = "level", value_parser = parse_level)]
    levels: Vec<(String, Level)>,
}

fn parse_level(arg: &str) -> Result<(String, Level), String> {
    let (dimension, level) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected DIMENSION=LEVEL, got '{}'", arg))?;
    if dimension.is_empty() {
        return Err(format!("missing dimension in '{}'", arg));
    }
    let level = match level.parse::<u8>() {
        Ok(position @ (0 | 50 | 100)) => Level::from_slider(position),
        _ => Level::parse(level),
    };
    if !level.is_recognized() {
        return Err(format!(
            "unknown level '{}', expected low, medium, high or 0/50/100",
            level
        ));
    }
    Ok((dimension.to_string(), level))
}

impl ProfileArgs {
    /// Preset values first, then each `--level` on top.
    fn build(&self, catalog: &Catalog) -> anyhow::Result<ValueProfile> {
        let mut profile = match &self.preset {
            Some(id) => match catalog.preset(id) {
                Some(preset) => preset.values.clone(),
                None => bail!("unknown preset '{}'", id),
            },
            None => ValueProfile::new(),
        };

        for (dimension, level) in &self.levels {
            if catalog.dimension(dimension).is_none() {
                warn!("'{}' is not a dimension of this catalog", dimension);
            }
            profile.set(dimension.clone(), level.clone());
        }

        debug!("Profile: {:?}", profile);
        Ok(profile)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn engine_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &cli.manifest {
        config.manifest.path = path.clone();
    }
    if let Some(strategy) = cli.strategy {
        config.resolver.strategy = strategy;
    }
    Ok(config)
}

fn print_decision(heading: &str, result: &DecisionResult) {
    println!("{}", heading);
    println!("  Decision:      {}", result.decision);
    println!("  Justification: {}", result.justification);
    if let Some(adm) = &result.adm_name {
        match &result.llm_backbone {
            Some(llm) => println!("  ADM:           {} ({})", adm, llm),
            None => println!("  ADM:           {}", adm),
        }
    }
}

fn print_comparison(cmp: &DecisionComparison) {
    print_decision("Baseline", &cmp.baseline);
    println!();
    print_decision("Aligned", &cmp.aligned);
    println!();
    println!("[{}]", cmp.status());
}

fn print_profile(catalog: &Catalog, profile: &ValueProfile) {
    let levels: Vec<String> = catalog
        .dimensions
        .iter()
        .map(|d| {
            let level = profile.get(&d.id).map_or("medium", Level::as_str);
            format!("{}={}", d.id, level)
        })
        .collect();
    println!("Profile: {}", levels.join(" "));
    println!();
}

async fn check(config: &EngineConfig) -> anyhow::Result<()> {
    let source = ManifestSource::Path(config.manifest.path.clone());
    let manifest = load(&source)
        .await
        .with_context(|| format!("loading manifest {}", source))?;
    print!("{}", LoadReport::from_manifest(&manifest));
    Ok(())
}

async fn run(config: EngineConfig, command: Commands) -> anyhow::Result<()> {
    let service = AlignService::start(config);
    let resolver = service.ready().await.context("starting resolver")?;
    let catalog = resolver.catalog();
    debug!("Answering from the {} strategy", resolver.name());

    match command {
        Commands::Scenarios => {
            for scenario in &catalog.scenarios {
                println!(
                    "{:<28} {:<16} {}",
                    scenario.id, scenario.kdma_type, scenario.title
                );
            }
        }
        Commands::Presets => {
            for preset in &catalog.presets {
                println!("{} ({}): {}", preset.label, preset.id, preset.tagline);
                for dim in &catalog.dimensions {
                    let level = preset.values.get(&dim.id).map_or("-", Level::as_str);
                    println!("  {:<18} {}", dim.label, level);
                }
            }
        }
        Commands::Show { scenario } => {
            let Some(scenario) = catalog.scenario(&scenario) else {
                bail!("unknown scenario '{}'", scenario);
            };
            let (intro, options) = scenario.description_parts();
            println!("{} [{}]", scenario.title, scenario.kdma_type);
            println!();
            println!("{}", intro);
            for option in options {
                println!();
                println!("  {}", option);
            }
            println!();
            for choice in &scenario.choices {
                println!("  - {} ({})", choice.label, choice.id);
            }
        }
        Commands::Decide {
            scenario,
            decider,
            profile,
            json,
        } => {
            let profile = match decider {
                Decider::Baseline => None,
                Decider::Aligned => Some(profile.build(catalog)?),
            };
            let result = service.decide(&scenario, decider, profile.as_ref()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                if let Some(profile) = &profile {
                    print_profile(catalog, profile);
                }
                print_decision(&format!("{} decision", decider), &result);
            }
        }
        Commands::Compare {
            scenario,
            profile,
            json,
        } => {
            let profile = profile.build(catalog)?;
            let cmp = service.compare(&scenario, &profile).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cmp)?);
            } else {
                print_profile(catalog, &profile);
                print_comparison(&cmp);
            }
        }
        Commands::Check => check(service.config()).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = engine_config(&cli)?;

    match cli.command {
        // Reports on the manifest itself, whatever the strategy
        Commands::Check => check(&config).await,
        command => run(config, command).await,
    }
}
