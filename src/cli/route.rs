//! CLI route: run context and the single command dispatch table.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{format_routes_text, format_simulation_text};
use crate::config::{ConfigLoader, RouterConfig};
use crate::env::memory::MemoryEnvironment;
use crate::env::Navigation;
use crate::error::CliError;
use crate::fragment::{self, OutletRoutes};
use crate::router::ShellRouter;

/// One frame in a simulation report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    pub path: String,
    pub outlet: String,
    pub visible: bool,
    pub src: String,
}

/// Outcome of `simulate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub hash: String,
    pub active: Option<String>,
    pub frames: Vec<FrameRow>,
    pub messages: Vec<serde_json::Value>,
}

/// Runtime context for CLI execution.
pub struct RunContext {
    config: Option<RouterConfig>,
}

impl RunContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => Some(ConfigLoader::load_from_file(&path)?),
            None => None,
        };
        Ok(Self { config })
    }

    pub fn execute(&self, command: &Commands) -> Result<String, CliError> {
        match command {
            Commands::Decode { hash, format } => {
                let routes = fragment::parse(hash.strip_prefix('#').unwrap_or(hash));
                match format {
                    OutputFormat::Text => Ok(format_routes_text(&routes)),
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&routes)?),
                }
            }
            Commands::Encode { entries } => {
                let routes = parse_entries(entries)?;
                Ok(fragment::serialize(&routes))
            }
            Commands::Simulate {
                hash,
                origin,
                preload,
                go,
                format,
            } => {
                let config = self.config.clone().ok_or_else(|| {
                    CliError::InvalidArgument("simulate requires --config".to_string())
                })?;
                let report = simulate(config, hash, origin, *preload, go)?;
                match format {
                    OutputFormat::Text => Ok(format_simulation_text(&report)),
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
                }
            }
        }
    }
}

fn parse_entries(entries: &[String]) -> Result<OutletRoutes, CliError> {
    entries
        .iter()
        .map(|entry| {
            entry
                .split_once('=')
                .filter(|(outlet, _)| !outlet.is_empty())
                .ok_or_else(|| {
                    CliError::InvalidArgument(format!("expected outlet=route, got '{}'", entry))
                })
        })
        .collect()
}

/// Run a router over an in-memory page with one element per configured outlet.
pub fn simulate(
    config: RouterConfig,
    hash: &str,
    origin: &str,
    preload: bool,
    go: &[String],
) -> Result<SimulationReport, CliError> {
    let env = MemoryEnvironment::new(origin).with_hash(hash);
    for outlet in config.outlets() {
        env.add_outlet(outlet);
    }

    let routes = config.routes.clone();
    let mut router = ShellRouter::new(env.clone(), config)?;
    let _subscriptions = router.init()?;
    if preload {
        router.preload()?;
    }
    for target in go {
        let (path, sub_route) = fragment::split_app_path(target);
        router.go(path, Some(sub_route), None)?;
    }
    info!(navigations = go.len(), "Simulation finished");

    let frames = routes
        .iter()
        .filter_map(|route| {
            let element = env.element_by_id(&route.path)?;
            Some(FrameRow {
                path: route.path.clone(),
                outlet: route.outlet_id().to_string(),
                visible: element.style.get("display").map(String::as_str) == Some("block"),
                src: element.attributes.get("src").cloned().unwrap_or_default(),
            })
        })
        .collect();

    Ok(SimulationReport {
        hash: env.hash(),
        active: router.active_route().map(|a| a.route.path.clone()),
        frames,
        messages: env.frame_posts().into_iter().map(|p| p.payload).collect(),
    })
}
