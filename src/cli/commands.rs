use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::manifest::{load_manifest, RouteManifest};
use crate::navigation::{
    resolve_path, Adapter, MemoryAdapter, NavigateOptions, NavigationError, RouterContext,
    StaticAdapter,
};
use crate::router::{Element, Routes};
use crate::runtime_config::RuntimeConfig;
use crate::trace::{MatchTrace, TraceCapture};

/// Command-line interface for routeway
///
/// Inspects route manifests: how they rank, what a path matches and where a
/// sequence of navigations ends up.
#[derive(Parser)]
#[command(name = "routeway")]
#[command(about = "Route manifest inspector", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List compiled branches, best ranked first
    Branches {
        /// Route manifest (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Base path (overrides the manifest and ROUTEWAY_BASE)
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Resolve a path against a manifest and print the match trace
    Match {
        /// Route manifest (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Base path (overrides the manifest and ROUTEWAY_BASE)
        #[arg(short, long)]
        base: Option<String>,

        /// Path to match (may carry a query and hash)
        path: String,
    },
    /// Resolve a navigation target
    Resolve {
        /// Router base path
        #[arg(short, long, default_value = "")]
        base: String,

        /// Matched path prefix relative targets resolve against
        #[arg(short, long)]
        from: Option<String>,

        /// Resolve against the root only, ignoring base and --from
        #[arg(long, default_value_t = false)]
        no_resolve: bool,

        /// Target to resolve
        to: String,
    },
    /// Replay navigations over an in-memory history
    Navigate {
        /// Route manifest (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Base path (overrides the manifest and ROUTEWAY_BASE)
        #[arg(short, long)]
        base: Option<String>,

        /// Initial location (defaults to the base path)
        #[arg(short, long, default_value = "")]
        start: String,

        /// Targets, applied in order from the root
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Serialize)]
struct BranchReport {
    score: i64,
    patterns: Vec<String>,
    names: Vec<Option<String>>,
}

#[derive(Serialize)]
struct MatchReport {
    pathname: String,
    matches: Vec<MatchTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rendered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirected_to: Option<String>,
}

#[derive(Serialize)]
struct NavigateReport {
    location: String,
    entries: Vec<String>,
    index: usize,
    matches: Vec<MatchTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rendered: Option<String>,
}

fn rendered_name(element: Option<Element>) -> Option<String> {
    element.and_then(|e| e.downcast_ref::<String>().cloned())
}

fn load(routes: &Path) -> anyhow::Result<RouteManifest> {
    load_manifest(routes).with_context(|| format!("Cannot use manifest {}", routes.display()))
}

fn build_router(
    adapter: impl Adapter + 'static,
    manifest: &RouteManifest,
    base: Option<&str>,
    trace: &TraceCapture,
) -> Result<(RouterContext, Routes), NavigationError> {
    let mut builder = RouterContext::builder(adapter)
        .with_config(&RuntimeConfig::from_env())
        .output(trace.clone());
    if !manifest.base.is_empty() {
        builder = builder.base(manifest.base.clone());
    }
    if let Some(base) = base {
        builder = builder.base(base);
    }
    let router = builder.build()?;
    let routes = Routes::from_definitions(&router, manifest.definitions())?;
    Ok((router, routes))
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Execute `cli`, writing results to `out`.
///
/// # Errors
///
/// Unreadable manifests, route configuration errors and failed navigations.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Branches { routes, base } => {
            let manifest = load(routes)?;
            let trace = TraceCapture::new();
            let (_router, routes) =
                build_router(StaticAdapter::new(""), &manifest, base.as_deref(), &trace)?;
            let report: Vec<BranchReport> = routes
                .branches()?
                .iter()
                .map(|branch| BranchReport {
                    score: branch.score(),
                    patterns: branch.routes().iter().map(|r| r.pattern().to_string()).collect(),
                    names: branch
                        .routes()
                        .iter()
                        .map(|r| r.name().map(str::to_string))
                        .collect(),
                })
                .collect();
            write_json(out, &report)
        }
        Commands::Match { routes, base, path } => {
            let manifest = load(routes)?;
            let trace = TraceCapture::new();
            let (router, routes) =
                build_router(StaticAdapter::new(path), &manifest, base.as_deref(), &trace)?;
            let rendered = rendered_name(routes.render()?);
            let report = MatchReport {
                pathname: router.location().pathname(),
                matches: trace.last_matches().unwrap_or_default(),
                rendered,
                redirected_to: trace.url(),
            };
            write_json(out, &report)
        }
        Commands::Resolve {
            base,
            from,
            no_resolve,
            to,
        } => {
            let resolved = if *no_resolve {
                resolve_path("", to, None)
            } else {
                resolve_path(base, to, from.as_deref())
            };
            let resolved = resolved.ok_or_else(|| NavigationError::NotRoutable {
                path: to.clone(),
            })?;
            writeln!(out, "{resolved}")?;
            Ok(())
        }
        Commands::Navigate {
            routes,
            base,
            start,
            paths,
        } => {
            let manifest = load(routes)?;
            let trace = TraceCapture::new();
            let history = MemoryAdapter::new(start);
            let (router, routes) =
                build_router(history.clone(), &manifest, base.as_deref(), &trace)?;
            for path in paths {
                debug!(path = %path, "Replaying navigation");
                router
                    .navigate_root(path.as_str(), NavigateOptions::default())
                    .with_context(|| format!("Navigation to '{path}' failed"))?;
            }
            let rendered = rendered_name(routes.render()?);
            let report = NavigateReport {
                location: router.location().href(),
                entries: history.entries(),
                index: history.index(),
                matches: trace.last_matches().unwrap_or_default(),
                rendered,
            };
            write_json(out, &report)
        }
    }
}

/// Parse process arguments, initialize logging and run.
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // A subscriber may already be installed when embedded; keep going.
    if let Err(err) = crate::logging::init_logging_with_config(&crate::logging::LogConfig::from_env()) {
        eprintln!("Warning: {err}");
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}
