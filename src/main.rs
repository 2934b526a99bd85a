use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use stagecraft::{
    parse_path, plot, Cast, Completion, PerformanceOutcome, ResolutionError, RouteFile, Router,
    ScreenDescriptor, ScreenHandle, ScreenResolver, ScriptRegistry, Stage, Story,
    TransitionCatalog, TransitionExecutor, TransitionRequest,
};

#[derive(Parser)]
#[command(name = "stagecraft", version, about = "Inspect and rehearse navigation routes")]
struct Cli {
    /// Route file (default: <config dir>/stagecraft/routes.toml)
    #[arg(long, value_name = "PATH", global = true)]
    routes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered scripts with their route templates
    Routes,
    /// Match a path and print the bound story
    Match {
        path: String,
    },
    /// Print the smallest story from one path to another
    Plot {
        from: String,
        to: String,
    },
    /// Perform paths in order against a dry-run executor
    Rehearse {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    stagecraft::logging::init_tracing();
    let cli = Cli::parse();

    let routes = match &cli.routes {
        Some(path) => RouteFile::load_from(path),
        None => RouteFile::load(),
    }
    .context("Failed to load route file")?;

    let registry = ScriptRegistry::new();
    for script in routes.build_scripts()? {
        registry.register(script);
    }
    let router = Router::new(registry.clone()).strict(routes.stage.strict_routes);

    match cli.command {
        Commands::Routes => {
            for script in registry.scripts() {
                let captures: Vec<String> = script
                    .capture_segments()
                    .into_iter()
                    .map(|(label, pattern)| format!("{label}={pattern}"))
                    .collect();
                println!(
                    "{}\t{}\t{}",
                    script.label(),
                    script.path_representation(),
                    captures.join(", ")
                );
            }
        }
        Commands::Match { path } => match router.route_path(&path)? {
            Some(story) => println!("{}", story.shorthand()),
            None => println!("no match"),
        },
        Commands::Plot { from, to } => {
            let from = route(&router, &from)?;
            let to = route(&router, &to)?;
            let plotted = plot(&from, &to)?;
            if plotted.is_empty() {
                println!("(nothing to do)");
            }
            for scene in plotted.scenes() {
                println!("{scene}");
            }
        }
        Commands::Rehearse { paths } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(rehearse(registry, routes, &paths))?;
        }
    }

    Ok(())
}

fn route(router: &Router, path: &str) -> Result<Story> {
    match router.route(&parse_path(path))? {
        Some(story) => Ok(story),
        None => bail!("No route matches '{path}'"),
    }
}

async fn rehearse(registry: ScriptRegistry, routes: RouteFile, paths: &[String]) -> Result<()> {
    let cast = Cast::new(
        TransitionCatalog::new(Arc::new(PrintingExecutor)),
        Arc::new(DescriptorResolver),
    );
    let stage = Stage::with_registry(cast, routes.stage, registry);

    for path in paths {
        let Some(performance) = stage.perform_path(path)? else {
            bail!("No route matches '{path}'");
        };
        println!("# {path}");
        let report = performance.finished().await?;
        if let PerformanceOutcome::PlotFailed(err) = report.outcome {
            bail!("Cannot perform '{path}': {err}");
        }
        println!("  = {}", report.story.shorthand());
    }
    Ok(())
}

/// Prints each transition and completes it immediately.
struct PrintingExecutor;

impl TransitionExecutor for PrintingExecutor {
    fn execute(&self, request: TransitionRequest, completion: Completion) {
        let name = |handle: &Option<ScreenHandle>| {
            handle
                .as_ref()
                .and_then(|h| h.downcast_ref::<ScreenDescriptor>())
                .map_or_else(|| "-".to_string(), ToString::to_string)
        };
        println!(
            "  {} {} -> {}",
            request.operator,
            name(&request.source),
            name(&request.destination)
        );
        completion.finish(true);
    }
}

/// Uses the descriptor itself as the screen.
struct DescriptorResolver;

impl ScreenResolver for DescriptorResolver {
    fn resolve(&self, descriptor: &ScreenDescriptor) -> Result<ScreenHandle, ResolutionError> {
        Ok(ScreenHandle::new(descriptor.clone()))
    }
}
