use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use shared::protocol::Action;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use visualization_core::{
    helpers::visualization_from_dashboard_item, DashboardApi, HttpAnalyticsService,
    HttpFavoriteService, VisualizationContext,
};

mod config;

use config::{load_settings, normalize_base_url, Settings};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "dashboard.toml")]
    config: PathBuf,
    /// Overrides the configured instance url.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every visualization of a dashboard item list and print the store.
    Load {
        #[arg(long)]
        items: PathBuf,
    },
    /// Dispatch a JSON list of actions and print the store.
    Replay {
        #[arg(long)]
        actions: PathBuf,
    },
}

fn build_context(settings: &Settings) -> Result<VisualizationContext> {
    let mut api = DashboardApi::new(&settings.base_url, settings.request_timeout())?;
    if let Some((username, password)) = settings.credentials() {
        api = api.with_credentials(username, password);
    }
    Ok(VisualizationContext::new(
        Arc::new(HttpFavoriteService::new(api.clone())),
        Arc::new(HttpAnalyticsService::new(api)),
    ))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid json in '{}'", path.display()))
}

async fn load_dashboard(context: &mut VisualizationContext, items: &Path) -> Result<()> {
    let items: Vec<Value> = read_json(items)?;
    let visualizations: Vec<_> = items
        .iter()
        .filter_map(|item| {
            let visualization = visualization_from_dashboard_item(item);
            if visualization.is_none() {
                warn!(item = %item, "skipping dashboard item without a loadable favorite");
            }
            visualization
        })
        .collect();
    info!(count = visualizations.len(), "hydrating dashboard visualizations");

    let requests: Vec<_> = visualizations
        .iter()
        .map(|visualization| {
            (
                visualization.id.clone(),
                visualization.name.clone(),
                visualization.visualization_type.clone(),
            )
        })
        .collect();
    context.dispatch(Action::AddAllVisualizations { visualizations });
    for (id, name, visualization_type) in requests {
        context.initialize(id, name, visualization_type, None);
    }

    context.run_until_idle().await;
    Ok(())
}

async fn replay(context: &mut VisualizationContext, actions: &Path) -> Result<()> {
    let actions: Vec<Action> = read_json(actions)?;
    for action in actions {
        context.dispatch(action);
    }
    context.run_until_idle().await;
    Ok(())
}

fn report(context: &VisualizationContext) {
    for visualization in context.state().visualizations().iter() {
        let progress = &visualization.progress;
        if progress.is_error() {
            warn!(
                visualization_id = %visualization.id,
                status = progress.status_code,
                message = %progress.message,
                "visualization failed to load"
            );
        } else {
            info!(
                visualization_id = %visualization.id,
                percent = progress.percent,
                layers = visualization.layers.len(),
                "{}",
                progress.message
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = normalize_base_url(&base_url);
    }
    info!(base_url = %settings.base_url, "using dashboard instance");

    let mut context = build_context(&settings)?;
    match cli.command {
        Command::Load { items } => load_dashboard(&mut context, &items).await?,
        Command::Replay { actions } => replay(&mut context, &actions).await?,
    }

    report(&context);
    println!("{}", serde_json::to_string_pretty(context.state())?);
    Ok(())
}
