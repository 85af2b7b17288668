//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{ResultsService, SearchResults};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{next_status, SearchRecord, SearchStatus, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{load_update, JsonFileRouteSource, RouteSource};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        if cli.info {
            return Ok(());
        }
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    // Commands that need no settings
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Status {
            current,
            results,
            complete,
            error,
        } => return status(*current, *results, *complete, error.as_deref()),
        _ => {}
    }

    let settings = Settings::load(cli.config_dir.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree {
            file,
            min_score,
            json,
        } => tree(&container, file, *min_score, *json),
        Commands::Summary {
            file,
            min_score,
            max_routes,
        } => summary(&container, file, *min_score, *max_routes),
        Commands::Validate { file } => validate(&container, file),
        Commands::Update {
            file,
            smiles,
            current,
        } => update(file, smiles, *current),
        Commands::Config { command } => config(&container, cli.config_dir.as_deref(), command),
        Commands::Completion { .. } | Commands::Status { .. } => Ok(()),
    }
}

fn min_score_or_default(container: &ServiceContainer, min_score: Option<f64>) -> Option<f64> {
    min_score.or(container.settings.results.min_score)
}

fn report_skipped(results: &SearchResults) {
    for skipped in &results.skipped {
        output::warning(&format!(
            "route {} (score {:.4}) skipped: {}",
            skipped.index, skipped.score, skipped.error
        ));
    }
}

#[instrument(skip(container))]
fn tree(
    container: &ServiceContainer,
    file: &Path,
    min_score: Option<f64>,
    json: bool,
) -> CliResult<()> {
    let routes = JsonFileRouteSource::new(file).load_routes()?;
    let results = container
        .results
        .assemble(&routes, min_score_or_default(container, min_score));

    if json {
        let rendered = serde_json::to_string_pretty(&results)
            .map_err(|e| InfraError::parse("serialize results", e))?;
        output::info(&rendered);
    } else {
        for (i, tree) in results.routes.iter().enumerate() {
            output::header(&format!("Route {} (score {:.4})", i + 1, tree.score));
            output::info(&tree.to_tree_string());
        }
    }
    report_skipped(&results);
    Ok(())
}

#[instrument(skip(container))]
fn summary(
    container: &ServiceContainer,
    file: &Path,
    min_score: Option<f64>,
    max_routes: usize,
) -> CliResult<()> {
    let routes = JsonFileRouteSource::new(file).load_routes()?;
    let results = container
        .results
        .assemble(&routes, min_score_or_default(container, min_score));

    output::info(&format!("Found {} routes", results.total_routes));
    for (i, tree) in results.routes.iter().take(max_routes).enumerate() {
        let summary = ResultsService::summarize(tree);
        output::header(&format!("Route {}:", i + 1));
        output::detail(&format!("Score: {:.4}", summary.score));
        output::detail(&format!("Target: {}", summary.target));
        output::detail(&format!("Steps: {}", summary.steps));
        output::detail(&format!(
            "Molecules: {} ({} purchasable)",
            summary.molecules, summary.purchasable
        ));
    }
    if results.total_routes > max_routes {
        output::info(&format!(
            "({} more routes not shown)",
            results.total_routes - max_routes
        ));
    }
    report_skipped(&results);
    Ok(())
}

#[instrument(skip(container))]
fn validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let routes = JsonFileRouteSource::new(file).load_routes()?;
    let mut invalid = 0;
    for (i, route) in routes.iter().enumerate() {
        match container.results.build(route) {
            Ok(tree) => output::success(&format!("route {}: ok (root {})", i, tree.root.smiles)),
            Err(e) => {
                invalid += 1;
                output::failure(&format!("route {}: {}", i, e));
            }
        }
    }
    debug!("validate: {} of {} invalid", invalid, routes.len());
    if invalid > 0 {
        return Err(CliError::InvalidRoutes {
            invalid,
            total: routes.len(),
        });
    }
    Ok(())
}

fn status(
    current: SearchStatus,
    results: usize,
    complete: bool,
    error: Option<&str>,
) -> CliResult<()> {
    if current.is_terminal() {
        output::warning(&format!("search is already {}", current));
    }
    let update = next_status(current, results, complete, error);
    output::action("status", &update.status);
    if let Some(message) = &update.error_message {
        output::action("error", message);
    }
    Ok(())
}

#[instrument]
fn update(file: &Path, smiles: &str, current: SearchStatus) -> CliResult<()> {
    let batch = load_update(file)?;
    let mut record = SearchRecord::new(smiles);
    record.status = current;
    if current.is_terminal() {
        output::warning(&format!("search is already {}", current));
    }

    let before = record.status;
    let outcome = record.apply(&batch);
    output::action("search", &record.id);
    output::detail(&format!(
        "{} routes, complete={}",
        batch.routes.len(),
        batch.is_complete
    ));
    output::action("status", &format!("{} -> {}", before, outcome.status));
    if let Some(message) = &outcome.error_message {
        output::action("error", message);
    }
    Ok(())
}

fn config(
    container: &ServiceContainer,
    config_dir: Option<&Path>,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Init => output::info(Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", "<unavailable>"),
            }
            let local_dir = match config_dir {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir()
                    .map_err(|e| InfraError::io("current directory", e))?,
            };
            output::action("local", &local_config_path(&local_dir).display());
        }
    }
    Ok(())
}
