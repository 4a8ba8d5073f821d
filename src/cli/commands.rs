//! Command dispatch: resolves settings, wires services and prints results

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::InstallTarget;
use crate::cli::args::{Cli, Commands, ConfigCommands, ReportArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, project_config_path, Settings};
use crate::domain::TreeNodeConvert;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };

    match &cli.command {
        Some(Commands::Install {
            report,
            repo,
            dry_run,
        }) => install(&project_dir, report, repo.as_deref(), *dry_run),
        Some(Commands::Tree { report }) => tree(&project_dir, report),
        Some(Commands::Config { command }) => config(&project_dir, command),
        Some(Commands::Completion { shell }) => {
            completion(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Load layered settings and apply the report flags on top.
///
/// Relative dependency directories are resolved against the project directory.
pub fn resolve_settings(project_dir: &Path, args: &ReportArgs) -> CliResult<Settings> {
    let settings = Settings::load(Some(project_dir))?;
    Ok(apply_report_args(settings, project_dir, args))
}

/// Apply the report flags onto already loaded settings.
pub fn apply_report_args(
    mut settings: Settings,
    project_dir: &Path,
    args: &ReportArgs,
) -> Settings {
    if let Some(dir) = &args.dir {
        settings.dependency_dir = dir.clone();
    }
    if settings.dependency_dir.is_relative() {
        settings.dependency_dir = project_dir.join(&settings.dependency_dir);
    }
    if let Some(root) = &args.root {
        settings.report.start_marker = root.clone();
    }
    if args.strict {
        settings.strict_indentation = true;
    }
    debug!("settings: {:?}", settings);
    settings
}

fn report_path(settings: &Settings, args: &ReportArgs) -> PathBuf {
    args.report
        .clone()
        .unwrap_or_else(|| settings.report_path())
}

#[instrument(skip(args))]
fn install(
    project_dir: &Path,
    args: &ReportArgs,
    repo: Option<&Path>,
    dry_run: bool,
) -> CliResult<()> {
    let mut settings = resolve_settings(project_dir, args)?;
    if let Some(repo) = repo {
        settings.local_repository = Some(repo.to_path_buf());
    }
    let report = report_path(&settings, args);
    let target = InstallTarget::new(
        settings.dependency_dir.clone(),
        settings.local_repository.clone(),
    );
    let container = ServiceContainer::new(settings);

    let forest = container.reports().load_forest(&report)?;
    if forest.is_empty() {
        output::warning(&format!("no dependencies found in {}", report.display()));
    }

    let installer = container.installer();
    if dry_run {
        for command in installer.plan(&target, &forest)? {
            output::info(&command);
        }
        return Ok(());
    }

    let result = installer.install_all(&target, &forest)?;
    output::success(&format!("Installed {} artifacts", result.installed.len()));
    output::success(&format!(
        "Installed {} standalone poms",
        result.swept_poms.len()
    ));
    if let Some(repo) = &target.local_repository {
        output::action("Repository", &repo.display());
    }
    Ok(())
}

#[instrument(skip(args))]
fn tree(project_dir: &Path, args: &ReportArgs) -> CliResult<()> {
    let settings = resolve_settings(project_dir, args)?;
    let report = report_path(&settings, args);
    let container = ServiceContainer::new(settings);

    let forest = container.reports().load_forest(&report)?;
    let total: usize = forest.iter().map(|root| root.node_count()).sum();
    output::header(&format!(
        "Found {} trees, {} dependencies:",
        forest.len(),
        total
    ));
    for root in &forest {
        output::info(&root.to_tree_string());
    }
    if let Some(depth) = forest.iter().map(|root| root.depth()).max() {
        output::detail(&format!("max depth: {}", depth));
    }
    Ok(())
}

fn config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &describe(&path)),
                None => output::action("Global", &"unavailable (no home directory)"),
            }
            output::action("Project", &describe(&project_config_path(project_dir)));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn describe(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
