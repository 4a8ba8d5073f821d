//! Installation service
//!
//! Replays a dependency forest into `mvn install:install-file` calls,
//! parents strictly before their children, then installs every parent or
//! aggregator pom that no node referenced.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, ArtifactKind};
use crate::config::Settings;
use crate::domain::coordinate::POM_EXTENSION;
use crate::domain::{Coordinate, DependencyNode, PreOrderIter};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// Maven goal used for every installation.
pub const INSTALL_GOAL: &str = "install:install-file";

/// Where artifacts come from and where they go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Directory holding the copied libraries and poms
    pub dependency_dir: PathBuf,
    /// Repository to install into, Maven's default local repository if None
    pub local_repository: Option<PathBuf>,
}

impl InstallTarget {
    pub fn new(dependency_dir: impl Into<PathBuf>, local_repository: Option<PathBuf>) -> Self {
        Self {
            dependency_dir: dependency_dir.into(),
            local_repository,
        }
    }

    pub fn lib_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.dependency_dir.join(coordinate.lib_name())
    }

    pub fn pom_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.dependency_dir.join(coordinate.pom_name())
    }
}

/// One invocation of the install command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    /// Install a library together with its own pom.
    pub fn for_artifact(program: &str, target: &InstallTarget, coordinate: &Coordinate) -> Self {
        let mut args = vec![
            INSTALL_GOAL.to_string(),
            format!("-Dfile={}", target.lib_path(coordinate).display()),
            format!("-DpomFile={}", target.pom_path(coordinate).display()),
            format!("-DgroupId={}", coordinate.group_id),
            format!("-DartifactId={}", coordinate.artifact_id),
            format!("-Dpackaging={}", coordinate.packaging),
            format!("-Dversion={}", coordinate.version),
        ];
        if let Some(classifier) = &coordinate.classifier {
            args.push(format!("-Dclassifier={}", classifier));
        }
        Self::with_repository(program, args, target)
    }

    /// Install a standalone pom, the pom being its own artifact.
    pub fn for_pom(program: &str, target: &InstallTarget, pom_path: &Path) -> Self {
        let args = vec![
            INSTALL_GOAL.to_string(),
            format!("-Dfile={}", pom_path.display()),
            format!("-DpomFile={}", pom_path.display()),
            format!("-Dpackaging={}", POM_EXTENSION),
        ];
        Self::with_repository(program, args, target)
    }

    fn with_repository(program: &str, mut args: Vec<String>, target: &InstallTarget) -> Self {
        if let Some(repo) = &target.local_repository {
            args.push(format!("-DlocalRepositoryPath={}", repo.display()));
        }
        Self {
            program: program.to_string(),
            args,
        }
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

/// Outcome of a full installation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Coordinates in installation order
    pub installed: Vec<String>,
    /// Pom file names installed as a node's own descriptor
    pub installed_poms: BTreeSet<String>,
    /// Standalone poms installed by the sweep
    pub swept_poms: Vec<PathBuf>,
}

/// Service driving the external install command.
pub struct InstallService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl InstallService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Install the whole forest, then sweep the remaining poms.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn install_all(
        &self,
        target: &InstallTarget,
        forest: &[DependencyNode],
    ) -> ApplicationResult<InstallReport> {
        let mut report = self.install_forest(target, forest)?;
        report.swept_poms = self.sweep_residual_poms(target, &report.installed_poms)?;
        info!(
            "installed {} artifacts and {} standalone poms",
            report.installed.len(),
            report.swept_poms.len()
        );
        Ok(report)
    }

    /// Install every node depth-first, parents before children.
    ///
    /// The returned report lists the installed coordinates and pom file names;
    /// `swept_poms` stays empty.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn install_forest(
        &self,
        target: &InstallTarget,
        forest: &[DependencyNode],
    ) -> ApplicationResult<InstallReport> {
        let mut report = InstallReport::default();
        for node in PreOrderIter::forest(forest) {
            self.install_node(target, node, &mut report.installed_poms)?;
            report.installed.push(node.coordinate.to_string());
        }
        Ok(report)
    }

    /// Install a single node's library and pom, children are not touched.
    pub fn install_node(
        &self,
        target: &InstallTarget,
        node: &DependencyNode,
        installed: &mut BTreeSet<String>,
    ) -> ApplicationResult<()> {
        let coordinate = &node.coordinate;
        installed.insert(coordinate.pom_name());

        let lib_path = target.lib_path(coordinate);
        if !self.fs.exists(&lib_path) {
            return Err(ApplicationError::MissingArtifactFile {
                kind: ArtifactKind::Library,
                path: lib_path,
            });
        }
        let pom_path = target.pom_path(coordinate);
        if !self.fs.exists(&pom_path) {
            return Err(ApplicationError::MissingArtifactFile {
                kind: ArtifactKind::Pom,
                path: pom_path,
            });
        }

        let command = InstallCommand::for_artifact(&self.settings.mvn_command, target, coordinate);
        debug!("install dependency, install cmd: {}", command);
        self.execute(&command)?;
        info!("installed {}", coordinate);
        Ok(())
    }

    /// Install all poms in the dependency directory not yet installed.
    #[instrument(level = "debug", skip(self, installed))]
    pub fn sweep_residual_poms(
        &self,
        target: &InstallTarget,
        installed: &BTreeSet<String>,
    ) -> ApplicationResult<Vec<PathBuf>> {
        let residual = self.residual_poms(target, installed)?;
        for pom_path in &residual {
            let command = InstallCommand::for_pom(&self.settings.mvn_command, target, pom_path);
            debug!("install single pom file, install cmd: {}", command);
            self.execute(&command)?;
            info!("installed pom {}", pom_path.display());
        }
        Ok(residual)
    }

    /// Every command a full run would execute, in order, without running or
    /// checking anything but the dependency directory listing.
    pub fn plan(
        &self,
        target: &InstallTarget,
        forest: &[DependencyNode],
    ) -> ApplicationResult<Vec<InstallCommand>> {
        let program = &self.settings.mvn_command;
        let mut installed = BTreeSet::new();
        let mut commands = Vec::new();
        for node in PreOrderIter::forest(forest) {
            installed.insert(node.coordinate.pom_name());
            commands.push(InstallCommand::for_artifact(program, target, &node.coordinate));
        }
        for pom_path in self.residual_poms(target, &installed)? {
            commands.push(InstallCommand::for_pom(program, target, &pom_path));
        }
        Ok(commands)
    }

    /// Poms in the dependency directory that no node installed, sorted by name.
    fn residual_poms(
        &self,
        target: &InstallTarget,
        installed: &BTreeSet<String>,
    ) -> ApplicationResult<Vec<PathBuf>> {
        let dir = &target.dependency_dir;
        let entries = self
            .fs
            .list_dir(dir)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("list dependency directory {}", dir.display()),
                source: Box::new(e),
            })?;

        let suffix = format!(".{}", POM_EXTENSION);
        let mut residual = Vec::new();
        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(&suffix) {
                continue;
            }
            if !self.fs.is_file(&path) {
                return Err(ApplicationError::NotAFile(path));
            }
            if installed.contains(name) {
                continue;
            }
            residual.push(path);
        }
        Ok(residual)
    }

    fn execute(&self, command: &InstallCommand) -> ApplicationResult<()> {
        let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
        let output = self.cmd.run(&command.program, &args).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("run {}", command.program),
                source: Box::new(e),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).into_owned()
            } else {
                stderr.into_owned()
            };
            return Err(ApplicationError::ExternalCommandFailure {
                command: command.to_string(),
                exit_code: output.status.code(),
                output: detail,
            });
        }
        Ok(())
    }
}
