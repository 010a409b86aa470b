use crate::build::{BuildMode, BuildRunner, BuildVersionFormatter, BuildVersions};
use crate::config::BuildConfig;
use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Runs the configured build command, then commits every change it made
pub struct CommandBuildRunner<'a> {
    git: &'a dyn GitClient,
    config: BuildConfig,
    formatter: BuildVersionFormatter,
    workdir: Option<PathBuf>,
}

impl<'a> CommandBuildRunner<'a> {
    pub fn new(git: &'a dyn GitClient, config: BuildConfig, formatter: BuildVersionFormatter) -> Self {
        CommandBuildRunner {
            git,
            config,
            formatter,
            workdir: None,
        }
    }

    /// Run build commands in `dir` instead of the process working directory
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    fn template(&self, mode: BuildMode) -> &str {
        match mode {
            BuildMode::PrepareNextVersion => &self.config.prepare_next_version,
            BuildMode::DevelopmentForNextRelease => &self.config.development_for_next_release,
        }
    }

    fn execute(&self, command_line: &str, versions: &BuildVersions) -> Result<()> {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };
        cmd.arg(command_line);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        for (key, value) in env_vars(versions) {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| {
            ReleaseError::build(format!("Failed to execute '{}': {}", command_line, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ReleaseError::build(format!(
                "'{}' failed with exit code {}\nStdout: {}\nStderr: {}",
                command_line,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }
        Ok(())
    }
}

/// Substitute `{version}`-style placeholders
pub fn render_template(template: &str, versions: &BuildVersions) -> String {
    template
        .replace("{version}", &versions.version)
        .replace("{assembly_version}", &versions.assembly_version)
        .replace("{assembly_file_version}", &versions.assembly_file_version)
        .replace("{informational_version}", &versions.informational_version)
        .replace("{nuget_version}", &versions.nuget_version)
}

fn env_vars(versions: &BuildVersions) -> HashMap<&'static str, String> {
    let mut env = HashMap::new();
    env.insert("RELEASEFLOW_VERSION", versions.version.clone());
    env.insert("RELEASEFLOW_ASSEMBLY_VERSION", versions.assembly_version.clone());
    env.insert(
        "RELEASEFLOW_ASSEMBLY_FILE_VERSION",
        versions.assembly_file_version.clone(),
    );
    env.insert(
        "RELEASEFLOW_INFORMATIONAL_VERSION",
        versions.informational_version.clone(),
    );
    env.insert("RELEASEFLOW_NUGET_VERSION", versions.nuget_version.clone());
    env
}

impl BuildRunner for CommandBuildRunner<'_> {
    fn call_build_steps_and_commit(&self, mode: BuildMode, version: &SemanticVersion) -> Result<()> {
        let versions = self.formatter.format(version)?;
        let template = self.template(mode).trim();

        if template.is_empty() {
            debug!(%mode, "No build command configured");
        } else {
            let command_line = render_template(template, &versions);
            info!(%mode, version = %version, command = %command_line, "Running build command");
            self.execute(&command_line, &versions)?;
        }

        self.git.commit_all(&mode.commit_message(version))
    }
}
