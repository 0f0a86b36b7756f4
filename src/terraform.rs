//! Terraform subprocess driver
//!
//! Every invocation runs in the output root. Methods take `&mut self` so a
//! driver can only run one command at a time; Terraform keeps shared state
//! under `.terraform/`. A non-zero exit is reported back as a
//! [`ToolOutcome`], never as an error. Only a failure to spawn the binary is
//! an error.

use std::path::PathBuf;

use log::{debug, warn};
use tokio::process::Command;

use crate::error::{Error, Result};

/// Lock file removed before `init`
pub const LOCK_FILE: &str = ".terraform.lock.hcl";

/// Local metadata directory removed before `init`
pub const METADATA_DIR: &str = ".terraform";

/// Result of one Terraform invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub command: String,
    /// Exit code; `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Last non-empty line of stderr, or of stdout if stderr is empty
    pub fn summary(&self) -> &str {
        last_line(&self.stderr)
            .or_else(|| last_line(&self.stdout))
            .unwrap_or("")
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|l| !l.is_empty())
}

/// Advisory results of a provisioning pass
#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub outcomes: Vec<ToolOutcome>,
}

impl ProvisionReport {
    pub fn failures(&self) -> impl Iterator<Item = &ToolOutcome> {
        self.outcomes.iter().filter(|o| !o.success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Runs Terraform in a project directory
#[derive(Debug)]
pub struct Terraform {
    binary: String,
    working_dir: PathBuf,
}

impl Terraform {
    pub fn new(binary: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
        }
    }

    #[cfg(test)]
    pub fn working_dir(&self) -> &std::path::Path {
        &self.working_dir
    }

    async fn run(&mut self, args: &[&str]) -> Result<ToolOutcome> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!("Running `{}` in {}", command, self.working_dir.display());

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .output()
            .await
            .map_err(|e| Error::Terraform {
                command: command.clone(),
                message: e.to_string(),
            })?;

        let outcome = ToolOutcome {
            command,
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !outcome.success() {
            warn!(
                "`{}` exited with {:?}: {}",
                outcome.command,
                outcome.status,
                outcome.summary()
            );
        }
        Ok(outcome)
    }

    /// Remove a stale lock file and metadata directory.
    pub fn clean_lock_state(&self) -> Result<()> {
        let lock = self.working_dir.join(LOCK_FILE);
        if lock.exists() {
            debug!("Removing {}", lock.display());
            std::fs::remove_file(&lock)?;
        }

        let metadata = self.working_dir.join(METADATA_DIR);
        if metadata.is_dir() {
            debug!("Removing {}", metadata.display());
            std::fs::remove_dir_all(&metadata)?;
        }
        Ok(())
    }

    pub async fn init(&mut self, upgrade: bool) -> Result<ToolOutcome> {
        if upgrade {
            self.run(&["init", "-upgrade", "-input=false"]).await
        } else {
            self.run(&["init", "-input=false"]).await
        }
    }

    pub async fn fmt(&mut self) -> Result<ToolOutcome> {
        self.run(&["fmt", "-recursive"]).await
    }

    pub async fn validate(&mut self) -> Result<ToolOutcome> {
        self.run(&["validate", "-no-color"]).await
    }

    pub async fn workspace_new(&mut self, name: &str) -> Result<ToolOutcome> {
        self.run(&["workspace", "new", name]).await
    }

    /// Clean, init, fmt, validate, then create one workspace per network.
    ///
    /// Non-zero exits are collected in the report and do not stop later
    /// steps.
    pub async fn provision(&mut self, workspaces: &[String]) -> Result<ProvisionReport> {
        self.clean_lock_state()?;

        let mut report = ProvisionReport::default();
        report.outcomes.push(self.init(true).await?);
        report.outcomes.push(self.fmt().await?);
        report.outcomes.push(self.validate().await?);

        for name in workspaces {
            report.outcomes.push(self.workspace_new(name).await?);
        }

        Ok(report)
    }
}
