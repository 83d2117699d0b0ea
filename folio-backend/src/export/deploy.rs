//! Publish the built site to a GitHub Pages branch.
//!
//! The output directory becomes a throwaway git repository holding a single
//! orphan commit, which is force-pushed to the pages branch of the source
//! repository's remote. The source checkout is never touched.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::ExportError;
use crate::models::site_config::ExportConfig;

/// One git invocation, run inside the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStep {
    pub args: Vec<String>,
}

impl GitStep {
    fn new(args: &[&str]) -> Self {
        Self {
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn command_line(&self) -> String {
        format!("git {}", self.args.join(" "))
    }
}

pub struct Deployer {
    output_dir: PathBuf,
    /// Checkout whose remote is resolved when `remote` is a name
    repo_dir: PathBuf,
    remote: String,
    branch: String,
    commit_message: String,
    author: Option<(String, String)>,
}

impl Deployer {
    pub fn new(output_dir: &Path, export: &ExportConfig) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            repo_dir: PathBuf::from("."),
            remote: export.remote.clone(),
            branch: export.branch.clone(),
            commit_message: export.commit_message.clone(),
            author: export.author_name.clone().zip(export.author_email.clone()),
        }
    }

    pub fn with_repo_dir(mut self, repo_dir: &Path) -> Self {
        self.repo_dir = repo_dir.to_path_buf();
        self
    }

    pub fn with_remote(mut self, remote: &str) -> Self {
        self.remote = remote.to_string();
        self
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }

    pub fn with_author(mut self, name: &str, email: &str) -> Self {
        self.author = Some((name.to_string(), email.to_string()));
        self
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Git steps that publish the output directory to `remote_url`
    pub fn plan(&self, remote_url: &str) -> Vec<GitStep> {
        let refspec = format!("HEAD:refs/heads/{}", self.branch);
        let commit = match &self.author {
            Some((name, email)) => GitStep::new(&[
                "-c",
                &format!("user.name={}", name),
                "-c",
                &format!("user.email={}", email),
                "commit",
                "--quiet",
                "-m",
                &self.commit_message,
            ]),
            None => GitStep::new(&["commit", "--quiet", "-m", &self.commit_message]),
        };
        vec![
            GitStep::new(&["init", "--quiet"]),
            GitStep::new(&["checkout", "--quiet", "--orphan", &self.branch]),
            GitStep::new(&["add", "--all"]),
            commit,
            GitStep::new(&["push", "--force", remote_url, &refspec]),
        ]
    }

    /// URL to push to. A bare name is looked up in the source checkout.
    /// Relative local paths are made absolute against the checkout, since the
    /// push runs inside the output directory.
    pub fn resolve_remote(&self) -> Result<String, ExportError> {
        let url = if looks_like_url(&self.remote) {
            self.remote.clone()
        } else {
            run_git(&self.repo_dir, &["remote", "get-url", &self.remote])?
                .trim()
                .to_string()
        };

        if !is_local_path(&url) || Path::new(&url).is_absolute() {
            return Ok(url);
        }
        let base = self
            .repo_dir
            .canonicalize()
            .map_err(|e| ExportError::io(&self.repo_dir, e))?;
        Ok(base.join(&url).to_string_lossy().into_owned())
    }

    pub fn deploy(&self) -> Result<(), ExportError> {
        if !self.output_dir.join("index.html").is_file() {
            return Err(ExportError::MissingOutput(self.output_dir.clone()));
        }

        let remote_url = self.resolve_remote()?;
        log::info!("[DEPLOY] Publishing {} to {} ({})", self.output_dir.display(), remote_url, self.branch);

        // A stale repository from an earlier deploy would already have the branch
        let stale_git = self.output_dir.join(".git");
        if stale_git.exists() {
            fs::remove_dir_all(&stale_git).map_err(|e| ExportError::io(&stale_git, e))?;
        }

        for step in self.plan(&remote_url) {
            log::info!("[DEPLOY] {}", step.command_line());
            let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
            run_git(&self.output_dir, &args)?;
        }

        log::info!("[DEPLOY] Deployed to branch {}", self.branch);
        Ok(())
    }
}

fn looks_like_url(remote: &str) -> bool {
    remote.contains("://") || remote.contains('@') || remote.contains('/') || remote.ends_with(".git")
}

/// Neither `scheme://` nor scp-style `host:path`
fn is_local_path(url: &str) -> bool {
    if url.contains("://") {
        return false;
    }
    match url.find(':') {
        Some(colon) => url[..colon].contains('/'),
        None => true,
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String, ExportError> {
    let command = format!("git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| ExportError::Git {
            command: command.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ExportError::Git {
            command,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
