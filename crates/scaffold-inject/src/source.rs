//! Resolving a chunk's source into text
//!
//! The engine only sees the [`SourceFetcher`] seam. [`ProjectSourceFetcher`]
//! is the stock implementation: files are read relative to the project root,
//! URLs are fetched over HTTP, commands and scripts run as subprocesses in
//! the project root.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use reqwest::blocking::Client;
use scaffold_fs::{NormalizedPath, io};

use crate::chunk::Source;
use crate::error::{Error, Result};
use crate::replace::Replacements;

/// Default timeout for URL sources
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Produces the text content of a chunk source.
pub trait SourceFetcher {
    fn fetch(&self, source: &Source) -> Result<String>;
}

impl<F> SourceFetcher for F
where
    F: Fn(&Source) -> Result<String>,
{
    fn fetch(&self, source: &Source) -> Result<String> {
        self(source)
    }
}

/// Fetches sources for a scaffolded project rooted at `root`.
#[derive(Debug, Clone)]
pub struct ProjectSourceFetcher {
    root: NormalizedPath,
    client: Client,
    replacements: Replacements,
    interpreter: Vec<String>,
}

impl ProjectSourceFetcher {
    pub fn new(root: impl Into<NormalizedPath>) -> Result<Self> {
        Self::with_timeout(root, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(root: impl Into<NormalizedPath>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            root: root.into(),
            client,
            replacements: Replacements::new(),
            interpreter: vec!["sh".to_string(), "-s".to_string()],
        })
    }

    pub fn with_replacements(mut self, replacements: Replacements) -> Self {
        self.replacements = replacements;
        self
    }

    /// Program and arguments that read inline script code on stdin,
    /// e.g. `&["node", "-"]`. An empty list disables script sources.
    pub fn with_script_interpreter(mut self, command: &[&str]) -> Self {
        self.interpreter = command.iter().map(|part| part.to_string()).collect();
        self
    }

    fn read_file(&self, path: &str) -> Result<String> {
        let full = self.root.resolve_under(&NormalizedPath::new(path))?;
        if !full.is_file() {
            return Err(Error::fetch(path, format!("{} does not exist", full)));
        }
        let content = io::read_text(&full)?;
        Ok(self.replacements.apply(path, &content).into_owned())
    }

    fn fetch_url(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching url source");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::fetch(url, format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("{}: {}", url, status)));
        }

        let body = response
            .text()
            .map_err(|e| Error::fetch(url, format!("{}: {}", url, e)))?;
        Ok(self.replacements.apply(url, &body).into_owned())
    }

    fn run_command(&self, command: &str) -> Result<String> {
        tracing::debug!(command, "running command source");
        let output = shell(command)
            .current_dir(self.root.to_native())
            .output()
            .map_err(|e| Error::fetch(command, format!("{}: {}", command, e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(Error::SourceCommand {
                command: command.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        if !output.status.success() {
            return Err(Error::fetch(
                command,
                format!(
                    "{} exited with non-zero status (exit code: {:?})",
                    command,
                    output.status.code()
                ),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_script(&self, code: &str) -> Result<String> {
        let Some((program, args)) = self.interpreter.split_first() else {
            return Err(Error::SourceScript {
                message: "no script interpreter configured".to_string(),
            });
        };
        tracing::debug!(interpreter = %program, "running script source");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(self.root.to_native())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::SourceScript {
                message: format!("{}: {}", program, e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(code.as_bytes())
                .map_err(|e| Error::SourceScript {
                    message: e.to_string(),
                })?;
        }

        let output = child.wait_with_output().map_err(|e| Error::SourceScript {
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::SourceScript {
                message: format!(
                    "exit code {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SourceFetcher for ProjectSourceFetcher {
    fn fetch(&self, source: &Source) -> Result<String> {
        match source {
            Source::File(path) => self.read_file(path),
            Source::Url(url) => self.fetch_url(url),
            Source::Command(command) => self.run_command(command),
            Source::Script(code) => self.run_script(code),
        }
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
