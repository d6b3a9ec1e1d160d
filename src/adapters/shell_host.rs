use crate::core::Host;
use crate::utils::error::{AthError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::process::Command;

/// Local stand-in for the automation server: steps run as child processes in
/// the workspace, stashes are directory copies under `.stash/`, archived
/// artifacts land under `.archive/`, and node leases are purely nominal.
/// Copying artifacts out of other jobs needs the real server and is not
/// supported here.
pub struct ShellHost {
    workspace: PathBuf,
    stash_root: PathBuf,
    archive_root: PathBuf,
    lease_counter: AtomicUsize,
}

impl ShellHost {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        Self {
            stash_root: workspace.join(".stash"),
            archive_root: workspace.join(".archive"),
            workspace,
            lease_counter: AtomicUsize::new(0),
        }
    }

    fn host_err(message: impl Into<String>) -> AthError {
        AthError::HostError {
            message: message.into(),
        }
    }

    /// Resolves a single-star pattern (`dir/*.xml`) or a plain path against
    /// the workspace. Good enough for the fixed patterns this tool uses.
    async fn matching_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        match pattern.find('*') {
            None => {
                let path = self.workspace.join(pattern);
                if tokio::fs::try_exists(&path).await? {
                    Ok(vec![path])
                } else {
                    Ok(Vec::new())
                }
            }
            Some(pos) => {
                let dir = self.workspace.join(pattern[..pos].trim_end_matches('/'));
                let suffix = pattern[pos + 1..].to_string();

                let mut found = Vec::new();
                let mut entries = match tokio::fs::read_dir(&dir).await {
                    Ok(entries) => entries,
                    Err(_) => return Ok(found),
                };
                while let Some(entry) = entries.next_entry().await? {
                    if entry.file_type().await?.is_file()
                        && entry.file_name().to_string_lossy().ends_with(&suffix)
                    {
                        found.push(entry.path());
                    }
                }
                Ok(found)
            }
        }
    }
}

#[async_trait]
impl Host for ShellHost {
    async fn run_shell(&self, script: &str) -> Result<()> {
        tracing::debug!("sh -c '{}'", script);
        tokio::fs::create_dir_all(&self.workspace).await?;

        let status = Command::new("sh")
            .arg("-c")
            .arg(script)
            .current_dir(&self.workspace)
            .status()
            .await?;

        if !status.success() {
            return Err(Self::host_err(format!(
                "Shell step exited with {}: {}",
                status, script
            )));
        }
        Ok(())
    }

    async fn lease_node(&self, label: &str) -> Result<String> {
        let id = self.lease_counter.fetch_add(1, Ordering::SeqCst);
        let node = format!("local-{}-{}", label, id);
        tracing::debug!("Leased node {}", node);
        Ok(node)
    }

    async fn release_node(&self, node: &str) -> Result<()> {
        tracing::debug!("Released node {}", node);
        Ok(())
    }

    async fn stash(&self, name: &str, includes: &str) -> Result<()> {
        let source = self.workspace.join(includes);
        let file_name = source
            .file_name()
            .map(|n| n.to_owned())
            .ok_or_else(|| Self::host_err(format!("Cannot stash {}: not a file path", includes)))?;

        let target_dir = self.stash_root.join(name);
        tokio::fs::create_dir_all(&target_dir).await?;
        tokio::fs::copy(&source, target_dir.join(file_name)).await?;
        Ok(())
    }

    async fn unstash(&self, name: &str) -> Result<()> {
        let source_dir = self.stash_root.join(name);
        let mut entries = tokio::fs::read_dir(&source_dir)
            .await
            .map_err(|_| Self::host_err(format!("No stash named {}", name)))?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::copy(entry.path(), self.workspace.join(entry.file_name())).await?;
            }
        }
        Ok(())
    }

    async fn copy_artifact(&self, item: &str, _run: Option<&str>, _artifact: &str) -> Result<()> {
        Err(Self::host_err(format!(
            "Copying artifacts from {} requires the automation server; not available locally",
            item
        )))
    }

    async fn archive_artifacts(&self, pattern: &str) -> Result<()> {
        let files = self.matching_files(pattern).await?;
        if files.is_empty() {
            return Err(Self::host_err(format!("Nothing matches {}", pattern)));
        }

        tokio::fs::create_dir_all(&self.archive_root).await?;
        for file in &files {
            if let Some(name) = file.file_name() {
                tokio::fs::copy(file, self.archive_root.join(name)).await?;
            }
        }
        tracing::info!("Archived {} file(s) matching {}", files.len(), pattern);
        Ok(())
    }

    async fn publish_test_results(&self, pattern: &str) -> Result<()> {
        let reports = self.matching_files(pattern).await?;
        if reports.is_empty() {
            return Err(Self::host_err(format!(
                "No test reports matching {}",
                pattern
            )));
        }
        tracing::info!("Recorded {} test report file(s)", reports.len());
        Ok(())
    }

    async fn install_tool(&self, tool: &str) -> Result<()> {
        let binary = match tool {
            "maven" => "mvn",
            "jdk" => "java",
            other => other,
        };
        self.run_shell(&format!("command -v {}", binary))
            .await
            .map_err(|_| Self::host_err(format!("Required tool {} is not installed", tool)))
    }
}
