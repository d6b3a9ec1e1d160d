use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The automation server's primitives. Orchestration code only ever talks to
/// the host through this trait, so it can run against a mock in tests and
/// against a plain shell adapter outside the server.
#[async_trait]
pub trait Host: Send + Sync {
    async fn run_shell(&self, script: &str) -> Result<()>;

    async fn lease_node(&self, label: &str) -> Result<String>;
    async fn release_node(&self, node: &str) -> Result<()>;

    async fn stash(&self, name: &str, includes: &str) -> Result<()>;
    async fn unstash(&self, name: &str) -> Result<()>;

    /// Copy an artifact from another job's build. `run` selects a specific
    /// build number; `None` means the latest stable build.
    async fn copy_artifact(&self, item: &str, run: Option<&str>, artifact: &str) -> Result<()>;

    async fn archive_artifacts(&self, pattern: &str) -> Result<()>;
    async fn publish_test_results(&self, pattern: &str) -> Result<()>;

    async fn install_tool(&self, tool: &str) -> Result<()>;
}

/// Supplies the per-branch exclusion lists, typically derived from test
/// history. This layer never invents a partition of its own.
pub trait TestPartitioner: Send + Sync {
    fn exclusion_lists(&self, branch_count: usize) -> Result<Vec<Vec<String>>>;
}
