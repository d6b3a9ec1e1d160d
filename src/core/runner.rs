use crate::core::fetch::WAR_STASH_NAME;
use crate::core::{BranchKind, BranchOutcome, Host, SplitPlan, Storage, TestBranch};
use crate::utils::error::{AthError, Result};
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;
use std::time::Instant;

pub const REPORT_PATTERN: &str = "target/surefire-reports/*.xml";
pub const DIAGNOSTICS_PATTERN: &str = "target/diagnostics/*";

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub node_label: String,
    pub rerun_count: u32,
    pub bundle_results: bool,
    pub monitor: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            node_label: "linux".to_string(),
            rerun_count: 0,
            bundle_results: false,
            monitor: false,
        }
    }
}

/// Runs every branch of a split plan concurrently, each on its own leased
/// node. Result collection is best-effort; only infrastructure failures
/// (node lease, unstash, the test command itself refusing to start) abort a
/// branch.
pub struct BranchRunner<S: Storage, H: Host> {
    storage: Arc<S>,
    host: Arc<H>,
    settings: RunSettings,
}

impl<S, H> BranchRunner<S, H>
where
    S: Storage + 'static,
    H: Host + 'static,
{
    pub fn new(storage: S, host: H, settings: RunSettings) -> Self {
        Self {
            storage: Arc::new(storage),
            host: Arc::new(host),
            settings,
        }
    }

    pub async fn run(&self, plan: SplitPlan) -> Result<Vec<BranchOutcome>> {
        let monitor = SystemMonitor::new(self.settings.monitor);
        tracing::info!("Running {} test branches in parallel", plan.branches.len());

        let mut handles = Vec::new();
        for branch in plan.branches {
            let storage = Arc::clone(&self.storage);
            let host = Arc::clone(&self.host);
            let settings = self.settings.clone();
            handles.push(tokio::spawn(async move {
                run_branch(storage, host, settings, branch).await
            }));
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            let outcome = handle.await.map_err(|e| AthError::ProcessingError {
                message: format!("Branch task panicked: {}", e),
            })??;
            monitor.log_stats(&outcome.branch);
            tracing::info!(
                "Branch {} finished on {} in {}ms",
                outcome.branch,
                outcome.node,
                outcome.duration_ms
            );
            outcomes.push(outcome);
        }

        monitor.log_final_stats();
        Ok(outcomes)
    }
}

async fn run_branch<S: Storage, H: Host>(
    storage: Arc<S>,
    host: Arc<H>,
    settings: RunSettings,
    branch: TestBranch,
) -> Result<BranchOutcome> {
    let started = Instant::now();

    let node = host.lease_node(&settings.node_label).await?;
    tracing::info!("Branch {} running on node {}", branch.name, node);

    let result = execute_branch(&*storage, &*host, &settings, &branch).await;

    // The node goes back to the pool whether the branch succeeded or not.
    if let Err(e) = host.release_node(&node).await {
        tracing::warn!("Failed to release node {}: {}", node, e);
    }

    let (reports_archived, bundle_archived, diagnostics_archived) = result?;

    Ok(BranchOutcome {
        branch: branch.name,
        node,
        reports_archived,
        bundle_archived,
        diagnostics_archived,
        duration_ms: started.elapsed().as_millis() as u64,
    })
}

async fn execute_branch<S: Storage, H: Host>(
    storage: &S,
    host: &H,
    settings: &RunSettings,
    branch: &TestBranch,
) -> Result<(bool, bool, bool)> {
    host.unstash(WAR_STASH_NAME).await?;
    host.install_tool("jdk").await?;
    host.install_tool("maven").await?;

    let mut command =
        String::from("mvn -B clean test -Dmaven.test.failure.ignore=true -DforkCount=1");

    match &branch.kind {
        BranchKind::Split { .. } => {
            let excludes_file = format!("{}-excludes.txt", branch.name);
            storage
                .write_file(&excludes_file, branch.exclusions.join("\n").as_bytes())
                .await?;
            command.push_str(&format!(" -Dsurefire.excludesFile={}", excludes_file));
        }
        BranchKind::Category { tag } => {
            command.push_str(&format!(" -Dgroups={}", tag));
        }
    }

    if settings.rerun_count > 0 {
        command.push_str(&format!(
            " -Dsurefire.rerunFailingTestsCount={}",
            settings.rerun_count
        ));
    }

    host.run_shell(&command).await?;

    // Pass/fail interpretation belongs to the report archiver, and a branch
    // that produced no reports is still a finished branch.
    let reports_archived = match host.publish_test_results(REPORT_PATTERN).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Branch {}: no test reports archived: {}", branch.name, e);
            false
        }
    };

    let bundle_archived = if settings.bundle_results {
        archive_report_bundle(host, &branch.name).await
    } else {
        false
    };

    let diagnostics_archived = match host.archive_artifacts(DIAGNOSTICS_PATTERN).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Branch {}: no diagnostics archived: {}", branch.name, e);
            false
        }
    };

    Ok((reports_archived, bundle_archived, diagnostics_archived))
}

async fn archive_report_bundle<H: Host>(host: &H, branch_name: &str) -> bool {
    let bundle = format!("{}-reports.zip", branch_name);
    let zip_up = format!("zip -r {} target/surefire-reports", bundle);

    let archived = match host.run_shell(&zip_up).await {
        Ok(()) => host.archive_artifacts(&bundle).await,
        Err(e) => Err(e),
    };

    match archived {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Branch {}: report bundle not archived: {}", branch_name, e);
            false
        }
    }
}
