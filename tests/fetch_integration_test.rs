use ath_runner::core::fetch::{WAR_FILE, WAR_STASH_NAME};
use ath_runner::core::version::POM_PROPERTIES_PATH;
use ath_runner::utils::error::{AthError, Result};
use ath_runner::{LocalStorage, WarFetcher};
use ath_runner::core::Host;
use async_trait::async_trait;
use httpmock::prelude::*;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use zip::write::{FileOptions, ZipWriter};

fn make_war(version: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file::<_, ()>(POM_PROPERTIES_PATH, FileOptions::default())
        .unwrap();
    zip.write_all(format!("groupId=org.jenkins-ci.main\nversion={}\n", version).as_bytes())
        .unwrap();
    zip.finish().unwrap().into_inner()
}

/// Host double that records every call and plants the war in the workspace
/// the way the real host-side steps would.
#[derive(Clone)]
struct MockHost {
    workspace: PathBuf,
    war: Vec<u8>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockHost {
    fn new(workspace: PathBuf, war: Vec<u8>) -> Self {
        Self {
            workspace,
            war,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Host for MockHost {
    async fn run_shell(&self, script: &str) -> Result<()> {
        self.record(format!("sh:{}", script));
        if script.starts_with("mv ") {
            std::fs::write(self.workspace.join(WAR_FILE), &self.war).unwrap();
        }
        Ok(())
    }

    async fn lease_node(&self, label: &str) -> Result<String> {
        self.record(format!("lease:{}", label));
        Ok("node-0".to_string())
    }

    async fn release_node(&self, node: &str) -> Result<()> {
        self.record(format!("release:{}", node));
        Ok(())
    }

    async fn stash(&self, name: &str, includes: &str) -> Result<()> {
        self.record(format!("stash:{}:{}", name, includes));
        Ok(())
    }

    async fn unstash(&self, name: &str) -> Result<()> {
        self.record(format!("unstash:{}", name));
        Ok(())
    }

    async fn copy_artifact(&self, item: &str, run: Option<&str>, artifact: &str) -> Result<()> {
        self.record(format!("copy:{}:{}:{}", item, run.unwrap_or("stable"), artifact));
        let target = self.workspace.join(artifact);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, &self.war).unwrap();
        Ok(())
    }

    async fn archive_artifacts(&self, pattern: &str) -> Result<()> {
        self.record(format!("archive:{}", pattern));
        Ok(())
    }

    async fn publish_test_results(&self, pattern: &str) -> Result<()> {
        self.record(format!("publish:{}", pattern));
        Ok(())
    }

    async fn install_tool(&self, tool: &str) -> Result<()> {
        self.record(format!("install:{}", tool));
        Ok(())
    }
}

#[tokio::test]
async fn test_fetch_plain_url_discovers_version_and_stashes() {
    let server = MockServer::start();
    let war = make_war("2.60.1");
    let war_mock = server.mock(|when, then| {
        when.method(GET).path("/latest/jenkins.war");
        then.status(200).body(war.clone());
    });

    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), war);
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host.clone());

    let artifact = fetcher.fetch(&server.url("/latest/jenkins.war")).await.unwrap();

    war_mock.assert();
    assert_eq!(artifact.version, Some("2.60.1".to_string()));
    assert_eq!(artifact.stash_name, WAR_STASH_NAME);
    assert!(host
        .calls()
        .contains(&format!("stash:{}:{}", WAR_STASH_NAME, WAR_FILE)));
}

#[tokio::test]
async fn test_fetch_plain_url_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.war");
        then.status(404);
    });

    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), Vec::new());
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host);

    let err = fetcher.fetch(&server.url("/missing.war")).await.unwrap_err();
    assert!(matches!(err, AthError::HttpError(_)));
}

#[tokio::test]
async fn test_fetch_rejects_corrupted_archive() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/jenkins.war");
        then.status(200).body("<html>502 Bad Gateway</html>");
    });

    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), Vec::new());
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host.clone());

    let err = fetcher.fetch(&server.url("/jenkins.war")).await.unwrap_err();
    assert!(matches!(err, AthError::CorruptArchive { .. }));

    // Nothing gets stashed when the self-test fails.
    assert!(!host.calls().iter().any(|c| c.starts_with("stash:")));
}

#[tokio::test]
async fn test_fetch_maven_coordinates_install_tools_and_copy() {
    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), make_war("2.60.1"));
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host.clone());

    let artifact = fetcher
        .fetch("mvn://org.jenkins-ci.main:jenkins-war:2.60.1:war")
        .await
        .unwrap();

    assert_eq!(artifact.version, Some("2.60.1".to_string()));

    let calls = host.calls();
    assert!(calls.contains(&"install:jdk".to_string()));
    assert!(calls.contains(&"install:maven".to_string()));
    assert!(calls.iter().any(|c| c
        .contains("dependency:copy -Dartifact=org.jenkins-ci.main:jenkins-war:2.60.1:war")));
}

#[tokio::test]
async fn test_fetch_from_specific_build() {
    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), make_war("2.60.1"));
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host.clone());

    let artifact = fetcher.fetch("artifact://ci/jenkins/42#jenkins.war").await.unwrap();

    assert_eq!(artifact.version, Some("2.60.1".to_string()));
    assert!(host
        .calls()
        .contains(&"copy:ci/jenkins:42:jenkins.war".to_string()));
}

#[tokio::test]
async fn test_fetch_from_latest_stable_build() {
    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), make_war("2.60.1"));
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host.clone());

    fetcher
        .fetch("stable://ci/jenkins#builds/jenkins.war")
        .await
        .unwrap();

    let calls = host.calls();
    assert!(calls.contains(&"copy:ci/jenkins:stable:builds/jenkins.war".to_string()));
    assert!(calls.iter().any(|c| c.starts_with("sh:mv ")));
}

#[tokio::test]
async fn test_fetch_malformed_artifact_url() {
    let dir = tempfile::tempdir().unwrap();
    let host = MockHost::new(dir.path().to_path_buf(), Vec::new());
    let fetcher = WarFetcher::new(LocalStorage::new(dir.path()), host.clone());

    let err = fetcher.fetch("artifact://ci/jenkins/latest#jenkins.war").await.unwrap_err();
    assert!(err.to_string().contains("artifact://ci/jenkins/latest#jenkins.war"));

    // Nothing touches the host for a URL that never parsed.
    assert!(host.calls().is_empty());
}
