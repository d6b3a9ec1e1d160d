use crate::core::source::parse_source;
use crate::core::version::{discover_version, self_test};
use crate::core::{ArtifactSource, Host, Storage, WarArtifact};
use crate::utils::error::Result;
use reqwest::Client;

/// Stash name later pipeline stages unstash the war from.
pub const WAR_STASH_NAME: &str = "jenkins-war";
/// Workspace-relative location every source variant leaves the war at.
pub const WAR_FILE: &str = "jenkins.war";

pub struct WarFetcher<S: Storage, H: Host> {
    storage: S,
    host: H,
    client: Client,
}

impl<S: Storage, H: Host> WarFetcher<S, H> {
    pub fn new(storage: S, host: H) -> Self {
        Self {
            storage,
            host,
            client: Client::new(),
        }
    }

    async fn move_to_war_file(&self, from: &str) -> Result<()> {
        if from == WAR_FILE {
            return Ok(());
        }
        self.host
            .run_shell(&format!("mv '{}' {}", from, WAR_FILE))
            .await
    }

    /// Resolves the URL to a war in the workspace, verifies it is a readable
    /// archive, stashes it for later stages and returns the discovered
    /// version (if the war carries one).
    pub async fn fetch(&self, url: &str) -> Result<WarArtifact> {
        let source = parse_source(url)?;
        tracing::info!("Fetching war from {:?}", source);

        match &source {
            ArtifactSource::Maven {
                group,
                artifact,
                version,
                packaging,
            } => {
                self.host.install_tool("jdk").await?;
                self.host.install_tool("maven").await?;

                let packaging = packaging.as_deref().unwrap_or("war");
                let coordinates = format!("{}:{}:{}:{}", group, artifact, version, packaging);
                self.host
                    .run_shell(&format!(
                        "mvn -B dependency:copy -Dartifact={} -DoutputDirectory=. -Dmdep.stripVersion=true",
                        coordinates
                    ))
                    .await?;
                self.move_to_war_file(&format!("{}.{}", artifact, packaging))
                    .await?;
            }
            ArtifactSource::Artifact {
                item,
                run,
                artifact,
            } => {
                self.host.copy_artifact(item, Some(run), artifact).await?;
                self.move_to_war_file(artifact).await?;
            }
            ArtifactSource::Stable { item, artifact } => {
                self.host.copy_artifact(item, None, artifact).await?;
                self.move_to_war_file(artifact).await?;
            }
            ArtifactSource::PlainUrl(plain) => {
                tracing::debug!("Downloading {}", plain);
                let response = self.client.get(plain).send().await?.error_for_status()?;
                let bytes = response.bytes().await?;
                self.storage.write_file(WAR_FILE, &bytes).await?;
            }
        }

        let war = self.storage.read_file(WAR_FILE).await?;
        self_test(&war, WAR_FILE)?;

        self.host.stash(WAR_STASH_NAME, WAR_FILE).await?;

        let version = discover_version(&war)?;
        match &version {
            Some(v) => tracing::info!("War under test reports version {}", v),
            None => tracing::warn!("War carries no discoverable version"),
        }

        Ok(WarArtifact {
            path: WAR_FILE.to_string(),
            stash_name: WAR_STASH_NAME.to_string(),
            version,
        })
    }
}
