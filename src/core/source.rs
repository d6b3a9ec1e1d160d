use crate::core::ArtifactSource;
use crate::utils::error::{AthError, Result};
use regex::Regex;

pub const ARTIFACT_FORMAT: &str = "artifact://full/job/path/<buildNumber>#path/to/artifact.war";
pub const STABLE_FORMAT: &str = "stable://full/job/path#path/to/artifact.war";
pub const MAVEN_FORMAT: &str = "mvn://groupId:artifactId:version[:war]";

/// Parses a fetch URL into its source variant. Anything that is not one of
/// the three custom schemes is treated as a plain HTTP(S) URL.
pub fn parse_source(url: &str) -> Result<ArtifactSource> {
    if url.trim().is_empty() {
        return Err(AthError::MissingParameter {
            name: "url".to_string(),
        });
    }

    if let Some(coordinates) = url.strip_prefix("mvn://") {
        return parse_maven(url, coordinates);
    }

    if url.starts_with("artifact://") {
        let re = Regex::new(r"^artifact://([/\w\-_ .]+)/(\d+)/?#([/\w.\-_]+)$").unwrap();
        let caps = re.captures(url).ok_or_else(|| AthError::MalformedUrl {
            url: url.to_string(),
            expected: ARTIFACT_FORMAT.to_string(),
        })?;
        return Ok(ArtifactSource::Artifact {
            item: caps[1].to_string(),
            run: caps[2].to_string(),
            artifact: caps[3].to_string(),
        });
    }

    if url.starts_with("stable://") {
        let re = Regex::new(r"^stable://([/\w\-_ .]+)#([/\w.\-_]+)$").unwrap();
        let caps = re.captures(url).ok_or_else(|| AthError::MalformedUrl {
            url: url.to_string(),
            expected: STABLE_FORMAT.to_string(),
        })?;
        return Ok(ArtifactSource::Stable {
            item: caps[1].to_string(),
            artifact: caps[2].to_string(),
        });
    }

    Ok(ArtifactSource::PlainUrl(url.to_string()))
}

fn parse_maven(url: &str, coordinates: &str) -> Result<ArtifactSource> {
    let parts: Vec<&str> = coordinates.split(':').collect();
    if parts.len() < 3 || parts.len() > 4 || parts.iter().any(|p| p.is_empty()) {
        return Err(AthError::MalformedUrl {
            url: url.to_string(),
            expected: MAVEN_FORMAT.to_string(),
        });
    }

    Ok(ArtifactSource::Maven {
        group: parts[0].to_string(),
        artifact: parts[1].to_string(),
        version: parts[2].to_string(),
        packaging: parts.get(3).map(|p| p.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artifact_url() {
        let source = parse_source("artifact://job/42#dir/file.war").unwrap();
        assert_eq!(
            source,
            ArtifactSource::Artifact {
                item: "job".to_string(),
                run: "42".to_string(),
                artifact: "dir/file.war".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_artifact_url_with_folder_path() {
        let source = parse_source("artifact://folder/my job/17#target/jenkins.war").unwrap();
        assert_eq!(
            source,
            ArtifactSource::Artifact {
                item: "folder/my job".to_string(),
                run: "17".to_string(),
                artifact: "target/jenkins.war".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_stable_url() {
        let source = parse_source("stable://job#file.war").unwrap();
        assert_eq!(
            source,
            ArtifactSource::Stable {
                item: "job".to_string(),
                artifact: "file.war".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_artifact_url_missing_hash() {
        let err = parse_source("artifact://job/42/dir/file.war").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("artifact://job/42/dir/file.war"));
        assert!(message.contains(ARTIFACT_FORMAT));
    }

    #[test]
    fn test_parse_artifact_url_non_numeric_build() {
        let err = parse_source("artifact://job/latest#file.war").unwrap_err();
        assert!(err.to_string().contains("artifact://job/latest#file.war"));
    }

    #[test]
    fn test_parse_stable_url_missing_hash() {
        let err = parse_source("stable://job/file.war").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("stable://job/file.war"));
        assert!(message.contains(STABLE_FORMAT));
    }

    #[test]
    fn test_parse_maven_url() {
        let source = parse_source("mvn://org.jenkins-ci.main:jenkins-war:2.60.1:war").unwrap();
        assert_eq!(
            source,
            ArtifactSource::Maven {
                group: "org.jenkins-ci.main".to_string(),
                artifact: "jenkins-war".to_string(),
                version: "2.60.1".to_string(),
                packaging: Some("war".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_maven_url_without_packaging() {
        let source = parse_source("mvn://org.jenkins-ci.main:jenkins-war:2.60.1").unwrap();
        match source {
            ArtifactSource::Maven { packaging, .. } => assert!(packaging.is_none()),
            other => panic!("expected Maven source, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_maven_url_too_few_parts() {
        let err = parse_source("mvn://jenkins-war:2.60.1").unwrap_err();
        assert!(err.to_string().contains("mvn://jenkins-war:2.60.1"));
    }

    #[test]
    fn test_parse_plain_url() {
        let source = parse_source("https://updates.example.org/latest/jenkins.war").unwrap();
        assert_eq!(
            source,
            ArtifactSource::PlainUrl("https://updates.example.org/latest/jenkins.war".to_string())
        );
    }

    #[test]
    fn test_parse_empty_url() {
        let err = parse_source("  ").unwrap_err();
        assert!(matches!(err, AthError::MissingParameter { .. }));
    }
}
