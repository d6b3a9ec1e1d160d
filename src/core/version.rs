use crate::utils::error::{AthError, Result};
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

/// Maven drops the build's pom.properties here when packaging the war.
pub const POM_PROPERTIES_PATH: &str =
    "META-INF/maven/org.jenkins-ci.main/jenkins-war/pom.properties";
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const MANIFEST_VERSION_ATTRIBUTE: &str = "Jenkins-Version";

/// Opens the archive to prove it is a readable zip. A download that is
/// truncated or an HTML error page fails here, before anything is stashed.
pub fn self_test(war: &[u8], path: &str) -> Result<()> {
    ZipArchive::new(Cursor::new(war)).map_err(|e| AthError::CorruptArchive {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Discovers the version baked into the war: the `version` field of the
/// embedded pom.properties wins, the `Jenkins-Version` manifest attribute is
/// the fallback, and a war carrying neither yields `None`.
pub fn discover_version(war: &[u8]) -> Result<Option<String>> {
    let mut archive = ZipArchive::new(Cursor::new(war))?;

    if let Some(contents) = read_entry(&mut archive, POM_PROPERTIES_PATH)? {
        if let Some(version) = properties_field(&contents, "version") {
            return Ok(Some(version));
        }
    }

    if let Some(contents) = read_entry(&mut archive, MANIFEST_PATH)? {
        return Ok(properties_field_with_separator(
            &contents,
            MANIFEST_VERSION_ATTRIBUTE,
            ':',
        ));
    }

    Ok(None)
}

fn read_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut contents = String::new();
            entry.read_to_string(&mut contents)?;
            Ok(Some(contents))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn properties_field(contents: &str, key: &str) -> Option<String> {
    properties_field_with_separator(contents, key, '=')
}

fn properties_field_with_separator(contents: &str, key: &str, separator: char) -> Option<String> {
    for line in contents.lines() {
        if let Some((name, value)) = line.split_once(separator) {
            if name.trim() == key && !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{FileOptions, ZipWriter};

    fn make_war(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            zip.start_file::<_, ()>(*name, FileOptions::default()).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_version_from_pom_properties() {
        let war = make_war(&[(
            POM_PROPERTIES_PATH,
            "#Generated by Maven\ngroupId=org.jenkins-ci.main\nversion=2.60.1\n",
        )]);
        assert_eq!(discover_version(&war).unwrap(), Some("2.60.1".to_string()));
    }

    #[test]
    fn test_version_from_manifest_fallback() {
        let war = make_war(&[(
            MANIFEST_PATH,
            "Manifest-Version: 1.0\nJenkins-Version: 2.60.1\n",
        )]);
        assert_eq!(discover_version(&war).unwrap(), Some("2.60.1".to_string()));
    }

    #[test]
    fn test_pom_properties_wins_over_manifest() {
        let war = make_war(&[
            (POM_PROPERTIES_PATH, "version=2.60.1\n"),
            (MANIFEST_PATH, "Jenkins-Version: 2.99\n"),
        ]);
        assert_eq!(discover_version(&war).unwrap(), Some("2.60.1".to_string()));
    }

    #[test]
    fn test_blank_pom_version_falls_back_to_manifest() {
        let war = make_war(&[
            (POM_PROPERTIES_PATH, "version=   \n"),
            (MANIFEST_PATH, "Jenkins-Version: 2.60.1\n"),
        ]);
        assert_eq!(discover_version(&war).unwrap(), Some("2.60.1".to_string()));
    }

    #[test]
    fn test_no_version_anywhere() {
        let war = make_war(&[("WEB-INF/web.xml", "<web-app/>")]);
        assert_eq!(discover_version(&war).unwrap(), None);
    }

    #[test]
    fn test_self_test_accepts_valid_archive() {
        let war = make_war(&[("WEB-INF/web.xml", "<web-app/>")]);
        assert!(self_test(&war, "jenkins.war").is_ok());
    }

    #[test]
    fn test_self_test_rejects_garbage() {
        let err = self_test(b"<html>502 Bad Gateway</html>", "jenkins.war").unwrap_err();
        assert!(matches!(err, AthError::CorruptArchive { .. }));
        assert!(err.to_string().contains("jenkins.war"));
    }
}
