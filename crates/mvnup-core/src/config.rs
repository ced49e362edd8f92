//! Install parameters and the locations derived from them.
//!
//! Every value has a fixed default so a bare run installs the pinned
//! Maven release; callers may override any of them.

use std::path::PathBuf;

use crate::{MvnupError, Result};

/// Environment variable registered to point at the install directory.
pub const MAVEN_HOME_VAR: &str = "MAVEN_HOME";

/// Maven release installed when no version is given.
pub const DEFAULT_VERSION: &str = "3.9.9";

/// Default Apache downloads host.
pub const DEFAULT_MIRROR: &str = "https://downloads.apache.org";

/// Parameters for a single install run.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Maven version to install, e.g. "3.9.9".
    pub version: String,
    /// Directory under which the versioned install directory is created.
    pub install_root: PathBuf,
    /// Base URL of the downloads host.
    pub mirror: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            install_root: default_install_root(),
            mirror: DEFAULT_MIRROR.to_string(),
        }
    }
}

impl InstallConfig {
    /// Validate the configuration, returning it unchanged on success.
    pub fn validated(self) -> Result<Self> {
        if self.version.trim().is_empty() {
            return Err(MvnupError::Config("version must not be empty".to_string()));
        }
        if self.version.contains(['/', '\\']) {
            return Err(MvnupError::Config(format!(
                "version must not contain path separators: {}",
                self.version
            )));
        }
        if self.mirror.trim().is_empty() {
            return Err(MvnupError::Config("mirror must not be empty".to_string()));
        }
        Ok(self)
    }

    /// Directory the archive is extracted into.
    pub fn install_dir(&self) -> PathBuf {
        self.install_root.join(format!("Maven{}", self.version))
    }

    /// Executable directory appended to the search path.
    pub fn bin_dir(&self) -> PathBuf {
        self.install_dir().join("bin")
    }

    /// File name of the distribution archive.
    pub fn archive_name(&self) -> String {
        format!("apache-maven-{}-bin.zip", self.version)
    }

    /// Full download URL for the distribution archive.
    pub fn download_url(&self) -> String {
        format!(
            "{}/maven/maven-3/{}/binaries/{}",
            self.mirror.trim_end_matches('/'),
            self.version,
            self.archive_name()
        )
    }

    /// Where the archive is staged during the run.
    pub fn temp_archive_path(&self) -> PathBuf {
        std::env::temp_dir().join(self.archive_name())
    }
}

#[cfg(windows)]
fn default_install_root() -> PathBuf {
    std::env::var_os("ProgramFiles")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
        .join("Maven")
}

#[cfg(not(windows))]
fn default_install_root() -> PathBuf {
    PathBuf::from("/opt/maven")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstallConfig::default();
        assert_eq!(config.version, "3.9.9");
        assert_eq!(config.mirror, DEFAULT_MIRROR);
    }

    #[test]
    fn test_download_url_shape() {
        let config = InstallConfig::default();
        assert_eq!(
            config.download_url(),
            "https://downloads.apache.org/maven/maven-3/3.9.9/binaries/apache-maven-3.9.9-bin.zip"
        );
    }

    #[test]
    fn test_download_url_trailing_slash_mirror() {
        let config = InstallConfig {
            mirror: "https://mirror.example.org/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.download_url(),
            "https://mirror.example.org/maven/maven-3/3.9.9/binaries/apache-maven-3.9.9-bin.zip"
        );
    }

    #[test]
    fn test_install_dir_includes_version() {
        let config = InstallConfig {
            install_root: PathBuf::from("/opt/maven"),
            ..Default::default()
        };
        assert_eq!(config.install_dir(), PathBuf::from("/opt/maven/Maven3.9.9"));
        assert_eq!(config.bin_dir(), PathBuf::from("/opt/maven/Maven3.9.9/bin"));
    }

    #[test]
    fn test_temp_archive_path_file_name() {
        let config = InstallConfig::default();
        let path = config.temp_archive_path();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "apache-maven-3.9.9-bin.zip"
        );
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_validated_rejects_empty_version() {
        let config = InstallConfig {
            version: "".to_string(),
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_validated_rejects_path_separators() {
        let config = InstallConfig {
            version: "3.9.9/../evil".to_string(),
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }
}
