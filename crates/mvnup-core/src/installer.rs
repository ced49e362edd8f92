//! The install sequence.
//!
//! One forward path: ensure the install directory exists, download the
//! distribution archive to a staging file, extract it, register
//! `MAVEN_HOME`, and append the executable directory to the search path.
//! The staged archive is removed on every exit path; nothing else is
//! rolled back on failure.

use std::path::PathBuf;

use serde::Serialize;

use crate::archive::ZipExtractor;
use crate::cli::{Output, ProgressManager};
use crate::config::{InstallConfig, MAVEN_HOME_VAR};
use crate::env::{self, EnvScope, EnvStore};
use crate::http::HttpClient;
use crate::temp::TempFileGuard;
use crate::Result;

/// Outcome of a completed install run.
#[derive(Debug, Serialize)]
pub struct InstallReport {
    /// Directory the archive was extracted into.
    pub install_dir: PathBuf,
    /// URL the archive was fetched from.
    pub url: String,
    /// Scope the environment variables were written at.
    pub scope: String,
    /// Whether the search path gained a new entry (false when the
    /// executable directory was already registered).
    pub path_updated: bool,
}

/// Performs the install sequence over an injected environment store.
pub struct Installer<E: EnvStore> {
    config: InstallConfig,
    http: HttpClient,
    env: E,
    scope: EnvScope,
    output: Output,
    progress: ProgressManager,
}

impl<E: EnvStore> Installer<E> {
    pub fn new(config: InstallConfig, http: HttpClient, env: E) -> Self {
        Self {
            config,
            http,
            env,
            scope: EnvScope::Machine,
            output: Output::new(),
            progress: ProgressManager::default(),
        }
    }

    /// Register environment variables at this scope instead of machine scope.
    pub fn with_scope(mut self, scope: EnvScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    /// The environment store this installer writes to.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Run the whole sequence once.
    pub async fn run(&self) -> Result<InstallReport> {
        let install_dir = self.config.install_dir();
        if !install_dir.exists() {
            self.output.info(&format!(
                "Creating installation directory at {}...",
                install_dir.display()
            ));
            std::fs::create_dir_all(&install_dir)?;
        }

        // Armed before the download so the staged archive is deleted on
        // every exit path from here on.
        let staging = TempFileGuard::new(self.config.temp_archive_path());

        let url = self.config.download_url();
        self.output.info(&format!(
            "Downloading Apache Maven {}...",
            self.config.version
        ));
        log::debug!("GET {}", url);

        let bar = self
            .progress
            .create_download_bar(&self.config.archive_name(), 0);
        let bar_handle = bar.clone();
        self.http
            .download(
                &url,
                staging.path(),
                Some(move |downloaded, total| {
                    if total > 0 {
                        bar_handle.set_length(total);
                    }
                    bar_handle.set_position(downloaded);
                }),
            )
            .await?;
        bar.finish_and_clear();
        log::debug!("downloaded {} to {}", url, staging.path().display());

        self.output.info("Extracting Apache Maven...");
        let entries = ZipExtractor::extract(staging.path(), &install_dir)?;
        log::debug!("extracted {} entries into {}", entries, install_dir.display());

        let path_updated = self.register_environment(&install_dir)?;

        self.output.success("Apache Maven installed successfully!");

        Ok(InstallReport {
            install_dir,
            url,
            scope: self.scope.to_string(),
            path_updated,
        })
    }

    /// Set `MAVEN_HOME` and append the executable directory to the search
    /// path if it is not already there. Returns whether the path changed.
    fn register_environment(&self, install_dir: &std::path::Path) -> Result<bool> {
        self.output.info(&format!(
            "Setting {} environment variable...",
            MAVEN_HOME_VAR
        ));
        self.env.set(
            MAVEN_HOME_VAR,
            &install_dir.to_string_lossy(),
            self.scope,
        )?;

        let bin_dir = self.config.bin_dir();
        let bin_entry = bin_dir.to_string_lossy();
        let current = self.env.get(env::PATH_VAR, self.scope)?.unwrap_or_default();

        match env::append_entry(&current, &bin_entry) {
            Some(updated) => {
                self.output.info(&format!(
                    "Updating {} environment variable...",
                    env::PATH_VAR
                ));
                self.env.set(env::PATH_VAR, &updated, self.scope)?;
                Ok(true)
            }
            None => {
                self.output.verbose(&format!(
                    "{} already contains {}",
                    env::PATH_VAR,
                    bin_entry
                ));
                Ok(false)
            }
        }
    }
}
