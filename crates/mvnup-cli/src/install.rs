//! Install command - download and register Apache Maven.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use mvnup_core::cli::{Output, ProgressManager, Verbosity};
use mvnup_core::env::EnvScope;
use mvnup_core::{HttpClient, HttpClientConfig, InstallConfig, Installer, SystemEnv};

use crate::config::MvnupConfig;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Maven version to install
    #[arg(long, value_name = "VERSION")]
    pub maven_version: Option<String>,

    /// Directory under which the versioned install directory is created
    #[arg(long, value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Base URL of the downloads host
    #[arg(long, value_name = "URL")]
    pub mirror: Option<String>,

    /// Register environment variables for the current user instead of the machine
    #[arg(long)]
    pub user: bool,

    /// Abort the download after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Print the install report as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not output any message
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl InstallArgs {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Debug,
            }
        }
    }
}

pub async fn execute(args: InstallArgs) -> Result<i32> {
    // mvnup.toml supplies defaults; CLI flags take precedence.
    let file_config = MvnupConfig::load_from_cwd()?.unwrap_or_default();
    let defaults = InstallConfig::default();

    let config = InstallConfig {
        version: args
            .maven_version
            .clone()
            .or(file_config.maven.version)
            .unwrap_or(defaults.version),
        install_root: args
            .install_root
            .clone()
            .or(file_config.maven.install_root.map(PathBuf::from))
            .unwrap_or(defaults.install_root),
        mirror: args
            .mirror
            .clone()
            .or(file_config.maven.mirror)
            .unwrap_or(defaults.mirror),
    }
    .validated()?;

    let mut http_config = HttpClientConfig::new();
    if let Some(seconds) = args.timeout {
        http_config = http_config.with_timeout(Duration::from_secs(seconds));
    }
    let http = HttpClient::with_config(http_config)
        .context("Failed to create HTTP client")?;

    let scope = if args.user {
        EnvScope::User
    } else {
        EnvScope::Machine
    };

    let output = Output::new().with_verbosity(args.verbosity());
    let progress = ProgressManager::new(!args.no_progress && !args.quiet);

    log::info!(
        "installing Maven {} into {} ({} scope)",
        config.version,
        config.install_dir().display(),
        scope
    );

    let installer = Installer::new(config, http, SystemEnv::new())
        .with_scope(scope)
        .with_output(output)
        .with_progress(progress);

    let report = installer.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(0)
}
