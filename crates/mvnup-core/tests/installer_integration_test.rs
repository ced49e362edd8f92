//! End-to-end installer tests against a local HTTP server.

use std::io::Write;
use std::net::SocketAddr;

use mvnup_core::cli::{Output, ProgressManager, Verbosity};
use mvnup_core::config::MAVEN_HOME_VAR;
use mvnup_core::env::{self, EnvScope, EnvStore, MemoryEnv};
use mvnup_core::{HttpClient, InstallConfig, Installer, MvnupError};

/// Build a Maven-shaped distribution zip in memory.
fn distribution_zip(version: &str) -> Vec<u8> {
    let mut writer = zip_writer();
    let options = zip::write::SimpleFileOptions::default();
    let prefix = format!("apache-maven-{}", version);

    writer.add_directory(format!("{}/", prefix), options).unwrap();
    writer
        .start_file(format!("{}/bin/mvn", prefix), options)
        .unwrap();
    writer.write_all(b"#!/bin/sh\necho maven\n").unwrap();
    writer
        .start_file(format!("{}/conf/settings.xml", prefix), options)
        .unwrap();
    writer.write_all(b"<settings/>").unwrap();

    writer.finish().unwrap().into_inner()
}

fn zip_writer() -> zip::ZipWriter<std::io::Cursor<Vec<u8>>> {
    zip::ZipWriter::new(std::io::Cursor::new(Vec::new()))
}

/// Serve every request with the same response body and status.
fn serve(body: Vec<u8>, status: u16) -> SocketAddr {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = tiny_http::Response::from_data(body.clone())
                .with_status_code(tiny_http::StatusCode(status));
            let _ = request.respond(response);
        }
    });

    addr
}

fn installer_for(
    version: &str,
    addr: SocketAddr,
    install_root: &std::path::Path,
) -> Installer<MemoryEnv> {
    let config = InstallConfig {
        version: version.to_string(),
        install_root: install_root.to_path_buf(),
        mirror: format!("http://{}", addr),
    };

    Installer::new(config, HttpClient::new().unwrap(), MemoryEnv::new())
        .with_output(Output::new().with_verbosity(Verbosity::Quiet))
        .with_progress(ProgressManager::new(false))
}

#[tokio::test]
async fn test_install_on_clean_machine() {
    // Version is unique per test so staged archives never collide.
    let version = "9.9.1-local";
    let addr = serve(distribution_zip(version), 200);
    let temp_dir = tempfile::TempDir::new().unwrap();

    let installer = installer_for(version, addr, temp_dir.path());
    let report = installer.run().await.unwrap();

    // Extracted contents keep the archive's own directory structure.
    let install_dir = temp_dir.path().join(format!("Maven{}", version));
    assert_eq!(report.install_dir, install_dir);
    assert!(install_dir
        .join(format!("apache-maven-{}/bin/mvn", version))
        .is_file());

    // The staged archive is gone after the run.
    let staged = std::env::temp_dir().join(format!("apache-maven-{}-bin.zip", version));
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_install_registers_environment() {
    let version = "9.9.2-local";
    let addr = serve(distribution_zip(version), 200);
    let temp_dir = tempfile::TempDir::new().unwrap();

    let env = MemoryEnv::new();
    env.set(env::PATH_VAR, "/usr/bin", EnvScope::Machine).unwrap();

    let config = InstallConfig {
        version: version.to_string(),
        install_root: temp_dir.path().to_path_buf(),
        mirror: format!("http://{}", addr),
    };
    let bin_entry = config.bin_dir().to_string_lossy().into_owned();
    let installer = Installer::new(config, HttpClient::new().unwrap(), env)
        .with_output(Output::new().with_verbosity(Verbosity::Quiet))
        .with_progress(ProgressManager::new(false));

    let report = installer.run().await.unwrap();
    assert!(report.path_updated);

    let maven_home = installer
        .env()
        .get(MAVEN_HOME_VAR, EnvScope::Machine)
        .unwrap()
        .unwrap();
    assert_eq!(maven_home, report.install_dir.to_string_lossy());

    // Second run with the same version: the path entry must not repeat.
    let report = installer.run().await.unwrap();
    assert!(!report.path_updated);

    let path = installer
        .env()
        .get(env::PATH_VAR, EnvScope::Machine)
        .unwrap()
        .unwrap();
    assert!(path.starts_with("/usr/bin"));
    assert_eq!(path.matches(bin_entry.as_str()).count(), 1);
}

#[tokio::test]
async fn test_preoccupied_staging_path_fails_before_extraction() {
    let version = "9.9.3-local";
    let addr = serve(distribution_zip(version), 200);
    let temp_dir = tempfile::TempDir::new().unwrap();

    let staged = std::env::temp_dir().join(format!("apache-maven-{}-bin.zip", version));
    std::fs::write(&staged, b"left over from somewhere else").unwrap();

    let installer = installer_for(version, addr, temp_dir.path());
    let result = installer.run().await;

    assert!(matches!(result, Err(MvnupError::Http(_))));

    // Nothing was extracted and the stale file was still cleaned up.
    let install_dir = temp_dir.path().join(format!("Maven{}", version));
    assert!(std::fs::read_dir(&install_dir).unwrap().next().is_none());
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_http_error_leaves_no_side_effects() {
    let version = "9.9.4-local";
    let addr = serve(b"not found".to_vec(), 404);
    let temp_dir = tempfile::TempDir::new().unwrap();

    let env = MemoryEnv::new();
    let config = InstallConfig {
        version: version.to_string(),
        install_root: temp_dir.path().to_path_buf(),
        mirror: format!("http://{}", addr),
    };
    let installer = Installer::new(config, HttpClient::new().unwrap(), env)
        .with_output(Output::new().with_verbosity(Verbosity::Quiet))
        .with_progress(ProgressManager::new(false));

    let result = installer.run().await;
    assert!(result.is_err());

    // No extraction, no environment mutation, no staged archive.
    let install_dir = temp_dir.path().join(format!("Maven{}", version));
    assert!(std::fs::read_dir(&install_dir).unwrap().next().is_none());
    assert_eq!(
        installer.env().get(MAVEN_HOME_VAR, EnvScope::Machine).unwrap(),
        None
    );
    let staged = std::env::temp_dir().join(format!("apache-maven-{}-bin.zip", version));
    assert!(!staged.exists());
}
