pub mod archive;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod http;
pub mod installer;
pub mod temp;

pub use config::InstallConfig;
pub use env::{EnvScope, EnvStore, MemoryEnv, SystemEnv};
pub use error::{MvnupError, Result};
pub use http::{HttpClient, HttpClientConfig};
pub use installer::{InstallReport, Installer};
pub use temp::TempFileGuard;
