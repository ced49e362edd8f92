mod config;
mod install;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "mvnup")]
#[command(about = "Download Apache Maven and register it in the environment")]
#[command(version)]
struct Args {
    #[command(flatten)]
    install: install::InstallArgs,
}

fn run() -> Result<i32> {
    env_logger::init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create async runtime: {}", e))?;
    rt.block_on(install::execute(args.install))
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
