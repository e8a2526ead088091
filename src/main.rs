//! # https-dwnld CLI
//!
//! Command-line interface for the https-dwnld library.
//! Downloads a file from a password protected HTTPS URL, or prints it.

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};
use https_dwnld::{
    write_content, DownloadOptions, Downloader, FetcherConfig, Outcome, ReqwestFetcher,
    ResultToken,
};
use env_logger::Env;
use log::{debug, error};

mod cli;

/// Command-line interface for https-dwnld
#[derive(Parser, Debug)]
#[command(name = "https-dwnld")]
#[command(about = "Download a file from a password protected HTTPS URL")]
#[command(long_about = "Downloads a file protected by HTTP Basic Authentication:
  https-dwnld USER PASS https://host/path/file.zip -o ./downloads   # Save as ./downloads/file.zip
  https-dwnld USER PASS https://host/path/notes.txt -s              # Print content to console

Prints `Completed` after saving, nothing after showing, and `Error` on any failure.")]
#[command(version = env!("HTTPS_DWNLD_VERSION"), disable_version_flag = true)]
#[command(group(ArgGroup::new("action").required(true).args(["out_dir", "show"])))]
struct Cli {
    /// HTTP Basic Authentication user
    user: String,

    /// HTTP Basic Authentication password
    password: String,

    /// URL of a file to be downloaded
    url: String,

    /// Downloading output directory
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    out_dir: Option<PathBuf>,

    /// Show file content to console
    #[arg(short, long)]
    show: bool,

    /// Hide progress bar
    #[arg(short, long)]
    raw: bool,

    /// Increase logging verbosity
    #[arg(long)]
    debug: bool,

    /// Accept self-signed or unverified TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Display version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr, keeping stdout for content and the status token
    env_logger::Builder::from_env(Env::default().default_filter_or(default_log_filter(cli.debug)))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(&cli).await {
        error!("❌ Error: {e}");
        std::process::exit(1);
    }
}

/// Log filter used when `RUST_LOG` is unset; only this crate is raised by `--debug`
fn default_log_filter(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    debug!("https-dwnld v{} starting", env!("HTTPS_DWNLD_VERSION"));

    let result = download(cli).await;
    if let Err(ref e) = result {
        error!("{e}");
    }

    let mut stdout = std::io::stdout().lock();
    if let Ok(Outcome::Shown(ref content)) = result {
        write_content(&mut stdout, content)?;
    }
    write!(stdout, "{}", ResultToken::from_result(&result))?;
    stdout.flush()?;

    Ok(())
}

/// Run the download described by the command line
async fn download(cli: &Cli) -> https_dwnld::Result<Outcome> {
    let config = FetcherConfig {
        accept_invalid_certs: cli.insecure,
        ..Default::default()
    };
    let fetcher = ReqwestFetcher::new(&config)?;

    let options = DownloadOptions {
        progress: cli::progress_callback(cli.raw),
        ..Default::default()
    };

    Downloader::with_options(fetcher, options)
        .download_from_args(
            &cli.user,
            &cli.password,
            &cli.url,
            cli.out_dir.clone(),
            cli.show,
        )
        .await
}
