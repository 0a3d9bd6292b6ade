#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use school_portal_theme::persistence::JsonFileStorage;
use school_portal_theme::{
    AppConfig, AssetKind, Document, HttpBackend, PresentationRuntime, VisibilityFlag, upload_asset,
};

#[derive(Parser, Debug)]
#[command(name = "school-portal-theme", version, about = "School portal settings and theme tools")]
struct Cli {
    /// Config file (defaults to <config dir>/school-portal-theme/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch both settings resources and print the resulting document state
    Preview,
    /// Query or change the contact ribbon visibility
    Ribbon {
        #[command(subcommand)]
        action: RibbonAction,
    },
    /// Upload a logo or favicon and print its absolute URL
    Upload {
        #[arg(value_enum)]
        kind: UploadKind,
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum RibbonAction {
    Show,
    Hide,
    Status,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum UploadKind {
    Logo,
    Favicon,
}

impl From<UploadKind> for AssetKind {
    fn from(kind: UploadKind) -> Self {
        match kind {
            UploadKind::Logo => AssetKind::Logo,
            UploadKind::Favicon => AssetKind::Favicon,
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout carries command output, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn preview(config: &AppConfig) -> Result<()> {
    let backend = Arc::new(HttpBackend::new(&config.api_base_url, config.request_timeout())?);
    let runtime = PresentationRuntime::start(backend, Document::new());
    runtime.settled().await;

    if let Some(error) = runtime.remote().error() {
        warn!(error = %error, "School settings unavailable");
    }
    if let Some(error) = runtime.design().error() {
        warn!(error = %error, "Design settings unavailable, showing defaults");
    }

    let json = serde_json::to_string_pretty(&runtime.document())
        .context("Failed to serialize document state")?;
    println!("{json}");
    Ok(())
}

fn ribbon(config: &AppConfig, action: RibbonAction) -> Result<()> {
    let storage = JsonFileStorage::new(config.storage_path());
    let mut flag = VisibilityFlag::contact_ribbon(storage);

    match action {
        RibbonAction::Show => flag.show()?,
        RibbonAction::Hide => flag.hide()?,
        RibbonAction::Status => {}
    }

    println!("{}", if flag.is_visible() { "visible" } else { "hidden" });
    Ok(())
}

async fn upload(config: &AppConfig, kind: UploadKind, file: PathBuf) -> Result<()> {
    let bytes = std::fs::read(&file).with_context(|| format!("Failed to read {:?}", file))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Upload path has no file name")?;

    let backend = HttpBackend::new(&config.api_base_url, config.request_timeout())?;
    let url = upload_asset(&backend, kind.into(), &file_name, bytes).await?;
    println!("{url}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Must precede AppConfig::load, which logs
    init_tracing(&AppConfig::startup_log_level(cli.config.as_deref()))?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        info!(api = %url, "API base URL overridden from command line");
        config.api_base_url = url;
    }

    info!(api = %config.api_base_url, "Starting");

    match cli.command {
        Command::Preview => preview(&config).await,
        Command::Ribbon { action } => ribbon(&config, action),
        Command::Upload { kind, file } => upload(&config, kind, file).await,
    }
}
