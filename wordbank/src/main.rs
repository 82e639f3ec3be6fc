use clap::{Args, Parser, Subcommand};
use config::{Config, ConfigError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use upload_api::config::{Config as UploadApiConfig, ValidationError};
use upload_api::errors::UploadApiError;

mod config;
mod telemetry;

#[derive(Parser)]
#[command(name = "wordbank", version, about = "Upload service for alphabet word images")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the upload API and its admin listener
    UploadApi(ConfigArgs),
    /// Load and validate the config file, then exit
    CheckConfig(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long, env = "WORDBANK_CONFIG", default_value = "wordbank.yaml")]
    config_file_path: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("config has no upload_api section")]
    MissingUploadApi,
    #[error("invalid upload_api config: {0}")]
    Validation(#[from] ValidationError),
    #[error("telemetry setup failed: {0}")]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("upload API stopped: {0}")]
    UploadApi(#[from] UploadApiError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        CliCommand::UploadApi(args) => {
            let (config, upload_api_config) = load(&args)?;
            let _telemetry = telemetry::init(&config.common)?;

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                config = %args.config_file_path.display(),
                "Starting upload API"
            );

            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            rt.block_on(upload_api::run(upload_api_config))?;
            Ok(())
        }
        CliCommand::CheckConfig(args) => {
            let (_config, upload_api_config) = load(&args)?;
            println!(
                "{}: ok (listening on {}, admin on {})",
                args.config_file_path.display(),
                upload_api_config.listener.address(),
                upload_api_config.admin_listener.address()
            );
            Ok(())
        }
    }
}

fn load(args: &ConfigArgs) -> Result<(Config, UploadApiConfig), CliError> {
    let mut config = Config::from_file(&args.config_file_path)?;
    let upload_api_config = config
        .upload_api
        .take()
        .ok_or(CliError::MissingUploadApi)?;
    upload_api_config.validate()?;
    Ok((config, upload_api_config))
}
