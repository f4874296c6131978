//! mediagate: image URL compression and uploads from the command line.
//!
//! Settings come from the environment (a `.env` file is honored); image tables
//! are read from the JSON file named by IMAGE_CONFIG_PATH. Results print as
//! JSON; error details are left out when ENVIRONMENT is production.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediagate_cli::{init_tracing, log_app_error, parse_custom, parse_rule, ErrorReport};
use mediagate_core::{
    AppError, CompressOptions, Config, ImageCompressor, ImageConfig, ObjectType,
};
use mediagate_processing::{UploadHandler, UploadSource};
use mediagate_storage::create_storage;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "mediagate", about = "Image compression URLs and media uploads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite an image URL to a processed derivative
    CompressUrl {
        url: String,
        /// Target width in pixels; omit to keep the original width
        #[arg(long)]
        width: Option<u32>,
        #[arg(long, default_value = "jpg")]
        format: String,
        #[arg(long, default_value = "100")]
        quality: u8,
        /// Use the internal-network host
        #[arg(long)]
        intra: bool,
    },
    /// Pick the breakpoint for a display width and build the compressed URL
    AutoCompress {
        /// Compression tag in compress_setting
        #[arg(long)]
        tag: String,
        #[arg(long)]
        platform: String,
        /// Requested display width
        #[arg(long)]
        width: String,
        /// Template URL with {$name} placeholders
        #[arg(long, conflicts_with = "options")]
        url: Option<String>,
        /// Placeholder value, name=value (repeatable)
        #[arg(long = "rule", value_parser = parse_rule)]
        rules: Vec<(String, String)>,
        /// Literal URL for a breakpoint, breakpoint=url (repeatable)
        #[arg(long = "custom", value_parser = parse_custom)]
        custom: Vec<(u32, String)>,
        /// Extra compression multiplier
        #[arg(long)]
        rate: Option<f64>,
        /// Full options as JSON instead of --url/--rule/--custom/--rate
        #[arg(long)]
        options: Option<String>,
        #[arg(long, default_value = "webp")]
        format: String,
        #[arg(long)]
        intra: bool,
    },
    /// Upload a file to the configured storage
    Upload {
        file: PathBuf,
        /// Treat the file contents as a base64 payload or data URI
        #[arg(long)]
        base64: bool,
        /// Override UPLOAD_OBJECT_TYPE: image, file, video, audio
        #[arg(long)]
        object_type: Option<ObjectType>,
    },
}

#[derive(Serialize)]
struct UrlResponse {
    url: String,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn load_image_config(config: &Config) -> anyhow::Result<ImageConfig> {
    ImageConfig::load(config.image_config_path()).context("Failed to load image configuration")
}

fn compress_options(
    url: Option<String>,
    rules: Vec<(String, String)>,
    custom: Vec<(u32, String)>,
    rate: Option<f64>,
    options: Option<String>,
) -> anyhow::Result<CompressOptions> {
    if let Some(json) = options {
        return serde_json::from_str(&json).context("Invalid --options JSON");
    }

    let mut options = CompressOptions::new(url.unwrap_or_default());
    options.rules.extend(rules);
    options.custom.extend(custom);
    options.custom_compress_rate = rate;
    Ok(options)
}

async fn run(config: &Config, command: Commands) -> anyhow::Result<Result<(), AppError>> {
    match command {
        Commands::CompressUrl {
            url,
            width,
            format,
            quality,
            intra,
        } => {
            let image_config = load_image_config(config)?;
            let compressor = ImageCompressor::new(&image_config);
            match compressor.compressed_image_url(&url, width, &format, quality, intra) {
                Ok(url) => print_json(&UrlResponse { url })?,
                Err(e) => return Ok(Err(e.into())),
            }
        }
        Commands::AutoCompress {
            tag,
            platform,
            width,
            url,
            rules,
            custom,
            rate,
            options,
            format,
            intra,
        } => {
            let image_config = load_image_config(config)?;
            let options = compress_options(url, rules, custom, rate, options)?;
            let compressor = ImageCompressor::new(&image_config);
            match compressor.auto_compress_image(&tag, &options, &platform, &width, &format, intra)
            {
                Ok(url) => print_json(&UrlResponse { url })?,
                Err(e) => return Ok(Err(e.into())),
            }
        }
        Commands::Upload {
            file,
            base64,
            object_type,
        } => {
            config.validate().context("Invalid configuration")?;
            let image_config = load_image_config(config)?;

            let mut settings = config.upload().clone();
            if let Some(object_type) = object_type {
                settings.object_type = object_type;
            }

            let storage = create_storage(config)
                .await
                .context("Failed to initialize storage")?;
            let handler = match UploadHandler::new(storage, settings, &image_config) {
                Ok(handler) => handler,
                Err(e) => return Ok(Err(e)),
            };

            let source = if base64 {
                let payload = tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                UploadSource::Base64(payload.trim().to_string())
            } else {
                let data = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let original_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                UploadSource::file(original_name, data)
            };

            match handler.upload(source).await {
                Ok(info) => print_json(&info)?,
                Err(e) => return Ok(Err(e)),
            }
        }
    }

    Ok(Ok(()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(
        environment = %config.environment(),
        is_production = config.is_production(),
        "Environment configuration loaded"
    );

    match run(&config, cli.command).await? {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            log_app_error(&err);
            print_json(&ErrorReport::from_app_error(&err, config.is_production()))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
