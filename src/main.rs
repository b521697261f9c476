use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use thumbsmith::ai::mime::detect_image_mime;
use thumbsmith::image::{ImageService, ThumbnailExporter};
use thumbsmith::models::{Config, Logo};
use thumbsmith::session::Session;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "thumbsmith")]
#[command(about = "Generate YouTube thumbnails from a video description")]
struct CliArgs {
    /// Video description; the first line becomes the default title.
    #[arg(value_name = "DESCRIPTION")]
    description: String,

    /// Title to overlay during enhancement (defaults to the description's
    /// first line).
    #[arg(long)]
    title: Option<String>,

    /// Logo image to place on the thumbnail during enhancement.
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Run the enhance cycle after generation (implied by --title or --logo).
    #[arg(long)]
    enhance: bool,

    /// Directory to write youtube_thumbnail.jpeg into
    /// (default: output/<date>_<uuid>).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

impl CliArgs {
    fn wants_enhance(&self) -> bool {
        self.enhance || self.title.is_some() || self.logo.is_some()
    }
}

fn default_output_dir() -> PathBuf {
    let date = Local::now().format("%Y-%m-%d").to_string();
    PathBuf::from("output").join(format!("{}_{}", date, Uuid::new_v4()))
}

fn load_logo(path: &Path) -> thumbsmith::Result<Logo> {
    let data = fs::read(path)?;
    let mime_type = detect_image_mime(&data).to_string();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("logo")
        .to_string();
    Ok(Logo::new(data, filename, mime_type))
}

async fn run(args: CliArgs) -> thumbsmith::Result<PathBuf> {
    let config = Config::from_env()?;
    let output_dir = args.output_dir.clone().unwrap_or_else(default_output_dir);

    let mut session = Session::from_config(&config);
    session.set_description(args.description.clone());
    session.generate().await?;

    if args.wants_enhance() {
        if let Some(title) = &args.title {
            session.set_title(title.clone());
        }
        if let Some(path) = &args.logo {
            session.attach_logo(load_logo(path)?);
        }
        session.enhance().await?;
    }

    let image = session.state().image.clone().ok_or_else(|| {
        thumbsmith::Error::Invariant("Session has no image after a successful run".to_string())
    })?;

    let exporter = ThumbnailExporter::new(&output_dir)?;
    exporter.export_thumbnail(&image).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thumbsmith=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting thumbsmith");

    let args = CliArgs::parse();

    match run(args).await {
        Ok(path) => {
            info!("Thumbnail ready at {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Thumbnail run failed: {}", e);
            std::process::exit(1);
        }
    }
}
