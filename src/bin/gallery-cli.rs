use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plant_tracker_web::gallery::{
    Dispatcher, Event, GalleryApi, GalleryConfig, GalleryController, HttpGalleryApi, ImageId,
    TerminalView, TimelapseWindow, UploadFile,
};

#[derive(Parser)]
#[command(name = "gallery-cli")]
#[command(about = "Browse and manage a plant's image gallery", long_about = None)]
struct Cli {
    /// Base URL of the web front end
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    url: String,

    #[arg(short, long, default_value_t = 1)]
    plant_id: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the plant's images
    List,
    /// Upload an image file
    Upload {
        path: PathBuf,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Show the analysis of an image
    Analyze { image_id: String },
    /// Share an image to Instagram
    Share { image_id: String },
    /// Build a timelapse from the plant's images
    Timelapse {
        /// Only images uploaded on or after this date (e.g. 2024-05-01)
        #[arg(long)]
        start_date: Option<String>,
        /// Only images uploaded on or before this date
        #[arg(long)]
        end_date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plant_tracker_web=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = HttpGalleryApi::new(&cli.url)?;
    let controller = GalleryController::new(GalleryConfig {
        api_base: cli.url.clone(),
        plant_id: cli.plant_id,
        ..GalleryConfig::default()
    });
    let mut gallery = Dispatcher::new(controller, api.clone(), TerminalView);

    match cli.command {
        Commands::List => gallery.dispatch(Event::Refresh).await,
        Commands::Upload { path, notes } => {
            let file = read_upload(&path).await?;
            gallery
                .dispatch(Event::UploadSubmitted {
                    plant_id: cli.plant_id,
                    file: Some(file),
                    notes,
                })
                .await;
        }
        Commands::Analyze { image_id } => {
            select(&mut gallery, &api, cli.plant_id, image_id).await;
            gallery.dispatch(Event::AnalyzeClicked).await;
        }
        Commands::Share { image_id } => {
            select(&mut gallery, &api, cli.plant_id, image_id).await;
            gallery.dispatch(Event::ShareClicked).await;
        }
        Commands::Timelapse {
            start_date,
            end_date,
        } => {
            gallery
                .dispatch(Event::TimelapseClicked(TimelapseWindow {
                    start_date,
                    end_date,
                }))
                .await
        }
    }

    Ok(())
}

/// Open an image the way a gallery click would. The filename is looked up
/// so the printed image URL is right; the id alone is enough otherwise.
async fn select(
    gallery: &mut Dispatcher<HttpGalleryApi, TerminalView>,
    api: &HttpGalleryApi,
    plant_id: u64,
    image_id: String,
) {
    let image_id = ImageId::new(image_id);
    let filename = match api.list_images(plant_id).await {
        Ok(list) => list
            .images
            .into_iter()
            .find(|image| image.id == image_id)
            .map(|image| image.filename),
        Err(e) => {
            tracing::warn!(error = %e, "could not look up image filename");
            None
        }
    }
    .unwrap_or_else(|| image_id.to_string());

    gallery
        .dispatch(Event::ImageClicked { image_id, filename })
        .await;
}

async fn read_upload(path: &PathBuf) -> Result<UploadFile, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(UploadFile {
        content_type: mime_guess::from_path(path).first().map(|m| m.to_string()),
        filename,
        bytes,
    })
}
