//! Sumi - headless ink-brush canvas
//!
//! Replays recorded pointer scripts through the canvas, writes the final
//! snapshot, and optionally posts it through the simulated share backend.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use painting::{InkCanvas, SNAPSHOT_QUALITY, SnapshotFormat, load_font};
use sumi_config::{JsonFileStore, MemoryStore, PreferenceStore, SurfaceConfig};
use sumi_share::{PostBackend, SimulatedPost, compose_post};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod script;

#[derive(Parser)]
#[command(name = "sumi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ink-brush calligraphy canvas", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a pointer script and write the resulting image
    Replay(ReplayArgs),

    /// Show or update stored preferences
    Settings {
        /// Preference file
        #[arg(long)]
        prefs: PathBuf,

        /// New stamp text (1-4 characters recommended)
        #[arg(long)]
        stamp_text: Option<String>,

        /// New artist name
        #[arg(long)]
        artist: Option<String>,

        /// Font used for stamp glyphs
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ReplayArgs {
    /// JSON script of pointer events and tool changes
    script: PathBuf,

    /// Output image path (defaults to sumi.<format>)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Paper width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Paper height in logical pixels
    #[arg(long)]
    height: Option<u32>,

    /// Device pixels per logical pixel (overrides SUMI_PIXEL_DENSITY)
    #[arg(long)]
    density: Option<f32>,

    /// Preference file; in-memory defaults when omitted
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Stamp font, overriding the one in preferences
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON brush/stamp profile table replacing the built-in one
    #[arg(long)]
    profiles: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Jpeg)]
    format: Format,

    /// Encoder quality in 0.0-1.0 (JPEG only)
    #[arg(long, default_value_t = SNAPSHOT_QUALITY)]
    quality: f32,

    /// Post the last snapshot with this title
    #[arg(long)]
    post_title: Option<String>,

    /// Artist for the post; defaults to the stored artist name
    #[arg(long)]
    artist: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Jpeg,
    Png,
}

impl From<Format> for SnapshotFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Jpeg => SnapshotFormat::Jpeg,
            Format::Png => SnapshotFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Replay(args) => cmd_replay(args).await,
        Commands::Settings {
            prefs,
            stamp_text,
            artist,
            font,
        } => cmd_settings(&prefs, stamp_text.as_deref(), artist.as_deref(), font),
    }
}

fn open_store(path: Option<&Path>) -> Result<Arc<dyn PreferenceStore>> {
    Ok(match path {
        Some(path) => Arc::new(
            JsonFileStore::open(path)
                .with_context(|| format!("Failed to open preferences {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    })
}

async fn cmd_replay(args: ReplayArgs) -> Result<()> {
    let mut config = SurfaceConfig::from_env();
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(density) = args.density {
        config = config.with_pixel_density(density);
    }

    let store = open_store(args.prefs.as_deref())?;
    let mut canvas = InkCanvas::new(Arc::clone(&store));
    if let Some(path) = &args.profiles {
        canvas = canvas.with_profiles(script::load_profiles(path)?);
    }
    if let Some(path) = &args.font {
        canvas.set_font(Some(load_font(path)?));
    }
    canvas.initialize_with(&config)?;

    let last_snapshot: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&last_snapshot);
    canvas.on_snapshot(move |uri| *sink.borrow_mut() = Some(uri.to_string()));

    let steps = script::load_script(&args.script)?;
    let report = script::replay(&mut canvas, &steps)?;
    info!(
        "Replayed {} steps: {} pointer events, {} strokes",
        report.steps, report.pointer_events, report.strokes
    );

    let format = SnapshotFormat::from(args.format);
    let snapshot = canvas.export_snapshot(format, args.quality)?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("sumi.{}", format.extension())));
    std::fs::write(&out, &snapshot.bytes)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!(
        "Wrote {}x{} {} to {}",
        snapshot.width,
        snapshot.height,
        format.mime_type(),
        out.display()
    );

    if let Some(title) = args.post_title {
        let artist = args.artist.unwrap_or_else(|| store.artist_name());
        let uri = last_snapshot.borrow().clone();
        if uri.is_none() {
            warn!("Nothing was drawn or stamped, so there is no snapshot to post");
        }
        let request = compose_post(store.as_ref(), &title, &artist, uri.as_deref())?;
        let receipt = SimulatedPost::default().post(request).await?;
        info!("Shared as {}", receipt.post_id);
    }

    Ok(())
}

fn cmd_settings(
    prefs: &Path,
    stamp_text: Option<&str>,
    artist: Option<&str>,
    font: Option<PathBuf>,
) -> Result<()> {
    let store = JsonFileStore::open(prefs)?;
    let mut current = store.load();
    let changed = stamp_text.is_some() || artist.is_some() || font.is_some();

    if let Some(text) = stamp_text {
        current.stamp_text = text.to_string();
    }
    if let Some(name) = artist {
        current.artist_name = name.to_string();
    }
    if font.is_some() {
        current.stamp_font = font;
    }
    if changed {
        store.save(&current)?;
        info!("Updated {}", prefs.display());
    }

    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}
