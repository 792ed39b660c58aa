use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cropframe::{
    CanvasLayout, CropConfig, CropEditor, ImageRole, ImageStore, NormalizedCropDescriptor,
    PersistedCropState, PersistedRoleState,
};

#[derive(Parser, Debug)]
#[command(name = "cropframe", version)]
struct Cli {
    /// Optional JSON crop config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the rotated bounds of a source as JSON.
    Bounds(BoundsArgs),
    /// Crop an image and write the result as PNG.
    Crop(CropArgs),
    /// Render the crop overlay as PNG.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct BoundsArgs {
    /// Source width in pixels.
    #[arg(long)]
    width: u32,

    /// Source height in pixels.
    #[arg(long)]
    height: u32,

    /// Rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Display scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Aspect token: free, main, or w:h.
    #[arg(long, default_value = "free")]
    aspect: String,

    /// Crop as fractions of the rotated bounds: nx,ny,nw,nh.
    #[arg(long, value_parser = parse_rect)]
    rect: Option<[f64; 4]>,

    /// Write the persisted crop state JSON here.
    #[arg(long)]
    state: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Aspect token: free, main, or w:h.
    #[arg(long, default_value = "free")]
    aspect: String,

    /// Guide: none, thirds, golden, grid, diagonal.
    #[arg(long, default_value = "thirds")]
    grid: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CropConfig::load(path)?,
        None => CropConfig::default(),
    };
    match cli.cmd {
        Command::Bounds(args) => cmd_bounds(args),
        Command::Crop(args) => cmd_crop(args, config),
        Command::Preview(args) => cmd_preview(args, config),
    }
}

fn parse_rect(s: &str) -> Result<[f64; 4], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; 4]>::try_from(parts).map_err(|v| format!("expected 4 values, got {}", v.len()))
}

#[tracing::instrument]
fn cmd_bounds(args: BoundsArgs) -> anyhow::Result<()> {
    let layout = CanvasLayout::with_scale(args.width, args.height, args.scale);
    let out = serde_json::json!({
        "canvas": layout,
        "bounds": layout.bounds(args.rotation),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn editor_for(path: &Path, config: CropConfig) -> anyhow::Result<CropEditor> {
    let source = cropframe::open_image(path)?;
    let mut store = ImageStore::new();
    store.insert(ImageRole::Primary, source)?;
    Ok(CropEditor::new(config, store)?)
}

#[tracing::instrument(skip(config))]
fn cmd_crop(args: CropArgs, config: CropConfig) -> anyhow::Result<()> {
    let mut editor = editor_for(&args.in_path, config)?;

    if let Some([nx, ny, nw, nh]) = args.rect {
        let source = editor
            .current_image(ImageRole::Primary)
            .context("primary image vanished")?;
        let descriptor = NormalizedCropDescriptor {
            normalized_x: nx,
            normalized_y: ny,
            normalized_width: nw,
            normalized_height: nh,
            rotation: args.rotation,
            original_width: source.width(),
            original_height: source.height(),
            scale: 1.0,
            timestamp: 0,
        };
        let mut seed = PersistedCropState::default();
        seed.roles.insert(
            ImageRole::Primary,
            PersistedRoleState {
                descriptor: Some(descriptor),
                settings: None,
            },
        );
        editor.import_state(seed);
    }

    editor.open_session(ImageRole::Primary)?;
    if args.rect.is_none() {
        editor.set_rotation(args.rotation);
    }
    editor.set_aspect_ratio(&args.aspect)?;
    let outcome = editor.confirm()?;

    let cropped = editor
        .current_image(ImageRole::Primary)
        .context("no committed image")?;
    ensure_parent(&args.out)?;
    cropframe::save_png(&cropped, &args.out)?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        outcome.width,
        outcome.height
    );

    if let Some(path) = &args.state {
        ensure_parent(path)?;
        editor.export_state().save(path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
fn cmd_preview(args: PreviewArgs, config: CropConfig) -> anyhow::Result<()> {
    let mut editor = editor_for(&args.in_path, config)?;
    editor.open_session(ImageRole::Primary)?;
    editor.set_rotation(args.rotation);
    editor.set_aspect_ratio(&args.aspect)?;
    editor.set_grid_type(&args.grid)?;

    ensure_parent(&args.out)?;
    let frame = editor.redraw(None)?.context("no crop session to draw")?;
    cropframe::save_png(frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
