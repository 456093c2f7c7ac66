//! nucleoseg CLI - segment nuclei and nucleoli in fluorescence images.

use clap::{Args, Parser, Subcommand};
use nucleoseg::output::{find_existing_masks, write_outputs};
use nucleoseg::segment::SegmentConfig;
use nucleoseg::{BatchItem, CancelToken, ImageReport, process_batch};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "nucleoseg")]
#[command(about = "Segment nuclei and nucleoli and measure per-cell features")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment images and write label maps plus CSV tables.
    Segment(SegmentArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct SegmentArgs {
    /// Input TIFF images (single-channel).
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output directory for label maps, cells.csv and summary.csv.
    #[arg(long)]
    out: PathBuf,

    /// JSON configuration file; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of existing <name>_nuclei.tif / <name>_nucleoli.tif maps.
    /// Images with both maps there skip segmentation; the rest are segmented.
    #[arg(long)]
    masks: Option<PathBuf>,

    /// Override the gamma exponent.
    #[arg(long)]
    gamma: Option<f32>,

    /// Override the oversized-nucleus factor.
    #[arg(long)]
    max_size_factor: Option<f64>,

    /// Stop starting new images after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Segment(args) => run_segment(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&SegmentConfig::default())?);
    Ok(())
}

fn load_config(args: &SegmentArgs) -> CliResult<SegmentConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading config: {}", path.display());
            let file = File::open(path)
                .map_err(|e| -> CliError { format!("{}: {}", path.display(), e).into() })?;
            serde_json::from_reader(BufReader::new(file))?
        }
        None => SegmentConfig::default(),
    };
    if let Some(gamma) = args.gamma {
        config = config.with_gamma(gamma);
    }
    if let Some(factor) = args.max_size_factor {
        config = config.with_max_size_factor(factor);
    }
    config.validate()?;
    Ok(config)
}

/// Report name of an input: its file stem
fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load one input, attaching its saved maps when the mask directory has them
fn load_item(path: &Path, masks_dir: Option<&Path>) -> nucleoseg::BatchResult<BatchItem> {
    let name = image_name(path);
    let image = nucleoseg::io::read_image(path)?;
    let masks = match masks_dir {
        Some(dir) => find_existing_masks(dir, &name)?,
        None => None,
    };
    let item = BatchItem::new(name, image);
    Ok(match masks {
        Some(masks) => item.with_masks(masks),
        None => item,
    })
}

fn run_segment(args: &SegmentArgs) -> CliResult<()> {
    let config = load_config(args)?;
    let cancel = match args.timeout_secs {
        Some(secs) => CancelToken::with_timeout(Duration::from_secs(secs)),
        None => CancelToken::new(),
    };

    // Unreadable inputs become failed reports; their slots keep input order
    let mut slots: Vec<Result<usize, ImageReport>> = Vec::with_capacity(args.images.len());
    let mut items = Vec::new();
    for path in &args.images {
        match load_item(path, args.masks.as_deref()) {
            Ok(item) => {
                slots.push(Ok(items.len()));
                items.push(item);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                slots.push(Err(ImageReport::failed(image_name(path), e.to_string())));
            }
        }
    }

    let mut processed: Vec<Option<ImageReport>> = process_batch(&items, &config, &cancel)?
        .into_iter()
        .map(Some)
        .collect();
    let reports: Vec<ImageReport> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Ok(i) => processed[i].take(),
            Err(report) => Some(report),
        })
        .collect();

    write_outputs(&args.out, &reports)?;

    let cells: usize = reports.iter().map(ImageReport::num_cells).sum();
    println!(
        "{} images, {} cells -> {}",
        reports.len(),
        cells,
        args.out.display()
    );
    Ok(())
}
