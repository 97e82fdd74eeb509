use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tripmap::config::TripConfig;
use tripmap::manifest::Manifest;
use tripmap::tracks::Track;
use tripmap::{config, manifest, output, scan, tracks};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "tripmap")]
#[command(about = "Manifest generator pairing GPX day tracks with day-grouped photos")]
#[command(long_about = "\
Manifest generator pairing GPX day tracks with day-grouped photos

Your filesystem is the data source. Track files sorted by name become trip
days, photos are grouped onto days by their EXIF capture timestamp, and the
result is the tracks.json document a trip map front end renders.

Data layout:

  data/
  ├── gpx/
  │   ├── HRP_J1.gpx               # Day 1 (position in sort order, not name)
  │   ├── HRP_J1.txt               # Optional day description sidecar
  │   └── HRP_J2.gpx               # Day 2
  └── images/                      # Walked recursively
      ├── 2025_07_06/
      │   └── PXL_20250706_1601.jpg
      └── DSC07813.jpg             # Layout is free-form; EXIF dates decide

Day assignment is positional: the first track in filename sort order gets
start_date, the next gets start_date + 1 day, and so on. Photos taken on a
track's calendar day become that day's gallery. A track filename that claims
a different day number than its position produces a warning.

Run 'tripmap gen-config' to generate a documented tripmap.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "tripmap.toml", global = true)]
    config: PathBuf,

    /// Directory of .gpx track files (overrides config)
    #[arg(long, global = true)]
    tracks_dir: Option<PathBuf>,

    /// Root of the photo tree (overrides config)
    #[arg(long, global = true)]
    images_dir: Option<PathBuf>,

    /// Manifest output path (overrides config)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline and write the manifest
    Build,
    /// Validate inputs and report, without writing the manifest
    Check,
    /// Print a stock tripmap.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = resolve_config(&cli)?;
            let (tracks, manifest) = run_pipeline(&config)?;
            let out = PathBuf::from(&config.output);
            manifest.write(&out)?;
            output::print_build_output(&tracks, &manifest, &out);
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            let (tracks, manifest) = run_pipeline(&config)?;
            output::print_check_output(&tracks, &manifest);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, apply CLI flag overrides, validate.
fn resolve_config(cli: &Cli) -> Result<TripConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(dir) = &cli.tracks_dir {
        config.tracks_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(dir) = &cli.images_dir {
        config.images_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(out) = &cli.out {
        config.output = out.to_string_lossy().into_owned();
    }
    config.validate()?;
    Ok(config)
}

/// Enumerate tracks, collect and group photos, build the manifest.
fn run_pipeline(
    config: &TripConfig,
) -> Result<(Vec<Track>, Manifest), Box<dyn std::error::Error>> {
    let start = config.start()?;
    let tracks = tracks::enumerate(
        Path::new(&config.tracks_dir),
        start,
        &config.palette,
        &config.day_title,
    )?;
    let photos = scan::collect_photos(Path::new(&config.images_dir))?;
    let day_groups = scan::group_by_day(&photos);
    let manifest = manifest::build(&tracks, &day_groups, Path::new(&config.base_dir))?;
    Ok((tracks, manifest))
}
