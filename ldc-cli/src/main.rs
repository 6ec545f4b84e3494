//! ldc — annotate a distorted image and its undistorted counterpart with a
//! calibration rectangle before and after undistortion.

use std::path::{Path, PathBuf};

use clap::Parser;
use ldc_core::{CoordinateMapper, Point2D};
use ldc_io::image::colors;
use ldc_io::{DemoConfig, Rect, draw_rect, load_rgb, remap_image, save_rgb};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const OUTLINE_THICKNESS: u32 = 2;

/// Demo settings shipped with the workspace
const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/demo.json");

#[derive(Parser, Debug)]
#[command(name = "ldc")]
#[command(about = "Check lens distortion correction by drawing a calibration rectangle on both images")]
#[command(version)]
struct Cli {
    /// Original (distorted) image.
    orig_distorted: Option<PathBuf>,

    /// Undistorted rendering of the same frame.
    orig_undistorted: Option<PathBuf>,

    /// Where to write the annotated distorted image.
    out_orig: Option<PathBuf>,

    /// Where to write the annotated undistorted image.
    out_undistorted: Option<PathBuf>,

    /// Arguments after the fourth positional are ignored.
    #[arg(hide = true)]
    extra: Vec<PathBuf>,

    /// Camera and calibration settings (JSON). Defaults to the workspace's
    /// configs/demo.json.
    #[arg(long, default_value = DEFAULT_CONFIG, hide_default_value = true)]
    config: PathBuf,

    /// Also write the distorted image resampled through the rectification map.
    #[arg(long)]
    remapped: Option<PathBuf>,
}

struct Paths {
    orig_distorted: PathBuf,
    orig_undistorted: PathBuf,
    out_orig: PathBuf,
    out_undistorted: PathBuf,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.extra.is_empty() {
        tracing::debug!("Ignoring {} extra arguments", cli.extra.len());
    }
    let (Some(orig_distorted), Some(orig_undistorted), Some(out_orig), Some(out_undistorted)) = (
        cli.orig_distorted,
        cli.orig_undistorted,
        cli.out_orig,
        cli.out_undistorted,
    ) else {
        return Ok(());
    };

    let paths = Paths {
        orig_distorted,
        orig_undistorted,
        out_orig,
        out_undistorted,
    };
    run(&paths, &cli.config, cli.remapped.as_deref())
}

fn run(paths: &Paths, config_path: &Path, remapped: Option<&Path>) -> CliResult<()> {
    tracing::info!("Loading config: {}", config_path.display());
    let config = DemoConfig::from_path(config_path)?;

    tracing::info!("Loading image: {}", paths.orig_distorted.display());
    let mut orig_img = load_rgb(&paths.orig_distorted)?;
    tracing::info!("Loading image: {}", paths.orig_undistorted.display());
    let mut undistort_img = load_rgb(&paths.orig_undistorted)?;

    let (first, second) = config.calibration.corners();
    let orig_rect = Rect::from_corners(first, second);
    draw_rect(&mut orig_img, orig_rect, colors::GREEN, OUTLINE_THICKNESS);

    tracing::info!(
        "Building maps for {}x{} frame",
        config.frame.width,
        config.frame.height
    );
    let mapper = CoordinateMapper::new(config.frame.width, config.frame.height, config.camera()?)?;

    let undistorted_first = undistort_corner(&mapper, first)?;
    let undistorted_second = undistort_corner(&mapper, second)?;
    let undistort_rect = Rect::from_corners(undistorted_first, undistorted_second);

    draw_rect(&mut orig_img, undistort_rect, colors::RED, OUTLINE_THICKNESS);
    save_rgb(&orig_img, &paths.out_orig)?;
    tracing::info!("Annotated image written to {}", paths.out_orig.display());

    draw_rect(&mut undistort_img, orig_rect, colors::GREEN, OUTLINE_THICKNESS);
    draw_rect(&mut undistort_img, undistort_rect, colors::RED, OUTLINE_THICKNESS);
    save_rgb(&undistort_img, &paths.out_undistorted)?;
    tracing::info!(
        "Annotated image written to {}",
        paths.out_undistorted.display()
    );

    println!("Original Points: {first} , {second}");
    println!("Undistorted Points: {undistorted_first} , {undistorted_second}");

    let mut checks = config.verification_points();
    if checks.is_empty() {
        checks = vec![undistorted_first, undistorted_second];
    }
    let round_trip = checks
        .iter()
        .map(|p| mapper.get_original_point(p.x, p.y))
        .collect::<Result<Vec<_>, _>>()?;
    println!(
        "Round-trip Points: {}",
        round_trip
            .iter()
            .map(Point2D::to_string)
            .collect::<Vec<_>>()
            .join(" , ")
    );

    if let Some(path) = remapped {
        let source = load_rgb(&paths.orig_distorted)?;
        let rendered = remap_image(&source, mapper.backward_map())?;
        save_rgb(&rendered, path)?;
        tracing::info!("Remapped image written to {}", path.display());
    }

    Ok(())
}

fn undistort_corner(mapper: &CoordinateMapper, corner: Point2D) -> CliResult<Point2D> {
    mapper.get_undistorted_point(corner.x, corner.y).map_err(|e| {
        tracing::warn!("Calibration corner {corner} rejected: {e}");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_accepts_no_positionals() {
        let cli = Cli::try_parse_from(["ldc"]).unwrap();
        assert!(cli.orig_distorted.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(cli.config.is_file());
    }

    #[test]
    fn test_cli_four_positionals() {
        let cli = Cli::try_parse_from([
            "ldc",
            "a.png",
            "b.png",
            "c.png",
            "d.png",
            "--config",
            "cam.json",
            "--remapped",
            "e.png",
        ])
        .unwrap();
        assert_eq!(cli.out_undistorted, Some(PathBuf::from("d.png")));
        assert_eq!(cli.config, PathBuf::from("cam.json"));
        assert_eq!(cli.remapped, Some(PathBuf::from("e.png")));
    }

    #[test]
    fn test_cli_ignores_extra_positionals() {
        let cli = Cli::try_parse_from(["ldc", "a", "b", "c", "d", "e", "f", "--config", "cam.json"]).unwrap();
        assert_eq!(cli.out_undistorted, Some(PathBuf::from("d")));
        assert_eq!(cli.extra, vec![PathBuf::from("e"), PathBuf::from("f")]);
        assert_eq!(cli.config, PathBuf::from("cam.json"));
    }
}
