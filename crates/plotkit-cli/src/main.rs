use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plotkit::{
    default_profile_path, init_logging, load_preview, Dialect, PlotterProfile, Point,
    Polygon, BUILD_DATE, VERSION,
};
use tracing::debug;

#[derive(Parser)]
#[command(name = "plotkit", about = "Cutting plotter command codec", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Encode polygons with a plotter profile
    Encode {
        /// Profile file (.json or .toml), defaults to the user profile
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// JSON array of polygons, each an array of [x, y] pairs
        #[arg(short, long)]
        input: PathBuf,
        /// Write the stream here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse an HP-GL stream back into polylines
    Preview {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value = "1")]
        ratio: f64,
        #[arg(long, default_value = "0")]
        surface_height: f64,
    },
    /// List the built-in dialect names
    Dialects,
}

fn read_polygons(path: &PathBuf) -> Result<Vec<Polygon>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<Vec<[f64; 2]>> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of polygons", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|polygon| polygon.into_iter().map(Point::from).collect())
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    debug!("plotkit {} built {}", VERSION, BUILD_DATE);

    let cli = Cli::parse();
    match cli.command {
        Cmd::Encode {
            profile,
            input,
            output,
        } => {
            let profile_path = match profile {
                Some(path) => path,
                None => default_profile_path()?,
            };
            let profile = PlotterProfile::load_from_file(&profile_path)?;
            let polygons = read_polygons(&input)?;
            let stream = profile.generate(&polygons)?;
            match output {
                Some(path) => {
                    fs::write(&path, &stream)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!(
                        "Encoded {} polygons with {} -> {}",
                        polygons.len(),
                        profile.protocol.protocol,
                        path.display()
                    );
                }
                None => print!("{stream}"),
            }
        }
        Cmd::Preview {
            input,
            ratio,
            surface_height,
        } => {
            let paths = load_preview(&input, ratio, surface_height)
                .await
                .with_context(|| format!("previewing {}", input.display()))?;
            let pairs: Vec<Vec<[f64; 2]>> = paths
                .into_iter()
                .map(|path| path.into_iter().map(|p| [p.x, p.y]).collect())
                .collect();
            println!("{}", serde_json::to_string(&pairs)?);
        }
        Cmd::Dialects => {
            for name in Dialect::ALL_NAMES {
                println!("{name}");
            }
        }
    }
    Ok(())
}
