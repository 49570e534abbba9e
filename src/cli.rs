use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "install-matrix",
    version,
    about = "Convert a hotel install-matrix PDF into inventory JSON/CSV"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse the install matrix and write items, room types and floor counts.
    Extract(ExtractArgs),
    /// Dump the raw table grids found in the PDF as JSON.
    Grids(GridsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Path to Install_Matrix.pdf
    #[arg(long)]
    pub pdf: PathBuf,

    /// Output folder for items.json, items.csv, room_types.json and
    /// room_inventory_by_floor.json
    #[arg(long)]
    pub out: PathBuf,

    /// Read table grids from this JSON file instead of running pdftohtml.
    #[arg(long)]
    pub grids: Option<PathBuf>,

    /// JSON layout override (columns, markers, section table ranges).
    #[arg(long)]
    pub layout: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Vertical distance (PDF points) within which pdftohtml fragments share a row.
    #[arg(long, default_value_t = 3.0)]
    pub line_tolerance: f64,
}

#[derive(Args, Debug, Clone)]
pub struct GridsArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 3.0)]
    pub line_tolerance: f64,
}
