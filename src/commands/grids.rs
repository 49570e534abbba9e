use anyhow::Result;
use tracing::info;

use crate::cli::GridsArgs;
use crate::source::{PdftohtmlSource, TableSource};
use crate::util::{require_file, write_json_pretty};

/// Writes the rebuilt grids in the format `extract --grids` reads back.
pub fn run(args: GridsArgs) -> Result<()> {
    require_file(&args.pdf, "source PDF")?;

    let source = PdftohtmlSource::new(args.line_tolerance);
    let grids = source.extract_tables(&args.pdf)?;

    write_json_pretty(&args.out, &grids)?;
    info!(
        path = %args.out.display(),
        grids = grids.len(),
        rows = grids.iter().map(|grid| grid.rows.len()).sum::<usize>(),
        "wrote table grids"
    );

    Ok(())
}
