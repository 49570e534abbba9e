use chrono::Utc;

use super::*;
use crate::cli::ExtractArgs;
use crate::model::ExtractRunManifest;
use crate::source::{GridFileSource, PdftohtmlSource, TableSource};
use crate::util::{ensure_directory, now_utc_string, require_file, sha256_file, utc_compact_string};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("extract-{}", utc_compact_string(started_ts));

    require_file(&args.pdf, "source PDF")?;

    let layout = match &args.layout {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };
    let source: Box<dyn TableSource> = match &args.grids {
        Some(path) => {
            require_file(path, "grid file")?;
            Box::new(GridFileSource::new(path.clone()))
        }
        None => Box::new(PdftohtmlSource::new(args.line_tolerance)),
    };

    info!(
        pdf = %args.pdf.display(),
        source = source.name(),
        run_id = %run_id,
        "starting extract"
    );

    let tables = source.extract_tables(&args.pdf)?;
    info!(tables = tables.len(), "loaded table grids");

    let parser = MatrixParser::new(layout)?;
    let extraction = parser.extract(&tables)?;

    ensure_directory(&args.out)?;
    let outputs = write_outputs(&args.out, &extraction)?;

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ExtractRunManifest {
            manifest_version: 1,
            run_id,
            generated_at: now_utc_string(),
            source_pdf: args.pdf.display().to_string(),
            source_sha256: sha256_file(&args.pdf)?,
            table_source: source.name().to_string(),
            layout: parser.layout.clone(),
            counts: extraction.counts.clone(),
            outputs: outputs
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
            warnings: extraction.warnings.clone(),
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote extract run manifest");
    }

    if !extraction.warnings.is_empty() {
        warn!(
            warnings = extraction.warnings.len(),
            "extract completed with warnings"
        );
    }
    info!(items = extraction.items.len(), out = %args.out.display(), "extract completed");
    println!(
        "Wrote {} items to {}",
        extraction.items.len(),
        args.out.display()
    );

    Ok(())
}
