//! Providers of raw table grids.
//!
//! The parsers only ever see [`TableGrid`] values in extraction order; where they
//! come from is decided here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::model::TableGrid;

mod pdftohtml;

pub use pdftohtml::PdftohtmlSource;

pub trait TableSource {
    fn name(&self) -> &'static str;

    /// Returns every table grid of the document, in page order.
    fn extract_tables(&self, pdf_path: &Path) -> Result<Vec<TableGrid>>;
}

/// Grids previously dumped by `install-matrix grids` or another extractor.
pub struct GridFileSource {
    path: PathBuf,
}

impl GridFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TableSource for GridFileSource {
    fn name(&self) -> &'static str {
        "grid_file"
    }

    fn extract_tables(&self, _pdf_path: &Path) -> Result<Vec<TableGrid>> {
        let raw = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut grids: Vec<TableGrid> = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse table grids {}", self.path.display()))?;

        if let Some((index, grid)) = grids
            .iter()
            .enumerate()
            .find(|(_, grid)| grid.page == u32::MAX)
        {
            bail!(
                "grid {index} in {} has page index {}; page indexes must be below {}",
                self.path.display(),
                grid.page,
                u32::MAX
            );
        }

        // Stable, so tables on one page keep their file order.
        grids.sort_by_key(|grid| grid.page);
        Ok(grids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn grid_file_source_reads_mixed_cells_in_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids.json");
        fs::write(
            &path,
            r#"[
                {"page": 2, "rows": [["late", null]]},
                {"page": 0, "rows": [["HS-1", "Lamp", "1,200", 4, 2.5, null]]}
            ]"#,
        )
        .unwrap();

        let grids = GridFileSource::new(path)
            .extract_tables(Path::new("unused.pdf"))
            .unwrap();

        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].page, 0);
        assert_eq!(
            grids[0].rows[0],
            vec![
                Some(CellValue::Text("HS-1".to_string())),
                Some(CellValue::Text("Lamp".to_string())),
                Some(CellValue::Text("1,200".to_string())),
                Some(CellValue::Integer(4)),
                Some(CellValue::Float(2.5)),
                None,
            ]
        );
        assert_eq!(grids[1].page, 2);
    }

    #[test]
    fn grid_file_source_rejects_out_of_range_pages() {
        let dir = tempfile::tempdir().unwrap();

        let too_large = dir.path().join("too_large.json");
        fs::write(&too_large, r#"[{"page": 4294967296, "rows": []}]"#).unwrap();
        let error = GridFileSource::new(too_large)
            .extract_tables(Path::new("x.pdf"))
            .unwrap_err();
        assert!(error.to_string().contains("failed to parse table grids"));

        let last = dir.path().join("last.json");
        fs::write(
            &last,
            r#"[{"page": 0, "rows": []}, {"page": 4294967295, "rows": []}]"#,
        )
        .unwrap();
        let error = GridFileSource::new(last)
            .extract_tables(Path::new("x.pdf"))
            .unwrap_err();
        assert!(error.to_string().contains("grid 1"));
        assert!(error.to_string().contains("page index 4294967295"));
    }

    #[test]
    fn grid_file_source_reports_missing_file() {
        let source = GridFileSource::new(PathBuf::from("/nonexistent/grids.json"));
        let error = source.extract_tables(Path::new("x.pdf")).unwrap_err();
        assert!(error.to_string().contains("failed to read"));
    }
}
