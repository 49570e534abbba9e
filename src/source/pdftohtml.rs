use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::{Captures, Regex};
use tracing::{debug, info};

use super::TableSource;
use crate::model::{CellValue, GridRow, TableGrid};

/// Lines with fewer fragments than this are not treated as table rows when
/// deriving column bands, and a page's grid starts at the first line that has them.
const MIN_TABLE_CELLS: usize = 3;
/// Horizontal slack when merging fragment extents into one column band.
const BAND_GAP: f64 = 1.0;

/// Rebuilds one grid per page from `pdftohtml -xml` text positions.
pub struct PdftohtmlSource {
    line_tolerance: f64,
}

impl PdftohtmlSource {
    pub fn new(line_tolerance: f64) -> Self {
        Self { line_tolerance }
    }
}

impl TableSource for PdftohtmlSource {
    fn name(&self) -> &'static str {
        "pdftohtml"
    }

    fn extract_tables(&self, pdf_path: &Path) -> Result<Vec<TableGrid>> {
        let xml = run_pdftohtml(pdf_path)?;
        let parser = FragmentParser::new()?;

        let mut grids = Vec::new();
        for (page, fragments) in parser.parse_pages(&xml) {
            let fragment_count = fragments.len();
            match build_page_grid(page, fragments, self.line_tolerance) {
                Some(grid) => {
                    debug!(
                        page = page.saturating_add(1),
                        rows = grid.rows.len(),
                        columns = grid.width(),
                        "rebuilt page grid"
                    );
                    grids.push(grid);
                }
                None => debug!(
                    page = page.saturating_add(1),
                    fragments = fragment_count,
                    "no tabular lines on page"
                ),
            }
        }

        info!(pdf = %pdf_path.display(), grids = grids.len(), "pdftohtml extraction complete");
        Ok(grids)
    }
}

fn run_pdftohtml(pdf_path: &Path) -> Result<String> {
    let output = Command::new("pdftohtml")
        .arg("-xml")
        .arg("-i")
        .arg("-q")
        .arg("-stdout")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to execute pdftohtml for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftohtml returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
}

#[derive(Debug, Clone, PartialEq)]
struct TextFragment {
    top: f64,
    left: f64,
    width: f64,
    text: String,
}

impl TextFragment {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

struct FragmentParser {
    page: Regex,
    text: Regex,
    inline_tag: Regex,
    numeric_entity: Regex,
}

impl FragmentParser {
    fn new() -> Result<Self> {
        let number = r"(-?\d+(?:\.\d+)?)";
        Ok(Self {
            page: Regex::new(r#"(?s)<page number="(\d+)"[^>]*>(.*?)</page>"#)
                .context("failed to compile pdftohtml page regex")?,
            text: Regex::new(&format!(
                r#"(?s)<text top="{number}" left="{number}" width="{number}" height="{number}"[^>]*>(.*?)</text>"#
            ))
            .context("failed to compile pdftohtml text regex")?,
            inline_tag: Regex::new(r"<[^>]*>").context("failed to compile inline tag regex")?,
            numeric_entity: Regex::new(r"&#(\d+);")
                .context("failed to compile numeric entity regex")?,
        })
    }

    /// Text fragments per page; pages are 0-based.
    fn parse_pages(&self, xml: &str) -> Vec<(u32, Vec<TextFragment>)> {
        self.page
            .captures_iter(xml)
            .map(|page| {
                let number = page
                    .get(1)
                    .and_then(|value| value.as_str().parse::<u32>().ok())
                    .unwrap_or(1);
                let body = page.get(2).map(|value| value.as_str()).unwrap_or("");
                (number.saturating_sub(1), self.parse_fragments(body))
            })
            .collect()
    }

    fn parse_fragments(&self, body: &str) -> Vec<TextFragment> {
        self.text
            .captures_iter(body)
            .filter_map(|captures| {
                let number = |index: usize| {
                    captures
                        .get(index)
                        .and_then(|value| value.as_str().parse::<f64>().ok())
                };
                let raw = captures.get(5).map(|value| value.as_str()).unwrap_or("");
                let text = self.decode_text(raw);
                if text.is_empty() {
                    return None;
                }

                Some(TextFragment {
                    top: number(1)?,
                    left: number(2)?,
                    width: number(3)?,
                    text,
                })
            })
            .collect()
    }

    fn decode_text(&self, raw: &str) -> String {
        let stripped = self.inline_tag.replace_all(raw, "");
        let decoded = self
            .numeric_entity
            .replace_all(&stripped, |captures: &Captures| {
                captures
                    .get(1)
                    .and_then(|value| value.as_str().parse::<u32>().ok())
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_default()
            })
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
            .replace('\u{00a0}', " ");

        decoded.split_whitespace().collect::<Vec<&str>>().join(" ")
    }
}

/// Groups fragments whose tops lie within `tolerance` of the line's first fragment.
fn group_lines(
    mut fragments: Vec<TextFragment>,
    tolerance: f64,
) -> Vec<Vec<TextFragment>> {
    fragments.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left)));

    let mut lines = Vec::<Vec<TextFragment>>::new();
    let mut line_top = f64::NEG_INFINITY;
    for fragment in fragments {
        match lines.last_mut() {
            Some(line) if fragment.top - line_top <= tolerance => line.push(fragment),
            _ => {
                line_top = fragment.top;
                lines.push(vec![fragment]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.left.total_cmp(&b.left));
    }
    lines
}

/// Column bands from the merged horizontal extents of fragments on tabular lines.
fn column_bands(lines: &[Vec<TextFragment>]) -> Vec<(f64, f64)> {
    let mut extents = lines
        .iter()
        .filter(|line| line.len() >= MIN_TABLE_CELLS)
        .flatten()
        .map(|fragment| (fragment.left, fragment.right()))
        .collect::<Vec<(f64, f64)>>();
    extents.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut bands = Vec::<(f64, f64)>::new();
    for (start, end) in extents {
        match bands.last_mut() {
            Some(band) if start <= band.1 + BAND_GAP => band.1 = band.1.max(end),
            _ => bands.push((start, end)),
        }
    }
    bands
}

fn assign_band(bands: &[(f64, f64)], fragment: &TextFragment) -> usize {
    if let Some(index) = bands
        .iter()
        .position(|(start, end)| fragment.left >= *start && fragment.left <= *end)
    {
        return index;
    }

    let center = fragment.center();
    let distance = |(start, end): &(f64, f64)| {
        if center < *start {
            start - center
        } else {
            (center - end).max(0.0)
        }
    };
    bands
        .iter()
        .enumerate()
        .min_by(|a, b| distance(a.1).total_cmp(&distance(b.1)))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Builds the page grid, starting at the first line that looks tabular.
fn build_page_grid(
    page: u32,
    fragments: Vec<TextFragment>,
    tolerance: f64,
) -> Option<TableGrid> {
    let lines = group_lines(fragments, tolerance);
    let first_table_line = lines
        .iter()
        .position(|line| line.len() >= MIN_TABLE_CELLS)?;
    let table_lines = &lines[first_table_line..];

    let bands = column_bands(table_lines);
    if bands.is_empty() {
        return None;
    }

    let rows = table_lines
        .iter()
        .map(|line| {
            let mut cells = vec![None::<String>; bands.len()];
            for fragment in line {
                let index = assign_band(&bands, fragment);
                if let Some(existing) = &mut cells[index] {
                    existing.push(' ');
                    existing.push_str(&fragment.text);
                } else {
                    cells[index] = Some(fragment.text.clone());
                }
            }
            cells
                .into_iter()
                .map(|cell| cell.map(CellValue::Text))
                .collect::<GridRow>()
        })
        .collect();

    Some(TableGrid { page, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(top: f64, left: f64, width: f64, text: &str) -> TextFragment {
        TextFragment {
            top,
            left,
            width,
            text: text.to_string(),
        }
    }

    fn text(value: &str) -> Option<CellValue> {
        Some(CellValue::Text(value.to_string()))
    }

    #[test]
    fn parse_pages_reads_positions_and_decodes_text() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8"?>
<pdf2xml producer="poppler" version="23.08.0">
<page number="1" position="absolute" top="0" left="0" height="612" width="1008">
	<fontspec id="0" size="7" family="Helvetica" color="#000000"/>
<text top="40" left="20" width="48" height="8" font="0"><b>Hilton Spec</b></text>
<text top="52" left="80" width="90" height="8" font="0">Bath &amp; Vanity&#160;Lights</text>
<text top="64" left="80" width="10" height="8" font="0">   </text>
</page>
<page number="2" position="absolute" top="0" left="0" height="612" width="1008">
<text top="10.5" left="5" width="10" height="8" font="0">x</text>
</page>
</pdf2xml>"##;

        let parser = FragmentParser::new().unwrap();
        let pages = parser.parse_pages(xml);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].0, 0);
        assert_eq!(
            pages[0].1,
            vec![
                fragment(40.0, 20.0, 48.0, "Hilton Spec"),
                fragment(52.0, 80.0, 90.0, "Bath & Vanity Lights"),
            ]
        );
        assert_eq!(pages[1].0, 1);
        assert_eq!(pages[1].1[0].top, 10.5);
    }

    #[test]
    fn group_lines_merges_fragments_within_tolerance() {
        let lines = group_lines(
            vec![
                fragment(101.0, 50.0, 10.0, "b"),
                fragment(100.0, 10.0, 10.0, "a"),
                fragment(120.0, 10.0, 10.0, "c"),
            ],
            3.0,
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "a");
        assert_eq!(lines[0][1].text, "b");
        assert_eq!(lines[1][0].text, "c");
    }

    #[test]
    fn build_page_grid_aligns_sparse_rows_to_column_bands() {
        let fragments = vec![
            fragment(10.0, 300.0, 80.0, "INSTALL MATRIX"),
            fragment(30.0, 10.0, 40.0, "Hilton Spec"),
            fragment(30.0, 60.0, 60.0, "Description"),
            fragment(30.0, 130.0, 20.0, "Qty"),
            fragment(42.0, 60.0, 50.0, "LIGHTING"),
            fragment(54.0, 10.0, 30.0, "HS-100"),
            fragment(54.0, 60.0, 20.0, "Lamp"),
            fragment(54.0, 136.0, 8.0, "12"),
        ];

        let grid = build_page_grid(4, fragments, 3.0).unwrap();

        assert_eq!(grid.page, 4);
        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.rows[0], vec![text("Hilton Spec"), text("Description"), text("Qty")]);
        assert_eq!(grid.rows[1], vec![None, text("LIGHTING"), None]);
        assert_eq!(grid.rows[2], vec![text("HS-100"), text("Lamp"), text("12")]);
    }

    #[test]
    fn build_page_grid_skips_pages_without_tabular_lines() {
        let fragments = vec![
            fragment(10.0, 10.0, 100.0, "Cover page"),
            fragment(30.0, 10.0, 100.0, "Prepared for"),
        ];
        assert!(build_page_grid(0, fragments, 3.0).is_none());
    }
}
