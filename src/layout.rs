use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Positional meaning of the install-matrix columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub spec: usize,
    pub description: usize,
    pub first_room_type: usize,
    pub last_room_type: usize,
    pub attic_stock: usize,
    pub total: usize,
    pub uom: usize,
    pub notes: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            spec: 0,
            description: 1,
            first_room_type: 2,
            last_room_type: 15,
            attic_stock: 16,
            total: 17,
            uom: 18,
            notes: 19,
        }
    }
}

impl ColumnLayout {
    pub fn room_type_columns(&self) -> RangeInclusive<usize> {
        self.first_room_type..=self.last_room_type
    }

    /// Number of columns a guestroom grid must reach.
    pub fn required_width(&self) -> usize {
        [
            self.spec,
            self.description,
            self.last_room_type,
            self.attic_stock,
            self.total,
            self.uom,
            self.notes,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
            + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMarkers {
    /// Case-sensitive text in the spec column that opens the guestroom item list.
    pub item_list: String,
    /// Text in the description column that marks a floor-count row.
    pub floor: String,
    /// Case-insensitive prefix of repeated header rows in public-area tables.
    pub public_header_prefix: String,
}

impl Default for LayoutMarkers {
    fn default() -> Self {
        Self {
            item_list: "Hilton Spec".to_string(),
            floor: "Floor".to_string(),
            public_header_prefix: "hilton spec".to_string(),
        }
    }
}

/// Half-open range of table indexes in extraction order. `end: None` runs to the last table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl TableRange {
    pub fn select<'a, T>(&self, tables: &'a [T]) -> &'a [T] {
        let end = self.end.unwrap_or(tables.len()).min(tables.len());
        let start = self.start.min(end);
        &tables[start..end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionPartition {
    pub guestrooms: TableRange,
    pub public_areas: TableRange,
}

impl Default for SectionPartition {
    fn default() -> Self {
        Self {
            guestrooms: TableRange {
                start: 0,
                end: Some(4),
            },
            public_areas: TableRange {
                start: 4,
                end: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub columns: ColumnLayout,
    pub markers: LayoutMarkers,
    pub sections: SectionPartition,
}

impl LayoutConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let layout: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse layout {}", path.display()))?;
        layout
            .validate()
            .with_context(|| format!("invalid layout {}", path.display()))?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        let columns = &self.columns;
        if columns.first_room_type > columns.last_room_type {
            bail!(
                "room-type columns are empty: first {} is after last {}",
                columns.first_room_type,
                columns.last_room_type
            );
        }
        if self.markers.item_list.trim().is_empty() {
            bail!("item-list marker must not be empty");
        }
        for (name, range) in [
            ("guestrooms", self.sections.guestrooms),
            ("public_areas", self.sections.public_areas),
        ] {
            if let Some(end) = range.end
                && end < range.start
            {
                bail!("{name} table range ends ({end}) before it starts ({})", range.start);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_install_matrix_columns() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.room_type_columns().count(), 14);
        assert_eq!(layout.required_width(), 20);
    }

    #[test]
    fn partial_layout_json_keeps_defaults() {
        let layout: LayoutConfig = serde_json::from_str(
            r#"{"sections": {"guestrooms": {"start": 0, "end": 2}, "public_areas": {"start": 2, "end": null}}}"#,
        )
        .unwrap();

        assert_eq!(layout.columns, ColumnLayout::default());
        assert_eq!(layout.markers.item_list, "Hilton Spec");
        assert_eq!(layout.sections.guestrooms.end, Some(2));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn table_range_clamps_to_available_tables() {
        let tables = vec![1, 2, 3];
        let guestrooms = SectionPartition::default().guestrooms;
        let public_areas = SectionPartition::default().public_areas;

        assert_eq!(guestrooms.select(&tables), &[1, 2, 3]);
        assert!(public_areas.select(&tables).is_empty());
    }

    #[test]
    fn validate_rejects_inverted_room_type_columns() {
        let mut layout = LayoutConfig::default();
        layout.columns.first_room_type = 10;
        layout.columns.last_room_type = 3;
        assert!(layout.validate().is_err());
    }
}
