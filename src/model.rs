use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;

/// A table cell as extracted, or after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

pub type GridRow = Vec<Option<CellValue>>;

/// One extracted table; `page` is the 0-based page index it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    pub page: u32,
    pub rows: Vec<GridRow>,
}

impl TableGrid {
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(Option::as_ref)
    }

    /// 1-based page number. Grid sources reject `u32::MAX` so this never saturates.
    pub fn source_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

/// Keyed quantities in column order.
pub type QuantityMap = IndexMap<String, CellValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeMeta {
    pub id: Option<String>,
    pub label: String,
    pub name: String,
}

impl RoomTypeMeta {
    /// Quantity key for this column: the canonical id, else the raw label.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    Guestrooms,
    #[serde(rename = "Public Areas")]
    PublicAreas,
}

impl Area {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guestrooms => "Guestrooms",
            Self::PublicAreas => "Public Areas",
        }
    }
}

/// A parsed data row before it is given an `item_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub spec: String,
    pub description: String,
    pub category: Option<String>,
    pub section_note: Option<String>,
    pub area: Area,
    pub room_type_quantities: Option<QuantityMap>,
    pub attic_stock: Option<CellValue>,
    pub total: Option<CellValue>,
    pub uom: String,
    pub notes: String,
    pub source_page: u32,
}

/// Placeholders the inventory page fills in by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableFields {
    pub vendor: String,
    pub model: String,
    pub part_number: String,
    pub unit_cost: String,
    pub warranty_months: String,
    pub warranty_start: String,
    pub warranty_end: String,
    pub installed_date: String,
    pub last_replaced: String,
    pub on_hand: String,
    pub min_on_hand: String,
    pub storage_location: String,
    pub link: String,
    pub image_urls: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub spec: String,
    pub description: String,
    pub category: Option<String>,
    pub section_note: Option<String>,
    pub area: Area,
    pub room_type_quantities: Option<QuantityMap>,
    pub attic_stock: Option<CellValue>,
    pub total: Option<CellValue>,
    pub uom: String,
    pub notes: String,
    pub source_page: u32,
    pub item_id: String,
    #[serde(flatten)]
    pub editable: EditableFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorInventory {
    pub floor: String,
    pub counts: QuantityMap,
    pub total: Option<CellValue>,
    pub source_page: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractCounts {
    pub tables: usize,
    pub guestroom_tables: usize,
    pub public_area_tables: usize,
    pub guestroom_items: usize,
    pub public_area_items: usize,
    pub items: usize,
    pub floor_records: usize,
    pub room_types: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub source_pdf: String,
    pub source_sha256: String,
    pub table_source: String,
    pub layout: LayoutConfig,
    pub counts: ExtractCounts,
    pub outputs: Vec<String>,
    pub warnings: Vec<String>,
}
