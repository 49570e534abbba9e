use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::layout::LayoutConfig;
use crate::model::{
    Area, CellValue, EditableFields, ExtractCounts, FloorInventory, Item, ItemDraft, QuantityMap,
    RoomTypeMeta, TableGrid,
};
use crate::util::write_json_pretty;

mod assemble;
mod cell;
mod classify;
mod guestroom;
mod output;
mod public_area;
mod room_types;
mod run;

pub use run::run;

use assemble::*;
use cell::*;
use classify::*;
use output::*;
use room_types::*;

struct MatrixParser {
    layout: LayoutConfig,
    room_types: RoomTypeParser,
}

impl MatrixParser {
    fn new(layout: LayoutConfig) -> Result<Self> {
        layout.validate()?;
        Ok(Self {
            layout,
            room_types: RoomTypeParser::new()?,
        })
    }
}
