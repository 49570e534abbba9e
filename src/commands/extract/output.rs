use super::*;

pub(super) const ITEMS_CSV: &str = "items.csv";
pub(super) const ITEMS_JSON: &str = "items.json";
pub(super) const ROOM_TYPES_JSON: &str = "room_types.json";
pub(super) const FLOOR_INVENTORY_JSON: &str = "room_inventory_by_floor.json";

pub(super) const ITEM_CSV_COLUMNS: [&str; 27] = [
    "spec",
    "description",
    "category",
    "section_note",
    "area",
    "room_type_quantities",
    "attic_stock",
    "total",
    "uom",
    "notes",
    "source_page",
    "item_id",
    "vendor",
    "model",
    "part_number",
    "unit_cost",
    "warranty_months",
    "warranty_start",
    "warranty_end",
    "installed_date",
    "last_replaced",
    "on_hand",
    "min_on_hand",
    "storage_location",
    "link",
    "image_urls",
    "tags",
];

// A failure leaves earlier files in place.
pub(super) fn write_outputs(out_dir: &Path, extraction: &Extraction) -> Result<Vec<PathBuf>> {
    let items_csv = out_dir.join(ITEMS_CSV);
    write_items_csv(&items_csv, &extraction.items)
        .with_context(|| format!("failed to write {ITEMS_CSV}"))?;
    info!(path = %items_csv.display(), rows = extraction.items.len(), "wrote items csv");

    let items_json = out_dir.join(ITEMS_JSON);
    write_json_pretty(&items_json, &extraction.items)
        .with_context(|| format!("failed to write {ITEMS_JSON}"))?;
    info!(path = %items_json.display(), "wrote items json");

    let room_types_json = out_dir.join(ROOM_TYPES_JSON);
    write_json_pretty(&room_types_json, &extraction.room_types)
        .with_context(|| format!("failed to write {ROOM_TYPES_JSON}"))?;
    info!(path = %room_types_json.display(), "wrote room types");

    let floors_json = out_dir.join(FLOOR_INVENTORY_JSON);
    write_json_pretty(&floors_json, &extraction.floors)
        .with_context(|| format!("failed to write {FLOOR_INVENTORY_JSON}"))?;
    info!(path = %floors_json.display(), "wrote floor inventory");

    Ok(vec![items_csv, items_json, room_types_json, floors_json])
}

fn write_items_csv(path: &Path, items: &[Item]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;

    writer
        .write_record(ITEM_CSV_COLUMNS)
        .with_context(|| format!("failed to write csv header: {}", path.display()))?;
    for item in items {
        let record = item_csv_record(item)?;
        writer
            .write_record(&record)
            .with_context(|| format!("failed to write csv row for {}", item.item_id))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush csv file: {}", path.display()))?;
    Ok(())
}

// Nested values become compact JSON text.
pub(super) fn item_csv_record(item: &Item) -> Result<Vec<String>> {
    fn cell(value: &Option<CellValue>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    let quantities = match &item.room_type_quantities {
        Some(quantities) => serde_json::to_string(quantities)
            .with_context(|| format!("failed to render quantities for {}", item.item_id))?,
        None => String::new(),
    };
    let editable = &item.editable;
    let image_urls = serde_json::to_string(&editable.image_urls)
        .with_context(|| format!("failed to render image_urls for {}", item.item_id))?;
    let tags = serde_json::to_string(&editable.tags)
        .with_context(|| format!("failed to render tags for {}", item.item_id))?;

    Ok(vec![
        item.spec.clone(),
        item.description.clone(),
        item.category.clone().unwrap_or_default(),
        item.section_note.clone().unwrap_or_default(),
        item.area.as_str().to_string(),
        quantities,
        cell(&item.attic_stock),
        cell(&item.total),
        item.uom.clone(),
        item.notes.clone(),
        item.source_page.to_string(),
        item.item_id.clone(),
        editable.vendor.clone(),
        editable.model.clone(),
        editable.part_number.clone(),
        editable.unit_cost.clone(),
        editable.warranty_months.clone(),
        editable.warranty_start.clone(),
        editable.warranty_end.clone(),
        editable.installed_date.clone(),
        editable.last_replaced.clone(),
        editable.on_hand.clone(),
        editable.min_on_hand.clone(),
        editable.storage_location.clone(),
        editable.link.clone(),
        image_urls,
        tags,
    ])
}
