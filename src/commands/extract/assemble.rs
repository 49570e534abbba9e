use super::*;

#[derive(Debug, Default)]
pub(super) struct Extraction {
    pub items: Vec<Item>,
    pub room_types: Vec<RoomTypeMeta>,
    pub floors: Vec<FloorInventory>,
    pub counts: ExtractCounts,
    pub warnings: Vec<String>,
}

impl MatrixParser {
    pub(super) fn extract(&self, tables: &[TableGrid]) -> Result<Extraction> {
        let sections = &self.layout.sections;
        let guestroom_grids = sections.guestrooms.select(tables);
        let public_grids = sections.public_areas.select(tables);

        let mut warnings = Vec::new();
        if let Some(end) = sections.guestrooms.end
            && tables.len() < end
        {
            warn!(
                tables = tables.len(),
                expected = end,
                "fewer tables than the guestroom section expects"
            );
            warnings.push(format!(
                "only {} tables extracted; guestroom section expects tables {}..{}",
                tables.len(),
                sections.guestrooms.start,
                end
            ));
        }

        let guestrooms = self.parse_guestroom_tables(guestroom_grids)?;
        let public_items = self.parse_public_tables(public_grids);
        warnings.extend(guestrooms.warnings);

        let counts = ExtractCounts {
            tables: tables.len(),
            guestroom_tables: guestroom_grids.len(),
            public_area_tables: public_grids.len(),
            guestroom_items: guestrooms.items.len(),
            public_area_items: public_items.len(),
            items: guestrooms.items.len() + public_items.len(),
            floor_records: guestrooms.floors.len(),
            room_types: guestrooms.room_types.len(),
        };

        info!(
            guestroom_items = counts.guestroom_items,
            public_area_items = counts.public_area_items,
            floor_records = counts.floor_records,
            "parsed install matrix tables"
        );

        let drafts = guestrooms.items.into_iter().chain(public_items).collect();

        Ok(Extraction {
            items: assign_item_ids(drafts),
            room_types: guestrooms.room_types,
            floors: guestrooms.floors,
            counts,
            warnings,
        })
    }
}

// Ordinals count repeats of a spec in output order.
pub(super) fn assign_item_ids(drafts: Vec<ItemDraft>) -> Vec<Item> {
    let mut ordinals = HashMap::<String, usize>::new();

    drafts
        .into_iter()
        .map(|draft| {
            let ordinal = ordinals.entry(draft.spec.clone()).or_insert(0);
            *ordinal += 1;
            let item_id = format_item_id(&draft.spec, *ordinal, draft.source_page);

            Item {
                spec: draft.spec,
                description: draft.description,
                category: draft.category,
                section_note: draft.section_note,
                area: draft.area,
                room_type_quantities: draft.room_type_quantities,
                attic_stock: draft.attic_stock,
                total: draft.total,
                uom: draft.uom,
                notes: draft.notes,
                source_page: draft.source_page,
                item_id,
                editable: EditableFields::default(),
            }
        })
        .collect()
}

pub(super) fn format_item_id(spec: &str, ordinal: usize, source_page: u32) -> String {
    format!("{spec}-{ordinal:02}-p{source_page:02}")
}
