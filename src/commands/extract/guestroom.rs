use super::*;

#[derive(Debug, Default)]
pub(super) struct GuestroomTables {
    pub items: Vec<ItemDraft>,
    pub floors: Vec<FloorInventory>,
    // Room types of the last guestroom table parsed.
    pub room_types: Vec<RoomTypeMeta>,
    pub warnings: Vec<String>,
}

impl MatrixParser {
    pub(super) fn parse_guestroom_tables(&self, grids: &[TableGrid]) -> Result<GuestroomTables> {
        let mut parsed = GuestroomTables::default();
        let mut context = RunningContext::default();

        for grid in grids {
            self.check_guestroom_shape(grid)?;

            let room_types = self.parse_room_type_header(grid);
            parsed
                .warnings
                .extend(self.header_warnings(grid, &room_types));

            let Some(start) = self.find_item_list_start(grid) else {
                warn!(
                    page = grid.source_page(),
                    marker = %self.layout.markers.item_list,
                    "guestroom table has no item-list marker"
                );
                parsed.warnings.push(format!(
                    "page {}: no '{}' row; table skipped",
                    grid.source_page(),
                    self.layout.markers.item_list
                ));
                parsed.room_types = room_types;
                continue;
            };

            parsed
                .floors
                .extend(self.parse_floor_rows(grid, start, &room_types));

            let items_before = parsed.items.len();
            for row in (start + 1)..grid.rows.len() {
                let (next, item) = self.guestroom_row_step(context, grid, row, &room_types);
                context = next;
                parsed.items.extend(item);
            }

            debug!(
                page = grid.source_page(),
                items = parsed.items.len() - items_before,
                "parsed guestroom table"
            );
            parsed.room_types = room_types;
        }

        Ok(parsed)
    }

    fn check_guestroom_shape(&self, grid: &TableGrid) -> Result<()> {
        if grid.rows.is_empty() {
            bail!("guestroom table on page {} has no rows", grid.source_page());
        }

        let required = self.layout.columns.required_width();
        let width = grid.width();
        if width < required {
            bail!(
                "guestroom table on page {} has {} columns; layout requires {}",
                grid.source_page(),
                width,
                required
            );
        }
        Ok(())
    }

    pub(super) fn parse_room_type_header(&self, grid: &TableGrid) -> Vec<RoomTypeMeta> {
        self.layout
            .columns
            .room_type_columns()
            .map(|column| self.room_types.parse_header(grid.cell(0, column)))
            .collect()
    }

    fn header_warnings(&self, grid: &TableGrid, room_types: &[RoomTypeMeta]) -> Vec<String> {
        let mut warnings = Vec::new();

        if room_types.iter().all(|meta| meta.id.is_none()) {
            warn!(
                page = grid.source_page(),
                "guestroom header has no room-type ids; quantities are keyed by label"
            );
            warnings.push(format!(
                "page {}: no room-type ids in header row; quantities keyed by label",
                grid.source_page()
            ));
        }

        let duplicates = duplicate_room_type_keys(room_types);
        if !duplicates.is_empty() {
            warn!(
                page = grid.source_page(),
                keys = %duplicates.join(", "),
                "room-type columns share a quantity key"
            );
            warnings.push(format!(
                "page {}: room-type columns share quantity keys: {}",
                grid.source_page(),
                duplicates.join(", ")
            ));
        }

        warnings
    }

    fn find_item_list_start(&self, grid: &TableGrid) -> Option<usize> {
        let marker = &self.layout.markers.item_list;
        (0..grid.rows.len())
            .find(|&row| cell_text(grid.cell(row, self.layout.columns.spec)).contains(marker.as_str()))
    }

    // Floor-count rows sit between the header and the item-list marker.
    fn parse_floor_rows(
        &self,
        grid: &TableGrid,
        start: usize,
        room_types: &[RoomTypeMeta],
    ) -> Vec<FloorInventory> {
        let columns = &self.layout.columns;

        (1..start)
            .filter_map(|row| {
                let floor = cell_text(grid.cell(row, columns.description));
                if !floor.contains(self.layout.markers.floor.as_str()) {
                    return None;
                }

                Some(FloorInventory {
                    floor,
                    counts: self.row_quantities(grid, row, room_types),
                    total: normalize_cell(grid.cell(row, columns.total)),
                    source_page: grid.source_page(),
                })
            })
            .collect()
    }

    fn row_quantities(
        &self,
        grid: &TableGrid,
        row: usize,
        room_types: &[RoomTypeMeta],
    ) -> QuantityMap {
        let mut quantities = QuantityMap::new();
        for (meta, column) in room_types
            .iter()
            .zip(self.layout.columns.room_type_columns())
        {
            if let Some(value) = normalize_cell(grid.cell(row, column)) {
                quantities.insert(meta.key().to_string(), value);
            }
        }
        quantities
    }

    fn guestroom_row_step(
        &self,
        context: RunningContext,
        grid: &TableGrid,
        row: usize,
        room_types: &[RoomTypeMeta],
    ) -> (RunningContext, Option<ItemDraft>) {
        let columns = &self.layout.columns;
        let (spec, description) = row_labels(
            grid.cell(row, columns.spec),
            grid.cell(row, columns.description),
        );

        let kind = classify_row(&spec, &description);
        if kind != RowKind::Data {
            return (context.apply(&kind), None);
        }

        let quantities = self
            .room_types
            .rekey(self.row_quantities(grid, row, room_types));

        let item = ItemDraft {
            spec,
            description,
            category: context.category.clone(),
            section_note: context.note.clone(),
            area: Area::Guestrooms,
            room_type_quantities: Some(quantities),
            attic_stock: normalize_cell(grid.cell(row, columns.attic_stock)),
            total: normalize_cell(grid.cell(row, columns.total)),
            uom: cell_text(grid.cell(row, columns.uom)),
            notes: cell_text(grid.cell(row, columns.notes)),
            source_page: grid.source_page(),
        };

        (context, Some(item))
    }
}
