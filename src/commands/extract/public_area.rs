use super::*;

impl MatrixParser {
    // No header phase and no room-type columns; context carries across tables.
    pub(super) fn parse_public_tables(&self, grids: &[TableGrid]) -> Vec<ItemDraft> {
        let mut items = Vec::new();
        let mut context = RunningContext::default();

        for grid in grids {
            for row in 0..grid.rows.len() {
                let (next, item) = self.public_row_step(context, grid, row);
                context = next;
                items.extend(item);
            }
        }

        items
    }

    fn public_row_step(
        &self,
        context: RunningContext,
        grid: &TableGrid,
        row: usize,
    ) -> (RunningContext, Option<ItemDraft>) {
        let columns = &self.layout.columns;
        let (spec, description) = row_labels(
            grid.cell(row, columns.spec),
            grid.cell(row, columns.description),
        );
        let quantity = grid.cell(row, columns.total);

        let kind = classify_public_row(
            &spec,
            &description,
            quantity,
            &self.layout.markers.public_header_prefix,
        );
        if kind != RowKind::Data {
            return (context.apply(&kind), None);
        }

        let item = ItemDraft {
            spec,
            description,
            category: context.category.clone(),
            section_note: context.note.clone(),
            area: Area::PublicAreas,
            room_type_quantities: None,
            attic_stock: None,
            total: normalize_cell(quantity),
            uom: cell_text(grid.cell(row, columns.uom)),
            notes: cell_text(grid.cell(row, columns.notes)),
            source_page: grid.source_page(),
        };

        (context, Some(item))
    }
}
