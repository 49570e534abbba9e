use super::*;

pub(super) struct RoomTypeParser {
    id_token: Regex,
    id_suffix: Regex,
    canonical_id: Regex,
}

impl RoomTypeParser {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            id_token: Regex::new(r"ID-?\s*(\d+)").context("failed to compile room-type id regex")?,
            id_suffix: Regex::new(r"\s*ID-?\s*\d+.*")
                .context("failed to compile room-type id suffix regex")?,
            canonical_id: Regex::new(r"^ID-\d+$")
                .context("failed to compile canonical room-type id regex")?,
        })
    }

    /// `King ID-1` becomes id `ID-1`, name `King`; the label keeps the full text.
    pub(super) fn parse_header(&self, cell: Option<&CellValue>) -> RoomTypeMeta {
        let label = match cell {
            None => String::new(),
            Some(CellValue::Text(text)) if text.is_empty() => String::new(),
            Some(value) => value.to_string().replace('\n', " ").trim().to_string(),
        };

        let id = self.extract_id(&label);
        let name = self.id_suffix.replacen(&label, 1, "").trim().to_string();

        RoomTypeMeta { id, label, name }
    }

    fn extract_id(&self, text: &str) -> Option<String> {
        self.id_token
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|digits| format!("ID-{}", digits.as_str()))
    }

    pub(super) fn canonical_key(&self, key: &str) -> String {
        if self.canonical_id.is_match(key) {
            return key.to_string();
        }
        self.extract_id(key).unwrap_or_else(|| key.to_string())
    }

    pub(super) fn rekey(&self, quantities: QuantityMap) -> QuantityMap {
        let mut rekeyed = QuantityMap::with_capacity(quantities.len());
        for (key, value) in quantities {
            rekeyed.insert(self.canonical_key(&key), value);
        }
        rekeyed
    }
}

pub(super) fn duplicate_room_type_keys(room_types: &[RoomTypeMeta]) -> Vec<String> {
    let mut counts = BTreeMap::<&str, usize>::new();
    for meta in room_types {
        *counts.entry(meta.key()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key.to_string())
        .collect()
}
