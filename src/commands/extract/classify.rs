use super::*;

const MAX_CATEGORY_CHARS: usize = 120;
const MAX_CATEGORY_WORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RowKind {
    Blank,
    Category(String),
    Note(String),
    Data,
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct RunningContext {
    pub category: Option<String>,
    pub note: Option<String>,
}

impl RunningContext {
    /// Category and note rows replace their own slot only.
    pub(super) fn apply(self, kind: &RowKind) -> Self {
        match kind {
            RowKind::Category(text) => Self {
                category: Some(text.clone()),
                ..self
            },
            RowKind::Note(text) => Self {
                note: Some(text.clone()),
                ..self
            },
            RowKind::Blank | RowKind::Data | RowKind::Skip => self,
        }
    }
}

pub(super) fn looks_like_category(description: &str) -> bool {
    let text = description.trim();
    if text.is_empty() || text.starts_with('*') {
        return false;
    }

    let upper = text.to_uppercase();
    let mentions_quantities = upper.contains("QTY") || upper.contains("QTYS");
    let asks_for_confirmation = ["GC", "CONFIRM", "VERIFY", "MUST"]
        .iter()
        .any(|needle| upper.contains(needle));
    if mentions_quantities && asks_for_confirmation {
        return false;
    }
    if ["SUBJECT TO CHANGE", "PRICING", "PREMEASURE"]
        .iter()
        .any(|needle| upper.contains(needle))
    {
        return false;
    }

    let char_count = text.chars().count();
    if is_all_uppercase(text) && char_count <= MAX_CATEGORY_CHARS {
        return true;
    }
    if text.ends_with(':') {
        return true;
    }

    let word_count = text.split_whitespace().count();
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    word_count <= MAX_CATEGORY_WORDS && char_count <= MAX_CATEGORY_CHARS && !has_digit
}

// Needs at least one cased letter and no lowercase ones.
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

fn is_missing_spec(spec: &str) -> bool {
    spec.is_empty() || spec.eq_ignore_ascii_case("none")
}

fn heading_kind(description: &str) -> RowKind {
    if looks_like_category(description) {
        RowKind::Category(description.to_string())
    } else {
        RowKind::Note(description.to_string())
    }
}

pub(super) fn classify_row(spec: &str, description: &str) -> RowKind {
    if spec.is_empty() && description.is_empty() {
        return RowKind::Blank;
    }
    if is_missing_spec(spec) {
        if description.is_empty() {
            return RowKind::Skip;
        }
        return heading_kind(description);
    }
    RowKind::Data
}

/// Public-area headings must also have an empty quantity cell.
pub(super) fn classify_public_row(
    spec: &str,
    description: &str,
    quantity: Option<&CellValue>,
    header_prefix: &str,
) -> RowKind {
    if spec.to_lowercase().starts_with(&header_prefix.to_lowercase()) {
        return RowKind::Skip;
    }
    if is_missing_spec(spec) {
        if !description.is_empty() && quantity_is_blank(quantity) {
            return heading_kind(description);
        }
        return RowKind::Skip;
    }
    RowKind::Data
}

fn quantity_is_blank(quantity: Option<&CellValue>) -> bool {
    match quantity {
        None => true,
        Some(CellValue::Integer(value)) => *value == 0,
        Some(CellValue::Float(value)) => *value == 0.0,
        Some(CellValue::Text(text)) => matches!(text.as_str(), "" | "0" | "None"),
    }
}

pub(super) fn row_labels(
    spec: Option<&CellValue>,
    description: Option<&CellValue>,
) -> (String, String) {
    (cell_text(spec), cell_text(description))
}
