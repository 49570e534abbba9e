use super::*;

/// Blank cells and `none` become null. Text that reads as a plain number once
/// thousands separators are dropped becomes an integer or float; other text is
/// returned trimmed with its commas intact.
pub(super) fn normalize_cell(cell: Option<&CellValue>) -> Option<CellValue> {
    match cell? {
        CellValue::Float(value) if value.is_nan() => None,
        CellValue::Integer(_) | CellValue::Float(_) => cell.cloned(),
        CellValue::Text(raw) => {
            let text = raw.trim();
            if text.is_empty() || text.eq_ignore_ascii_case("none") {
                return None;
            }

            let digits = text.replace(',', "");
            Some(parse_plain_number(&digits).unwrap_or_else(|| CellValue::Text(text.to_string())))
        }
    }
}

pub(super) fn cell_text(cell: Option<&CellValue>) -> String {
    cell.map(|value| value.to_string().trim().to_string())
        .unwrap_or_default()
}

fn parse_plain_number(text: &str) -> Option<CellValue> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return None;
    }

    if fraction.is_none()
        && let Ok(value) = text.parse::<i64>()
    {
        return Some(CellValue::Integer(value));
    }

    text.parse::<f64>().ok().map(CellValue::Float)
}
