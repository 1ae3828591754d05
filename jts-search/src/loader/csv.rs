//! Quote-aware CSV line splitting and classification code normalization

/// Split one line on commas, honoring double-quoted fields
///
/// A quote toggles the in-quotes state and is dropped from the output; commas inside
/// quotes are kept as data. Doubled quotes are not treated as escapes. Never fails:
/// unbalanced quoting simply leaves the remainder of the line in one field.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    fields.push(field);
    fields
}

/// Remove every `[` and `]` marker
pub fn strip_brackets(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

/// Normalize a raw classification code to five zero-padded digits
///
/// Brackets are stripped and the remainder parsed as an unsigned integer. Returns `None`
/// for non-numeric input or values that do not fit in five digits.
pub fn normalize_code(raw: &str) -> Option<String> {
    let cleaned = strip_brackets(raw.trim());
    let value: u32 = cleaned.trim().parse().ok()?;
    if value > 99_999 {
        return None;
    }
    Some(format!("{:05}", value))
}
