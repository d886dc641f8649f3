/// Strips common separators from a raw phone value, keeping one leading
/// `+` if present.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        if c == '+' && i == 0 {
            normalized.push(c);
        } else if c.is_ascii_digit() {
            normalized.push(c);
        } else if matches!(c, ' ' | '-' | '.' | '(' | ')' | '/') {
            // separator, dropped
        } else {
            // Anything else makes the value suspicious; keep it so
            // validation rejects the row instead of silently mangling it.
            normalized.push(c);
        }
    }
    normalized
}

/// Loose E.164-style check: optional leading `+`, then 2 to 15 digits.
/// Expects an already-normalized value.
pub fn is_valid_phone(normalized: &str) -> bool {
    let digits = normalized.strip_prefix('+').unwrap_or(normalized);
    (2..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
