use rust_decimal::Decimal;

pub(crate) const CURRENCY: &str = "USD";

/// Format a decimal amount with thousand separators, 2 decimal places and
/// the currency suffix, e.g. `1234567.89` → `"1,234,567.89 USD"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{with_commas}.{dec_part} {CURRENCY}")
}

/// `"42.5%"`-style label for a percentage share.
pub(crate) fn format_share(share: Decimal) -> String {
    format!("{:.1}%", share.round_dp(1))
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    let page = page.max(1);
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Pick the entry `delta` steps away from `current` in `items`, wrapping.
/// Falls back to the first entry when `current` is not listed.
pub(crate) fn cycle<'a>(items: &[&'a str], current: &str, delta: isize) -> Option<&'a str> {
    if items.is_empty() {
        return None;
    }
    let len = items.len() as isize;
    let next = match items.iter().position(|s| *s == current) {
        Some(pos) => (pos as isize + delta).rem_euclid(len),
        None => 0,
    };
    items.get(next as usize).copied()
}
