/// Placeholder used when an address has nothing after the first comma
pub const MISSING_REMAINDER: &str = "Unknown";

/// Joins the primary line and remainder of a normalized key
pub const KEY_SEPARATOR: &str = ", ";

/// Split a free-text address into its primary line and remainder
///
/// The first comma is the boundary. Both parts are trimmed; the remainder's own
/// comma-separated segments are trimmed and re-joined with `", "`. An empty
/// remainder becomes [`MISSING_REMAINDER`].
///
/// `"12 Elm St,  Springfield ,IL"` → `("12 Elm St", "Springfield, IL")`
pub fn split_address(address: &str) -> (String, String) {
    let (primary, remainder) = match address.split_once(',') {
        Some((primary, remainder)) => (primary, remainder),
        None => (address, ""),
    };

    let remainder = remainder
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR);

    let remainder = if remainder.trim().is_empty() {
        MISSING_REMAINDER.to_string()
    } else {
        remainder
    };

    (primary.trim().to_string(), remainder)
}

/// Canonical comparison key for an address
///
/// Case-insensitive and whitespace-insensitive. Total: empty input produces
/// `", unknown"`. Normalizing a key returns the same key.
pub fn normalize_address(address: &str) -> String {
    let (primary, remainder) = split_address(address);
    format!(
        "{}{}{}",
        canonical_part(&primary),
        KEY_SEPARATOR,
        canonical_part(&remainder)
    )
}

#[inline]
fn canonical_part(part: &str) -> String {
    part.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
