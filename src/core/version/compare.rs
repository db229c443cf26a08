// ─── Version Comparator ───
// Orders dotted artifact versions such as `9.8`, `2.1.10` or `1.2-beta`.

use std::cmp::Ordering;

/// Numeric value of a single dotted segment: its leading digit run,
/// ignoring any `-qualifier`. Segments without leading digits count as `0`.
fn segment_value(segment: &str) -> u64 {
    let digits_end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    let digits = &segment[..digits_end];

    if digits.is_empty() {
        return 0;
    }

    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// Compare two version strings.
///
/// Segments are compared pairwise up to the shorter length by their leading
/// numeric run. When every compared segment is equal, the version with more
/// segments is newer, so `1.2 < 1.2.0`.
///
/// Qualifiers are not part of the ordering: `1.2.0-beta` and `1.2.0` compare
/// equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for (a_seg, b_seg) in a_parts.iter().zip(b_parts.iter()) {
        match segment_value(a_seg).cmp(&segment_value(b_seg)) {
            Ordering::Equal => continue,
            non_eq => return non_eq,
        }
    }

    a_parts.len().cmp(&b_parts.len())
}
