//! Pluralization utilities for log messages.

/// Return "s" suffix for plural counts
///
/// # Examples
///
/// - `plural_s(0)` -> `"s"` (0 pages)
/// - `plural_s(1)` -> `""` (1 page)
/// - `plural_s(5)` -> `"s"` (5 pages)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// # Examples
///
/// - `plural_count(0, "web font")` -> `"0 web fonts"`
/// - `plural_count(1, "web font")` -> `"1 web font"`
/// - `plural_count(5, "page")` -> `"5 pages"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}
