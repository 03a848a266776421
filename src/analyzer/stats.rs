//! Rounding and percentage helpers shared by the aggregations.

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Share of `count` in `total`, in percent with one decimal. 0.0 when `total` is 0.
pub fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}
