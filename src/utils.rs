//! Numeric helpers shared by the analytics modules.

/// Round `value` to `places` decimal places, halves away from zero.
///
/// Scales by `10^places`, rounds with `f64::round`, and scales back, so
/// `71.25` becomes `71.3` and `-71.25` becomes `-71.3` at one place.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
