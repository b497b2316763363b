/// Upper bound for an availability percentage.
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Caps a percentage at 100. Returns the capped value and whether capping happened.
///
/// NaN caps to 100 as well, so a contributing record never reads as "no data".
pub fn clamp_percentage(value: f64) -> (f64, bool) {
    if value > MAX_PERCENTAGE || value.is_nan() {
        (MAX_PERCENTAGE, true)
    } else {
        (value, false)
    }
}
