//! Discrete red → yellow → green colour scale.
//!
//! The scale is quantized to one colour per tick. A value `v` falls into
//! level `floor(v / max_tick * levels)`, clipped to the valid range, and
//! each level samples the three-stop gradient at `level / (levels - 1)`.

use plotters::style::RGBColor;

use crate::error::{PlotError, Result};

/// Bad or missing
pub const LOW: RGBColor = RGBColor(255, 0, 0);
/// Partial
pub const MID: RGBColor = RGBColor(191, 191, 0);
/// Good or complete
pub const HIGH: RGBColor = RGBColor(0, 128, 0);
/// Cells without any contributing record
pub const NO_DATA: RGBColor = RGBColor(220, 220, 220);

/// Ticks 0, 10, …, 100 used for percentage plots.
pub fn default_ticks() -> Vec<f64> {
    (0..=100).step_by(10).map(f64::from).collect()
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn gradient(low: RGBColor, mid: RGBColor, high: RGBColor, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.5 {
        lerp(low, mid, t * 2.0)
    } else {
        lerp(mid, high, (t - 0.5) * 2.0)
    }
}

/// Colour lookup shared by every panel of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    ticks: Vec<f64>,
    levels: Vec<RGBColor>,
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Builds the default red/yellow/green scale for `ticks`.
    pub fn from_ticks(ticks: &[f64]) -> Result<Self> {
        Self::with_colors(ticks, LOW, MID, HIGH)
    }

    /// Builds a scale with one level per tick spanning `0..=max(ticks)`.
    pub fn with_colors(ticks: &[f64], low: RGBColor, mid: RGBColor, high: RGBColor) -> Result<Self> {
        if ticks.is_empty() || ticks.iter().any(|t| !t.is_finite()) {
            return Err(PlotError::InvalidArgument(
                "tick set must be non-empty and finite".into(),
            ));
        }
        let max = ticks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= 0.0 {
            return Err(PlotError::InvalidArgument(format!(
                "largest tick must be positive, got {max}"
            )));
        }

        let n = ticks.len();
        let levels = (0..n)
            .map(|k| {
                let t = if n == 1 { 1.0 } else { k as f64 / (n - 1) as f64 };
                gradient(low, mid, high, t)
            })
            .collect();

        Ok(Self {
            ticks: ticks.to_vec(),
            levels,
            min: 0.0,
            max,
        })
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    pub fn levels(&self) -> &[RGBColor] {
        &self.levels
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Index of the level a defined value falls into.
    pub fn level_of(&self, value: f64) -> usize {
        let n = self.levels.len();
        let x = (value - self.min) / (self.max - self.min);
        let idx = (x * n as f64).floor();
        if idx < 0.0 { 0 } else { (idx as usize).min(n - 1) }
    }

    /// Colour for a cell; undefined and NaN cells get [`NO_DATA`].
    pub fn color_for(&self, value: Option<f64>) -> RGBColor {
        match value {
            Some(v) if !v.is_nan() => self.levels[self.level_of(v)],
            _ => NO_DATA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ticks() {
        let ticks = default_ticks();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[10], 100.0);
    }

    #[test]
    fn test_coherency_levels_map_to_stops() {
        let scale = ColorScale::from_ticks(&[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(scale.color_for(Some(0.0)), LOW);
        assert_eq!(scale.color_for(Some(1.0)), MID);
        assert_eq!(scale.color_for(Some(2.0)), HIGH);
    }

    #[test]
    fn test_percentage_quantization() {
        let scale = ColorScale::from_ticks(&default_ticks()).unwrap();
        assert_eq!(scale.levels().len(), 11);
        assert_eq!(scale.level_of(0.0), 0);
        assert_eq!(scale.level_of(9.0), 0);
        assert_eq!(scale.level_of(50.0), 5);
        assert_eq!(scale.level_of(99.0), 10);
        assert_eq!(scale.level_of(100.0), 10);
        assert_eq!(scale.level_of(-5.0), 0);
        assert_eq!(scale.color_for(Some(100.0)), HIGH);
        assert_eq!(scale.color_for(Some(0.0)), LOW);
    }

    #[test]
    fn test_undefined_is_no_data() {
        let scale = ColorScale::from_ticks(&default_ticks()).unwrap();
        assert_eq!(scale.color_for(None), NO_DATA);
        assert_eq!(scale.color_for(Some(f64::NAN)), NO_DATA);
        assert!(!scale.levels().contains(&NO_DATA));
    }

    #[test]
    fn test_invalid_ticks() {
        assert!(ColorScale::from_ticks(&[]).is_err());
        assert!(ColorScale::from_ticks(&[0.0]).is_err());
        assert!(ColorScale::from_ticks(&[0.0, f64::NAN]).is_err());
    }
}
