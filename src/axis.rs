//! Grid spacing and tick label formatting.

use crate::bounds::Range;

/// Snap a positive spacing to the largest of `1`, `2` or `5` times a power
/// of ten that does not exceed it.
pub fn snap_step(value: f64) -> f64 {
    if !(value.is_finite() && value > 0.0) {
        return 1.0;
    }
    let snap = |factor: f64| 10_f64.powf((value / factor).log10().floor()) * factor;
    snap(1.0).max(snap(2.0)).max(snap(5.0))
}

/// Grid spacing for a range drawn across `plot_px` pixels with cells of
/// roughly `cell_px` pixels.
pub fn grid_step(range: Range, plot_px: i32, cell_px: i32) -> f64 {
    if range.max == range.min {
        return 1.0;
    }
    let cells = (f64::from(plot_px) / f64::from(cell_px.max(1))).floor().max(1.0);
    snap_step(range.span() / cells)
}

/// Enlarge `step` by the smallest integer factor whose pixel pitch reaches
/// `min_px`.
pub fn legible_step(step: f64, scale: f64, min_px: f64) -> f64 {
    let pitch = (step * scale).abs();
    if pitch > 0.0 && pitch < min_px {
        step * (min_px / pitch).ceil()
    } else {
        step
    }
}

/// Multiples of `step` inside `range`, ascending.
pub fn ticks(range: Range, step: f64) -> impl Iterator<Item = f64> {
    let valid = step.is_finite() && step > 0.0 && range.min.is_finite() && range.max.is_finite();
    let (first, last) = if valid {
        let (min, max) = (range.min / step, range.max / step);
        (min.ceil() as i64, max.floor() as i64)
    } else {
        (1, 0)
    };
    (first..=last).map(move |i| i as f64 * step)
}

/// Format a tick value with four significant digits, printing zero as `0`.
pub fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let scientific = format!("{value:.3e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if !(-4..4).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs());
    }
    let decimals = (3 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_picks_one_two_five() {
        assert_eq!(snap_step(1.0), 1.0);
        assert_eq!(snap_step(3.0), 2.0);
        assert_eq!(snap_step(7.0), 5.0);
        assert_eq!(snap_step(19.0), 10.0);
        assert!((snap_step(0.03) - 0.02).abs() < 1e-12);
        assert_eq!(snap_step(0.0), 1.0);
    }

    #[test]
    fn grid_step_guards_small_plots() {
        let range = Range::new(0.0, 10.0);
        assert_eq!(grid_step(range, 200, 60), 2.0);
        assert_eq!(grid_step(range, 10, 60), 10.0);
        assert_eq!(grid_step(Range::new(3.0, 3.0), 200, 60), 1.0);
    }

    #[test]
    fn legible_step_scales_by_integer() {
        assert_eq!(legible_step(1.0, 10.0, 30.0), 3.0);
        assert_eq!(legible_step(1.0, -7.0, 20.0), 3.0);
        assert_eq!(legible_step(1.0, 40.0, 30.0), 1.0);
    }

    #[test]
    fn ticks_cover_range() {
        let values: Vec<f64> = ticks(Range::new(-1.5, 4.2), 1.0).collect();
        assert_eq!(values, vec![-1.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ticks(Range::empty(), 1.0).count(), 0);
        assert_eq!(ticks(Range::new(0.0, 1.0), 0.0).count(), 0);
    }

    #[test]
    fn format_uses_four_significant_digits() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(100.0), "100");
        assert_eq!(format_tick(1234.6), "1235");
        assert_eq!(format_tick(0.000_12), "0.00012");
        assert_eq!(format_tick(123_456.0), "1.235e+05");
        assert_eq!(format_tick(0.000_01), "1e-05");
    }
}
