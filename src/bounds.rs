//! Running value extents folded across series before drawing.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Inverted range that any finite value narrows.
    pub const fn empty() -> Self {
        Self {
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    /// Range covering only zero.
    pub const fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether no value has been folded in yet.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }

    /// Grow both ends by `amount`.
    pub fn padded(&self, amount: f64) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }
}

/// Extents gathered from every series of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// X extent.
    pub x: Range,
    /// Y extent.
    pub y: Range,
    /// Largest entry count across series.
    pub n_max: usize,
    /// Inner padding in pixels.
    pub p_max: i32,
}

impl Bounds {
    /// Seed bounds for folding.
    ///
    /// An axis that includes the origin starts at `0..0`, otherwise it starts
    /// inverted so the first sample defines it.
    pub fn seed(include_zero_x: bool, include_zero_y: bool, padding: i32) -> Self {
        let axis = |zero: bool| if zero { Range::zero() } else { Range::empty() };
        Self {
            x: axis(include_zero_x),
            y: axis(include_zero_y),
            n_max: 0,
            p_max: padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_is_narrowed_by_first_value() {
        let mut range = Range::empty();
        assert!(range.is_empty());
        range.expand_to_include(-3.0);
        assert_eq!(range, Range::new(-3.0, -3.0));
        range.expand_to_include(f64::NAN);
        assert_eq!(range, Range::new(-3.0, -3.0));
    }

    #[test]
    fn zero_seed_keeps_origin() {
        let mut bounds = Bounds::seed(true, false, 20);
        bounds.x.expand_to_include(5.0);
        bounds.y.expand_to_include(5.0);
        assert_eq!(bounds.x, Range::new(0.0, 5.0));
        assert_eq!(bounds.y, Range::new(5.0, 5.0));
        assert_eq!(bounds.p_max, 20);
    }

    #[test]
    fn clamp_and_padding() {
        let range = Range::new(2.0, 4.0);
        assert_eq!(range.clamp(0.0), 2.0);
        assert_eq!(range.clamp(3.0), 3.0);
        assert_eq!(range.padded(1.0), Range::new(1.0, 5.0));
    }
}
