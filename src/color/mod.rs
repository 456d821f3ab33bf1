//! Color values and the hue, index, and hash derivations used for
//! automatic series coloring.

mod seed_hash;

pub(crate) use seed_hash::seed_hash;

/// 8-bit RGBA color.
///
/// Alpha is not applied by the drawing primitives directly; it selects the
/// blend weight of the [`Compositor`](crate::Compositor) layer a draw goes
/// through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::gray(0);
    /// Very dark gray.
    pub const DARK: Self = Self::gray(32);
    /// Mid gray.
    pub const GRAY: Self = Self::gray(128);
    /// Light gray.
    pub const LIGHT: Self = Self::gray(223);
    /// Opaque white.
    pub const WHITE: Self = Self::gray(255);

    /// Hue 0.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Hue 0.5.
    pub const ORANGE: Self = Self::rgb(255, 127, 0);
    /// Hue 1.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Hue 1.5.
    pub const LAWN: Self = Self::rgb(127, 255, 0);
    /// Hue 2.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Hue 2.5.
    pub const AQUA: Self = Self::rgb(0, 255, 127);
    /// Hue 3.
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    /// Hue 3.5.
    pub const SKY: Self = Self::rgb(0, 127, 255);
    /// Hue 4.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Hue 4.5.
    pub const PURPLE: Self = Self::rgb(127, 0, 255);
    /// Hue 5.
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    /// Hue 5.5.
    pub const PINK: Self = Self::rgb(255, 0, 127);

    /// Create a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque gray.
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Copy of this color with a different alpha.
    pub const fn alpha(self, alpha: u8) -> Self {
        Self::new(self.r, self.g, self.b, alpha)
    }

    /// Apply gamma correction to the color channels.
    pub fn gamma(self, gamma: f64) -> Self {
        if gamma <= 0.0 || !gamma.is_finite() {
            return self;
        }
        let correct = |c: u8| ((f64::from(c) / 255.0).powf(1.0 / gamma) * 255.0).round() as u8;
        Self::new(correct(self.r), correct(self.g), correct(self.b), self.a)
    }

    /// Opaque color on the six-sector hue wheel.
    ///
    /// `0` is red, `2` green, `4` blue; the wheel repeats every 6 units.
    pub fn hue(hue: f32) -> Self {
        let hue = hue.rem_euclid(6.0);
        let sector = hue as i32;
        let f = (hue - sector as f32) * 255.0;
        let (up, down) = (f as u8, (255.0 - f) as u8);
        match sector {
            0 => Self::rgb(255, up, 0),
            1 => Self::rgb(down, 255, 0),
            2 => Self::rgb(0, 255, up),
            3 => Self::rgb(0, down, 255),
            4 => Self::rgb(up, 0, 255),
            _ => Self::rgb(255, 0, down),
        }
    }

    /// Opaque color from three phase-shifted cosines of the hue.
    ///
    /// Smoother than [`Color::hue`]; used for dynamic per-sample colors.
    pub fn cos(hue: f32) -> Self {
        let hue = hue.rem_euclid(6.0);
        let channel = |shift: f32| ((((hue - shift) * 1.047).cos() + 1.0) * 127.9) as u8;
        Self::rgb(channel(0.0), channel(2.0), channel(4.0))
    }

    /// Opaque color for the `index`-th series, avoiding greens.
    pub fn index(index: u32) -> Self {
        Self::index_with(index, 16, 2.0, 2.0)
    }

    /// Opaque color for the `index`-th of `density` evenly spread hues.
    ///
    /// When `avoid > 0` the hue band of width `range` centered on `avoid` is
    /// skipped.
    pub fn index_with(index: u32, density: u32, avoid: f32, range: f32) -> Self {
        let mut index = index;
        let mut density = density.max(1);
        if avoid > 0.0 {
            let step = density as f32 / (6.0 - range);
            let offset = (avoid + range / 2.0) * step;
            index = (offset + (index % density) as f32) as u32;
            density = ((density as f32 + step * range) as u32).max(1);
        }
        let hue = (index % density) as f32 * 6.0 / density as f32;
        Self::cos(hue)
    }

    /// Stable color derived from a string, such as a series label.
    pub fn hash(seed: &str) -> Self {
        Self::index(seed_hash(seed.as_bytes()) as u32)
    }

    /// Hue of this color on the six-sector wheel, `0.0` for grays.
    pub fn hue_of(&self) -> f32 {
        let (r, g, b) = (i32::from(self.r), i32::from(self.g), i32::from(self.b));
        let min = r.min(g).min(b);
        let max = r.max(g).max(b);
        if min == max {
            return 0.0;
        }
        let span = (max - min) as f32;
        let hue = if r == max {
            (g - b) as f32 / span
        } else if g == max {
            2.0 + (b - r) as f32 / span
        } else {
            4.0 + (r - g) as f32 / span
        };
        if hue < 0.0 { hue + 6.0 } else { hue }
    }

    /// RGB channels, dropping alpha.
    pub const fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

impl From<[u8; 4]> for Color {
    fn from(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(c: Color) -> [u8; 4] {
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn default_is_opaque_black() {
        assert_eq!(channels(Color::default()), [0, 0, 0, 255]);
        assert_eq!(Color::from([1, 2, 3]).a, 255);
        assert_eq!(Color::new(1, 2, 3, 4).alpha(5).a, 5);
    }

    #[test]
    fn gray_sets_all_channels() {
        for v in [0, 3, 128, 255] {
            assert_eq!(channels(Color::gray(v)), [v, v, v, 255]);
        }
    }

    #[test]
    fn golden_vectors() {
        assert_eq!(channels(Color::hue(3.0)), [0, 255, 255, 255]);
        assert_eq!(channels(Color::cos(3.0)), [0, 191, 191, 255]);
        assert_eq!(channels(Color::index(3)), [37, 94, 251, 255]);
        assert_eq!(channels(Color::hash("test")), [160, 4, 218, 255]);
    }

    #[test]
    fn named_hues_match_wheel() {
        assert_eq!(Color::hue(0.0), Color::RED);
        assert_eq!(Color::hue(2.0), Color::GREEN);
        assert_eq!(Color::hue(4.0), Color::BLUE);
        assert_eq!(Color::hue(0.5), Color::ORANGE);
        assert_eq!(Color::hue(5.5), Color::PINK);
    }

    #[test]
    fn falling_sectors_round_down() {
        assert_eq!(Color::hue(1.5), Color::LAWN);
        assert_eq!(Color::hue(2.5), Color::AQUA);
        assert_eq!(Color::hue(3.5), Color::SKY);
        assert_eq!(Color::hue(4.5), Color::PURPLE);
    }

    #[test]
    fn hue_and_cos_repeat_every_six() {
        for h in [0.0_f32, 0.25, 1.5, 2.75, 3.0, 4.5, 5.25] {
            assert_eq!(Color::hue(h), Color::hue(h + 6.0), "hue {h}");
            assert_eq!(Color::cos(h), Color::cos(h + 6.0), "cos {h}");
            assert_eq!(Color::hue(h), Color::hue(h - 6.0), "hue {h}");
        }
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(Color::hash("series"), Color::hash("series"));
        assert_eq!(Color::hash("").a, 255);
    }

    #[test]
    fn hue_of_inverts_wheel() {
        assert_eq!(Color::gray(40).hue_of(), 0.0);
        assert!((Color::BLUE.hue_of() - 4.0).abs() < 1e-6);
        assert!((Color::CYAN.hue_of() - 3.0).abs() < 1e-6);
        assert!((Color::MAGENTA.hue_of() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn gamma_keeps_extremes() {
        let c = Color::new(0, 255, 64, 9).gamma(2.2);
        assert_eq!((c.r, c.g, c.a), (0, 255, 9));
        assert!(c.b > 64);
        assert_eq!(Color::WHITE.gamma(0.0), Color::WHITE);
    }
}
