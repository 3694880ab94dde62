/// An authored color: RGB in 0–255, alpha in 0–1.
///
/// Parts are authored with byte-range colors; the renderer wants normalized
/// floats. [`Rgba::normalized`] does the conversion and [`Rgba::shaded`] applies
/// the flat per-face brightness factor on top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Rgba = Rgba::rgb(255.0, 255.0, 255.0);
    pub const RED: Rgba = Rgba::rgb(255.0, 0.0, 0.0);
    pub const GREEN: Rgba = Rgba::rgb(0.0, 255.0, 0.0);
    pub const BLUE: Rgba = Rgba::rgb(0.0, 0.0, 255.0);

    /// RGB divided by 255, alpha passed through.
    pub fn normalized(&self) -> [f32; 4] {
        [self.r / 255.0, self.g / 255.0, self.b / 255.0, self.a]
    }

    /// Normalized color with every channel, alpha included, multiplied by `factor`.
    pub fn shaded(&self, factor: f32) -> [f32; 4] {
        self.normalized().map(|c| c * factor)
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_leaves_alpha() {
        let c = Rgba::new(255.0, 51.0, 0.0, 0.5);
        assert_eq!(c.normalized(), [1.0, 0.2, 0.0, 0.5]);
    }

    #[test]
    fn shading_scales_alpha_too() {
        let c = Rgba::from([255.0, 255.0, 255.0, 1.0]);
        assert_eq!(c.shaded(0.5), [0.5, 0.5, 0.5, 0.5]);
    }
}
