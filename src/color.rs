use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

/// Sequential red scale for the map table: `t = 0` is pale, `t = 1` dark.
pub fn reds(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    hsl_to_color32(Hsl::new(0.0, 0.85, 0.92 - 0.62 * t as f32))
}

// ---------------------------------------------------------------------------
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// Maps every country of the dataset to a distinct colour, so a country
/// keeps its colour whatever else is selected.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(countries: &BTreeSet<String>) -> Self {
        let palette = generate_palette(countries.len());
        ColorMap {
            mapping: countries.iter().cloned().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        let distinct: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn reds_darken_with_value() {
        let pale = reds(0.0);
        let dark = reds(1.0);
        assert!(pale.g() > dark.g());
        assert_eq!(reds(f64::NAN), pale);
        assert_eq!(reds(7.0), dark);
    }

    #[test]
    fn unknown_country_is_gray() {
        let map = ColorMap::new(&BTreeSet::from(["France".to_string()]));
        assert_ne!(map.color_for("France"), Color32::GRAY);
        assert_eq!(map.color_for("Atlantis"), Color32::GRAY);
    }
}
