use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (work modes, ...) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Colours are assigned in sorted label order, so a category keeps its
    /// colour while the filters change.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: std::collections::BTreeSet<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale for numeric values
// ---------------------------------------------------------------------------

/// Viridis anchor colours, dark to bright.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Colour at position `t` in `[0, 1]` along the Viridis gradient.
pub fn sequential_color(t: f32) -> Color32 {
    let pos = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f32;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let lower = anchor(VIRIDIS[i]);
    let upper = anchor(VIRIDIS[i + 1]);
    let mixed = lower.mix(upper, pos - i as f32);
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

fn anchor((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Maps values in `[min, max]` onto [`sequential_color`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        ColorScale { min, max }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let range = self.max - self.min;
        let t = if range.is_finite() && range > f64::EPSILON {
            (value - self.min) / range
        } else {
            1.0
        };
        sequential_color(t as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn color_map_is_stable_and_falls_back_to_gray() {
        let a = ColorMap::new(["Remote", "Hybrid", "On-site"]);
        let b = ColorMap::new(["On-site", "Remote", "Hybrid", "Remote"]);
        assert_eq!(a.color_for("Remote"), b.color_for("Remote"));
        assert_eq!(a.color_for("Unknown"), Color32::GRAY);
    }

    #[test]
    fn sequential_scale_hits_the_ends() {
        assert_eq!(sequential_color(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(sequential_color(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(sequential_color(7.0), sequential_color(1.0));

        let scale = ColorScale::new([10.0, 20.0]);
        assert_eq!(scale.color_for(10.0), sequential_color(0.0));
        assert_eq!(scale.color_for(20.0), sequential_color(1.0));
        assert_eq!(ColorScale::new([5.0]).color_for(5.0), sequential_color(1.0));
    }
}
