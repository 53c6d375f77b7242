use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Maps category labels to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: BTreeSet<&str> = labels.into_iter().collect();
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
// Sequential scales
// ---------------------------------------------------------------------------

/// Continuous colour scales for value-coloured bars and heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Blues,
    Greens,
    Oranges,
    Viridis,
}

impl ColorScale {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorScale::Blues => &[(222, 235, 247), (158, 202, 225), (66, 146, 198), (8, 81, 156), (8, 48, 107)],
            ColorScale::Greens => &[(229, 245, 224), (161, 217, 155), (65, 171, 93), (0, 109, 44), (0, 68, 27)],
            ColorScale::Oranges => &[(254, 230, 206), (253, 174, 107), (241, 105, 19), (166, 54, 3), (127, 39, 4)],
            ColorScale::Viridis => &[(68, 1, 84), (59, 82, 139), (33, 145, 140), (94, 201, 98), (253, 231, 37)],
        }
    }

    /// Colour at `t` in `[0, 1]`, interpolated in linear RGB.
    pub fn color_at(self, t: f32) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f32;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - i as f32;

        let lin = |(r, g, b): (u8, u8, u8)| -> LinSrgb<f32> { Srgb::new(r, g, b).into_linear() };
        let mixed = lin(stops[i]).mix(lin(stops[i + 1]), frac);
        let out: Srgb<u8> = Srgb::from_linear(mixed);
        Color32::from_rgb(out.red, out.green, out.blue)
    }

    /// Colour for `value` relative to `(min, max)`; a flat range maps to the top.
    pub fn color_for(self, value: f64, range: Option<(f64, f64)>) -> Color32 {
        let t = match range {
            Some((lo, hi)) if hi > lo => ((value - lo) / (hi - lo)) as f32,
            _ => 1.0,
        };
        self.color_at(t)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luminance = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luminance > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn color_map_is_stable_per_label() {
        let cm = ColorMap::new(["Toys", "Furniture", "Toys"]);
        assert_eq!(cm.color_for("Toys"), cm.color_for("Toys"));
        assert_ne!(cm.color_for("Toys"), cm.color_for("Furniture"));
        assert_eq!(cm.color_for("Garden"), Color32::GRAY);
    }

    fn close(a: Color32, b: Color32) -> bool {
        a.r().abs_diff(b.r()) <= 1 && a.g().abs_diff(b.g()) <= 1 && a.b().abs_diff(b.b()) <= 1
    }

    #[test]
    fn scale_endpoints_hit_first_and_last_stop() {
        assert!(close(ColorScale::Viridis.color_at(0.0), Color32::from_rgb(68, 1, 84)));
        assert!(close(ColorScale::Viridis.color_at(1.0), Color32::from_rgb(253, 231, 37)));
        assert_eq!(ColorScale::Blues.color_at(7.0), ColorScale::Blues.color_at(1.0));
        assert_eq!(ColorScale::Blues.color_for(5.0, Some((5.0, 5.0))), ColorScale::Blues.color_at(1.0));
    }

    #[test]
    fn contrast_text() {
        assert_eq!(text_color_on(Color32::WHITE), Color32::BLACK);
        assert_eq!(text_color_on(Color32::from_rgb(8, 48, 107)), Color32::WHITE);
    }
}
