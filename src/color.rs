use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Risk rating scale
// ---------------------------------------------------------------------------

/// Green (lowest) to red (highest) tint for a rating within `[min, max]`.
pub fn rating_color(value: f64, min: f64, max: f64) -> Color32 {
    let range = max - min;
    let t = if range.abs() < f64::EPSILON {
        0.5
    } else {
        ((value - min) / range).clamp(0.0, 1.0)
    };
    // Hue 120° is green, 0° is red.
    hsl_to_color32(120.0 * (1.0 - t as f32), 0.7, 0.5)
}

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

/// Maps business categories to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    /// Build from the dataset's sorted distinct categories.
    pub fn new(categories: &[String]) -> Self {
        let mapping = categories
            .iter()
            .cloned()
            .zip(generate_palette(categories.len()))
            .collect();
        CategoryColors { mapping }
    }

    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
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
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn rating_scale_runs_green_to_red() {
        let low = rating_color(1.0, 1.0, 9.0);
        let high = rating_color(9.0, 1.0, 9.0);
        assert!(low.g() > low.r());
        assert!(high.r() > high.g());
        // A degenerate range sits at the middle of the scale.
        assert_eq!(rating_color(3.0, 3.0, 3.0), rating_color(0.5, 0.0, 1.0));
    }

    #[test]
    fn unknown_category_is_gray() {
        let colors = CategoryColors::new(&["Energy".to_string(), "Water".to_string()]);
        assert_ne!(colors.color_for("Energy"), colors.color_for("Water"));
        assert_eq!(colors.color_for("Mining"), Color32::GRAY);
    }
}
