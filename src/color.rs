use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
// Color mapping: experiment id → Color32
// ---------------------------------------------------------------------------

/// Assigns each experiment a stable colour by its first-occurrence index.
#[derive(Debug, Clone, Default)]
pub struct ExperimentColors {
    mapping: BTreeMap<String, Color32>,
}

impl ExperimentColors {
    pub const FALLBACK: Color32 = Color32::GRAY;

    /// Build the mapping for experiments listed in first-occurrence order.
    pub fn new(experiments: &[String]) -> Self {
        let mapping = experiments
            .iter()
            .cloned()
            .zip(generate_palette(experiments.len()))
            .collect();
        ExperimentColors { mapping }
    }

    /// Look up the colour for an experiment; unknown ids are grey.
    pub fn color_for(&self, experiment_id: &str) -> Color32 {
        self.mapping
            .get(experiment_id)
            .copied()
            .unwrap_or(Self::FALLBACK)
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
