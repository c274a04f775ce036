use egui::{Color32, Stroke};

/// Visual style of a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    /// Fill of polygons and markers.
    pub fill: Color32,

    /// Outline of polygons and markers, and the line itself for line strings.
    pub stroke: Stroke,

    /// Radius of the default marker.
    pub radius: f32,

    /// Multiplies both `fill` and `stroke`.
    pub opacity: f32,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgba_unmultiplied(0x93, 0xc0, 0xd0, 0x99),
            stroke: Stroke::new(2., Color32::WHITE),
            radius: 10.,
            opacity: 1.,
        }
    }
}

impl FeatureStyle {
    /// Fill color with the opacity applied.
    pub fn fill_color(&self) -> Color32 {
        self.fill.gamma_multiply(self.opacity)
    }

    /// Stroke with the opacity applied.
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.stroke.width, self.stroke.color.gamma_multiply(self.opacity))
    }
}

/// Interaction state of a feature, passed to the callback requesting the feature's style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureState {
    /// Pointer is over the feature.
    pub mouse_over: bool,
}
