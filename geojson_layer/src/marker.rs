use egui::{Painter, Pos2};

use crate::{geometry::Feature, style::FeatureStyle};

/// Draws a marker at the position of each point of `Point` and `MultiPoint` geometries.
///
/// Closures taking the same arguments as [`Marker::draw`] are markers too.
pub trait Marker {
    fn draw(&self, painter: &Painter, point: Pos2, feature: &Feature, style: &FeatureStyle);

    /// Whether `pointer` is over a marker drawn at `point`.
    fn contains(&self, point: Pos2, pointer: Pos2, style: &FeatureStyle) -> bool {
        point.distance(pointer) <= style.radius + style.stroke.width / 2.
    }
}

/// Default marker, a filled circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circle;

impl Marker for Circle {
    fn draw(&self, painter: &Painter, point: Pos2, _feature: &Feature, style: &FeatureStyle) {
        painter.circle(point, style.radius, style.fill_color(), style.stroke());
    }
}

impl<F> Marker for F
where
    F: Fn(&Painter, Pos2, &Feature, &FeatureStyle),
{
    fn draw(&self, painter: &Painter, point: Pos2, feature: &Feature, style: &FeatureStyle) {
        self(painter, point, feature, style);
    }
}
