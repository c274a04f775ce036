use egui::{Painter, Pos2, Shape, vec2};
use geojson_layer::{Circle, Feature, FeatureStyle, Marker};

/// Pin standing on the point, for features with `"marker": "pin"` property. Others are drawn as
/// circles.
pub struct Pins;

fn is_pin(feature: &Feature) -> bool {
    feature
        .property("marker")
        .and_then(|marker| marker.as_str())
        == Some("pin")
}

impl Marker for Pins {
    fn draw(&self, painter: &Painter, point: Pos2, feature: &Feature, style: &FeatureStyle) {
        if !is_pin(feature) {
            Circle.draw(painter, point, feature, style);
            return;
        }

        let head = point - vec2(0., style.radius * 2.);
        painter.add(Shape::convex_polygon(
            vec![
                point,
                head + vec2(style.radius * 0.6, 0.),
                head - vec2(style.radius * 0.6, 0.),
            ],
            style.fill_color(),
            style.stroke(),
        ));
        painter.circle(head, style.radius, style.fill_color(), style.stroke());
    }

    fn contains(&self, point: Pos2, pointer: Pos2, style: &FeatureStyle) -> bool {
        // Head or the needle.
        let head = point - vec2(0., style.radius * 2.);
        Circle.contains(head, pointer, style) || Circle.contains(point, pointer, style)
    }
}
