//! Finding out whether the pointer is over a projected geometry.

use egui::Pos2;
use geo::{Contains as _, LineString, Point, Polygon, coord};

use crate::{marker::Marker, projector::ProjectedGeometry, style::FeatureStyle};

/// Lines thinner than that are still easy to point at.
const MIN_LINE_TOLERANCE: f32 = 3.;

fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq == 0. {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0., 1.);
    point.distance(a + ab * t)
}

fn near_path(pointer: Pos2, path: &[Pos2], tolerance: f32) -> bool {
    match path {
        [] => false,
        [single] => pointer.distance(*single) <= tolerance,
        _ => path
            .windows(2)
            .any(|segment| distance_to_segment(pointer, segment[0], segment[1]) <= tolerance),
    }
}

fn near_ring(pointer: Pos2, ring: &[Pos2], tolerance: f32) -> bool {
    near_path(pointer, ring, tolerance)
        || match (ring.first(), ring.last()) {
            (Some(first), Some(last)) => distance_to_segment(pointer, *last, *first) <= tolerance,
            _ => false,
        }
}

fn to_line_string(ring: &[Pos2]) -> LineString {
    LineString(
        ring.iter()
            .map(|p| coord! { x: p.x as f64, y: p.y as f64 })
            .collect(),
    )
}

fn inside_polygon(pointer: Pos2, rings: &[Vec<Pos2>]) -> bool {
    let Some((exterior, holes)) = rings.split_first() else {
        return false;
    };

    if exterior.len() < 3 {
        return false;
    }

    let polygon = Polygon::new(
        to_line_string(exterior),
        holes.iter().map(|hole| to_line_string(hole)).collect(),
    );
    polygon.contains(&Point::new(pointer.x as f64, pointer.y as f64))
}

fn hits_polygon(pointer: Pos2, rings: &[Vec<Pos2>], tolerance: f32) -> bool {
    inside_polygon(pointer, rings) || rings.iter().any(|ring| near_ring(pointer, ring, tolerance))
}

/// Whether `pointer` is over the geometry drawn with `style` and `marker`.
pub(crate) fn hits(
    geometry: &ProjectedGeometry,
    pointer: Pos2,
    style: &FeatureStyle,
    marker: &dyn Marker,
) -> bool {
    let tolerance = (style.stroke.width / 2.).max(MIN_LINE_TOLERANCE);

    match geometry {
        ProjectedGeometry::Point(point) => marker.contains(*point, pointer, style),
        ProjectedGeometry::MultiPoint(points) => points
            .iter()
            .any(|point| marker.contains(*point, pointer, style)),
        ProjectedGeometry::LineString(path) => near_path(pointer, path, tolerance),
        ProjectedGeometry::MultiLineString(paths) => {
            paths.iter().any(|path| near_path(pointer, path, tolerance))
        }
        ProjectedGeometry::Polygon(rings) => hits_polygon(pointer, rings, tolerance),
        ProjectedGeometry::MultiPolygon(polygons) => polygons
            .iter()
            .any(|rings| hits_polygon(pointer, rings, tolerance)),
        ProjectedGeometry::GeometryCollection(geometries) => geometries
            .iter()
            .any(|geometry| hits(geometry, pointer, style, marker)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Circle;
    use egui::pos2;

    fn square(min: f32, max: f32) -> Vec<Pos2> {
        vec![
            pos2(min, min),
            pos2(max, min),
            pos2(max, max),
            pos2(min, max),
            pos2(min, min),
        ]
    }

    fn hits_default(geometry: &ProjectedGeometry, pointer: Pos2) -> bool {
        hits(geometry, pointer, &FeatureStyle::default(), &Circle)
    }

    #[test]
    fn distance_to_segment_ends_and_middle() {
        let (a, b) = (pos2(0., 0.), pos2(10., 0.));
        assert_eq!(5., distance_to_segment(pos2(5., 5.), a, b));
        assert_eq!(5., distance_to_segment(pos2(-3., 4.), a, b));
        assert_eq!(5., distance_to_segment(pos2(3., 4.), a, a));
    }

    #[test]
    fn point_is_hit_within_marker() {
        let point = ProjectedGeometry::Point(pos2(50., 50.));
        assert!(hits_default(&point, pos2(55., 55.)));
        assert!(!hits_default(&point, pos2(70., 50.)));
    }

    #[test]
    fn line_is_hit_near_any_segment() {
        let line = ProjectedGeometry::LineString(vec![pos2(0., 0.), pos2(100., 0.), pos2(100., 100.)]);
        assert!(hits_default(&line, pos2(50., 2.)));
        assert!(hits_default(&line, pos2(98., 50.)));
        assert!(!hits_default(&line, pos2(50., 50.)));
    }

    #[test]
    fn polygon_is_hit_inside_but_not_in_hole() {
        let polygon = ProjectedGeometry::Polygon(vec![square(0., 100.), square(40., 60.)]);
        assert!(hits_default(&polygon, pos2(20., 20.)));
        assert!(!hits_default(&polygon, pos2(50., 50.)));
        assert!(!hits_default(&polygon, pos2(150., 50.)));

        // Outline of the hole counts as the polygon.
        assert!(hits_default(&polygon, pos2(40., 50.)));
    }

    #[test]
    fn collection_is_hit_if_any_member_is() {
        let collection = ProjectedGeometry::GeometryCollection(vec![
            ProjectedGeometry::Point(pos2(500., 500.)),
            ProjectedGeometry::MultiPolygon(vec![vec![square(0., 10.)]]),
        ]);
        assert!(hits_default(&collection, pos2(5., 5.)));
        assert!(hits_default(&collection, pos2(500., 505.)));
        assert!(!hits_default(&collection, pos2(200., 200.)));
    }
}
