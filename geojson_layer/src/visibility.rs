//! Deciding whether any part of a geometry is visible.

use geo::{BoundingRect as _, Intersects as _, Rect, Translate as _, coord};

use crate::{
    bounds::{MAX_WORLD_COPIES, WORLD_LONGITUDE_SPAN, WorldBounds, is_in_world_bounds},
    geometry::{Feature, Geometry, LonLat},
};

fn is_position_in_world_bounds(position: LonLat, bounds: &WorldBounds) -> bool {
    is_in_world_bounds(position.latitude(), position.longitude(), bounds)
}

/// Whether any vertex of the geometry is within the `bounds`.
///
/// Note that this is an approximation. A line or polygon whose vertices are all outside of the
/// bounds is considered invisible, even if its edges or interior cross them. See
/// [`VisibilityTest::Intersecting`] for an exact, but more expensive, alternative.
pub fn is_geometry_in_world_bounds(geometry: &Geometry, bounds: &WorldBounds) -> bool {
    let visible = |position: &LonLat| is_position_in_world_bounds(*position, bounds);

    match geometry {
        Geometry::Point { coordinates } => visible(coordinates),
        Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
            coordinates.iter().any(&visible)
        }
        Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
            coordinates.iter().any(|path| path.iter().any(&visible))
        }
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .any(|polygon| polygon.iter().any(|path| path.iter().any(&visible))),
        Geometry::GeometryCollection { geometries } => geometries
            .iter()
            .any(|geometry| is_geometry_in_world_bounds(geometry, bounds)),
        Geometry::Unsupported => false,
    }
}

/// Whether any vertex of the feature's geometry is within the `bounds`. Features without
/// geometry are never visible.
pub fn is_feature_in_world_bounds(feature: &Feature, bounds: &WorldBounds) -> bool {
    feature
        .geometry
        .as_ref()
        .is_some_and(|geometry| is_geometry_in_world_bounds(geometry, bounds))
}

/// Method of deciding whether a feature should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityTest {
    /// Feature is visible if any of its vertices is. Cheap, but misses shapes which cross the
    /// viewport without having a vertex in it, like a huge polygon around a zoomed-in map.
    #[default]
    AnyVertex,

    /// Feature is visible if it has a vertex within the bounds or any part of it intersects them.
    Intersecting,
}

impl VisibilityTest {
    pub fn is_geometry_visible(self, geometry: &Geometry, bounds: &WorldBounds) -> bool {
        match self {
            VisibilityTest::AnyVertex => is_geometry_in_world_bounds(geometry, bounds),
            VisibilityTest::Intersecting => {
                is_geometry_in_world_bounds(geometry, bounds)
                    || intersects_world_bounds(geometry, bounds)
            }
        }
    }

    pub fn is_feature_visible(self, feature: &Feature, bounds: &WorldBounds) -> bool {
        feature
            .geometry
            .as_ref()
            .is_some_and(|geometry| self.is_geometry_visible(geometry, bounds))
    }
}

/// Exact intersection test, which also takes copies of the geometry shifted by whole worlds into
/// account.
fn intersects_world_bounds(geometry: &Geometry, bounds: &WorldBounds) -> bool {
    let Some(geometry) = geometry.to_geo() else {
        return false;
    };

    let Some(extent) = geometry.bounding_rect() else {
        return false;
    };

    let (west, east) = (bounds.north_west.x(), bounds.south_east.x());
    let (south, north) = (bounds.south_east.y(), bounds.north_west.y());

    if !(west <= east && south <= north) {
        return false;
    }

    let viewport = Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north });

    // Range of world copies which overlap the bounds horizontally.
    let first = ((west - extent.max().x) / WORLD_LONGITUDE_SPAN).ceil();
    let last = ((east - extent.min().x) / WORLD_LONGITUDE_SPAN).floor();

    if !first.is_finite() || !last.is_finite() {
        return false;
    }

    let first = first as i64;
    let last = (last as i64).min(first + MAX_WORLD_COPIES);

    (first..=last).any(|copy| {
        geometry
            .translate(copy as f64 * WORLD_LONGITUDE_SPAN, 0.)
            .intersects(&viewport)
    })
}
