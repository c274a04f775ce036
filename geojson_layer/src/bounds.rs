//! Deciding whether a geographical position lies within the visible part of the world.

use egui::Rect;
use walkers::{Position, Projector};

/// Degrees of longitude covered by a single copy of the world.
pub(crate) const WORLD_LONGITUDE_SPAN: f64 = 360.;

/// Upper limit of world copies taken into account in each direction. Even at zoom 0, where the
/// world is 256px wide, that is far more than any screen can show.
pub(crate) const MAX_WORLD_COPIES: i64 = 64;

/// Geographical extent which is currently visible on the screen.
///
/// When the map is zoomed out far enough, the extent can be wider than 360° of longitude, in
/// which case the world is shown more than once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub north_west: Position,
    pub south_east: Position,
}

impl WorldBounds {
    pub fn new(north_west: Position, south_east: Position) -> Self {
        Self {
            north_west,
            south_east,
        }
    }

    /// Extent of the `viewport` as seen through the map's `projector`. Longitudes are not wrapped.
    pub fn from_projector(projector: &Projector, viewport: Rect) -> Self {
        Self::new(
            projector.unproject(viewport.left_top().to_vec2()),
            projector.unproject(viewport.right_bottom().to_vec2()),
        )
    }

    /// Width of the bounds in degrees of longitude.
    pub fn longitude_span(&self) -> f64 {
        self.south_east.x() - self.north_west.x()
    }
}

/// Whether the position given by `latitude` and `longitude` is within `bounds`.
///
/// Longitude is periodic, so a position is considered to be inside if any of its copies, shifted
/// by a multiple of 360°, is. This works regardless of the bounds crossing the antimeridian or
/// lying entirely in another copy of the world. Non-finite coordinates and latitudes beyond the
/// poles are never inside.
pub fn is_in_world_bounds(latitude: f64, longitude: f64, bounds: &WorldBounds) -> bool {
    if !(-90. ..=90.).contains(&latitude) || !longitude.is_finite() {
        return false;
    }

    let north = bounds.north_west.y();
    let south = bounds.south_east.y();
    if !(south..=north).contains(&latitude) {
        return false;
    }

    let west = bounds.north_west.x();
    let span = bounds.longitude_span();

    if span.is_nan() || span < 0. {
        return false;
    }

    if span >= WORLD_LONGITUDE_SPAN {
        return true;
    }

    // Closest copy of the longitude which is not to the west of the bounds.
    west + (longitude - west).rem_euclid(WORLD_LONGITUDE_SPAN) <= west + span
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Vec2};
    use walkers::{MapMemory, lat_lon, lon_lat};

    fn europe() -> WorldBounds {
        WorldBounds::new(lat_lon(60., -10.), lat_lon(35., 30.))
    }

    #[test]
    fn position_inside_plain_bounds() {
        assert!(is_in_world_bounds(51.1, 17.0, &europe()));
        assert!(is_in_world_bounds(60., -10., &europe()), "edges are inclusive");
    }

    #[test]
    fn position_outside_plain_bounds() {
        assert!(!is_in_world_bounds(51.1, 40.0, &europe()));
        assert!(!is_in_world_bounds(20.0, 17.0, &europe()));
        assert!(!is_in_world_bounds(61.0, 17.0, &europe()));
    }

    #[test]
    fn bounds_crossing_the_antimeridian() {
        let pacific = WorldBounds::new(lat_lon(30., 170.), lat_lon(-30., 190.));

        assert!(is_in_world_bounds(0., 175., &pacific));
        assert!(is_in_world_bounds(0., -175., &pacific));
        assert!(!is_in_world_bounds(0., -165., &pacific));
        assert!(!is_in_world_bounds(0., 165., &pacific));
    }

    #[test]
    fn bounds_in_another_copy_of_the_world() {
        // Map was dragged by one whole world to the east.
        let europe_again = WorldBounds::new(lat_lon(60., 350.), lat_lon(35., 390.));

        assert!(is_in_world_bounds(51.1, 17.0, &europe_again));
        assert!(!is_in_world_bounds(51.1, 40.0, &europe_again));
    }

    #[test]
    fn bounds_spanning_multiple_worlds() {
        let zoomed_out = WorldBounds::new(lat_lon(85., -562.5), lat_lon(-85., 562.5));

        assert!(is_in_world_bounds(0., 179.9, &zoomed_out));
        assert!(is_in_world_bounds(0., -1000., &zoomed_out));
        assert!(!is_in_world_bounds(89., 0., &zoomed_out));
    }

    #[test]
    fn invalid_coordinates_are_never_inside() {
        let everything = WorldBounds::new(lat_lon(90., -180.), lat_lon(-90., 180.));

        assert!(!is_in_world_bounds(f64::NAN, 0., &everything));
        assert!(!is_in_world_bounds(0., f64::NAN, &everything));
        assert!(!is_in_world_bounds(0., f64::INFINITY, &everything));
        assert!(!is_in_world_bounds(91., 0., &everything));
        assert!(!is_in_world_bounds(-90.5, 0., &everything));
    }

    #[test]
    fn inverted_or_invalid_bounds_contain_nothing() {
        let inverted = WorldBounds::new(lat_lon(60., 30.), lat_lon(35., -10.));
        assert!(!is_in_world_bounds(51.1, 17.0, &inverted));

        let broken = WorldBounds::new(lat_lon(60., f64::NAN), lat_lon(35., 30.));
        assert!(!is_in_world_bounds(51.1, 17.0, &broken));
    }

    #[test]
    fn span_of_zoomed_out_bounds() {
        let bounds = WorldBounds::new(lat_lon(60., -200.), lat_lon(-60., 200.));
        approx::assert_relative_eq!(bounds.longitude_span(), 400.);
    }

    #[test]
    fn bounds_of_the_whole_world_at_zoom_zero() {
        let mut memory = MapMemory::default();
        memory.set_zoom(0.).unwrap();

        // Whole world is 256px wide at zoom 0, so 512px shows it twice.
        let viewport = Rect::from_min_size(Pos2::ZERO, Vec2::new(512., 256.));
        let projector = Projector::new(viewport, &memory, lon_lat(0., 0.));
        let bounds = WorldBounds::from_projector(&projector, viewport);

        approx::assert_relative_eq!(bounds.north_west.x(), -360., epsilon = 1e-6);
        approx::assert_relative_eq!(bounds.south_east.x(), 360., epsilon = 1e-6);
        approx::assert_relative_eq!(bounds.longitude_span(), 720., epsilon = 1e-6);
        assert!(bounds.north_west.y() > 85.);
        assert!(bounds.south_east.y() < -85.);
    }
}
