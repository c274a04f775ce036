//! Copies of the world shown side by side when the map is zoomed out.

use walkers::{Position, lon_lat};

use crate::bounds::{MAX_WORLD_COPIES, WORLD_LONGITUDE_SPAN, WorldBounds};

/// Half of the world, in degrees of longitude.
const HALF_WORLD: f64 = WORLD_LONGITUDE_SPAN / 2.;

/// Number of half-world spans between the prime meridian and the given longitude, truncated
/// towards zero and limited to [`MAX_WORLD_COPIES`]. Non-finite longitudes count as zero.
fn half_worlds(longitude: f64) -> i64 {
    let count = (longitude / HALF_WORLD).trunc();
    if count.is_finite() {
        (count as i64).clamp(-MAX_WORLD_COPIES, MAX_WORLD_COPIES)
    } else {
        0
    }
}

/// Calculate map centers for each copy of the world which can be visible within `bounds`. A
/// feature needs to be drawn once for each of them, so that e.g. a polygon is seen in every copy
/// of the world when the map is zoomed out.
///
/// Centers are ordered from west to east and always include `center` itself. There are never
/// more than [`MAX_WORLD_COPIES`] of them on each side of `center`.
pub fn calc_centers(center: Position, bounds: &WorldBounds) -> Vec<Position> {
    let west = half_worlds(bounds.north_west.x());
    let east = half_worlds(bounds.south_east.x());

    let shifted = |worlds: i64| {
        lon_lat(
            center.x() + worlds as f64 * WORLD_LONGITUDE_SPAN,
            center.y(),
        )
    };

    (west..0)
        .map(shifted)
        .chain(std::iter::once(center))
        .chain((0..east).map(|x| shifted(x + 1)))
        .collect()
}
