//! Projection of whole GeoJSON geometries onto the screen.

use egui::{Pos2, Rect};
use walkers::{Position, Projector, lon_lat};

use crate::geometry::{Geometry, LonLat};

/// Map center, i.e. the position shown in the middle of the `viewport`.
pub fn map_center(projector: &Projector, viewport: Rect) -> Position {
    projector.unproject(viewport.center().to_vec2())
}

/// Calculate a point on the screen from a GeoJSON position, as if the map was centered at
/// `center` instead of its actual center. `center` is expected to be one of the centers given by
/// [`crate::calc_centers`].
///
/// The projector knows the zoom, the size of the tiles and the part of the screen taken by the
/// map, and always projects relative to the actual center. As the projection is linear in
/// longitude, looking from another center is the same as shifting the position by the
/// difference between the centers.
pub fn geojson_point_to_screen_point(
    position: LonLat,
    center: Position,
    projector: &Projector,
    viewport: Rect,
) -> Pos2 {
    project_from(projector, map_center(projector, viewport), position, center)
}

fn project_from(
    projector: &Projector,
    map_center: Position,
    position: LonLat,
    center: Position,
) -> Pos2 {
    let shift = map_center.x() - center.x();
    projector
        .project(lon_lat(position.longitude() + shift, position.latitude()))
        .to_pos2()
}

/// Geometry projected onto the screen. Mirrors the structure of [`Geometry`], so that rings of
/// polygons, and polygons of multi-polygons, can be told apart when drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedGeometry {
    Point(Pos2),
    MultiPoint(Vec<Pos2>),
    LineString(Vec<Pos2>),
    MultiLineString(Vec<Vec<Pos2>>),
    Polygon(Vec<Vec<Pos2>>),
    MultiPolygon(Vec<Vec<Vec<Pos2>>>),
    GeometryCollection(Vec<ProjectedGeometry>),
}

/// Projects geometries for a single frame of the map.
pub struct GeometryProjector<'a> {
    projector: &'a Projector,
    map_center: Position,
}

impl<'a> GeometryProjector<'a> {
    pub fn new(projector: &'a Projector, viewport: Rect) -> Self {
        Self {
            projector,
            map_center: map_center(projector, viewport),
        }
    }

    /// Position shown in the middle of the map.
    pub fn map_center(&self) -> Position {
        self.map_center
    }

    /// Project a single position, as if the map was centered at `center`.
    pub fn project_position(&self, position: LonLat, center: Position) -> Pos2 {
        project_from(self.projector, self.map_center, position, center)
    }

    fn project_path(&self, path: &[LonLat], center: Position) -> Vec<Pos2> {
        path.iter()
            .map(|position| self.project_position(*position, center))
            .collect()
    }

    fn project_paths(&self, paths: &[Vec<LonLat>], center: Position) -> Vec<Vec<Pos2>> {
        paths
            .iter()
            .map(|path| self.project_path(path, center))
            .collect()
    }

    /// Project every position of the geometry, as if the map was centered at `center`. Returns
    /// `None` for [`Geometry::Unsupported`], which has nothing to project.
    pub fn project_geometry(
        &self,
        geometry: &Geometry,
        center: Position,
    ) -> Option<ProjectedGeometry> {
        Some(match geometry {
            Geometry::Point { coordinates } => {
                ProjectedGeometry::Point(self.project_position(*coordinates, center))
            }
            Geometry::MultiPoint { coordinates } => {
                ProjectedGeometry::MultiPoint(self.project_path(coordinates, center))
            }
            Geometry::LineString { coordinates } => {
                ProjectedGeometry::LineString(self.project_path(coordinates, center))
            }
            Geometry::MultiLineString { coordinates } => {
                ProjectedGeometry::MultiLineString(self.project_paths(coordinates, center))
            }
            Geometry::Polygon { coordinates } => {
                ProjectedGeometry::Polygon(self.project_paths(coordinates, center))
            }
            Geometry::MultiPolygon { coordinates } => ProjectedGeometry::MultiPolygon(
                coordinates
                    .iter()
                    .map(|polygon| self.project_paths(polygon, center))
                    .collect(),
            ),
            Geometry::GeometryCollection { geometries } => ProjectedGeometry::GeometryCollection(
                geometries
                    .iter()
                    .filter_map(|geometry| self.project_geometry(geometry, center))
                    .collect(),
            ),
            Geometry::Unsupported => return None,
        })
    }
}
