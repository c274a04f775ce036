#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

mod bounds;
mod geometry;
mod hit;
mod layer;
mod marker;
mod popup;
mod projector;
mod replicas;
mod style;
mod visibility;

pub use bounds::{WorldBounds, is_in_world_bounds};
pub use geometry::{
    Error, Feature, FeatureCollection, GeoJson, Geometry, InvalidPosition, LonLat,
};
pub use layer::{FeatureStyleFn, GeoJsonLayer, LayerResponse, PopupFn, RenderedFeature};
pub use marker::{Circle, Marker};
pub use popup::{PopupContents, properties_popup, property_rows};
pub use projector::{
    GeometryProjector, ProjectedGeometry, geojson_point_to_screen_point, map_center,
};
pub use replicas::calc_centers;
pub use style::{FeatureState, FeatureStyle};
pub use visibility::{VisibilityTest, is_feature_in_world_bounds, is_geometry_in_world_bounds};
