use std::borrow::Cow;

use egui::{Area, Id, Order, Painter, Pos2, Rect, Response, Shape, Ui};
use lyon_path::geom::Point;
use lyon_tessellation::math::point;
use walkers::{MapMemory, Plugin, Projector, tessellate_polygon};

use crate::{
    bounds::WorldBounds,
    geometry::{Feature, GeoJson},
    hit,
    marker::{Circle, Marker},
    popup::PopupContents,
    projector::{GeometryProjector, ProjectedGeometry},
    replicas::calc_centers,
    style::{FeatureState, FeatureStyle},
    visibility::VisibilityTest,
};

/// Callback deciding the style of a feature. Returning `None` means that the layer's default
/// style is used.
pub type FeatureStyleFn<'a> = Box<dyn Fn(&Feature, FeatureState) -> Option<FeatureStyle> + 'a>;

/// Callback giving the popup for the feature under the pointer, or `None` if there is nothing
/// to show for it. The contents are drawn inside an [`egui::Area`] placed at the pointer's
/// position.
pub type PopupFn<'a> =
    Box<dyn for<'f> Fn(&'f Feature, Pos2) -> Option<PopupContents<'f>> + 'a>;

/// Feature laid out on the screen, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    /// Index of the feature within the document.
    pub index: usize,

    pub style: FeatureStyle,

    /// Feature's geometry, projected once for each copy of the world.
    pub shapes: Vec<ProjectedGeometry>,
}

/// Pointer interactions with the layer in the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerResponse {
    /// Index of the feature under the pointer.
    pub hovered: Option<usize>,

    /// Index of the feature clicked with the primary button.
    pub clicked: Option<usize>,

    /// Index of the feature clicked with the secondary button, e.g. to open a context menu.
    pub secondary_clicked: Option<usize>,
}

/// Feature under the pointer, kept in egui's memory between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hover {
    feature: usize,
    point: Pos2,
}

/// Draws GeoJSON features on top of a [`walkers::Map`]. Like egui widgets and walkers plugins,
/// it is meant to be created on each frame.
///
/// ```no_run
/// # use geojson_layer::{GeoJson, GeoJsonLayer, LayerResponse, properties_popup};
/// # use walkers::{HttpTiles, Map, MapMemory, lat_lon};
/// struct MyApp {
///     tiles: HttpTiles,
///     map_memory: MapMemory,
///     geojson: GeoJson,
///     clicked: LayerResponse,
/// }
///
/// impl MyApp {
///     fn update(&mut self, ui: &mut egui::Ui) {
///         let layer = GeoJsonLayer::new(&self.geojson)
///             .with_popup(properties_popup)
///             .with_response(&mut self.clicked);
///
///         Map::new(None, &mut self.map_memory, lat_lon(51.47, 0.))
///             .with_layer(&mut self.tiles, 1.0)
///             .with_plugin(layer)
///             .show(ui, |_, _, _, _| {});
///     }
/// }
/// ```
pub struct GeoJsonLayer<'a> {
    features: Cow<'a, [Feature]>,
    default_style: FeatureStyle,
    feature_style: Option<FeatureStyleFn<'a>>,
    popup: Option<PopupFn<'a>>,
    marker: Box<dyn Marker + 'a>,
    visibility_test: VisibilityTest,
    id: Id,
    response: Option<&'a mut LayerResponse>,
}

impl<'a> GeoJsonLayer<'a> {
    pub fn new(geojson: &'a GeoJson) -> Self {
        Self {
            features: geojson.features(),
            default_style: FeatureStyle::default(),
            feature_style: None,
            popup: None,
            marker: Box::new(Circle),
            visibility_test: VisibilityTest::default(),
            id: Id::new("geojson_layer"),
            response: None,
        }
    }

    /// Style used for features for which [`Self::with_feature_style`] gives no style.
    pub fn with_default_style(mut self, style: FeatureStyle) -> Self {
        self.default_style = style;
        self
    }

    /// Choose the style of each feature, possibly depending on its properties or on whether
    /// the pointer is over it.
    pub fn with_feature_style(
        mut self,
        feature_style: impl Fn(&Feature, FeatureState) -> Option<FeatureStyle> + 'a,
    ) -> Self {
        self.feature_style = Some(Box::new(feature_style));
        self
    }

    /// Show a popup when the pointer is over a feature. No popup is created for features for
    /// which `popup` returns `None`.
    pub fn with_popup(
        mut self,
        popup: impl for<'f> Fn(&'f Feature, Pos2) -> Option<PopupContents<'f>> + 'a,
    ) -> Self {
        self.popup = Some(Box::new(popup));
        self
    }

    /// Draw points with a custom marker instead of the default [`Circle`].
    pub fn with_marker(mut self, marker: impl Marker + 'a) -> Self {
        self.marker = Box::new(marker);
        self
    }

    pub fn with_visibility_test(mut self, visibility_test: VisibilityTest) -> Self {
        self.visibility_test = visibility_test;
        self
    }

    /// Hover state is kept under this id. Each layer shown at the same time needs its own.
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    /// When the layer runs as a map plugin, pointer interactions are written here.
    pub fn with_response(mut self, response: &'a mut LayerResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    fn style(&self, feature: &Feature, state: FeatureState) -> FeatureStyle {
        self.feature_style
            .as_ref()
            .and_then(|feature_style| feature_style(feature, state))
            .unwrap_or(self.default_style)
    }

    /// Project every visible feature for each copy of the world shown in `viewport`, which is
    /// the part of the screen that `projector` was made for. Feature at `hovered` index gets
    /// styled as being under the pointer.
    pub fn layout(
        &self,
        projector: &Projector,
        viewport: Rect,
        hovered: Option<usize>,
    ) -> Vec<RenderedFeature> {
        let bounds = WorldBounds::from_projector(projector, viewport);
        let projector = GeometryProjector::new(projector, viewport);
        let centers = calc_centers(projector.map_center(), &bounds);

        let rendered: Vec<_> = self
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let geometry = feature.geometry.as_ref()?;

                if !self.visibility_test.is_geometry_visible(geometry, &bounds) {
                    return None;
                }

                let state = FeatureState {
                    mouse_over: hovered == Some(index),
                };

                Some(RenderedFeature {
                    index,
                    style: self.style(feature, state),
                    shapes: centers
                        .iter()
                        .filter_map(|center| projector.project_geometry(geometry, *center))
                        .collect(),
                })
            })
            .collect();

        log::trace!(
            "{} of {} features visible in {} copies of the world.",
            rendered.len(),
            self.features.len(),
            centers.len()
        );

        rendered
    }

    /// Draw the layer within `response.rect` and handle the pointer. `response` is the map
    /// widget's response and `projector` must be made for its rect.
    pub fn show(&self, ui: &mut Ui, response: &Response, projector: &Projector) -> LayerResponse {
        let previous = ui.ctx().data(|data| data.get_temp::<Hover>(self.id));
        let layout = self.layout(projector, response.rect, previous.map(|hover| hover.feature));

        let painter = ui.painter_at(response.rect);
        for rendered in &layout {
            let feature = &self.features[rendered.index];
            for shape in &rendered.shapes {
                self.paint(&painter, shape, feature, &rendered.style);
            }
        }

        // Features drawn last are on top.
        let hover = response.hover_pos().and_then(|pointer| {
            layout
                .iter()
                .rev()
                .find(|rendered| {
                    rendered.shapes.iter().any(|shape| {
                        hit::hits(shape, pointer, &rendered.style, self.marker.as_ref())
                    })
                })
                .map(|rendered| Hover {
                    feature: rendered.index,
                    point: pointer,
                })
        });

        ui.ctx().data_mut(|data| match hover {
            Some(hover) => data.insert_temp(self.id, hover),
            None => {
                data.remove::<Hover>(self.id);
            }
        });

        let hovered = hover.map(|hover| hover.feature);
        if hovered != previous.map(|hover| hover.feature) {
            log::debug!("Feature under the pointer changed to {hovered:?}.");
            // Style depends on the hover state, which is only known after drawing.
            ui.ctx().request_repaint();
        }

        if let Some((popup, hover)) = self.popup.as_ref().zip(hover)
            && let Some(contents) = popup(&self.features[hover.feature], hover.point)
        {
            Area::new(self.id.with("popup"))
                .order(Order::Tooltip)
                .fixed_pos(hover.point)
                .interactable(false)
                .show(ui.ctx(), contents);
        }

        LayerResponse {
            hovered,
            clicked: hovered.filter(|_| response.clicked()),
            secondary_clicked: hovered.filter(|_| response.secondary_clicked()),
        }
    }

    fn paint(
        &self,
        painter: &Painter,
        geometry: &ProjectedGeometry,
        feature: &Feature,
        style: &FeatureStyle,
    ) {
        match geometry {
            ProjectedGeometry::Point(point) => self.marker.draw(painter, *point, feature, style),
            ProjectedGeometry::MultiPoint(points) => {
                for point in points {
                    self.marker.draw(painter, *point, feature, style);
                }
            }
            ProjectedGeometry::LineString(path) => paint_line(painter, path, style),
            ProjectedGeometry::MultiLineString(paths) => {
                for path in paths {
                    paint_line(painter, path, style);
                }
            }
            ProjectedGeometry::Polygon(rings) => paint_polygon(painter, rings, style),
            ProjectedGeometry::MultiPolygon(polygons) => {
                for rings in polygons {
                    paint_polygon(painter, rings, style);
                }
            }
            ProjectedGeometry::GeometryCollection(geometries) => {
                for geometry in geometries {
                    self.paint(painter, geometry, feature, style);
                }
            }
        }
    }
}

impl Plugin for GeoJsonLayer<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &Response,
        projector: &Projector,
        _map_memory: &MapMemory,
    ) {
        let layer_response = self.show(ui, response, projector);
        if let Some(out) = self.response {
            *out = layer_response;
        }
    }
}

fn paint_line(painter: &Painter, path: &[Pos2], style: &FeatureStyle) {
    if path.len() >= 2 {
        painter.add(Shape::line(path.to_vec(), style.stroke()));
    }
}

/// Ring without the closing vertex, or `None` if there are not enough vertices to enclose
/// anything.
fn open_ring(ring: &[Pos2]) -> Option<Vec<Pos2>> {
    let ring = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };

    (ring.len() >= 3).then(|| ring.to_vec())
}

fn to_lyon(ring: &[Pos2]) -> Vec<Point<f32>> {
    ring.iter().map(|p| point(p.x, p.y)).collect()
}

fn paint_polygon(painter: &Painter, rings: &[Vec<Pos2>], style: &FeatureStyle) {
    let Some(exterior) = rings.first().and_then(|ring| open_ring(ring)) else {
        return;
    };
    let holes: Vec<_> = rings[1..].iter().filter_map(|ring| open_ring(ring)).collect();

    let fill = style.fill_color();
    if fill.a() > 0 {
        let lyon_holes: Vec<_> = holes.iter().map(|hole| to_lyon(hole)).collect();
        if let Ok(mesh) = tessellate_polygon(&to_lyon(&exterior), &lyon_holes, fill) {
            painter.add(Shape::mesh(mesh));
        } else {
            log::warn!("Could not fill a polygon of {} vertices.", exterior.len());
        }
    }

    let stroke = style.stroke();
    painter.add(Shape::closed_line(exterior, stroke));
    for hole in holes {
        painter.add(Shape::closed_line(hole, stroke));
    }
}
