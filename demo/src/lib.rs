mod markers;
mod windows;

use egui::{Color32, Context, Stroke};
use geojson_layer::{
    Feature, FeatureCollection, FeatureStyle, GeoJson, GeoJsonLayer, LayerResponse,
    VisibilityTest, properties_popup,
};
use walkers::{HttpOptions, HttpTiles, Map, MapMemory, Position, lat_lon, sources};

/// Where the map starts, before it is dragged around.
pub fn starting_point() -> Position {
    lat_lon(48., 5.)
}

pub struct MyApp {
    tiles: HttpTiles,
    map_memory: MapMemory,
    geojson: GeoJson,
    visibility_test: VisibilityTest,
    pins: bool,
    popups: bool,
    layer_response: LayerResponse,
    clicked: Option<String>,
}

fn sample() -> GeoJson {
    include_str!("../assets/sample.geojson")
        .parse()
        .unwrap_or_else(|err| {
            log::error!("Could not load the sample: {err}");
            FeatureCollection {
                features: Vec::new(),
            }
            .into()
        })
}

/// Color from feature's `color` property, e.g. `"#e74c3c"`.
fn color_property(feature: &Feature) -> Option<Color32> {
    let hex = feature.property("color")?.as_str()?;
    Color32::from_hex(hex)
        .inspect_err(|err| log::warn!("Invalid color '{hex}': {err:?}"))
        .ok()
}

fn feature_name(feature: &Feature) -> String {
    feature
        .property("name")
        .and_then(|name| name.as_str())
        .unwrap_or("unnamed")
        .to_owned()
}

impl MyApp {
    pub fn new(egui_ctx: Context) -> Self {
        let mut map_memory = MapMemory::default();
        let _ = map_memory.set_zoom(4.);

        Self {
            tiles: HttpTiles::with_options(
                sources::OpenStreetMap,
                HttpOptions::default(),
                egui_ctx.to_owned(),
            ),
            map_memory,
            geojson: sample(),
            visibility_test: VisibilityTest::AnyVertex,
            pins: true,
            popups: true,
            layer_response: LayerResponse::default(),
            clicked: None,
        }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let mut layer = GeoJsonLayer::new(&self.geojson)
                    .with_visibility_test(self.visibility_test)
                    .with_feature_style(|feature, state| {
                        let mut style = FeatureStyle::default();
                        if let Some(color) = color_property(feature) {
                            style.fill = color.gamma_multiply(0.6);
                        }
                        if state.mouse_over {
                            style.stroke = Stroke::new(4., Color32::YELLOW);
                        }
                        Some(style)
                    })
                    .with_response(&mut self.layer_response);

                if self.pins {
                    layer = layer.with_marker(markers::Pins);
                }

                if self.popups {
                    layer = layer.with_popup(properties_popup);
                }

                // In egui, widgets are constructed and consumed in each frame.
                Map::new(None, &mut self.map_memory, starting_point())
                    .with_layer(&mut self.tiles, 1.0)
                    .with_plugin(layer)
                    .show(ui, |_, _, _, _| {});

                if let Some(index) = self.layer_response.clicked {
                    let name = feature_name(&self.geojson.features()[index]);
                    log::info!("Clicked {name}.");
                    self.clicked = Some(name);
                }

                // Draw utility windows.
                {
                    use windows::*;

                    zoom(ui, &mut self.map_memory);
                    go_to_starting_point(ui, &mut self.map_memory);
                    controls(
                        ui,
                        &mut self.map_memory,
                        &mut self.visibility_test,
                        &mut self.pins,
                        &mut self.popups,
                    );
                    acknowledge(ui);
                    clicked(ui, self.clicked.as_deref());
                }
            });
    }
}
