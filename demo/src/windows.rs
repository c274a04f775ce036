use egui::{Align2, ComboBox, RichText, Slider, Ui, Window};
use geojson_layer::VisibilityTest;
use walkers::{MapMemory, lat_lon};

use crate::starting_point;

pub fn acknowledge(ui: &Ui) {
    Window::new("Acknowledge")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_TOP, [10., 10.])
        .show(ui.ctx(), |ui| {
            ui.label("map provided by");
            ui.hyperlink_to(
                "OpenStreetMap contributors",
                "https://www.openstreetmap.org/copyright",
            );
            ui.label("viewed in ");
            ui.hyperlink_to("Walkers", "https://github.com/podusowski/walkers");
        });
}

/// Simple GUI to zoom in and out.
pub fn zoom(ui: &Ui, map_memory: &mut MapMemory) {
    Window::new("Map")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_BOTTOM, [10., -10.])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                if ui.button(RichText::new("➕").heading()).clicked() {
                    let _ = map_memory.zoom_in();
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    let _ = map_memory.zoom_out();
                }
            });
        });
}

/// When map is "detached", show a windows with an option to go back to the starting point.
pub fn go_to_starting_point(ui: &Ui, map_memory: &mut MapMemory) {
    if let Some(position) = map_memory.detached() {
        Window::new("Center")
            .collapsible(false)
            .resizable(false)
            .title_bar(false)
            .anchor(Align2::LEFT_BOTTOM, [10., -60.])
            .show(ui.ctx(), |ui| {
                ui.label(format!(
                    "center at {:.04} {:.04}",
                    position.y(),
                    position.x()
                ));
                if ui
                    .button(RichText::new("go to the starting point").heading())
                    .clicked()
                {
                    map_memory.follow_my_position();
                }
            });
    }
}

pub fn controls(
    ui: &Ui,
    map_memory: &mut MapMemory,
    visibility_test: &mut VisibilityTest,
    pins: &mut bool,
    popups: &mut bool,
) {
    Window::new("Controls")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_TOP, [-10., 10.])
        .fixed_size([180., 150.])
        .show(ui.ctx(), |ui| {
            ui.collapsing("Layer", |ui| {
                ComboBox::from_label("Visibility")
                    .selected_text(format!("{visibility_test:?}"))
                    .show_ui(ui, |ui| {
                        for test in [VisibilityTest::AnyVertex, VisibilityTest::Intersecting] {
                            ui.selectable_value(visibility_test, test, format!("{test:?}"));
                        }
                    });

                ui.checkbox(pins, "Pins");
                ui.checkbox(popups, "Popups");
            });

            ui.collapsing("View", |ui| {
                let center = map_memory.detached().unwrap_or_else(starting_point);

                // Longitude is not wrapped, so it can be used to travel around the world.
                let mut longitude = center.x();
                if ui
                    .add(Slider::new(&mut longitude, -720.0..=720.0).text("longitude"))
                    .changed()
                {
                    map_memory.center_at(lat_lon(center.y(), longitude));
                }

                ui.label(format!("zoom {:.1}", map_memory.zoom()));

                if ui.button("zoom out to the whole world").clicked() {
                    map_memory.center_at(lat_lon(0., center.x()));
                    let _ = map_memory.set_zoom(0.);
                }
            });
        });
}

/// Name of the last clicked feature.
pub fn clicked(ui: &Ui, name: Option<&str>) {
    if let Some(name) = name {
        Window::new("Clicked")
            .collapsible(false)
            .resizable(false)
            .title_bar(false)
            .anchor(Align2::RIGHT_BOTTOM, [-10., -10.])
            .show(ui.ctx(), |ui| {
                ui.label(format!("clicked {name}"));
            });
    }
}
