//! Popups shown when the pointer is over a feature.

use egui::{Frame, Grid, Pos2, Ui};
use serde_json::Value;

use crate::geometry::Feature;

/// Contents of a popup, drawn inside an [`egui::Area`] at the pointer's position.
pub type PopupContents<'f> = Box<dyn FnOnce(&mut Ui) + 'f>;

/// Properties of the feature as `(name, value)` text pairs, in the order they appear in the
/// document. `None` if the feature has no properties, meaning there is nothing worth showing.
pub fn property_rows(feature: &Feature) -> Option<Vec<(String, String)>> {
    let properties = feature.properties.as_ref().filter(|p| !p.is_empty())?;
    Some(
        properties
            .iter()
            .map(|(name, value)| (name.to_owned(), property_text(value)))
            .collect(),
    )
}

fn property_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.to_owned(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Popup listing all properties of the feature in a table. Features without properties get no
/// popup at all. Can be passed directly to [`crate::GeoJsonLayer::with_popup`].
pub fn properties_popup(feature: &Feature, _point: Pos2) -> Option<PopupContents<'_>> {
    let rows = property_rows(feature)?;

    Some(Box::new(move |ui: &mut Ui| {
        Frame::popup(ui.style()).show(ui, |ui| {
            ui.set_max_width(300.);
            Grid::new("geojson_properties")
                .striped(true)
                .show(ui, |ui| {
                    for (name, value) in rows {
                        ui.strong(name);
                        ui.label(value);
                        ui.end_row();
                    }
                });
        });
    }))
}
