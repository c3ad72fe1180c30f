use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::DEFAULT_DATASET_URL;
use crate::data::model::{Attribute, FilterValue};
use crate::state::AppState;

/// A filter edit requested by a widget, applied after rendering.
enum FilterAction {
    All(Attribute),
    Clear(Attribute),
    Toggle(Attribute, FilterValue),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for attr in Attribute::ALL {
                let all_values = dataset.domain(attr);

                // Show count of selected / total in the header
                let n_selected = all_values
                    .iter()
                    .filter(|v| state.selection.is_selected(attr, v))
                    .count();
                let header_text = format!("{}  ({n_selected}/{})", attr.label(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(attr.column())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::All(attr));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::Clear(attr));
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.is_selected(attr, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                actions.push(FilterAction::Toggle(attr, val.clone()));
                            }
                        }
                    });
            }
        });

    for action in actions {
        match action {
            FilterAction::All(attr) => state.select_all(attr),
            FilterAction::Clear(attr) => state.select_none(attr),
            FilterAction::Toggle(attr, value) => state.toggle_filter_value(attr, &value),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload default dataset").clicked() {
                state.load(DEFAULT_DATASET_URL);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(source) = &state.source {
            ui.separator();
            ui.weak(source);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path.to_string_lossy());
    }
}
