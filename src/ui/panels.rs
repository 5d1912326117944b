use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::controller::Axis;
use crate::data::filter::ComparisonMode;
use crate::data::model::{AttrValue, Attribute};
use crate::state::AppState;

/// How many autocomplete suggestions the model field lists.
const MAX_SUGGESTIONS: usize = 8;

// ---------------------------------------------------------------------------
// Left side panel – axis, colour and filter widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Cars");
    ui.separator();

    let Some(chart) = state.chart.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Axis selectors ----
            let (x, y) = chart.axes();
            for (axis, current, label) in [(Axis::X, x, "X axis"), (Axis::Y, y, "Y axis")] {
                ui.strong(label);
                let mut selected = current;
                egui::ComboBox::from_id_salt(label)
                    .selected_text(current.name())
                    .show_ui(ui, |ui: &mut Ui| {
                        for attr in Attribute::AXES {
                            ui.selectable_value(&mut selected, attr, attr.name());
                        }
                    });
                if selected != current {
                    chart.select_axis(axis, selected);
                }
            }
            ui.separator();

            // ---- Colouring ----
            let has_cluster = chart.dataset().schema.has_cluster();
            let mut cluster_mode = chart.cluster_mode();
            if ui
                .add_enabled(has_cluster, egui::Checkbox::new(&mut cluster_mode, "Color by cluster"))
                .changed()
            {
                chart.toggle_cluster_mode(cluster_mode);
            }

            // Clicking an origin filters to it.
            ui.strong("Origin");
            let origins = chart.colors().origin_legend();
            for (origin, color) in origins {
                let text = RichText::new(format!("● {origin}")).color(color);
                if ui.selectable_label(false, text).clicked() {
                    chart.constraint_added(Attribute::Origin, AttrValue::Text(origin));
                }
            }
            if chart.cluster_legend_visible() {
                ui.strong("Clusters");
                let clusters = chart.colors().cluster_legend();
                for (label, color) in clusters {
                    ui.label(RichText::new(format!("● {label}")).color(color));
                }
            }
            ui.separator();

            // ---- Model highlight with autocomplete ----
            ui.strong("Highlight model");
            let mut query = chart.model_query().to_string();
            let edit = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("type a model name")
                    .desired_width(f32::INFINITY),
            );
            if edit.changed() {
                chart.model_highlight_changed(&query);
            }
            let needle = query.trim().to_lowercase();
            if !needle.is_empty() && chart.dataset().records_with_model(&needle).is_empty() {
                let suggestions: Vec<String> = chart
                    .dataset()
                    .models
                    .iter()
                    .filter(|m| m.to_lowercase().contains(&needle))
                    .take(MAX_SUGGESTIONS)
                    .cloned()
                    .collect();
                for model in suggestions {
                    if ui.small_button(&model).clicked() {
                        chart.model_highlight_changed(&model);
                    }
                }
            }
            ui.separator();

            // ---- Active filters ----
            let active: Vec<(Attribute, String)> = chart
                .filter()
                .active()
                .map(|(attr, value)| (attr, value.to_string()))
                .collect();
            ui.strong(format!("Filters ({})", active.len()));
            if active.is_empty() {
                ui.label("Click a point to show similar cars.");
                return;
            }

            let mut mode = chart.filter().mode();
            egui::ComboBox::from_id_salt("comparison_mode")
                .selected_text(mode.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for m in ComparisonMode::ALL {
                        ui.selectable_value(&mut mode, m, m.label());
                    }
                });
            if mode != chart.filter().mode() {
                chart.mode_changed(mode);
            }

            let mut removed = None;
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for (attr, value) in &active {
                    let badge = RichText::new(format!("{attr}: {value}  ×"))
                        .background_color(Color32::from_gray(60));
                    if ui.small_button(badge).on_hover_text("Remove filter").clicked() {
                        removed = Some(*attr);
                    }
                }
            });
            if let Some(attr) = removed {
                chart.constraint_removed(attr);
            }

            if ui.button("Clear filters").clicked() {
                chart.reset();
            }
        });
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
        });

        ui.separator();

        if let Some(chart) = &state.chart {
            ui.label(format!(
                "{} cars loaded, {} visible",
                chart.dataset().len(),
                chart.visible().len()
            ));
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
        .set_title("Open car dataset")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
