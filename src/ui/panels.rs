use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use eframe::egui::{self, emath::Numeric, Color32, RichText, ScrollArea, Ui};

use crate::data::{export, loader, model::ListingTable};
use crate::state::{AppState, RangeEdit};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        if ui.small_button("Reset").clicked() {
            state.reset_filters();
        }
    });
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut changed = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= range_section(ui, "Model year", &mut state.year, 1.0);
            changed |= range_section(ui, "Price", &mut state.price, 100.0);
            changed |= range_section(ui, "Odometer", &mut state.odometer, 1000.0);
            ui.separator();

            changed |= category_section(
                ui,
                "Manufacturer",
                &state.all_manufacturers,
                &mut state.selected_manufacturers,
            );
            changed |= category_section(
                ui,
                "Body type",
                &state.all_body_types,
                &mut state.selected_types,
            );
        });

    // Recompute visible indices only when a widget actually changed.
    if changed {
        state.refilter();
    }
}

/// One numeric range filter: enable checkbox plus lo/hi drag values.
/// Disabled means the field is unconstrained. Returns whether any widget
/// changed this frame.
fn range_section<T: Numeric>(ui: &mut Ui, label: &str, edit: &mut RangeEdit<T>, speed: f64) -> bool {
    let mut changed = ui
        .checkbox(&mut edit.enabled, RichText::new(label).strong())
        .changed();
    if edit.enabled {
        ui.horizontal(|ui: &mut Ui| {
            changed |= ui
                .add(
                    egui::DragValue::new(&mut edit.lo)
                        .range(edit.min..=edit.max)
                        .speed(speed),
                )
                .changed();
            ui.label("to");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut edit.hi)
                        .range(edit.min..=edit.max)
                        .speed(speed),
                )
                .changed();
        });
    }
    ui.add_space(4.0);
    changed
}

/// Collapsible checkbox list over one category column, with All/None.
/// Returns whether the selection changed this frame.
fn category_section(
    ui: &mut Ui,
    label: &str,
    all_values: &BTreeSet<String>,
    selected: &mut BTreeSet<String>,
) -> bool {
    let header_text = format!("{label}  ({}/{})", selected.len(), all_values.len());
    let mut changed = false;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = all_values.clone();
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                    changed = true;
                }
            }
        });

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} listings loaded, {} match",
                table.len(),
                state.visible_indices.len()
            ));
            ui.separator();
        }

        if ui
            .selectable_label(state.log_price, "Log-scale price")
            .clicked()
        {
            state.log_price = !state.log_price;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_into_state(state, path);
    }
}

/// Load (or re-use from the process cache) the table at `path` and install
/// it in the UI state. On failure the previous table stays untouched.
pub fn load_into_state(state: &mut AppState, path: PathBuf) {
    match loader::load_cached(&path) {
        Ok(table) => {
            state.set_table(table, path);
        }
        Err(e) => {
            log::error!("failed to load {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        return;
    };

    let target = rfd::FileDialog::new()
        .set_title("Export filtered listings")
        .set_file_name("used_cars_filtered.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = target {
        match write_export(&table, &state.visible_indices, &path) {
            Ok(()) => {
                log::info!(
                    "exported {} rows to {}",
                    state.visible_indices.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}

fn write_export(table: &ListingTable, indices: &[usize], path: &Path) -> anyhow::Result<()> {
    let bytes = export::to_csv(table, indices)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
