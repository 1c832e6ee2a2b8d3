use std::path::PathBuf;

use eframe::egui;

use crate::state::{AppState, DEFAULT_DATA_PATH};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarLensApp {
    pub state: AppState,
}

impl CarLensApp {
    /// Build the app, loading the bundled dataset when it is present. A
    /// missing or corrupt file only leaves a status message; the user can
    /// still open a CSV from the File menu.
    pub fn new() -> Self {
        let mut state = AppState::default();
        let default_path = PathBuf::from(DEFAULT_DATA_PATH);
        if default_path.exists() {
            panels::load_into_state(&mut state, default_path);
        } else {
            state.status_message = Some(format!(
                "{DEFAULT_DATA_PATH} not found — use File → Open CSV…"
            ));
        }
        Self { state }
    }
}

impl Default for CarLensApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for CarLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::central_panel(ui, &mut self.state);
        });
    }
}
