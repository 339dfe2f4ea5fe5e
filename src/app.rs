use eframe::egui::{self, Color32, RichText};

use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct InWorkPovertyApp {
    pub state: AppState,
}

impl InWorkPovertyApp {
    /// Build the app and run the first load.
    pub fn new(mut state: AppState) -> Self {
        state.reload();
        Self { state }
    }
}

impl eframe::App for InWorkPovertyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: one tab per question ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                // Fatal: show the message and nothing else.
                let msg = self
                    .state
                    .status_message
                    .clone()
                    .unwrap_or_else(|| "No dataset loaded.".to_string());
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(msg).color(Color32::RED).size(16.0));
                });
                return;
            }
            tabs::central_panel(ui, &mut self.state);
        });
    }
}
