use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SilentStruggleApp {
    pub state: AppState,
}

impl SilentStruggleApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SilentStruggleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Bottom bar: dataset ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(format!(
                "{} · {} respondents",
                self.state.dataset_path.display(),
                self.state.table.n_rows()
            ));
        });

        // ---- Central panel: the page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.set_max_width(1100.0);
                    panels::page(ui, &self.state);
                });
        });
    }
}
