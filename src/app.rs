use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarScatterApp {
    pub state: AppState,
}

impl CarScatterApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for CarScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: axes, colours, filters ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: scatter plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::scatter_plot(ui, &mut self.state);
        });
    }
}
