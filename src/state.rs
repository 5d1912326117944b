use std::path::Path;

use crate::config::ViewerConfig;
use crate::controller::ChartController;
use crate::data::loader::{load_file, LoadError};
use crate::data::model::CarDataset;
use crate::ui::plot::PlotCanvas;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Chart controller (None until a file is loaded).
    pub chart: Option<ChartController<PlotCanvas>>,

    pub config: ViewerConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let mut state = Self {
            chart: None,
            config,
            status_message: None,
        };
        if let Some(path) = state.config.data_path.clone() {
            state.open(&path);
        }
        state
    }

    /// Load a CSV and replace the current chart. On failure the previous
    /// chart stays and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match load_file(path, self.config.schema) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.report_load_error(&e),
        }
    }

    /// Ingest a newly loaded dataset and draw it.
    pub fn set_dataset(&mut self, dataset: CarDataset) {
        self.chart = Some(ChartController::new(
            dataset,
            self.config.x_axis,
            self.config.y_axis,
            self.config.scale_options(),
            PlotCanvas::default(),
        ));
        self.status_message = None;
    }

    fn report_load_error(&mut self, e: &LoadError) {
        log::error!("Failed to load data: {e}");
        self.status_message = Some(format!("Error: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_reader, SchemaMode};

    const CSV: &str = "\
Model,MPG,Cylinders,Displacement,Horsepower,Weight,Acceleration,Year,Origin
ford pinto,25,4,98,75,2046,19,71,usa
datsun 510,27,4,97,88,2130,14.5,71,japan
";

    #[test]
    fn missing_startup_file_reports_error() {
        let config = ViewerConfig {
            data_path: Some("no/such/cars.csv".into()),
            ..ViewerConfig::default()
        };
        let state = AppState::new(config);
        assert!(state.chart.is_none());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("no/such/cars.csv")));
    }

    #[test]
    fn dataset_builds_a_drawn_chart() {
        let mut state = AppState::new(ViewerConfig::default());
        state.set_dataset(load_reader(CSV.as_bytes(), SchemaMode::Auto).unwrap());
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.renderer().scene().map(|s| s.points.len()), Some(2));
        assert!(state.status_message.is_none());
    }
}
