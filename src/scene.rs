use eframe::egui::Color32;

use crate::data::model::Attribute;
use crate::scale::Domain;

/// One data point ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePoint {
    /// Position of the record in the dataset; the handle used for hover,
    /// click and highlight lookups.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub color: Color32,
}

/// Everything a renderer needs for one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub x: Attribute,
    pub y: Attribute,
    pub x_domain: Domain,
    pub y_domain: Domain,
    pub points: Vec<ScenePoint>,
}

/// Receives redraws from the chart controller.
pub trait RenderAdapter {
    /// Drop whatever the previous redraw produced.
    fn clear(&mut self);
    fn draw(&mut self, scene: &Scene);
}
