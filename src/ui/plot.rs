use eframe::egui::{Color32, Pos2, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, PlotTransform, Points};

use crate::controller::{ChartController, PointStyle};
use crate::scene::{RenderAdapter, Scene};
use crate::state::AppState;

/// Extra pixels around a point that still count as "on" it.
const PICK_SLACK: f32 = 3.0;

// ---------------------------------------------------------------------------
// Render adapter backed by egui_plot
// ---------------------------------------------------------------------------

/// Holds the last scene; egui repaints it every frame.
#[derive(Debug, Default)]
pub struct PlotCanvas {
    scene: Option<Scene>,
}

impl PlotCanvas {
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}

impl RenderAdapter for PlotCanvas {
    fn clear(&mut self) {
        self.scene = None;
    }

    fn draw(&mut self, scene: &Scene) {
        self.scene = Some(scene.clone());
    }
}

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter plot in the central panel.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(chart) = state.chart.as_mut() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a car dataset to start  (File → Open…)");
        });
        return;
    };

    let (x_attr, y_attr) = chart.axes();
    if x_attr == y_attr {
        ui.label(RichText::new("Pick two different attributes for X and Y.").color(Color32::YELLOW));
    }
    let Some(scene) = chart.renderer().scene() else {
        return;
    };

    // Emphasised points are drawn last so they sit on top.
    let mut order: Vec<(usize, PointStyle)> = scene
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, chart.point_style(p.index)))
        .collect();
    order.sort_by(|a, b| a.1.radius.total_cmp(&b.1.radius));

    let response = Plot::new("cars_scatter")
        .x_axis_label(scene.x.name())
        .y_axis_label(scene.y.name())
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [scene.x_domain.min, scene.y_domain.min],
                [scene.x_domain.max, scene.y_domain.max],
            ));
            for &(i, style) in &order {
                let p = &scene.points[i];
                if style.outlined {
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[p.x, p.y]]))
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(style.radius + 1.0)
                            .color(Color32::WHITE),
                    );
                }
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![[p.x, p.y]]))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(style.radius)
                        .color(p.color.gamma_multiply(style.opacity)),
                );
            }
        });

    let pointer = response.response.hover_pos();
    let hovered = pointer.and_then(|pos| pick_point(scene, &response.transform, pos, chart));
    let clicked = response.response.clicked();

    if let Some(record) = hovered.and_then(|i| chart.record(i)) {
        let lines = record.summary_lines();
        response.response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            for line in &lines {
                ui.label(line);
            }
        });
    }

    chart.hover(hovered);
    if clicked {
        if let Some(index) = hovered {
            chart.point_activated(index);
        }
    }
}

/// Record index of the topmost point under `pos`.
fn pick_point<R: RenderAdapter>(
    scene: &Scene,
    transform: &PlotTransform,
    pos: Pos2,
    chart: &ChartController<R>,
) -> Option<usize> {
    scene
        .points
        .iter()
        .filter_map(|p| {
            let screen = transform.position_from_point(&PlotPoint::new(p.x, p.y));
            let distance = screen.distance(pos);
            let reach = chart.point_style(p.index).radius + PICK_SLACK;
            (distance <= reach).then_some((p.index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Attribute;
    use crate::scale::Domain;

    #[test]
    fn canvas_keeps_only_the_latest_scene() {
        let mut canvas = PlotCanvas::default();
        let scene = Scene {
            x: Attribute::Mpg,
            y: Attribute::Weight,
            x_domain: Domain { min: 0.0, max: 50.0 },
            y_domain: Domain { min: 1500.0, max: 5500.0 },
            points: Vec::new(),
        };
        canvas.draw(&scene);
        assert_eq!(canvas.scene(), Some(&scene));
        canvas.clear();
        assert!(canvas.scene().is_none());
    }
}
