use crate::color::ColorSchemes;
use crate::data::filter::{filtered_indices, ComparisonMode, FilterState};
use crate::data::model::{AttrValue, Attribute, CarDataset, Record};
use crate::scale::Domain;
use crate::scene::{RenderAdapter, Scene, ScenePoint};

/// Radius / opacity pair for one drawn point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub radius: f32,
    pub opacity: f32,
    pub outlined: bool,
}

impl PointStyle {
    pub const NORMAL: PointStyle = PointStyle {
        radius: 5.0,
        opacity: 0.7,
        outlined: false,
    };
    const DIMMED: PointStyle = PointStyle {
        radius: 3.0,
        opacity: 0.3,
        outlined: false,
    };
    const HIGHLIGHTED: PointStyle = PointStyle {
        radius: 9.0,
        opacity: 1.0,
        outlined: false,
    };
    const HOVERED: PointStyle = PointStyle {
        radius: 7.0,
        opacity: 1.0,
        outlined: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Scale settings handed to every scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOptions {
    /// Units added on each side of the Y extent before rounding.
    pub y_padding: f64,
    pub tick_count: usize,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            y_padding: 1.0,
            tick_count: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart controller
// ---------------------------------------------------------------------------

/// Owns the dataset and all interaction state; every transition that
/// changes the visible data set ends in exactly one redraw.
pub struct ChartController<R: RenderAdapter> {
    dataset: CarDataset,
    colors: ColorSchemes,
    filter: FilterState,
    x: Attribute,
    y: Attribute,
    cluster_mode: bool,
    scale: ScaleOptions,
    /// Text of the model field.
    model_query: String,
    /// Records emphasised by the model field, `None` when the field is empty.
    highlight: Option<Vec<usize>>,
    hovered: Option<usize>,
    visible: Vec<usize>,
    renderer: R,
}

impl<R: RenderAdapter> ChartController<R> {
    /// Build the controller and draw the initial chart.
    pub fn new(
        dataset: CarDataset,
        x: Attribute,
        y: Attribute,
        scale: ScaleOptions,
        renderer: R,
    ) -> Self {
        let colors = ColorSchemes::new(&dataset);
        let filter = FilterState::new(dataset.schema);
        let mut controller = ChartController {
            visible: (0..dataset.len()).collect(),
            dataset,
            colors,
            filter,
            x: if x.is_axis() { x } else { Attribute::Mpg },
            y: if y.is_axis() { y } else { Attribute::Horsepower },
            cluster_mode: false,
            scale,
            model_query: String::new(),
            highlight: None,
            hovered: None,
            renderer,
        };
        controller.redraw();
        controller
    }

    // -- transitions --

    /// Change one axis. Redraws only when the two axes differ.
    pub fn select_axis(&mut self, axis: Axis, attr: Attribute) {
        if !attr.is_axis() {
            log::warn!("Ignoring non-numeric axis attribute {attr}");
            return;
        }
        match axis {
            Axis::X => self.x = attr,
            Axis::Y => self.y = attr,
        }
        self.redraw();
    }

    /// Colour by cluster instead of origin. Stays off for data without clusters.
    pub fn toggle_cluster_mode(&mut self, enabled: bool) {
        if enabled && !self.dataset.schema.has_cluster() {
            log::warn!("Cluster mode requested but the dataset has no Cluster column");
            return;
        }
        self.cluster_mode = enabled;
        self.redraw();
    }

    /// Filter to rows like the clicked record.
    pub fn point_activated(&mut self, index: usize) {
        let Some(record) = self.dataset.records.get(index) else {
            log::warn!("Click on unknown record {index}");
            return;
        };
        self.filter = FilterState::from_record(record, self.dataset.schema, self.filter.mode());
        self.model_query = record.model.clone();
        log::debug!(
            "Filtering on '{}' ({} constraints)",
            record.model,
            self.filter.active_count()
        );
        self.redraw();
    }

    /// Drop one constraint; dropping the last one resets the whole filter.
    pub fn constraint_removed(&mut self, attr: Attribute) {
        self.filter.clear_constraint(attr);
        if self.filter.active_count() == 0 {
            self.clear_filters();
        }
        self.redraw();
    }

    /// Set a single constraint without touching the others.
    pub fn constraint_added(&mut self, attr: Attribute, value: AttrValue) {
        match self.filter.set_constraint(attr, value) {
            Ok(()) => self.redraw(),
            Err(e) => log::warn!("Rejected filter: {e}"),
        }
    }

    pub fn reset(&mut self) {
        self.clear_filters();
        self.redraw();
    }

    pub fn mode_changed(&mut self, mode: ComparisonMode) {
        self.filter.set_mode(mode);
        self.redraw();
    }

    /// Visual only: emphasise records whose model matches `text`.
    pub fn model_highlight_changed(&mut self, text: &str) {
        self.model_query = text.to_string();
        self.highlight = if text.trim().is_empty() {
            None
        } else {
            Some(self.dataset.records_with_model(text).to_vec())
        };
    }

    /// Visual only: the point under the pointer, if any.
    pub fn hover(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|i| *i < self.dataset.len());
    }

    // -- internals --

    fn clear_filters(&mut self) {
        self.filter.reset();
        self.model_query.clear();
        self.highlight = None;
    }

    fn redraw(&mut self) {
        // The visible set tracks the filter even while the scene is frozen.
        self.visible = filtered_indices(&self.dataset.records, &self.filter);
        if self.x == self.y {
            log::debug!("Both axes show {}, skipping redraw", self.x);
            return;
        }
        let scene = self.build_scene();
        self.renderer.clear();
        self.renderer.draw(&scene);
        log::debug!(
            "Redrew {} of {} cars ({} vs {})",
            self.visible.len(),
            self.dataset.len(),
            self.x,
            self.y
        );
    }

    fn build_scene(&self) -> Scene {
        let records = &self.dataset.records;
        let axis_domain = |attr: Attribute, padding: f64| {
            Domain::extent(records, attr)
                .unwrap_or(Domain { min: 0.0, max: 1.0 })
                .padded(padding)
                .non_degenerate()
                .nice(self.scale.tick_count)
        };

        let points = self
            .visible
            .iter()
            .filter_map(|&index| {
                let rec = &records[index];
                Some(ScenePoint {
                    index,
                    x: rec.numeric(self.x)?,
                    y: rec.numeric(self.y)?,
                    color: self.colors.color_for(rec, self.cluster_mode),
                })
            })
            .collect();

        Scene {
            x: self.x,
            y: self.y,
            x_domain: axis_domain(self.x, 0.0),
            y_domain: axis_domain(self.y, self.scale.y_padding),
            points,
        }
    }

    // -- queries --

    /// How the point for record `index` is drawn right now.
    pub fn point_style(&self, index: usize) -> PointStyle {
        if let Some(hovered) = self.hovered {
            if index == hovered {
                return PointStyle::HOVERED;
            }
            let same_cluster = self.cluster_mode
                && self.dataset.records[index].cluster == self.dataset.records[hovered].cluster;
            return PointStyle {
                opacity: if same_cluster { 1.0 } else { 0.3 },
                ..PointStyle::NORMAL
            };
        }
        match &self.highlight {
            Some(matches) if matches.contains(&index) => PointStyle::HIGHLIGHTED,
            Some(_) => PointStyle::DIMMED,
            None => PointStyle::NORMAL,
        }
    }

    pub fn dataset(&self) -> &CarDataset {
        &self.dataset
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.dataset.records.get(index)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn axes(&self) -> (Attribute, Attribute) {
        (self.x, self.y)
    }

    pub fn cluster_mode(&self) -> bool {
        self.cluster_mode
    }

    /// The cluster legend is shown exactly while cluster mode is on.
    pub fn cluster_legend_visible(&self) -> bool {
        self.cluster_mode
    }

    pub fn colors(&self) -> &ColorSchemes {
        &self.colors
    }

    pub fn model_query(&self) -> &str {
        &self.model_query
    }

    /// Indices visible after the last redraw.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
