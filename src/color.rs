use eframe::egui::Color32;
use palette::Srgb;

use crate::data::model::{cluster_label, CarDataset, Record};

// ---------------------------------------------------------------------------
// Categorical palettes
// ---------------------------------------------------------------------------

/// ColorBrewer "Set2", used for origins.
const SET2: [(u8, u8, u8); 8] = [
    (0x66, 0xc2, 0xa5),
    (0xfc, 0x8d, 0x62),
    (0x8d, 0xa0, 0xcb),
    (0xe7, 0x8a, 0xc3),
    (0xa6, 0xd8, 0x54),
    (0xff, 0xd9, 0x2f),
    (0xe5, 0xc4, 0x94),
    (0xb3, 0xb3, 0xb3),
];

/// Tableau 10, used for clusters.
const TABLEAU10: [(u8, u8, u8); 10] = [
    (0x4e, 0x79, 0xa7),
    (0xf2, 0x8e, 0x2c),
    (0xe1, 0x57, 0x59),
    (0x76, 0xb7, 0xb2),
    (0x59, 0xa1, 0x4f),
    (0xed, 0xc9, 0x49),
    (0xaf, 0x7a, 0xa1),
    (0xff, 0x9d, 0xa7),
    (0x9c, 0x75, 0x5f),
    (0xba, 0xb0, 0xab),
];

fn palette_of(colors: &[(u8, u8, u8)]) -> Vec<Srgb<u8>> {
    colors.iter().map(|&(r, g, b)| Srgb::new(r, g, b)).collect()
}

fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Ordinal scale: category → colour
// ---------------------------------------------------------------------------

/// Maps each domain value to the palette entry at the same position,
/// wrapping around when the domain is longer than the palette.
#[derive(Debug, Clone)]
pub struct OrdinalScale<T> {
    domain: Vec<T>,
    range: Vec<Srgb<u8>>,
}

impl<T: PartialEq> OrdinalScale<T> {
    pub fn new(domain: Vec<T>, range: Vec<Srgb<u8>>) -> Self {
        OrdinalScale { domain, range }
    }

    /// Colour for `value`; values outside the domain get `Color32::GRAY`.
    pub fn color_for(&self, value: &T) -> Color32 {
        match self.domain.iter().position(|v| v == value) {
            Some(i) if !self.range.is_empty() => to_color32(self.range[i % self.range.len()]),
            _ => Color32::GRAY,
        }
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }
}

// ---------------------------------------------------------------------------
// Colour schemes for the car chart
// ---------------------------------------------------------------------------

/// Origin colours and (for clustered data) cluster colours.
#[derive(Debug, Clone)]
pub struct ColorSchemes {
    pub origin: OrdinalScale<String>,
    pub cluster: OrdinalScale<i64>,
}

impl ColorSchemes {
    pub fn new(dataset: &CarDataset) -> Self {
        ColorSchemes {
            origin: OrdinalScale::new(dataset.origins.clone(), palette_of(&SET2)),
            cluster: OrdinalScale::new(dataset.clusters.clone(), palette_of(&TABLEAU10)),
        }
    }

    /// Point colour: by cluster in cluster mode, by origin otherwise.
    pub fn color_for(&self, record: &Record, cluster_mode: bool) -> Color32 {
        match record.cluster {
            Some(cluster) if cluster_mode => self.cluster.color_for(&cluster),
            _ => self.origin.color_for(&record.origin),
        }
    }

    /// Legend entries for origins, in order of first appearance.
    pub fn origin_legend(&self) -> Vec<(String, Color32)> {
        self.origin
            .domain()
            .iter()
            .map(|o| (o.clone(), self.origin.color_for(o)))
            .collect()
    }

    /// Legend entries for clusters, sorted by id.
    pub fn cluster_legend(&self) -> Vec<(String, Color32)> {
        let mut ids = self.cluster.domain().to_vec();
        ids.sort_unstable();
        ids.into_iter()
            .map(|c| (cluster_label(c), self.cluster.color_for(&c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{sample_record, Schema};

    #[test]
    fn ordinal_scale_wraps_around_the_palette() {
        let scale = OrdinalScale::new((0..12).collect(), palette_of(&TABLEAU10));
        assert_eq!(scale.color_for(&0), Color32::from_rgb(0x4e, 0x79, 0xa7));
        assert_eq!(scale.color_for(&10), scale.color_for(&0));
        assert_eq!(scale.color_for(&11), scale.color_for(&1));
        assert_eq!(scale.color_for(&99), Color32::GRAY);
    }

    #[test]
    fn cluster_mode_switches_the_color_source() {
        let mut a = sample_record("a", "usa", 20.0);
        a.cluster = Some(3);
        let mut b = sample_record("b", "japan", 20.0);
        b.cluster = Some(-1);
        let ds = CarDataset::from_records(vec![a.clone(), b.clone()], Schema::Clustered);
        let schemes = ColorSchemes::new(&ds);

        assert_eq!(schemes.color_for(&a, false), Color32::from_rgb(0x66, 0xc2, 0xa5));
        assert_eq!(schemes.color_for(&b, false), Color32::from_rgb(0xfc, 0x8d, 0x62));
        assert_eq!(schemes.color_for(&a, true), Color32::from_rgb(0x4e, 0x79, 0xa7));
        assert_eq!(schemes.color_for(&b, true), Color32::from_rgb(0xf2, 0x8e, 0x2c));
    }

    #[test]
    fn cluster_legend_is_sorted_with_outlier_first() {
        let records = [2, -1, 0]
            .into_iter()
            .map(|c| {
                let mut r = sample_record("m", "usa", 20.0);
                r.cluster = Some(c);
                r
            })
            .collect();
        let ds = CarDataset::from_records(records, Schema::Clustered);
        let labels: Vec<String> = ColorSchemes::new(&ds)
            .cluster_legend()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Outlier", "Cluster 1", "Cluster 3"]);
    }
}
