use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Attribute – one column of the fixed car schema
// ---------------------------------------------------------------------------

/// The fixed set of record fields. Serialized with the CSV header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Model,
    Origin,
    #[serde(rename = "MPG")]
    Mpg,
    Cylinders,
    Displacement,
    Horsepower,
    Weight,
    Acceleration,
    Year,
    Cluster,
}

impl Attribute {
    /// Every attribute, in CSV header order (Cluster last).
    pub const ALL: [Attribute; 10] = [
        Attribute::Model,
        Attribute::Mpg,
        Attribute::Cylinders,
        Attribute::Displacement,
        Attribute::Horsepower,
        Attribute::Weight,
        Attribute::Acceleration,
        Attribute::Year,
        Attribute::Origin,
        Attribute::Cluster,
    ];

    /// Numeric attributes selectable for the X / Y axis.
    pub const AXES: [Attribute; 7] = [
        Attribute::Mpg,
        Attribute::Cylinders,
        Attribute::Displacement,
        Attribute::Horsepower,
        Attribute::Weight,
        Attribute::Acceleration,
        Attribute::Year,
    ];

    /// Header / label text.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Model => "Model",
            Attribute::Origin => "Origin",
            Attribute::Mpg => "MPG",
            Attribute::Cylinders => "Cylinders",
            Attribute::Displacement => "Displacement",
            Attribute::Horsepower => "Horsepower",
            Attribute::Weight => "Weight",
            Attribute::Acceleration => "Acceleration",
            Attribute::Year => "Year",
            Attribute::Cluster => "Cluster",
        }
    }

    pub fn is_axis(self) -> bool {
        Self::AXES.contains(&self)
    }

    /// Whether values of this attribute are numbers (everything but Model and Origin).
    pub fn is_numeric(self) -> bool {
        !matches!(self, Attribute::Model | Attribute::Origin)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// AttrValue – a single cell
// ---------------------------------------------------------------------------

/// A typed cell value. Numeric variants compare with each other as `f64`.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
}

// -- Manual Eq/Ord so AttrValue can key a BTreeMap --

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for AttrValue {}

impl PartialOrd for AttrValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttrValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => match (self, other) {
                (AttrValue::Text(a), AttrValue::Text(b)) => a.cmp(b),
                _ => std::cmp::Ordering::Equal,
            },
        }
    }
}

impl std::hash::Hash for AttrValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            AttrValue::Text(s) => s.hash(state),
            AttrValue::Int(i) => (*i as f64).to_bits().hash(state),
            AttrValue::Float(v) => v.to_bits().hash(state),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{s}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – with or without the precomputed cluster column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Plain,
    Clustered,
}

impl Schema {
    pub fn has_cluster(self) -> bool {
        self == Schema::Clustered
    }

    /// Attributes present in records of this schema.
    pub fn attributes(self) -> impl Iterator<Item = Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(move |a| *a != Attribute::Cluster || self.has_cluster())
    }
}

// ---------------------------------------------------------------------------
// Record – one vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub model: String,
    pub origin: String,
    pub mpg: f64,
    pub cylinders: i64,
    pub displacement: f64,
    pub horsepower: f64,
    pub weight: i64,
    pub acceleration: f64,
    /// Four-digit year.
    pub year: i64,
    /// Precomputed cluster id, -1 for outliers. `None` in the plain schema.
    pub cluster: Option<i64>,
}

impl Record {
    /// Value of `attr`, or `None` for Cluster on a record without one.
    pub fn value(&self, attr: Attribute) -> Option<AttrValue> {
        Some(match attr {
            Attribute::Model => AttrValue::Text(self.model.clone()),
            Attribute::Origin => AttrValue::Text(self.origin.clone()),
            Attribute::Mpg => AttrValue::Float(self.mpg),
            Attribute::Cylinders => AttrValue::Int(self.cylinders),
            Attribute::Displacement => AttrValue::Float(self.displacement),
            Attribute::Horsepower => AttrValue::Float(self.horsepower),
            Attribute::Weight => AttrValue::Int(self.weight),
            Attribute::Acceleration => AttrValue::Float(self.acceleration),
            Attribute::Year => AttrValue::Int(self.year),
            Attribute::Cluster => AttrValue::Int(self.cluster?),
        })
    }

    /// Numeric value of `attr` without allocating.
    pub fn numeric(&self, attr: Attribute) -> Option<f64> {
        match attr {
            Attribute::Model | Attribute::Origin => None,
            Attribute::Mpg => Some(self.mpg),
            Attribute::Cylinders => Some(self.cylinders as f64),
            Attribute::Displacement => Some(self.displacement),
            Attribute::Horsepower => Some(self.horsepower),
            Attribute::Weight => Some(self.weight as f64),
            Attribute::Acceleration => Some(self.acceleration),
            Attribute::Year => Some(self.year as f64),
            Attribute::Cluster => self.cluster.map(|c| c as f64),
        }
    }

    /// Tooltip text, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{} ({}) - {}", self.model, self.year, self.origin),
            format!("MPG: {}", self.mpg),
            format!("Cylinders: {}", self.cylinders),
            format!("Displacement: {}", self.displacement),
            format!("Horsepower: {}", self.horsepower),
            format!("Weight: {}", self.weight),
            format!("Acceleration: {}", self.acceleration),
        ];
        match self.cluster {
            Some(-1) => lines.push("Cluster: Outlier".to_string()),
            Some(cluster) => lines.push(format!("Cluster: {}", cluster + 1)),
            None => {}
        }
        lines
    }
}

/// "Outlier" for -1, otherwise the one-based cluster number.
pub fn cluster_label(cluster: i64) -> String {
    if cluster == -1 {
        "Outlier".to_string()
    } else {
        format!("Cluster {}", cluster + 1)
    }
}

// ---------------------------------------------------------------------------
// CarDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset with lookup tables built once at load time.
#[derive(Debug, Clone)]
pub struct CarDataset {
    pub records: Vec<Record>,
    pub schema: Schema,
    /// Distinct origins in order of first appearance.
    pub origins: Vec<String>,
    /// Distinct cluster ids in order of first appearance (empty for `Schema::Plain`).
    pub clusters: Vec<i64>,
    /// Sorted distinct model names, for autocomplete.
    pub models: BTreeSet<String>,
    /// Lower-cased model name → indices of records with that model.
    model_index: BTreeMap<String, Vec<usize>>,
}

impl CarDataset {
    pub fn from_records(records: Vec<Record>, schema: Schema) -> Self {
        let mut origins = Vec::new();
        let mut clusters = Vec::new();
        let mut models = BTreeSet::new();
        let mut model_index: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (i, rec) in records.iter().enumerate() {
            if !origins.contains(&rec.origin) {
                origins.push(rec.origin.clone());
            }
            if let Some(c) = rec.cluster {
                if !clusters.contains(&c) {
                    clusters.push(c);
                }
            }
            models.insert(rec.model.clone());
            model_index
                .entry(rec.model.to_lowercase())
                .or_default()
                .push(i);
        }

        CarDataset {
            records,
            schema,
            origins,
            clusters,
            models,
            model_index,
        }
    }

    /// Indices of records whose model matches `name` exactly, ignoring case
    /// and surrounding whitespace.
    pub fn records_with_model(&self, name: &str) -> &[usize] {
        self.model_index
            .get(&name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(model: &str, origin: &str, mpg: f64) -> Record {
    Record {
        model: model.to_string(),
        origin: origin.to_string(),
        mpg,
        cylinders: 4,
        displacement: 120.0,
        horsepower: 90.0,
        weight: 2500,
        acceleration: 15.0,
        year: 1975,
        cluster: Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_compare_across_int_and_float() {
        assert_eq!(AttrValue::Int(4), AttrValue::Float(4.0));
        assert!(AttrValue::Int(3) < AttrValue::Float(3.5));
        assert!(AttrValue::Float(1e9) < AttrValue::Text("a".into()));
    }

    #[test]
    fn plain_schema_has_no_cluster_attribute() {
        assert!(!Schema::Plain.attributes().any(|a| a == Attribute::Cluster));
        assert_eq!(Schema::Clustered.attributes().count(), 10);
    }

    #[test]
    fn axes_exclude_categorical_fields() {
        for attr in [Attribute::Model, Attribute::Origin, Attribute::Cluster] {
            assert!(!attr.is_axis());
        }
        assert!(Attribute::Year.is_axis());
    }

    #[test]
    fn dataset_indexes_models_case_insensitively() {
        let ds = CarDataset::from_records(
            vec![
                sample_record("ford pinto", "usa", 25.0),
                sample_record("vw rabbit", "europe", 29.0),
                sample_record("Ford Pinto", "usa", 26.0),
            ],
            Schema::Clustered,
        );
        assert_eq!(ds.records_with_model("  FORD PINTO "), &[0, 2]);
        assert!(ds.records_with_model("ford").is_empty());
        assert_eq!(ds.origins, vec!["usa".to_string(), "europe".to_string()]);
        assert_eq!(ds.clusters, vec![0]);
        assert_eq!(ds.models.len(), 3);
    }

    #[test]
    fn summary_mentions_outliers() {
        let mut rec = sample_record("amc gremlin", "usa", 21.0);
        rec.cluster = Some(-1);
        let lines = rec.summary_lines();
        assert_eq!(lines[0], "amc gremlin (1975) - usa");
        assert_eq!(lines.last().map(String::as_str), Some("Cluster: Outlier"));

        rec.cluster = Some(2);
        let lines = rec.summary_lines();
        assert_eq!(lines.last().map(String::as_str), Some("Cluster: 3"));
        assert_eq!(cluster_label(2), "Cluster 3");
    }
}
