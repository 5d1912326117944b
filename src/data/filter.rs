use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{AttrValue, Attribute, Record, Schema};

// ---------------------------------------------------------------------------
// Comparison mode
// ---------------------------------------------------------------------------

/// Relational operator applied to every active numeric constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Value must equal the constraint.
    #[default]
    Equal,
    /// Value must be at most the constraint.
    Down,
    /// Value must be at least the constraint.
    Up,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 3] =
        [ComparisonMode::Equal, ComparisonMode::Down, ComparisonMode::Up];

    pub fn label(self) -> &'static str {
        match self {
            ComparisonMode::Equal => "Equal",
            ComparisonMode::Down => "At most",
            ComparisonMode::Up => "At least",
        }
    }

    /// Whether `value` violates constraint `bound` under this mode.
    fn rejects(self, value: f64, bound: f64) -> bool {
        match self {
            ComparisonMode::Equal => value != bound,
            ComparisonMode::Down => value > bound,
            ComparisonMode::Up => value < bound,
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Filter state store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("the Model attribute is highlighted, never filtered")]
    ModelNotFilterable,
    #[error("attribute {0} is not part of the loaded schema")]
    NotInSchema(Attribute),
    #[error("value '{value}' does not fit attribute {attr}")]
    TypeMismatch { attr: Attribute, value: AttrValue },
}

/// Per-attribute constraints plus the comparison mode.
///
/// The key set is fixed at construction to the schema's attributes; a key
/// mapped to `None` is inactive. `Model` is a key but never active.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    schema: Schema,
    constraints: BTreeMap<Attribute, Option<AttrValue>>,
    mode: ComparisonMode,
}

impl FilterState {
    /// All attributes inactive, mode `Equal`.
    pub fn new(schema: Schema) -> Self {
        FilterState {
            schema,
            constraints: schema.attributes().map(|a| (a, None)).collect(),
            mode: ComparisonMode::default(),
        }
    }

    /// "Rows like this one": every attribute except `Model` constrained to
    /// the record's value.
    pub fn from_record(record: &Record, schema: Schema, mode: ComparisonMode) -> Self {
        let mut state = FilterState::new(schema);
        state.mode = mode;
        for (attr, slot) in state.constraints.iter_mut() {
            if *attr != Attribute::Model {
                *slot = record.value(*attr);
            }
        }
        state
    }

    pub fn set_constraint(&mut self, attr: Attribute, value: AttrValue) -> Result<(), FilterError> {
        if attr == Attribute::Model {
            return Err(FilterError::ModelNotFilterable);
        }
        let Some(slot) = self.constraints.get_mut(&attr) else {
            return Err(FilterError::NotInSchema(attr));
        };
        if attr.is_numeric() != value.as_f64().is_some() {
            return Err(FilterError::TypeMismatch { attr, value });
        }
        *slot = Some(value);
        Ok(())
    }

    /// Deactivate one attribute. Unknown attributes are ignored.
    pub fn clear_constraint(&mut self, attr: Attribute) {
        if let Some(slot) = self.constraints.get_mut(&attr) {
            *slot = None;
        }
    }

    /// Every attribute inactive and mode back to `Equal`.
    pub fn reset(&mut self) {
        *self = FilterState::new(self.schema);
    }

    pub fn set_mode(&mut self, mode: ComparisonMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> FilterState {
        self.clone()
    }

    pub fn constraint(&self, attr: Attribute) -> Option<&AttrValue> {
        self.constraints.get(&attr).and_then(Option::as_ref)
    }

    pub fn is_active(&self, attr: Attribute) -> bool {
        self.constraint(attr).is_some()
    }

    /// Active constraints in attribute order.
    pub fn active(&self) -> impl Iterator<Item = (Attribute, &AttrValue)> {
        self.constraints
            .iter()
            .filter_map(|(attr, v)| Some((*attr, v.as_ref()?)))
            .filter(|(attr, _)| *attr != Attribute::Model)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// The fixed key set.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.constraints.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Whether `record` satisfies every active constraint of `state`.
///
/// * `Origin` always compares for equality.
/// * Numeric attributes compare with `state.mode()`.
pub fn matches(record: &Record, state: &FilterState) -> bool {
    let mode = state.mode();
    state.active().all(|(attr, bound)| match attr {
        Attribute::Origin => bound.as_text() == Some(record.origin.as_str()),
        _ => match (record.numeric(attr), bound.as_f64()) {
            (Some(value), Some(bound)) => !mode.rejects(value, bound),
            _ => false,
        },
    })
}

/// Indices of records passing all active filters, in input order.
pub fn filtered_indices(records: &[Record], state: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches(rec, state))
        .map(|(i, _)| i)
        .collect()
}

/// The records passing all active filters, in input order.
pub fn evaluate<'a>(records: &'a [Record], state: &FilterState) -> Vec<&'a Record> {
    records.iter().filter(|rec| matches(rec, state)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_record;

    fn three_cars() -> Vec<Record> {
        vec![
            sample_record("amc hornet", "usa", 18.0),
            sample_record("datsun 510", "japan", 24.0),
            sample_record("vw rabbit", "europe", 30.0),
        ]
    }

    fn mpgs(records: &[&Record]) -> Vec<f64> {
        records.iter().map(|r| r.mpg).collect()
    }

    #[test]
    fn no_constraints_keeps_everything_in_order() {
        let cars = three_cars();
        let state = FilterState::new(Schema::Clustered);
        assert_eq!(state.active_count(), 0);
        assert_eq!(filtered_indices(&cars, &state), vec![0, 1, 2]);
    }

    #[test]
    fn equal_mode_selects_exact_match() {
        let cars = three_cars();
        let mut state = FilterState::new(Schema::Clustered);
        state.set_constraint(Attribute::Mpg, AttrValue::Float(24.0)).unwrap();
        assert_eq!(mpgs(&evaluate(&cars, &state)), vec![24.0]);
    }

    #[test]
    fn down_mode_keeps_values_at_most_the_bound() {
        let cars = three_cars();
        let mut state = FilterState::new(Schema::Clustered);
        state.set_constraint(Attribute::Mpg, AttrValue::Float(24.0)).unwrap();
        state.set_mode(ComparisonMode::Down);
        let kept = evaluate(&cars, &state);
        assert_eq!(mpgs(&kept), vec![18.0, 24.0]);
        assert!(kept.iter().all(|r| r.mpg <= 24.0));
    }

    #[test]
    fn up_mode_keeps_values_at_least_the_bound() {
        let cars = three_cars();
        let mut state = FilterState::new(Schema::Clustered);
        state.set_constraint(Attribute::Mpg, AttrValue::Int(24)).unwrap();
        state.set_mode(ComparisonMode::Up);
        assert_eq!(mpgs(&evaluate(&cars, &state)), vec![24.0, 30.0]);
    }

    #[test]
    fn origin_ignores_mode() {
        let cars = three_cars();
        let mut state = FilterState::new(Schema::Clustered);
        state
            .set_constraint(Attribute::Origin, AttrValue::Text("japan".into()))
            .unwrap();
        for mode in ComparisonMode::ALL {
            state.set_mode(mode);
            assert_eq!(filtered_indices(&cars, &state), vec![1], "mode {mode}");
        }
    }

    #[test]
    fn constraints_combine_with_and() {
        let cars = three_cars();
        let mut state = FilterState::new(Schema::Clustered);
        state.set_mode(ComparisonMode::Up);
        state.set_constraint(Attribute::Mpg, AttrValue::Float(20.0)).unwrap();
        state
            .set_constraint(Attribute::Origin, AttrValue::Text("europe".into()))
            .unwrap();
        assert_eq!(filtered_indices(&cars, &state), vec![2]);

        state
            .set_constraint(Attribute::Origin, AttrValue::Text("usa".into()))
            .unwrap();
        assert!(filtered_indices(&cars, &state).is_empty());
    }

    #[test]
    fn record_filter_contains_its_source() {
        let cars = three_cars();
        for (i, car) in cars.iter().enumerate() {
            let state = FilterState::from_record(car, Schema::Clustered, ComparisonMode::Equal);
            assert!(!state.is_active(Attribute::Model));
            assert_eq!(state.active_count(), 9);
            assert!(filtered_indices(&cars, &state).contains(&i));
        }
    }

    #[test]
    fn record_filter_on_plain_schema_skips_cluster() {
        let mut car = sample_record("ford pinto", "usa", 25.0);
        car.cluster = None;
        let state = FilterState::from_record(&car, Schema::Plain, ComparisonMode::Down);
        assert_eq!(state.active_count(), 8);
        assert_eq!(state.mode(), ComparisonMode::Down);
        assert!(state.attributes().all(|a| a != Attribute::Cluster));
    }

    #[test]
    fn reset_matches_a_fresh_state() {
        let cars = three_cars();
        let mut state = FilterState::from_record(&cars[0], Schema::Clustered, ComparisonMode::Up);
        state.reset();
        assert_eq!(state, FilterState::new(Schema::Clustered));
        assert_eq!(filtered_indices(&cars, &state), vec![0, 1, 2]);
        state.reset();
        assert_eq!(state, FilterState::new(Schema::Clustered));
    }

    #[test]
    fn store_rejects_invalid_constraints() {
        let mut state = FilterState::new(Schema::Plain);
        assert_eq!(
            state.set_constraint(Attribute::Model, AttrValue::Text("x".into())),
            Err(FilterError::ModelNotFilterable)
        );
        assert_eq!(
            state.set_constraint(Attribute::Cluster, AttrValue::Int(1)),
            Err(FilterError::NotInSchema(Attribute::Cluster))
        );
        assert!(matches!(
            state.set_constraint(Attribute::Origin, AttrValue::Int(1)),
            Err(FilterError::TypeMismatch { .. })
        ));
        assert!(matches!(
            state.set_constraint(Attribute::Weight, AttrValue::Text("heavy".into())),
            Err(FilterError::TypeMismatch { .. })
        ));
        assert_eq!(state.active_count(), 0);
    }

    #[test]
    fn clearing_keeps_the_key_set() {
        let mut state = FilterState::new(Schema::Clustered);
        state.set_constraint(Attribute::Year, AttrValue::Int(1975)).unwrap();
        let snapshot = state.current();
        state.clear_constraint(Attribute::Year);
        assert!(snapshot.is_active(Attribute::Year));
        assert!(!state.is_active(Attribute::Year));
        assert_eq!(state.attributes().count(), 10);
    }
}
