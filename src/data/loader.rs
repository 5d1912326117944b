use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{Attribute, CarDataset, Record, Schema};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV is missing the '{0}' column")]
    MissingColumn(Attribute),
    #[error("row {row}, column {column}: cannot parse '{value}'")]
    Field {
        row: usize,
        column: Attribute,
        value: String,
    },
    #[error("CSV contains no rows")]
    Empty,
}

/// How to decide between the plain and the clustered dataset variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Clustered iff the header has a `Cluster` column.
    #[default]
    Auto,
    /// Ignore any `Cluster` column.
    Plain,
    /// Require a `Cluster` column.
    Clustered,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the car dataset from a CSV file.
pub fn load_file(path: &Path, mode: SchemaMode) -> Result<CarDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(file, mode)?;
    log::info!(
        "Loaded {} cars from {} ({:?} schema)",
        dataset.len(),
        path.display(),
        dataset.schema
    );
    Ok(dataset)
}

/// CSV layout: header row `Model, MPG, Cylinders, Displacement, Horsepower,
/// Weight, Acceleration, Year, Origin` and optionally `Cluster`, in any order.
/// Every field is trimmed. `Year` holds two digits and is read as 19xx.
///
/// A field that does not coerce to its type fails the whole load.
pub fn load_reader<R: Read>(reader: R, mode: SchemaMode) -> Result<CarDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let has_cluster = headers.iter().any(|h| h == Attribute::Cluster.name());
    let schema = match mode {
        SchemaMode::Auto if has_cluster => Schema::Clustered,
        SchemaMode::Auto | SchemaMode::Plain => Schema::Plain,
        SchemaMode::Clustered if has_cluster => Schema::Clustered,
        SchemaMode::Clustered => return Err(LoadError::MissingColumn(Attribute::Cluster)),
    };

    let mut columns = Vec::new();
    for attr in schema.attributes() {
        let idx = headers
            .iter()
            .position(|h| h == attr.name())
            .ok_or(LoadError::MissingColumn(attr))?;
        columns.push((attr, idx));
    }
    let column = |attr: Attribute| -> usize {
        columns
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, idx)| *idx)
            .unwrap_or(usize::MAX)
    };

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let row_no = row_no + 1;
        let field = |attr: Attribute| row.get(column(attr)).unwrap_or("");

        let cluster = if schema.has_cluster() {
            Some(parse_field(field(Attribute::Cluster), row_no, Attribute::Cluster)?)
        } else {
            None
        };

        records.push(Record {
            model: field(Attribute::Model).to_string(),
            origin: field(Attribute::Origin).to_string(),
            mpg: parse_finite(field(Attribute::Mpg), row_no, Attribute::Mpg)?,
            cylinders: parse_field(field(Attribute::Cylinders), row_no, Attribute::Cylinders)?,
            displacement: parse_finite(
                field(Attribute::Displacement),
                row_no,
                Attribute::Displacement,
            )?,
            horsepower: parse_finite(field(Attribute::Horsepower), row_no, Attribute::Horsepower)?,
            weight: parse_field(field(Attribute::Weight), row_no, Attribute::Weight)?,
            acceleration: parse_finite(
                field(Attribute::Acceleration),
                row_no,
                Attribute::Acceleration,
            )?,
            year: parse_year(field(Attribute::Year), row_no)?,
            cluster,
        });
    }

    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    log::debug!("Parsed {} rows, origins and clusters indexed", records.len());
    Ok(CarDataset::from_records(records, schema))
}

// -- field coercion --

fn parse_field<T: FromStr>(raw: &str, row: usize, column: Attribute) -> Result<T, LoadError> {
    let parsed = raw.parse::<T>().map_err(|_| field_error(raw, row, column))?;
    Ok(parsed)
}

/// Float fields must also be finite: `NaN`/`inf` parse as `f64` but are rejected.
fn parse_finite(raw: &str, row: usize, column: Attribute) -> Result<f64, LoadError> {
    let v: f64 = parse_field(raw, row, column)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(field_error(raw, row, column))
    }
}

/// Two-digit year, stored as 19yy.
fn parse_year(raw: &str, row: usize) -> Result<i64, LoadError> {
    if raw.len() != 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error(raw, row, Attribute::Year));
    }
    parse_field::<i64>(&format!("19{raw}"), row, Attribute::Year)
}

fn field_error(raw: &str, row: usize, column: Attribute) -> LoadError {
    LoadError::Field {
        row,
        column,
        value: raw.to_string(),
    }
}
