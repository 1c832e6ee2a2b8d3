use std::collections::{BTreeMap, BTreeSet};

/// Names of the typed columns every source file must provide.
/// Anything else in the header is carried along as passthrough text.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "price",
    "odometer",
    "model_year",
    "manufacturer",
    "type",
    "model",
];

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single vehicle listing (one CSV row). `None` means the source cell was
/// empty or unparsable — absent, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub price: Option<f64>,
    pub odometer: Option<f64>,
    pub model_year: Option<i64>,
    pub manufacturer: Option<String>,
    /// Body style; the source column is named `type`.
    pub body_type: Option<String>,
    pub model: Option<String>,
    /// Columns outside the typed schema, kept verbatim for export.
    pub extras: BTreeMap<String, String>,
}

impl Listing {
    /// Canonical cell text for a given (normalized) column name, shared by
    /// the preview table and the CSV export. Absent values render empty, and
    /// numeric formatting round-trips through the loader's coercion.
    pub fn cell(&self, column: &str) -> String {
        match column {
            "price" => self.price.map(fmt_f64).unwrap_or_default(),
            "odometer" => self.odometer.map(fmt_f64).unwrap_or_default(),
            "model_year" => self.model_year.map(|y| y.to_string()).unwrap_or_default(),
            "manufacturer" => self.manufacturer.clone().unwrap_or_default(),
            "type" => self.body_type.clone().unwrap_or_default(),
            "model" => self.model.clone().unwrap_or_default(),
            other => self.extras.get(other).cloned().unwrap_or_default(),
        }
    }
}

fn fmt_f64(v: f64) -> String {
    // f64 Display is the shortest representation that parses back to the
    // same value, which is exactly what the export round-trip needs.
    v.to_string()
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable after load; every downstream component
/// (filter, summary, charts, export) only ever reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingTable {
    /// Normalized source column names, in source order.
    pub headers: Vec<String>,
    pub rows: Vec<Listing>,
}

impl ListingTable {
    /// Number of listings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted set of manufacturers present in the table (absent skipped).
    pub fn unique_manufacturers(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter_map(|r| r.manufacturer.clone())
            .collect()
    }

    /// Sorted set of body types present in the table (absent skipped).
    pub fn unique_body_types(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter_map(|r| r.body_type.clone())
            .collect()
    }

    /// (min, max) over present model years.
    pub fn year_bounds(&self) -> Option<(i64, i64)> {
        let mut iter = self.rows.iter().filter_map(|r| r.model_year);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// (min, max) over present prices.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        numeric_bounds(self.rows.iter().filter_map(|r| r.price))
    }

    /// (min, max) over present odometer readings.
    pub fn odometer_bounds(&self) -> Option<(f64, f64)> {
        numeric_bounds(self.rows.iter().filter_map(|r| r.odometer))
    }
}

fn numeric_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for v in values {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    bounds
}
