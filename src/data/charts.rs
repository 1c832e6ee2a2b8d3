use std::collections::BTreeMap;

use super::model::ListingTable;
use super::summary::quantile;

/// Series label for rows whose body type is absent.
pub const UNKNOWN_TYPE: &str = "(unknown)";

// ---------------------------------------------------------------------------
// Scatter: odometer vs price, one series per body type
// ---------------------------------------------------------------------------

/// One colorable scatter series: `[odometer, price]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Project the subset into scatter series grouped by body type. Rows missing
/// either price or odometer are skipped. With `log_price` the y value is
/// log10(price) and non-positive prices are skipped as well.
pub fn scatter_series(table: &ListingTable, indices: &[usize], log_price: bool) -> Vec<ScatterSeries> {
    let mut groups: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();

    for &i in indices {
        let row = &table.rows[i];
        let (Some(price), Some(odometer)) = (row.price, row.odometer) else {
            continue;
        };
        let Some(y) = price_axis_value(price, log_price) else {
            continue;
        };
        let label = row.body_type.clone().unwrap_or_else(|| UNKNOWN_TYPE.to_string());
        groups.entry(label).or_default().push([odometer, y]);
    }

    groups
        .into_iter()
        .map(|(label, points)| ScatterSeries { label, points })
        .collect()
}

// ---------------------------------------------------------------------------
// Boxplot: price distribution per manufacturer
// ---------------------------------------------------------------------------

/// Five-number summary of prices for one manufacturer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBox {
    pub manufacturer: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One box per manufacturer present in the subset, sorted by name.
/// Manufacturers with no usable prices are omitted rather than drawn empty.
pub fn price_by_manufacturer(
    table: &ListingTable,
    indices: &[usize],
    log_price: bool,
) -> Vec<PriceBox> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for &i in indices {
        let row = &table.rows[i];
        let (Some(mfr), Some(price)) = (&row.manufacturer, row.price) else {
            continue;
        };
        let Some(value) = price_axis_value(price, log_price) else {
            continue;
        };
        groups.entry(mfr.clone()).or_default().push(value);
    }

    groups
        .into_iter()
        .filter_map(|(manufacturer, mut values)| {
            values.sort_by(f64::total_cmp);
            Some(PriceBox {
                manufacturer,
                count: values.len(),
                min: *values.first()?,
                q1: quantile(&values, 0.25)?,
                median: quantile(&values, 0.5)?,
                q3: quantile(&values, 0.75)?,
                max: *values.last()?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram: listing count per model
// ---------------------------------------------------------------------------

/// Listing count per distinct model, sorted by count descending then name.
/// Rows with an absent model are skipped.
pub fn model_counts(table: &ListingTable, indices: &[usize]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for &i in indices {
        if let Some(model) = &table.rows[i].model {
            *counts.entry(model.clone()).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

fn price_axis_value(price: f64, log_price: bool) -> Option<f64> {
    if log_price {
        (price > 0.0).then(|| price.log10())
    } else {
        Some(price)
    }
}
