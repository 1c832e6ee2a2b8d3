use super::model::ListingTable;

// ---------------------------------------------------------------------------
// Summary statistics over a filtered subset
// ---------------------------------------------------------------------------

/// Headline numbers for the current subset. Statistics are `None` when there
/// is nothing to aggregate — "no data" is distinct from a real zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Raw subset size; rows with absent numerics still count.
    pub count: usize,
    pub mean_price: Option<f64>,
    pub median_price: Option<f64>,
    pub mean_odometer: Option<f64>,
}

/// Compute summary statistics for the rows at `indices`. Absent values are
/// excluded from means and medians, never treated as zero.
pub fn summarize(table: &ListingTable, indices: &[usize]) -> Summary {
    let prices: Vec<f64> = indices
        .iter()
        .filter_map(|&i| table.rows[i].price)
        .collect();
    let odometers: Vec<f64> = indices
        .iter()
        .filter_map(|&i| table.rows[i].odometer)
        .collect();

    Summary {
        count: indices.len(),
        mean_price: mean(&prices),
        median_price: median(&prices),
        mean_odometer: mean(&odometers),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.5)
}

/// Linearly interpolated quantile of an ascending-sorted slice.
/// `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
