use std::collections::BTreeSet;

use super::model::ListingTable;

// ---------------------------------------------------------------------------
// Filter criteria: the conjunction of user-selected constraints
// ---------------------------------------------------------------------------

/// User-selected constraints, rebuilt from UI state on every interaction.
///
/// Conventions:
/// * A `None` range means "no constraint on this field".
/// * An empty category set means "match all" — deselecting everything must
///   not produce a degenerate empty result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub year: Option<(i64, i64)>,
    pub price: Option<(f64, f64)>,
    pub odometer: Option<(f64, f64)>,
    pub manufacturers: BTreeSet<String>,
    pub types: BTreeSet<String>,
}

impl FilterCriteria {
    /// Whether any constraint is active.
    pub fn is_active(&self) -> bool {
        self.year.is_some()
            || self.price.is_some()
            || self.odometer.is_some()
            || !self.manufacturers.is_empty()
            || !self.types.is_empty()
    }
}

/// Return indices of listings that pass all active criteria, in original
/// row order. Deterministic: same table + same criteria gives the same
/// result.
///
/// A row with an absent value for a constrained field fails that constraint;
/// absence is never implicitly in-range or in-set.
pub fn filtered_indices(table: &ListingTable, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            if let Some((lo, hi)) = criteria.year {
                match row.model_year {
                    Some(y) if y >= lo && y <= hi => {}
                    _ => return false,
                }
            }
            if let Some((lo, hi)) = criteria.price {
                match row.price {
                    Some(p) if p >= lo && p <= hi => {}
                    _ => return false,
                }
            }
            if let Some((lo, hi)) = criteria.odometer {
                match row.odometer {
                    Some(o) if o >= lo && o <= hi => {}
                    _ => return false,
                }
            }
            if !criteria.manufacturers.is_empty() {
                match &row.manufacturer {
                    Some(m) if criteria.manufacturers.contains(m) => {}
                    _ => return false,
                }
            }
            if !criteria.types.is_empty() {
                match &row.body_type {
                    Some(t) if criteria.types.contains(t) => {}
                    _ => return false,
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Listing;
    use std::collections::BTreeMap;

    fn listing(
        price: Option<f64>,
        odometer: Option<f64>,
        year: Option<i64>,
        mfr: &str,
        body: &str,
        model: &str,
    ) -> Listing {
        Listing {
            price,
            odometer,
            model_year: year,
            manufacturer: Some(mfr.to_string()),
            body_type: Some(body.to_string()),
            model: Some(model.to_string()),
            extras: BTreeMap::new(),
        }
    }

    /// The three-listing table used across the dashboard's scenario tests.
    fn sample_table() -> ListingTable {
        ListingTable {
            headers: vec![
                "price".into(),
                "odometer".into(),
                "model_year".into(),
                "manufacturer".into(),
                "type".into(),
                "model".into(),
            ],
            rows: vec![
                listing(Some(1000.0), Some(5000.0), Some(2010), "A", "sedan", "X"),
                listing(Some(2000.0), Some(3000.0), Some(2015), "B", "suv", "Y"),
                listing(None, Some(1000.0), Some(2015), "A", "sedan", "Z"),
            ],
        }
    }

    #[test]
    fn default_criteria_keep_every_row() {
        let table = sample_table();
        let criteria = FilterCriteria::default();
        assert!(!criteria.is_active());
        assert_eq!(filtered_indices(&table, &criteria), vec![0, 1, 2]);
    }

    #[test]
    fn year_range_keeps_matching_rows_in_order() {
        let table = sample_table();
        let criteria = FilterCriteria {
            year: Some((2015, 2015)),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![1, 2]);
    }

    #[test]
    fn absent_numeric_fails_an_active_range() {
        let table = sample_table();
        // Row 2 has no price; a price constraint must exclude it even though
        // the range is wide open.
        let criteria = FilterCriteria {
            price: Some((0.0, 1_000_000.0)),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![0, 1]);
    }

    #[test]
    fn empty_category_selection_matches_all() {
        let table = sample_table();
        let criteria = FilterCriteria {
            manufacturers: BTreeSet::new(),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria).len(), table.len());
    }

    #[test]
    fn category_selection_filters_by_membership() {
        let table = sample_table();
        let criteria = FilterCriteria {
            manufacturers: ["A".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![0, 2]);
    }

    #[test]
    fn conjunction_of_constraints() {
        let table = sample_table();
        let criteria = FilterCriteria {
            year: Some((2015, 2015)),
            types: ["sedan".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![2]);
    }

    #[test]
    fn output_never_exceeds_input_and_is_idempotent() {
        let table = sample_table();
        let criteria = FilterCriteria {
            odometer: Some((0.0, 4000.0)),
            ..Default::default()
        };
        let first = filtered_indices(&table, &criteria);
        let second = filtered_indices(&table, &criteria);
        assert!(first.len() <= table.len());
        assert_eq!(first, second);
    }

    #[test]
    fn all_excluding_criteria_yield_empty_subset() {
        let table = sample_table();
        let criteria = FilterCriteria {
            year: Some((1990, 1991)),
            ..Default::default()
        };
        assert!(filtered_indices(&table, &criteria).is_empty());
    }
}
