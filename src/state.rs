use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::ListingTable;
use crate::data::summary::quantile;

/// Dataset loaded at startup when present next to the executable.
pub const DEFAULT_DATA_PATH: &str = "vehicles_us.csv";

/// Rows shown in the data preview tab.
pub const PREVIEW_ROWS: usize = 1000;

/// Bars shown in the popular-models histogram.
pub const MAX_MODEL_BARS: usize = 20;

// ---------------------------------------------------------------------------
// Chart tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scatter,
    Boxes,
    Models,
    Table,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Scatter, Tab::Boxes, Tab::Models, Tab::Table];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Scatter => "Price vs odometer",
            Tab::Boxes => "Price by manufacturer",
            Tab::Models => "Popular models",
            Tab::Table => "Data preview",
        }
    }
}

// ---------------------------------------------------------------------------
// Range editor state
// ---------------------------------------------------------------------------

/// One numeric range filter as edited in the side panel. Disabled means "no
/// constraint on this field"; the bounds seed the drag widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEdit<T> {
    pub enabled: bool,
    pub lo: T,
    pub hi: T,
    /// Widget bounds derived from the loaded data.
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd> RangeEdit<T> {
    fn seeded(min: T, max: T) -> Self {
        RangeEdit {
            enabled: false,
            lo: min,
            hi: max,
            min,
            max,
        }
    }

    /// The constraint this edit contributes, if any. Bounds are reordered so
    /// a crossed pair from mid-edit drags never inverts the range.
    fn constraint(&self) -> Option<(T, T)> {
        if !self.enabled {
            return None;
        }
        if self.lo <= self.hi {
            Some((self.lo, self.hi))
        } else {
            Some((self.hi, self.lo))
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file loads successfully).
    pub table: Option<Arc<ListingTable>>,
    pub source_path: Option<PathBuf>,

    pub year: RangeEdit<i64>,
    pub price: RangeEdit<f64>,
    pub odometer: RangeEdit<f64>,

    /// All category values present in the table, for the checkbox lists.
    pub all_manufacturers: BTreeSet<String>,
    pub all_body_types: BTreeSet<String>,
    /// Checked values. Checking everything (or nothing) means no constraint.
    pub selected_manufacturers: BTreeSet<String>,
    pub selected_types: BTreeSet<String>,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Stable colours for the scatter's body-type series.
    pub color_map: Option<ColorMap>,

    /// Plot price axes on a log10 scale.
    pub log_price: bool,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_path: None,
            year: RangeEdit::seeded(2000, 2024),
            price: RangeEdit::seeded(0.0, 100_000.0),
            odometer: RangeEdit::seeded(0.0, 300_000.0),
            all_manufacturers: BTreeSet::new(),
            all_body_types: BTreeSet::new(),
            selected_manufacturers: BTreeSet::new(),
            selected_types: BTreeSet::new(),
            visible_indices: Vec::new(),
            color_map: None,
            log_price: false,
            active_tab: Tab::Scatter,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table, seed filter widgets from its bounds.
    pub fn set_table(&mut self, table: Arc<ListingTable>, path: PathBuf) {
        let (year_min, year_max) = table.year_bounds().unwrap_or((2000, 2024));
        self.year = RangeEdit::seeded(year_min, year_max);

        // Price/odometer widgets stop at the 99th percentile so a handful of
        // outlier listings does not flatten the useful range.
        let (price_min, price_max) = table.price_bounds().unwrap_or((0.0, 100_000.0));
        let price_cap = p99(table.rows.iter().filter_map(|r| r.price)).unwrap_or(price_max);
        self.price = RangeEdit::seeded(price_min, price_cap.max(price_min));

        let (odo_min, odo_max) = table.odometer_bounds().unwrap_or((0.0, 300_000.0));
        let odo_cap = p99(table.rows.iter().filter_map(|r| r.odometer)).unwrap_or(odo_max);
        self.odometer = RangeEdit::seeded(odo_min, odo_cap.max(odo_min));

        self.all_manufacturers = table.unique_manufacturers();
        self.all_body_types = table.unique_body_types();
        self.selected_manufacturers = self.all_manufacturers.clone();
        self.selected_types = self.all_body_types.clone();

        self.color_map = Some(ColorMap::new(&self.all_body_types));
        self.visible_indices = (0..table.len()).collect();
        self.table = Some(table);
        self.source_path = Some(path);
        self.status_message = None;
    }

    /// Build the criteria the data layer understands from the widget state.
    /// A fully checked category list carries no constraint, so rows with an
    /// absent category are not hidden by the default selection.
    pub fn build_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            year: self.year.constraint(),
            price: self.price.constraint(),
            odometer: self.odometer.constraint(),
            manufacturers: effective_selection(&self.selected_manufacturers, &self.all_manufacturers),
            types: effective_selection(&self.selected_types, &self.all_body_types),
        }
    }

    /// Recompute `visible_indices` after any filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.build_criteria());
        }
    }

    /// Back to "show everything".
    pub fn reset_filters(&mut self) {
        self.year.enabled = false;
        self.price.enabled = false;
        self.odometer.enabled = false;
        self.year.lo = self.year.min;
        self.year.hi = self.year.max;
        self.price.lo = self.price.min;
        self.price.hi = self.price.max;
        self.odometer.lo = self.odometer.min;
        self.odometer.hi = self.odometer.max;
        self.selected_manufacturers = self.all_manufacturers.clone();
        self.selected_types = self.all_body_types.clone();
        self.refilter();
    }
}

fn effective_selection(selected: &BTreeSet<String>, all: &BTreeSet<String>) -> BTreeSet<String> {
    if selected.len() == all.len() {
        BTreeSet::new()
    } else {
        selected.clone()
    }
}

fn p99(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.99)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_reader;
    use std::io::Cursor;

    const SOURCE: &str = "\
price,odometer,model_year,manufacturer,type,model
1000,5000,2010,A,sedan,X
2000,3000,2015,B,suv,Y
,1000,2015,A,sedan,Z
";

    fn loaded_state() -> AppState {
        let table = parse_reader(Cursor::new(SOURCE)).unwrap();
        let mut state = AppState::default();
        state.set_table(Arc::new(table), PathBuf::from("test.csv"));
        state
    }

    #[test]
    fn fresh_table_is_fully_visible_and_unconstrained() {
        let state = loaded_state();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert!(!state.build_criteria().is_active());
    }

    #[test]
    fn fully_checked_categories_carry_no_constraint() {
        let state = loaded_state();
        let criteria = state.build_criteria();
        assert!(criteria.manufacturers.is_empty());
        assert!(criteria.types.is_empty());
    }

    #[test]
    fn partial_category_selection_becomes_a_constraint() {
        let mut state = loaded_state();
        state.selected_manufacturers.remove("B");
        state.refilter();
        assert_eq!(state.visible_indices, vec![0, 2]);
    }

    #[test]
    fn enabling_a_year_range_refilters() {
        let mut state = loaded_state();
        state.year.enabled = true;
        state.year.lo = 2015;
        state.year.hi = 2015;
        state.refilter();
        assert_eq!(state.visible_indices, vec![1, 2]);
    }

    #[test]
    fn crossed_range_bounds_are_reordered() {
        let mut state = loaded_state();
        state.year.enabled = true;
        state.year.lo = 2015;
        state.year.hi = 2010;
        let criteria = state.build_criteria();
        assert_eq!(criteria.year, Some((2010, 2015)));
    }

    #[test]
    fn reset_restores_everything() {
        let mut state = loaded_state();
        state.year.enabled = true;
        state.year.lo = 2015;
        state.selected_types.clear();
        state.refilter();
        state.reset_filters();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert!(!state.build_criteria().is_active());
    }

    #[test]
    fn widget_bounds_come_from_the_data() {
        let state = loaded_state();
        assert_eq!((state.year.min, state.year.max), (2010, 2015));
        assert_eq!(state.price.min, 1000.0);
    }
}
