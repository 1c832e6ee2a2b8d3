use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;

use super::model::{Listing, ListingTable, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// A load failure is fatal to the whole table: no partial table is ever
/// produced or cached.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Process-wide table cache
// ---------------------------------------------------------------------------

static TABLE_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<ListingTable>>>> = OnceLock::new();

/// Load a table, reusing the parsed result for any path seen before in this
/// process. The cached table is shared read-only and never mutated, so
/// handing out `Arc` clones is safe.
pub fn load_cached(path: &Path) -> Result<Arc<ListingTable>, DataLoadError> {
    let cache = TABLE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(table) = guard.get(path) {
        log::debug!("cache hit for {}", path.display());
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(load_file(path)?);
    guard.insert(path.to_path_buf(), Arc::clone(&table));
    Ok(table)
}

/// Parse a listings CSV from disk (uncached).
pub fn load_file(path: &Path) -> Result<ListingTable, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_reader(file)?;
    log::info!(
        "loaded {} listings ({} columns) from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse a listings CSV from any reader.
///
/// * Header names are normalized: trimmed, lowercased, spaces to underscores.
/// * The six contract columns (price, odometer, model_year, manufacturer,
///   type, model) must be present.
/// * Numeric cells that are empty or unparsable become absent (`None`), the
///   row itself is kept.
/// * Duplicate rows — compared after coercion, so numeric formatting
///   differences do not count — are dropped, first occurrence wins.
pub fn parse_reader<R: Read>(input: R) -> Result<ListingTable, DataLoadError> {
    let mut reader = csv::Reader::from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut required_idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in required_idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataLoadError::MissingColumn(name))?;
    }
    let [price_idx, odometer_idx, year_idx, mfr_idx, type_idx, model_idx] = required_idx;

    // Everything outside the typed schema rides along for export.
    let extra_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !required_idx.contains(i))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut rows = Vec::new();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut duplicates = 0usize;

    for result in reader.records() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");

        let mut extras = BTreeMap::new();
        for (i, name) in &extra_cols {
            extras.insert(name.clone(), cell(*i).to_string());
        }

        let listing = Listing {
            price: coerce_f64(cell(price_idx)),
            odometer: coerce_f64(cell(odometer_idx)),
            model_year: coerce_year(cell(year_idx)),
            manufacturer: coerce_text(cell(mfr_idx)),
            body_type: coerce_text(cell(type_idx)),
            model: coerce_text(cell(model_idx)),
            extras,
        };

        // Dedup keys are the coerced cell values, so rows differing only in
        // raw numeric formatting ("2015.0" vs "2015") collapse to one
        // listing and the export round-trip stays stable.
        let key: Vec<String> = headers.iter().map(|h| listing.cell(h)).collect();
        if !seen.insert(key) {
            duplicates += 1;
            continue;
        }

        rows.push(listing);
    }

    if duplicates > 0 {
        log::debug!("dropped {duplicates} duplicate rows");
    }

    Ok(ListingTable { headers, rows })
}

fn normalize_header(h: &str) -> String {
    h.trim().to_ascii_lowercase().replace(' ', "_")
}

/// Tolerant numeric coercion: empty, unparsable, or non-finite becomes
/// absent. Mirrors the field-level "coerce to missing" the dashboard needs.
fn coerce_f64(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Years often arrive as floats ("2011.0") when the source had gaps.
/// A genuinely fractional year is rounded to the nearest integer.
fn coerce_year(s: &str) -> Option<i64> {
    coerce_f64(s).map(|v| v.round() as i64)
}

fn coerce_text(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    const SAMPLE: &str = "\
price,odometer,model_year,manufacturer,type,model,condition
1000,5000,2010,ford,sedan,focus,good
2000,3000,2015.0,bmw,suv,x5,
,1000,2015,ford,sedan,fiesta,fair
oops,not-a-number,,,,unknown,
";

    #[test]
    fn parses_and_coerces_numeric_columns() {
        let table = parse_reader(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0].price, Some(1000.0));
        assert_eq!(table.rows[1].model_year, Some(2015));
        // Absent price stays absent, row is kept.
        assert_eq!(table.rows[2].price, None);
        // Unparsable numerics coerce to absent, not zero.
        assert_eq!(table.rows[3].price, None);
        assert_eq!(table.rows[3].odometer, None);
        assert_eq!(table.rows[3].manufacturer, None);
        assert_eq!(table.rows[3].model.as_deref(), Some("unknown"));
    }

    #[test]
    fn preserves_passthrough_columns() {
        let table = parse_reader(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(
            table.headers,
            vec!["price", "odometer", "model_year", "manufacturer", "type", "model", "condition"]
        );
        assert_eq!(table.rows[0].extras.get("condition").map(String::as_str), Some("good"));
        assert_eq!(table.rows[1].extras.get("condition").map(String::as_str), Some(""));
    }

    #[test]
    fn normalizes_header_names() {
        let csv = "Price, Model Year ,odometer,manufacturer,type,model\n100,2011,5,ford,sedan,focus\n";
        let table = parse_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.headers[0], "price");
        assert_eq!(table.headers[1], "model_year");
        assert_eq!(table.rows[0].model_year, Some(2011));
    }

    #[test]
    fn drops_exact_duplicate_rows() {
        let csv = "price,odometer,model_year,manufacturer,type,model\n\
                   100,5,2011,ford,sedan,focus\n\
                   100,5,2011,ford,sedan,focus\n\
                   200,5,2011,ford,sedan,focus\n";
        let table = parse_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].price, Some(100.0));
        assert_eq!(table.rows[1].price, Some(200.0));
    }

    #[test]
    fn duplicates_are_detected_after_numeric_coercion() {
        // "2015.0" and "2015" coerce to the same listing; keeping both would
        // let a later export collapse them and change the row count.
        let csv = "price,odometer,model_year,manufacturer,type,model\n\
                   100,5,2015.0,ford,sedan,focus\n\
                   100,5,2015,ford,sedan,focus\n\
                   100.0,5,2015,ford,sedan,focus\n";
        let table = parse_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].model_year, Some(2015));
    }

    #[test]
    fn fractional_years_round_to_nearest() {
        let csv = "price,odometer,model_year,manufacturer,type,model\n\
                   100,5,2015.7,ford,sedan,focus\n\
                   100,5,2010.2,ford,sedan,focus\n";
        let table = parse_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.rows[0].model_year, Some(2016));
        assert_eq!(table.rows[1].model_year, Some(2010));
    }

    #[test]
    fn missing_required_column_fails() {
        let csv = "price,odometer,model_year,manufacturer,model\n100,5,2011,ford,focus\n";
        let err = parse_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("type")));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_file(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Open { .. }));
    }

    #[test]
    fn cache_returns_the_same_table_for_the_same_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let first = load_cached(file.path()).unwrap();
        let second = load_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 4);
    }
}
