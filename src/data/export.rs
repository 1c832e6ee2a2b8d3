use anyhow::{Context, Result};

use super::model::ListingTable;

/// Serialize the rows at `indices` as CSV bytes with the table's header row
/// (same column names and order as the source file). Absent values become
/// empty fields, so re-parsing with the loader's coercion reproduces the
/// subset value-for-value.
pub fn to_csv(table: &ListingTable, indices: &[usize]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);

        writer
            .write_record(&table.headers)
            .context("writing CSV header")?;

        for &i in indices {
            let row = &table.rows[i];
            let record: Vec<String> = table.headers.iter().map(|h| row.cell(h)).collect();
            writer
                .write_record(&record)
                .with_context(|| format!("writing CSV row {i}"))?;
        }

        writer.flush().context("flushing CSV buffer")?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterCriteria};
    use crate::data::loader::parse_reader;
    use crate::data::model::ListingTable;
    use std::io::Cursor;

    const SOURCE: &str = "\
price,odometer,model_year,manufacturer,type,model,condition
1000,5000,2010,ford,sedan,focus,good
2000,3000,2015,bmw,suv,x5,fair
,1000,2015,ford,sedan,fiesta,
";

    fn subset_of(table: &ListingTable, indices: &[usize]) -> ListingTable {
        ListingTable {
            headers: table.headers.clone(),
            rows: indices.iter().map(|&i| table.rows[i].clone()).collect(),
        }
    }

    #[test]
    fn export_keeps_source_header_order() {
        let table = parse_reader(Cursor::new(SOURCE)).unwrap();
        let bytes = to_csv(&table, &[0]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("price,odometer,model_year,manufacturer,type,model,condition\n"));
    }

    #[test]
    fn round_trip_of_a_filtered_subset_is_value_equal() {
        let table = parse_reader(Cursor::new(SOURCE)).unwrap();
        let criteria = FilterCriteria {
            year: Some((2015, 2015)),
            ..Default::default()
        };
        let indices = filtered_indices(&table, &criteria);
        assert_eq!(indices, vec![1, 2]);

        let bytes = to_csv(&table, &indices).unwrap();
        let reparsed = parse_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(reparsed, subset_of(&table, &indices));
    }

    #[test]
    fn round_trip_preserves_absent_values_as_absent() {
        let table = parse_reader(Cursor::new(SOURCE)).unwrap();
        let bytes = to_csv(&table, &[2]).unwrap();
        let reparsed = parse_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(reparsed.rows[0].price, None);
        assert_eq!(reparsed.rows[0].odometer, Some(1000.0));
        assert_eq!(reparsed.rows[0].extras.get("condition").map(String::as_str), Some(""));
    }

    #[test]
    fn round_trip_unaffected_by_source_numeric_formatting() {
        // Two source rows that coerce to the same listing must not survive
        // the load as two value-equal rows: export would emit two identical
        // lines and re-parsing would drop one, changing the subset.
        let source = "\
price,odometer,model_year,manufacturer,type,model,condition
2000,3000,2015.0,bmw,suv,x5,fair
2000,3000,2015,bmw,suv,x5,fair
";
        let table = parse_reader(Cursor::new(source)).unwrap();
        assert_eq!(table.len(), 1);

        let indices: Vec<usize> = (0..table.len()).collect();
        let bytes = to_csv(&table, &indices).unwrap();
        let reparsed = parse_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(reparsed, subset_of(&table, &indices));
    }

    #[test]
    fn empty_subset_exports_just_the_header() {
        let table = parse_reader(Cursor::new(SOURCE)).unwrap();
        let bytes = to_csv(&table, &[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
