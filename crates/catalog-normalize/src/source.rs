//! Record sources: decode CSV text and JSON arrays into raw records.
//!
//! Each record decodes independently. A bad record surfaces as an `Err` item
//! so the caller can skip it and keep going.

use std::io;

use crate::error::NormalizeError;
use crate::types::{FlatRow, StructuredRecord};

/// Reads CSV with a header row, yielding one [`FlatRow`] per data row.
///
/// Rows shorter than the header simply lack the trailing columns; extra cells
/// beyond the header are ignored.
///
/// # Errors
///
/// Returns [`NormalizeError::Csv`] if the header row cannot be read. Per-row
/// decode failures are yielded by the iterator instead.
pub fn read_raw_rows<R: io::Read>(
    reader: R,
) -> Result<impl Iterator<Item = Result<FlatRow, NormalizeError>>, NormalizeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    Ok(rdr.into_records().map(move |record| -> Result<FlatRow, NormalizeError> {
        let record = record?;
        Ok(headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect())
    }))
}

/// Parses a JSON array of raw records, decoding each element separately.
///
/// # Errors
///
/// Returns [`NormalizeError::Deserialize`] if `text` is not a JSON array.
/// Elements that fail to decode are returned as `Err` entries in the vector.
pub fn read_structured_records(
    text: &str,
) -> Result<Vec<Result<StructuredRecord, NormalizeError>>, NormalizeError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|source| NormalizeError::Deserialize {
            context: "record array".to_string(),
            source,
        })?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|source| NormalizeError::Deserialize {
                context: format!("record {index}"),
                source,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_raw_rows_maps_header_to_cells() {
        let csv = "title,final_price,image\nMug,8.50,\"a.jpg,b.jpg\"\n";
        let rows: Vec<FlatRow> = read_raw_rows(csv.as_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "Mug");
        assert_eq!(rows[0]["final_price"], "8.50");
        assert_eq!(rows[0]["image"], "a.jpg,b.jpg");
    }

    #[test]
    fn read_raw_rows_keeps_json_cells_verbatim() {
        let csv = "title,variations\nShirt,\"[{\"\"name\"\":\"\"Color\"\",\"\"variations\"\":[\"\"Red\"\"]}]\"\n";
        let rows: Vec<FlatRow> = read_raw_rows(csv.as_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            rows[0]["variations"],
            r#"[{"name":"Color","variations":["Red"]}]"#
        );
    }

    #[test]
    fn read_raw_rows_tolerates_short_rows() {
        let csv = "title,final_price,rating\nMug\nLamp,12,4.5\n";
        let rows: Vec<FlatRow> = read_raw_rows(csv.as_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title").map(String::as_str), Some("Mug"));
        assert!(rows[0].get("final_price").is_none());
        assert_eq!(rows[1]["rating"], "4.5");
    }

    #[test]
    fn read_raw_rows_empty_input_yields_nothing() {
        let rows: Vec<_> = read_raw_rows("".as_bytes()).unwrap().collect();
        assert!(rows.is_empty());
    }

    #[test]
    fn read_structured_records_isolates_bad_elements() {
        let text = r#"[{"title":"Good"},{"title":42},{"final_price":3}]"#;
        let records = read_structured_records(text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().title, "Good");
        assert!(
            matches!(&records[1], Err(NormalizeError::Deserialize { context, .. }) if context == "record 1")
        );
        assert!(records[2].is_ok());
    }

    #[test]
    fn read_structured_records_keeps_record_with_several_description_keys() {
        let text = r#"[{"title":"Mug","description":"short","Product Desciption":"long"}]"#;
        let records = read_structured_records(text).unwrap();
        let record = records[0].as_ref().expect("record should decode");
        assert_eq!(record.description(), "long");
    }

    #[test]
    fn read_structured_records_rejects_non_array() {
        let err = read_structured_records(r#"{"title":"Solo"}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::Deserialize { .. }));
    }
}
