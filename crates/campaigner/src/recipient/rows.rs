use std::collections::HashMap;
use std::io::Read;

use log::debug;

use crate::error::TransformError;

/// One raw input row, keyed by column name.
pub type Row = HashMap<String, String>;

/// Parsed tabular input: the header row plus the data rows, in input order.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads row-oriented CSV input with a header row defining column names.
///
/// Short records are padded with empty strings; extra fields beyond the
/// header width are dropped. Header order is preserved for auto-mapping.
pub fn read_rows<R: Read>(input: R) -> Result<RowSet, TransformError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(TransformError::MissingHeaderRow);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = record.get(i).unwrap_or_default();
            row.insert(header.clone(), value.to_string());
        }
        rows.push(row);
    }

    debug!("read {} rows with {} columns", rows.len(), headers.len());
    Ok(RowSet { headers, rows })
}

/// Reads rows from an in-memory string, mostly for tests and previews.
pub fn read_rows_from_str(content: &str) -> Result<RowSet, TransformError> {
    read_rows(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_basic() {
        let set = read_rows_from_str("phone,name\n+411,Ada\n+412,Grace\n").unwrap();
        assert_eq!(set.headers, vec!["phone", "name"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rows[1]["name"], "Grace");
    }

    #[test]
    fn test_short_records_padded() {
        let set = read_rows_from_str("phone,name,code\n+411,Ada\n").unwrap();
        assert_eq!(set.rows[0]["code"], "");
    }

    #[test]
    fn test_values_trimmed() {
        let set = read_rows_from_str("phone , name\n +411 , Ada \n").unwrap();
        assert_eq!(set.headers, vec!["phone", "name"]);
        assert_eq!(set.rows[0]["phone"], "+411");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            read_rows_from_str(""),
            Err(TransformError::MissingHeaderRow)
        ));
    }
}
