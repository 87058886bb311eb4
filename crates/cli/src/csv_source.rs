//! CSV adapter for the dataset abstraction
//!
//! The first record is the header. A column is numeric when every present
//! cell parses as a float; empty cells and common NA markers are missing.

use std::io::Read;
use std::path::Path;

use watchdog_lib::{ColumnData, DatasetError, Table};

/// Cell values treated as missing
const NA_VALUES: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    NA_VALUES.iter().any(|na| cell.eq_ignore_ascii_case(na))
}

/// Load a CSV file into a table
pub fn load_csv(path: &Path) -> Result<Table, DatasetError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DatasetError::Read(format!("{}: {}", path.display(), e)))?;
    read_csv(file)
}

/// Read CSV data into a table
pub fn read_csv<R: Read>(reader: R) -> Result<Table, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DatasetError::Read(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| DatasetError::Read(e.to_string()))?;
        for (column, cell) in cells.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }

    let mut table = Table::new();
    for (name, column) in headers.into_iter().zip(cells) {
        table.push_column(name, infer_column(column))?;
    }
    table.validate()?;
    Ok(table)
}

fn infer_column(cells: Vec<String>) -> ColumnData {
    let numeric: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(None)
            } else {
                cell.trim().parse::<f64>().ok().map(Some)
            }
        })
        .collect();

    match numeric {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(
            cells
                .into_iter()
                .map(|cell| if is_missing(&cell) { None } else { Some(cell) })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use watchdog_lib::Dataset;

    #[test]
    fn test_type_inference() {
        let data = "id,price,label\n1,2.5,a\n2,,b\n3,NaN,\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["id", "price", "label"]);
        assert!(table.is_numeric("id"));
        assert!(table.is_numeric("price"));
        assert!(!table.is_numeric("label"));
        assert_eq!(
            table.numeric_values("price"),
            Some(&[Some(2.5), None, None][..])
        );
        assert_eq!(
            table.column("label").unwrap().data,
            ColumnData::Text(vec![Some("a".to_string()), Some("b".to_string()), None])
        );
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let table = read_csv("a,b\n1,\n2,\n".as_bytes()).unwrap();
        assert!(table.is_numeric("b"));
        assert_eq!(table.numeric_values("b"), Some(&[None, None][..]));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = read_csv("a,a\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateColumn(_)));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = read_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Read(_)));
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "A,B").unwrap();
        writeln!(file, "1,4").unwrap();
        writeln!(file, "2,5").unwrap();

        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.numeric_values("B"), Some(&[Some(4.0), Some(5.0)][..]));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Read(_)));
    }
}
