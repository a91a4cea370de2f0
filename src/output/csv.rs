use std::error::Error;
use std::fmt;
use std::path::Path;

use crate::engine::Table;
use crate::DynError;

/// A CSV file the codec could not turn into a table (or write one out to).
#[derive(Debug, Clone)]
pub struct CsvCodecError(String);

impl CsvCodecError {
    pub fn new(s: &str) -> CsvCodecError {
        CsvCodecError(s.to_string())
    }
}

impl fmt::Display for CsvCodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for CsvCodecError {}

/// Read a table from a CSV file. The first non-comment record is the
/// header; a record whose first field starts with `#` is a comment and is
/// skipped. Every data record must have exactly as many fields as the
/// header (the table invariant is enforced here, at the boundary).
pub fn read_table(filename: &str) -> Result<Table, DynError> {
    if !Path::new(filename).exists() {
        return Err(Box::new(CsvCodecError::new(&format!(
            "File '{}' does not exist.",
            filename
        ))));
    }
    // flexible: comment lines are not required to match the header width
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(filename)?;

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.get(0).map_or(false, |f| f.starts_with('#')) {
            continue;
        }
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        match &header {
            None => header = Some(fields),
            Some(h) => {
                if fields.len() != h.len() {
                    return Err(Box::new(CsvCodecError::new(&format!(
                        "File '{}' has a row with {} fields where the header has {}.",
                        filename,
                        fields.len(),
                        h.len()
                    ))));
                }
                rows.push(fields);
            }
        }
    }

    match header {
        Some(header) => Ok(Table::new(header, rows)),
        None => Err(Box::new(CsvCodecError::new(&format!(
            "File '{}' contains no header row.",
            filename
        )))),
    }
}

/// Write a table as plain CSV: header record first, then the data records.
/// Comment lines skipped on read are not reconstructed.
pub fn write_table(table: &Table, filename: &str) -> Result<(), DynError> {
    let mut wr = csv::Writer::from_path(filename)?;
    wr.write_record(table.header())?;
    for row in table.rows() {
        wr.write_record(row)?;
    }
    wr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_fixture(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, content).unwrap();
        let name = path.to_str().unwrap().to_string();
        (dir, name)
    }

    #[test]
    fn reads_header_and_rows() {
        let (_dir, path) = write_fixture("id,val\n1,x\n2,y\n");
        let t = read_table(&path).unwrap();
        assert_eq!(t.header(), &["id", "val"]);
        assert_eq!(
            t.rows(),
            &[
                vec!["1".to_string(), "x".to_string()],
                vec!["2".to_string(), "y".to_string()],
            ]
        );
    }

    #[test]
    fn skips_comment_records_anywhere() {
        let (_dir, path) = write_fixture("# leading comment\nid,val\n# another\n1,x\n");
        let t = read_table(&path).unwrap();
        assert_eq!(t.header(), &["id", "val"]);
        assert_eq!(t.rows().len(), 1);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let (_dir, path) = write_fixture("id,txt\n1,\"a, b\"\n");
        let t = read_table(&path).unwrap();
        assert_eq!(t.rows()[0][1], "a, b");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_table("/nonexistent/nope.csv").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn ragged_row_is_an_error() {
        let (_dir, path) = write_fixture("a,b\n1\n");
        assert!(read_table(&path).is_err());
    }

    #[test]
    fn file_with_only_comments_has_no_header() {
        let (_dir, path) = write_fixture("# just\n# comments\n");
        let err = read_table(&path).unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["id".to_string(), "val".to_string()],
            vec![vec!["1".to_string(), "x, y".to_string()]],
        );
        write_table(&table, path.to_str().unwrap()).unwrap();
        let back = read_table(path.to_str().unwrap()).unwrap();
        assert_eq!(back, table);
    }
}
