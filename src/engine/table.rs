/// A fully materialized in-memory relation: an ordered header plus ordered
/// rows of untyped text cells. Every row has exactly as many cells as the
/// header has columns; the CSV codec enforces this on the way in, and every
/// operation here preserves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Table {
        debug_assert!(rows.iter().all(|r| r.len() == header.len()));
        Table { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a column in the header. Duplicate names resolve to the
    /// first occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Inner equi-join of two tables on one shared column, as a nested loop
/// over both row sets: O(|left| * |right|), the dominant algorithmic cost
/// in the engine. The output header is the left header followed by the
/// right header minus the join column; a left row matching k right rows
/// yields k output rows, in the right table's row order.
///
/// Both tables must contain the join column; callers validate that first.
pub fn join(left: &Table, right: &Table, using: &str) -> Table {
    let lix = left.column_index(using).unwrap();
    let rix = right.column_index(using).unwrap();
    let keep: Vec<usize> = right
        .header()
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != using)
        .map(|(i, _)| i)
        .collect();

    let mut header = left.header().to_vec();
    header.extend(keep.iter().map(|&i| right.header()[i].clone()));

    let mut rows = Vec::new();
    for lrow in left.rows() {
        let key = &lrow[lix];
        for rrow in right.rows() {
            if &rrow[rix] == key {
                let mut row = lrow.clone();
                row.extend(keep.iter().map(|&i| rrow[i].clone()));
                rows.push(row);
            }
        }
    }
    Table::new(header, rows)
}
