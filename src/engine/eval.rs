use log::warn;

use crate::parser::{CompareOp, Condition};

/// Filter rows against a condition tree.
///
/// A comparison looks up the column's position in the header and compares
/// each row's cell against the value's string rendering. The ordering
/// operators use lexicographic string order, never numeric order: all cell
/// data is untyped text, so `"10" < "9"`. A conjunction narrows
/// sequentially, left filter first, then the right filter over the already
/// narrowed rows.
///
/// A comparison naming a column that is not in the header leaves the rows
/// unfiltered (logged, not an error).
pub fn filter_rows(rows: &[Vec<String>], header: &[String], condition: &Condition) -> Vec<Vec<String>> {
    match condition {
        Condition::Compare { column, op, value } => {
            let ix = match header.iter().position(|h| h == column) {
                Some(ix) => ix,
                None => {
                    warn!("condition references unknown column '{}'", column);
                    return rows.to_vec();
                }
            };
            let value = value.to_text();
            rows.iter()
                .filter(|row| compare(&row[ix], *op, &value))
                .cloned()
                .collect()
        }
        Condition::And(left, right) => {
            let narrowed = filter_rows(rows, header, left);
            filter_rows(&narrowed, header, right)
        }
    }
}

fn compare(cell: &str, op: CompareOp, value: &str) -> bool {
    match op {
        CompareOp::Eq => cell == value,
        CompareOp::Ne => cell != value,
        CompareOp::Lt => cell < value,
        CompareOp::Gt => cell > value,
        CompareOp::Le => cell <= value,
        CompareOp::Ge => cell >= value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CompareValue;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn cmp(column: &str, op: CompareOp, value: &str) -> Condition {
        Condition::Compare {
            column: column.to_string(),
            op,
            value: CompareValue::Text(value.to_string()),
        }
    }

    #[test]
    fn equality_compares_cell_text() {
        let h = header(&["id", "val"]);
        let r = rows(&[&["1", "x"], &["2", "y"]]);
        let out = filter_rows(&r, &h, &cmp("id", CompareOp::Eq, "1"));
        assert_eq!(out, rows(&[&["1", "x"]]));
    }

    #[test]
    fn number_values_compare_through_their_text_rendering() {
        let h = header(&["n"]);
        let r = rows(&[&["22"], &["23"]]);
        let cond = Condition::Compare {
            column: "n".to_string(),
            op: CompareOp::Eq,
            value: CompareValue::Number(22),
        };
        assert_eq!(filter_rows(&r, &h, &cond), rows(&[&["22"]]));
    }

    #[test]
    fn ordering_is_lexicographic_not_numeric() {
        // "10" sorts before "9" as text, so col > "9" must exclude it
        let h = header(&["col"]);
        let r = rows(&[&["9"], &["10"], &["91"]]);
        let out = filter_rows(&r, &h, &cmp("col", CompareOp::Gt, "9"));
        assert_eq!(out, rows(&[&["91"]]));
    }

    #[test]
    fn conjunction_narrows_left_then_right() {
        let h = header(&["a", "b"]);
        let r = rows(&[&["1", "x"], &["1", "y"], &["2", "x"]]);
        let cond = Condition::And(
            Box::new(cmp("a", CompareOp::Eq, "1")),
            Box::new(cmp("b", CompareOp::Eq, "x")),
        );
        assert_eq!(filter_rows(&r, &h, &cond), rows(&[&["1", "x"]]));
    }

    #[test]
    fn unknown_column_leaves_rows_unfiltered() {
        let h = header(&["a"]);
        let r = rows(&[&["1"], &["2"]]);
        let out = filter_rows(&r, &h, &cmp("nope", CompareOp::Eq, "1"));
        assert_eq!(out, r);
    }

    #[test]
    fn not_equals_and_bounds() {
        let h = header(&["v"]);
        let r = rows(&[&["a"], &["b"], &["c"]]);
        assert_eq!(
            filter_rows(&r, &h, &cmp("v", CompareOp::Ne, "b")),
            rows(&[&["a"], &["c"]])
        );
        assert_eq!(
            filter_rows(&r, &h, &cmp("v", CompareOp::Le, "b")),
            rows(&[&["a"], &["b"]])
        );
        assert_eq!(
            filter_rows(&r, &h, &cmp("v", CompareOp::Ge, "b")),
            rows(&[&["b"], &["c"]])
        );
    }
}
