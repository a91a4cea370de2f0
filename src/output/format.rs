/// Render a table as text: header cells joined with `" | "`, a dash rule
/// as wide as the header line, then one line per row, cells joined the
/// same way.
pub fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let header_line = header.join(" | ");
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.clone());
    lines.push("-".repeat(header_line.chars().count()));
    for row in rows {
        lines.push(row.join(" | "));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn renders_header_rule_and_rows() {
        let out = render_table(
            &strings(&["id", "val"]),
            &[strings(&["1", "x"]), strings(&["2", "y"])],
        );
        assert_eq!(out, "id | val\n--------\n1 | x\n2 | y");
    }

    #[test]
    fn empty_table_is_header_and_rule_only() {
        let out = render_table(&strings(&["only"]), &[]);
        assert_eq!(out, "only\n----");
    }

    #[test]
    fn rule_width_counts_characters_not_bytes() {
        let out = render_table(&strings(&["Tempé"]), &[]);
        let mut lines = out.lines();
        let header = lines.next().unwrap();
        let rule = lines.next().unwrap();
        assert_eq!(header.chars().count(), rule.chars().count());
    }
}
