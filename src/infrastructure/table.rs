//! Mined unit tables: tab-separated, header `unit tag count level`.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::UnitRow;
use crate::infrastructure::{InfraError, InfraResult};

pub const TABLE_COLUMNS: [&str; 4] = ["unit", "tag", "count", "level"];

/// Tabs and line breaks inside a field would split the row on reload.
fn sanitize(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\n', '\r']) {
        Cow::Owned(field.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(field)
    }
}

pub fn render_table(rows: &[UnitRow]) -> String {
    let mut out = TABLE_COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            sanitize(&row.unit),
            sanitize(&row.tag),
            row.count,
            row.level
        ));
    }
    out
}

#[instrument(level = "debug", skip(rows), fields(count = rows.len()))]
pub fn write_table(path: &Path, rows: &[UnitRow]) -> InfraResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create directory {}", parent.display()), e))?;
    }
    fs::write(path, render_table(rows))
        .map_err(|e| InfraError::io(format!("write table {}", path.display()), e))?;
    debug!(path = %path.display(), "table written");
    Ok(())
}

#[instrument(level = "debug")]
pub fn read_table(path: &Path) -> InfraResult<Vec<UnitRow>> {
    let content = fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read table {}", path.display()), e))?;
    parse_table(path, &content)
}

pub fn parse_table(path: &Path, content: &str) -> InfraResult<Vec<UnitRow>> {
    let invalid = |line: usize, reason: String| InfraError::InvalidTable {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = content.lines().enumerate();
    match lines.next() {
        Some((_, header)) if header.split('\t').eq(TABLE_COLUMNS) => {}
        Some((_, header)) => return Err(invalid(1, format!("unexpected header {header:?}"))),
        None => return Err(invalid(1, "missing header".to_string())),
    }

    let mut rows = Vec::new();
    for (i, line) in lines {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let &[unit, tag, count, level] = fields.as_slice() else {
            return Err(invalid(i + 1, format!("expected 4 fields, found {}", fields.len())));
        };
        let count = count
            .parse()
            .map_err(|e| invalid(i + 1, format!("count {count:?}: {e}")))?;
        let level = level
            .parse()
            .map_err(|e| invalid(i + 1, format!("level {level:?}: {e}")))?;
        rows.push(UnitRow::new(unit, tag, count, level));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_rows_when_rendering_then_writes_header_and_one_line_per_row() {
        let rows = vec![
            UnitRow::new("mL", "NN", 120, 1),
            UnitRow::new("( mol )", "-LRB- NN -RRB-", 101, 3),
        ];

        let text = render_table(&rows);

        assert_eq!(
            text,
            "unit\ttag\tcount\tlevel\nmL\tNN\t120\t1\n( mol )\t-LRB- NN -RRB-\t101\t3\n"
        );
        assert_eq!(parse_table(Path::new("u.tsv"), &text).unwrap(), rows);
    }

    #[test]
    fn given_tab_in_unit_when_rendering_then_replaces_it() {
        let text = render_table(&[UnitRow::new("a\tb", "NN NN", 3, 2)]);
        assert!(text.ends_with("a b\tNN NN\t3\t2\n"));
    }

    #[test]
    fn given_wrong_header_when_parsing_then_errors() {
        let result = parse_table(Path::new("u.tsv"), "unit\tcount\nmL\t3\n");
        assert!(matches!(result, Err(InfraError::InvalidTable { line: 1, .. })));
    }

    #[test]
    fn given_bad_count_when_parsing_then_names_line() {
        let result = parse_table(Path::new("u.tsv"), "unit\ttag\tcount\tlevel\nmL\tNN\tmany\t1\n");
        assert!(matches!(result, Err(InfraError::InvalidTable { line: 2, .. })));
    }

    #[test]
    fn given_header_only_when_parsing_then_no_rows() {
        let rows = parse_table(Path::new("u.tsv"), "unit\ttag\tcount\tlevel\n").unwrap();
        assert!(rows.is_empty());
    }
}
