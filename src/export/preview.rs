use super::table::Table;

pub const PREVIEW_ROWS: usize = 5;
const MAX_CELL_CHARS: usize = 40;

/// Fixed-width rendering of the header and the first `limit` rows.
pub fn format_preview(table: &Table, limit: usize) -> String {
    if table.columns.is_empty() {
        return "(empty table)\n".to_string();
    }

    let header: Vec<String> = table.columns.iter().map(|c| truncate(c)).collect();
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(|c| truncate(c)).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    push_line(&mut output, &header, &widths);
    for row in &body {
        push_line(&mut output, row, &widths);
    }
    if table.rows.len() > limit {
        output.push_str(&format!("... ({} more rows)\n", table.rows.len() - limit));
    }
    output
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(line.trim_end());
    output.push('\n');
}

fn truncate(cell: &str) -> String {
    let single_line: String = cell
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if single_line.chars().count() <= MAX_CELL_CHARS {
        return single_line;
    }
    let head: String = single_line.chars().take(MAX_CELL_CHARS - 3).collect();
    format!("{head}...")
}
