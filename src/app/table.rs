/// Renders a plain-text table with `|` separated, padded columns.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = display_width(cell);
            match widths.get_mut(i) {
                Some(current) if *current < w => *current = w,
                Some(_) => {}
                None => widths.push(w),
            }
        }
    }

    let mut out = String::new();
    out.push_str(&render_row(headers, &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        out.push('\n');
        out.push_str(&render_row(row, &widths));
    }
    out
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map(|c| flatten(c)).unwrap_or_default();
            let pad = width.saturating_sub(display_width(&cell));
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

// 換行會破壞表格
fn flatten(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ")
}

fn display_width(cell: &str) -> usize {
    flatten(cell).chars().count()
}
