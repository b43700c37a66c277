//! Two-column tables with a width-capped value column.
//!
//! Values wider than [`MAX_VALUE_COLUMN_WIDTH`] wrap onto continuation lines of the
//! same row. Rendering is forced into non-TTY mode so output never depends on the
//! calling terminal.

use comfy_table::{presets, ColumnConstraint, ContentArrangement, Table, Width};

/// Display columns available to the value (second) column.
pub const MAX_VALUE_COLUMN_WIDTH: u16 = 60;

/// Render `rows` under `headers` as an ASCII table. Output ends with a newline.
pub fn render_table<K, V>(headers: (&str, &str), rows: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut t = Table::new();
    t.load_preset(presets::ASCII_FULL)
        .force_no_tty()
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec![headers.0, headers.1]);
    for (k, v) in rows {
        t.add_row(vec![k.as_ref(), v.as_ref()]);
    }
    if let Some(col) = t.column_mut(1) {
        col.set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(MAX_VALUE_COLUMN_WIDTH)));
    }
    let mut out = t.to_string();
    out.push('\n');
    out
}
