//! CSV building for spreadsheet exports.

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
///
/// Values that a spreadsheet would evaluate as a formula (leading `=`, `+`,
/// `-`, `@`) are prefixed with a single quote.
pub fn csv_escape(value: &str) -> String {
    let value = if value.starts_with(['=', '+', '-', '@']) {
        format!("'{value}")
    } else {
        value.to_string()
    };

    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

/// Build a CSV document with a header row. Lines end with `\r\n`.
pub fn build_csv<R, F>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<str>,
{
    let mut out = String::new();
    push_line(&mut out, header.iter().copied());
    for row in rows {
        push_line(&mut out, row.iter().map(|f| f.as_ref()));
    }
    out
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(csv_escape).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}
