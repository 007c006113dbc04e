use serde_json::Value;

use terminal_size::{terminal_size, Width};

/// What a command produced, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A list of records; rendered as a table unless JSON is forced.
    Rows(Value),
    /// A single record.
    Record(Value),
    Message(String),
}

pub fn render(out: &Output, force_json: bool) -> String {
    match out {
        Output::Message(m) => m.clone(),
        Output::Record(v) => pretty(v),
        Output::Rows(v) => {
            if force_json {
                return pretty(v);
            }
            render_table(v, terminal_width()).unwrap_or_else(|| pretty(v))
        }
    }
}

fn pretty(v: &Value) -> String { serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()) }

/// ASCII table for an array of objects, one column per key (union across rows, sorted).
/// None for anything that is not a non-empty array of objects.
pub fn render_table(val: &Value, max_width: usize) -> Option<String> {
    let arr = val.as_array()?;
    if arr.is_empty() {
        return None;
    }
    let mut cols: Vec<String> = Vec::new();
    for el in arr {
        let map = el.as_object()?;
        for k in map.keys() {
            if !cols.contains(k) {
                cols.push(k.clone());
            }
        }
    }
    cols.sort();
    let rows: Vec<Vec<String>> = arr
        .iter()
        .filter_map(|el| el.as_object())
        .map(|map| cols.iter().map(|c| map.get(c).map(to_cell_string).unwrap_or_default()).collect())
        .collect();

    // cap any single column so one long description cannot swallow the terminal
    let cap = (max_width / cols.len().max(1)).max(8);
    let mut widths: Vec<usize> = cols.iter().map(|c| c.chars().count().min(cap)).collect();
    for r in &rows {
        for (i, cell) in r.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count().min(cap));
        }
    }

    let sep = build_separator(&widths);
    let mut lines = vec![sep.clone(), build_row(&cols, &widths, false), sep.clone()];
    for r in &rows {
        lines.push(build_row(r, &widths, true));
    }
    lines.push(sep);
    lines.push(format!("rows: {}", rows.len()));
    Some(lines.join("\n"))
}

fn to_cell_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize], align_numbers: bool) -> String {
    let mut s = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let text = truncate(cell, *w);
        let pad = " ".repeat(w.saturating_sub(text.chars().count()));
        s.push(' ');
        if align_numbers && is_numeric_like(cell) {
            s.push_str(&pad);
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&pad);
        }
        s.push_str(" |");
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".to_string();
    }
    s.chars().take(max - 1).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    let st = s.trim();
    !st.is_empty() && st.chars().any(|c| c.is_ascii_digit()) && st.chars().all(|c| c.is_ascii_digit() || ".-+".contains(c))
}

fn terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) if w > 4 => (w - 4) as usize,
        _ => 80,
    }
}
