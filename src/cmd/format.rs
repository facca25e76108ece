/*!
format.rs

Output rendering for resource commands (human tables + raw JSON).

Shapes:
  - MultiColumn   : one header row of attribute names, one row per instance
  - PropertyValue : two columns (Property | Value), one row per attribute

Attribute projection:
  - `["all"]` (or an empty selection) keeps every attribute
  - otherwise only the named attributes, in the given order

Style decisions follow the environment: NO_COLOR disables ANSI, COLUMNS
(clamped 40..=220) bounds the table width. JSON output never carries ANSI.

Public API Summary:
  - StyleOptions::detect() -> StyleOptions
  - render(&Rendered, &RenderOptions, &StyleOptions) -> Result<String>
  - table(headers, rows, TableOpts, &StyleOptions) -> String
  - truncate_ellipsis(s, max_chars) -> String
*/

use std::borrow::Cow;
use std::io::IsTerminal;

use anyhow::Result;
use serde_json::{Map, Value};

/* -------------------------------------------------------------------------- */
/* Style                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        if !std::io::stdout().is_terminal() {
            return Self::plain();
        }
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            term_width: width,
        }
    }

    /// No colour, wide table. Used by tests and when output is piped.
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 220,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Accent,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Accent => "38;5;213",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Rendering                                                                  */
/* -------------------------------------------------------------------------- */

/// Table shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    MultiColumn,
    PropertyValue,
}

/// What is being rendered: one document or a list of documents.
#[derive(Debug, Clone)]
pub enum Rendered {
    One(Value),
    Many(Vec<Value>),
}

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub shape: TableShape,
    pub attributes: &'a [String],
    pub widths: Option<&'a [usize]>,
    pub display_order: &'a [&'a str],
    pub json: bool,
}

pub fn render(subject: &Rendered, opts: &RenderOptions<'_>, style: &StyleOptions) -> Result<String> {
    if opts.json {
        let projected = match subject {
            Rendered::One(doc) => project(doc, opts.attributes),
            Rendered::Many(docs) => {
                Value::Array(docs.iter().map(|d| project(d, opts.attributes)).collect())
            }
        };
        return Ok(serde_json::to_string_pretty(&projected)?);
    }

    let docs: Vec<&Value> = match subject {
        Rendered::One(doc) => vec![doc],
        Rendered::Many(docs) => docs.iter().collect(),
    };

    Ok(match opts.shape {
        TableShape::MultiColumn => multi_column(&docs, opts, style),
        TableShape::PropertyValue => {
            let blocks: Vec<String> = docs
                .iter()
                .map(|d| property_value(d, opts, style))
                .collect();
            blocks.join("\n\n")
        }
    })
}

fn selects_all(attributes: &[String]) -> bool {
    attributes.is_empty() || attributes.iter().any(|a| a == "all")
}

fn project(doc: &Value, attributes: &[String]) -> Value {
    if selects_all(attributes) {
        return doc.clone();
    }
    let Value::Object(map) = doc else {
        return doc.clone();
    };
    let mut out = Map::new();
    for attr in attributes {
        if let Some(v) = map.get(attr) {
            out.insert(attr.clone(), v.clone());
        }
    }
    Value::Object(out)
}

/// Attribute names to show: the explicit selection, or every key seen
/// (preferred order first, the rest alphabetically).
fn resolve_columns(docs: &[&Value], attributes: &[String], display_order: &[&str]) -> Vec<String> {
    if !selects_all(attributes) {
        return attributes.to_vec();
    }
    let mut seen: Vec<String> = docs
        .iter()
        .filter_map(|d| d.as_object())
        .flat_map(|m| m.keys().cloned())
        .collect();
    seen.sort();
    seen.dedup();

    let mut columns: Vec<String> = display_order
        .iter()
        .filter(|a| seen.iter().any(|s| s == *a))
        .map(|a| a.to_string())
        .collect();
    columns.extend(seen.into_iter().filter(|s| !display_order.contains(&s.as_str())));
    columns
}

fn cell(doc: &Value, attr: &str) -> String {
    match doc.get(attr) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.replace('\n', " "),
        Some(other) => other.to_string(),
    }
}

fn multi_column(docs: &[&Value], opts: &RenderOptions<'_>, style: &StyleOptions) -> String {
    let columns = resolve_columns(docs, opts.attributes, opts.display_order);
    let rows: Vec<Vec<String>> = docs
        .iter()
        .map(|d| columns.iter().map(|c| cell(d, c)).collect())
        .collect();
    let headers: Vec<&str> = columns.iter().map(String::as_str).collect();

    table(
        &headers,
        &rows,
        TableOpts {
            max_width: style.term_width,
            widths: opts.widths.map(<[usize]>::to_vec),
            ..TableOpts::default()
        },
        style,
    )
}

fn property_value(doc: &Value, opts: &RenderOptions<'_>, style: &StyleOptions) -> String {
    let attributes = resolve_columns(&[doc], opts.attributes, opts.display_order);
    let rows: Vec<Vec<String>> = attributes
        .iter()
        .map(|a| vec![a.clone(), cell(doc, a)])
        .collect();

    table(
        &["Property", "Value"],
        &rows,
        TableOpts {
            max_width: style.term_width,
            ..TableOpts::default()
        },
        style,
    )
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                             */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct TableOpts {
    pub max_width: usize,
    pub min_col_width: usize,
    /// Fixed widths per column, in column order. Columns past the end of the
    /// list are sized from their content.
    pub widths: Option<Vec<usize>>,
}

impl Default for TableOpts {
    fn default() -> Self {
        Self {
            max_width: 0, // 0 -> auto style.term_width
            min_col_width: 2,
            widths: None,
        }
    }
}

pub fn table(headers: &[&str], rows: &[Vec<String>], opts: TableOpts, style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();
    let width_limit = if opts.max_width == 0 {
        style.term_width
    } else {
        opts.max_width.min(style.term_width)
    };

    // Compute max content width per column
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let fixed = opts.widths.as_deref().unwrap_or(&[]);
    for (i, w) in fixed.iter().enumerate().take(col_count) {
        widths[i] = (*w).max(1);
    }

    // Shrink the widest unfixed columns until the table fits
    let total_raw: usize = widths.iter().sum::<usize>() + (col_count - 1) * 2;
    if total_raw > width_limit {
        let mut overflow = total_raw - width_limit;
        let mut ordered: Vec<(usize, usize)> = widths
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i >= fixed.len())
            .collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (idx, _) in ordered {
            if overflow == 0 {
                break;
            }
            let target = widths[idx];
            if target > opts.min_col_width {
                let shrink = (target - opts.min_col_width).min(overflow);
                widths[idx] -= shrink;
                overflow -= shrink;
            }
        }
    }

    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 2);

    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| color(Role::Accent, pad_or_truncate(h, widths[i]), style))
        .collect();
    lines.push(header_cells.join("  ").trim_end().to_string());

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(color(Role::Dim, sep.join("  "), style));

    for row in rows {
        let cells: Vec<String> = (0..col_count)
            .map(|c| {
                let raw = row.get(c).map(String::as_str).unwrap_or("");
                pad_or_truncate(raw, widths[c])
            })
            .collect();
        lines.push(cells.join("  ").trim_end().to_string());
    }

    lines.join("\n")
}

fn pad_or_truncate(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len == width {
        return s.to_string();
    }
    if len < width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    truncate_ellipsis(&strip_ansi(s), width)
}

/* -------------------------------------------------------------------------- */
/* Text Helpers                                                                */
/* -------------------------------------------------------------------------- */

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 1 {
        return "…".into();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    // Scans for ESC '[' ... final letter; no regex.
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                       */
/* -------------------------------------------------------------------------- */
