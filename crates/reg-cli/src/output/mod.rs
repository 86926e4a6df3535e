use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let rendered = match serde_json::to_value(value)? {
        Value::Array(items) => render_rows(&items),
        Value::Object(map) => render_page(&map).unwrap_or_else(|| render_record(map)),
        scalar => single_column("value", std::slice::from_ref(&scalar)),
    };
    Ok(rendered)
}

/// A single record renders as sorted key/value pairs.
fn render_record(map: Map<String, Value>) -> String {
    let mut rows: Vec<Vec<String>> = map
        .into_iter()
        .map(|(key, value)| vec![key, value_to_cell(&value)])
        .collect();
    rows.sort();
    table::render_entity_table(&["key", "value"], &rows, table_options())
}

/// Paged listings render their items plus a one-line position footer.
fn render_page(map: &Map<String, Value>) -> Option<String> {
    let items = map.get("items")?.as_array()?;
    let pagination = map.get("pagination")?;
    let field = |name: &str| pagination.get(name).and_then(Value::as_u64).unwrap_or(0);
    Some(format!(
        "{}\npage {} of {} ({} total)",
        render_rows(items),
        field("page"),
        field("pages"),
        field("total"),
    ))
}

fn single_column(header: &str, items: &[Value]) -> String {
    let rows: Vec<Vec<String>> = items.iter().map(|item| vec![value_to_cell(item)]).collect();
    table::render_entity_table(&[header], &rows, table_options())
}

/// Rows of objects become one column per key seen in any row.
fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    let Some(objects) = items.iter().map(Value::as_object).collect::<Option<Vec<_>>>() else {
        return single_column("value", items);
    };

    let mut headers: Vec<&str> = objects
        .iter()
        .flat_map(|map| map.keys().map(String::as_str))
        .collect();
    // Ids first, timestamps last, the rest alphabetical.
    headers.sort_by_key(|header| (column_rank(header), *header));
    headers.dedup();
    if headers.is_empty() {
        return String::from("(no columns)");
    }

    let rows: Vec<Vec<String>> = objects
        .iter()
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), value_to_cell))
                .collect()
        })
        .collect();
    table::render_entity_table(&headers, &rows, table_options())
}

fn column_rank(header: &str) -> u8 {
    match header {
        "id" => 0,
        _ if header.ends_with("_at") => 2,
        _ => 1,
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
