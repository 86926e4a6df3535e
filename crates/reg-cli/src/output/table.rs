//! Plain-text table rendering for `--format table`.

/// Smallest width a column is shrunk to when fitting the terminal.
const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

struct Column<'a> {
    header: &'a str,
    width: usize,
}

impl Column<'_> {
    fn floor(&self) -> usize {
        display_len(self.header).max(MIN_COLUMN_WIDTH)
    }
}

/// Render rows under the given headers, numbers right-aligned.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut columns: Vec<Column<'_>> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let widest = rows
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| display_len(cell))
                .max()
                .unwrap_or(0);
            Column {
                header,
                width: widest.max(display_len(header)).max(MIN_COLUMN_WIDTH),
            }
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut columns, max_width);
    }

    let header_line = columns
        .iter()
        .map(|column| pad(&clip(column.header, column.width), column.width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push("-".repeat(display_len(&header_line)));
    lines.insert(0, header_line);

    for row in rows {
        let line = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let cell = clip(row.get(index).map_or("-", String::as_str), column.width);
                let numeric = is_numeric(&cell);
                let padded = pad(&cell, column.width, numeric);
                if options.color {
                    colorize_status(&padded, &cell)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line);
    }

    lines.join("\n")
}

/// Narrow the widest shrinkable column one step at a time until the row fits
/// or every column is at its floor.
fn shrink_to_fit(columns: &mut [Column<'_>], max_width: usize) {
    let separators = columns.len().saturating_sub(1) * SEPARATOR.len();
    let total = |columns: &[Column<'_>]| columns.iter().map(|c| c.width).sum::<usize>() + separators;

    while total(columns) > max_width {
        let Some(widest) = columns
            .iter_mut()
            .filter(|column| column.width > column.floor())
            .max_by_key(|column| column.width)
        else {
            break;
        };
        widest.width -= 1;
    }
}

fn display_len(value: &str) -> usize {
    value.chars().count()
}

fn clip(value: &str, width: usize) -> String {
    if display_len(value) <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(display_len(value)));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

/// Wrap the status word inside an already padded cell in its color.
fn colorize_status(padded: &str, cell: &str) -> String {
    match status_color(cell) {
        Some(code) => padded.replacen(cell, &format!("\u{1b}[{code}m{cell}\u{1b}[0m"), 1),
        None => padded.to_string(),
    }
}

/// ANSI color for enrollment, offering, and account status words.
fn status_color(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "registered" | "completed" | "open" | "active" | "graduated" | "true" => Some("32"),
        "waitlist" | "auditing" | "scheduled" | "pending" | "on_leave" => Some("33"),
        "dropped" | "closed" | "cancelled" | "suspended" | "withdrawn" | "inactive" | "false" => {
            Some("31")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn narrow_terminal_clips_widest_column() {
        let headers = ["id", "course_title"];
        let rows = vec![vec![
            "cls-1".to_string(),
            "Introduction to Distributed Systems and Networks".to_string(),
        ]];
        let table = render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        assert!(table.lines().all(|line| line.chars().count() <= 40));
        assert!(table.contains('…'));
    }

    #[test]
    fn numeric_cells_align_right() {
        let headers = ["credits"];
        let rows = vec![vec!["3".to_string()], vec!["12".to_string()]];
        let table = render_entity_table(&headers, &rows, PLAIN);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "      3");
        assert_eq!(lines[3], "     12");
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let headers = ["id", "room"];
        let rows = vec![vec!["cls-1".to_string()]];
        let table = render_entity_table(&headers, &rows, PLAIN);
        assert!(table.lines().nth(2).is_some_and(|line| line.trim_end().ends_with('-')));
    }

    #[test]
    fn colored_cells_keep_their_padding() {
        let headers = ["status", "id"];
        let rows = vec![vec!["dropped".to_string(), "enr-1".to_string()]];
        let table = render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("\u{1b}[31mdropped\u{1b}[0m"));
        assert!(row.ends_with("enr-1 "));
    }

    #[test]
    fn status_words_map_to_colors() {
        assert_eq!(status_color("Registered"), Some("32"));
        assert_eq!(status_color("waitlist"), Some("33"));
        assert_eq!(status_color("dropped"), Some("31"));
        assert_eq!(status_color("CS101"), None);
    }
}
