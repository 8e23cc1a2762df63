//! UI-agnostic view models.
//!
//! Views describe *what* to show (labelled values, links, images, tables);
//! the host decides how. `render_text` is a plain-text fallback used for
//! logs and tests.

use serde::Serialize;

/// One displayed value, optionally linked or shown as an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self { text: text.into(), link: Some(href.into()), image: None }
    }

    pub fn image(alt: impl Into<String>, src: impl Into<String>) -> Self {
        Self { text: alt.into(), link: None, image: Some(src.into()) }
    }

    /// `null` renders as an empty cell.
    pub fn opt<T: ToString>(value: Option<T>) -> Self {
        Self::text(value.map(|v| v.to_string()).unwrap_or_default())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: Cell,
}

impl Field {
    pub fn new(label: impl Into<String>, value: Cell) -> Self {
        Self { label: label.into(), value }
    }

    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, Cell::text(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum View {
    Summary(Vec<Field>),
    Table(Table),
    Message(String),
    Stack(Vec<View>),
}

impl View {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            View::Summary(fields) => {
                for f in fields {
                    out.push_str(&f.label);
                    out.push_str(": ");
                    out.push_str(&f.value.text);
                    out.push('\n');
                }
            }
            View::Table(table) => {
                out.push_str(&table.columns.join(" | "));
                out.push('\n');
                for row in &table.rows {
                    let cells: Vec<&str> = row.iter().map(|c| c.text.as_str()).collect();
                    out.push_str(&cells.join(" | "));
                    out.push('\n');
                }
            }
            View::Message(text) => {
                out.push_str(text);
                out.push('\n');
            }
            View::Stack(views) => {
                for (i, v) in views.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    v.write_text(out);
                }
            }
        }
    }
}
