//! Table formatting utilities.

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table as ComfyTable, presets};

/// Table builder for listings.
pub struct Table {
    inner: ComfyTable,
    colors_enabled: bool,
}

impl Table {
    /// Create a borderless table.
    pub fn new() -> Self {
        let colors_enabled = crate::output::colors_enabled();
        let mut inner = ComfyTable::new();
        inner.load_preset(presets::NOTHING);
        inner.set_content_arrangement(ContentArrangement::Dynamic);
        Self {
            inner,
            colors_enabled,
        }
    }

    /// Set the table headers
    pub fn headers<I, T>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| {
                let cell = Cell::new(h.as_ref());
                if self.colors_enabled {
                    cell.add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            })
            .collect();
        self.inner.set_header(cells);
        self
    }

    /// Add a row to the table
    pub fn row<I, T>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        self.inner.add_row(row);
        self
    }

    /// Add a row with styled cells
    pub fn styled_row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.inner.add_row(cells);
        self
    }

    /// Create a highlighted cell, used for directories and changed branches.
    pub fn accent_cell(&self, text: impl std::fmt::Display) -> Cell {
        let cell = Cell::new(text);
        if self.colors_enabled {
            cell.fg(Color::Cyan)
        } else {
            cell
        }
    }

    /// Create a dim-styled cell
    pub fn dim_cell(&self, text: impl std::fmt::Display) -> Cell {
        let cell = Cell::new(text);
        if self.colors_enabled {
            cell.fg(Color::DarkGrey)
        } else {
            cell
        }
    }

    /// Render the table to a string
    pub fn render(&self) -> String {
        self.inner.to_string()
    }

    /// Print the table to stdout
    pub fn print(&self) {
        println!("{}", self.inner);
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a key-value table (two columns)
pub fn kv_table<I, K, V>(items: I) -> Table
where
    I: IntoIterator<Item = (K, V)>,
    K: std::fmt::Display,
    V: std::fmt::Display,
{
    let mut table = Table::new();
    for (key, value) in items {
        let key_cell = if table.colors_enabled {
            Cell::new(key).add_attribute(Attribute::Bold)
        } else {
            Cell::new(key)
        };
        table.styled_row(vec![key_cell, Cell::new(value)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_creation() {
        let mut table = Table::new();
        table.headers(["Branch", "Revision"]);
        table.row(["trunk", "42"]);
        table.row(["branches/rel-1", "40"]);
        let output = table.render();
        assert!(output.contains("branches/rel-1"));
        assert!(output.contains("42"));
    }

    #[test]
    fn test_kv_table() {
        let table = kv_table([("repository-url", "https://svn/x"), ("username", "ci")]);
        let output = table.render();
        assert!(output.contains("repository-url"));
        assert!(output.contains("ci"));
    }
}
