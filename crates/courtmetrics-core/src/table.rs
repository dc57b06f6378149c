// Tabular provider results.
//
// Every provider endpoint answers with a header row plus a list of value
// rows. `Table` keeps that shape and offers case-insensitive column access so
// downstream decoders work regardless of the provider's casing convention.

use serde::Deserialize;
use serde_json::Value;

/// How column labels are normalized after a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnCase {
    /// Lowercase every label (`GAME_ID` -> `game_id`).
    #[default]
    Lower,
    /// Keep the provider's own casing.
    Native,
}

/// A header row plus value rows, as returned by the stats provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Table { headers, rows }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Table::default()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rewrite the column labels according to `case`.
    pub fn normalize_headers(&mut self, case: ColumnCase) {
        if case == ColumnCase::Lower {
            for header in &mut self.headers {
                *header = header.to_lowercase();
            }
        }
    }

    /// Index of the column named `name`, compared case-insensitively.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Iterate over rows in provider order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            table: self,
            values,
        })
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Raw value of the named column. `None` when the column does not exist
    /// or the row is shorter than the header.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let idx = self.table.column(name)?;
        self.values.get(idx)
    }

    /// Column as text. Numbers are rendered, nulls are `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Column as an integer identifier. Accepts JSON integers, integral
    /// floats and numeric strings.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Column as a stat value. Missing or non-numeric values become NaN so
    /// they propagate through averages instead of silently reading as zero.
    pub fn stat(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::new(
            vec!["GAME_ID".into(), "PTS".into(), "MIN".into()],
            vec![
                vec![json!("0022300555"), json!(31), json!("34:12")],
                vec![json!("0022300556"), json!(null), json!(28)],
            ],
        )
    }

    #[test]
    fn column_lookup_ignores_case() {
        let table = sample();
        assert_eq!(table.column("game_id"), Some(0));
        assert_eq!(table.column("Pts"), Some(1));
        assert_eq!(table.column("reb"), None);
    }

    #[test]
    fn normalize_lowercases_headers() {
        let mut table = sample();
        table.normalize_headers(ColumnCase::Lower);
        assert_eq!(table.headers(), &["game_id", "pts", "min"]);
    }

    #[test]
    fn normalize_native_keeps_headers() {
        let mut table = sample();
        table.normalize_headers(ColumnCase::Native);
        assert_eq!(table.headers(), &["GAME_ID", "PTS", "MIN"]);
    }

    #[test]
    fn row_accessors() {
        let table = sample();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].text("game_id").as_deref(), Some("0022300555"));
        assert_eq!(rows[0].stat("pts"), 31.0);
        assert_eq!(rows[0].text("min").as_deref(), Some("34:12"));
        assert!(rows[1].stat("pts").is_nan());
        assert!(rows[1].stat("missing").is_nan());
        assert_eq!(rows[1].text("min").as_deref(), Some("28"));
    }

    #[test]
    fn int_accepts_numbers_and_strings() {
        let table = Table::new(
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![vec![json!(1610612738), json!("1610612752"), json!(12.0), json!(1.5)]],
        );
        let row = table.rows().next().unwrap();
        assert_eq!(row.int("a"), Some(1610612738));
        assert_eq!(row.int("b"), Some(1610612752));
        assert_eq!(row.int("c"), Some(12));
        assert_eq!(row.int("d"), None);
    }

    #[test]
    fn short_rows_yield_none() {
        let table = Table::new(vec!["A".into(), "B".into()], vec![vec![json!(1)]]);
        let row = table.rows().next().unwrap();
        assert!(row.get("b").is_none());
    }

    #[test]
    fn empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.rows().count(), 0);
    }
}
