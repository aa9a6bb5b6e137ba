//! Builds parameterized MySQL statements. Identifiers come from the allow-list or the
//! live schema only; values are always bound as parameters.

use crate::coerce::CoercedValue;
use crate::source::FieldDescriptor;

/// Quote identifier for MySQL.
fn quoted(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<CoercedValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: CoercedValue) {
        self.params.push(v);
    }
}

/// Column types sqlx cannot decode into a JSON-friendly Rust type are selected as text.
fn needs_text_cast(declared_type: &str) -> bool {
    let t = declared_type.to_ascii_lowercase();
    t.starts_with("decimal") || t.starts_with("numeric") || t.starts_with("bit") || t.starts_with("year")
}

/// SELECT list from described columns; decimals and friends as CAST(col AS CHAR) aliased to the column name.
fn select_column_list(columns: &[FieldDescriptor]) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }
    columns
        .iter()
        .map(|c| {
            let q = quoted(&c.name);
            if needs_text_cast(&c.declared_type) {
                format!("CAST({} AS CHAR) AS {}", q, q)
            } else {
                q
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Columns of one table in the current database, in declaration order.
pub fn describe_table(table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(CoercedValue::Text(table.to_string()));
    q.sql = "SELECT CAST(COLUMN_NAME AS CHAR) AS name, CAST(COLUMN_TYPE AS CHAR) AS declared_type \
             FROM information_schema.COLUMNS \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
             ORDER BY ORDINAL_POSITION"
        .to_string();
    q
}

/// SELECT every row of a table.
pub fn select_all(table: &str, columns: &[FieldDescriptor]) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", select_column_list(columns), quoted(table));
    q
}

/// SELECT rows where one column equals the bound value.
pub fn select_by_field(
    table: &str,
    columns: &[FieldDescriptor],
    field: &FieldDescriptor,
    value: &CoercedValue,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(value.clone());
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_column_list(columns),
        quoted(table),
        quoted(&field.name)
    );
    q
}
