//! Normalization of key-value replies into tabular results.
//!
//! Native replies are classified once into a [`Reply`] shape by the
//! connector, then flattened here into a [`QueryResult`].

use crate::db::{QueryResult, Value};

/// Column name used for single-column replies.
pub const VALUE_COLUMN: &str = "value";

/// Column name used for the key side of mapping replies.
pub const KEY_COLUMN: &str = "key";

/// Shape of a key-value reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A single text or integer value.
    Scalar(Value),
    /// An ordered list of values.
    List(Vec<Value>),
    /// Key/value pairs. Iteration order is not meaningful.
    Mapping(Vec<(Value, Value)>),
    /// Anything else, already rendered as text.
    Other(String),
}

/// Converts a reply into a result table.
///
/// - Scalar: one `value` column, one row
/// - List: one `value` column, one row per element
/// - Mapping: `key` and `value` columns, one row per entry
/// - Other: one `value` column holding the text rendering
pub fn normalize(reply: Reply) -> QueryResult {
    match reply {
        Reply::Scalar(value) => single_column(vec![vec![value]]),
        Reply::List(items) => single_column(items.into_iter().map(|v| vec![v]).collect()),
        Reply::Mapping(entries) => QueryResult::with_data(
            vec![KEY_COLUMN.to_string(), VALUE_COLUMN.to_string()],
            entries.into_iter().map(|(k, v)| vec![k, v]).collect(),
        ),
        Reply::Other(text) => single_column(vec![vec![Value::String(text)]]),
    }
}

fn single_column(rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult::with_data(vec![VALUE_COLUMN.to_string()], rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_text() {
        let result = normalize(Reply::Scalar(Value::from("OK")));
        assert_eq!(result.columns, vec!["value"]);
        assert_eq!(result.rows, vec![vec![Value::from("OK")]]);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_scalar_integer() {
        let result = normalize(Reply::Scalar(Value::Int(42)));
        assert_eq!(result.columns, vec!["value"]);
        assert_eq!(result.rows, vec![vec![Value::Int(42)]]);
    }

    #[test]
    fn test_list_one_row_per_element() {
        let result = normalize(Reply::List(vec![
            Value::from("a"),
            Value::Int(2),
            Value::Null,
        ]));
        assert_eq!(result.columns, vec!["value"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::from("a")],
                vec![Value::Int(2)],
                vec![Value::Null]
            ]
        );
    }

    #[test]
    fn test_empty_list() {
        let result = normalize(Reply::List(vec![]));
        assert_eq!(result.columns, vec!["value"]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_mapping_two_entries() {
        let result = normalize(Reply::Mapping(vec![
            (Value::from("name"), Value::from("alice")),
            (Value::from("age"), Value::Int(30)),
        ]));
        assert_eq!(result.columns, vec!["key", "value"]);
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows.iter().all(|row| row.len() == 2));
        assert!(result
            .rows
            .contains(&vec![Value::from("name"), Value::from("alice")]));
        assert!(result
            .rows
            .contains(&vec![Value::from("age"), Value::Int(30)]));
    }

    #[test]
    fn test_other_renders_text() {
        let result = normalize(Reply::Other("<nil>".to_string()));
        assert_eq!(result.columns, vec!["value"]);
        assert_eq!(result.rows, vec![vec![Value::from("<nil>")]]);
    }
}
