//! Valores escalares intercambiados con el store (celdas de fila y literales
//! de predicado).

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::Serialize;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

/// Fila tal cual la devuelve el store, en el orden de columnas pedido.
pub type Row = Vec<SqlValue>;

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(v) => Some(*v as f64),
            SqlValue::Float(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Literal SQL: texto entre comillas simples con `''` como escape.
    pub fn render_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::Timestamp(ts) => format!("TIMESTAMP '{}'", ts.format(TIMESTAMP_FORMAT)),
        }
    }

    /// Comparación con semántica SQL: `None` si alguno es NULL o si los tipos
    /// no son comparables.
    pub fn compare(&self, other: &SqlValue) -> Option<Ordering> {
        match (self, other) {
            (SqlValue::Null, _) | (_, SqlValue::Null) => None,
            (SqlValue::Int(a), SqlValue::Int(b)) => Some(a.cmp(b)),
            (SqlValue::Int(a), SqlValue::Float(b)) => (*a as f64).partial_cmp(b),
            (SqlValue::Float(a), SqlValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (SqlValue::Float(a), SqlValue::Float(b)) => a.partial_cmp(b),
            (SqlValue::Text(a), SqlValue::Text(b)) => Some(a.cmp(b)),
            (SqlValue::Timestamp(a), SqlValue::Timestamp(b)) => Some(a.cmp(b)),
            (SqlValue::Text(a), SqlValue::Timestamp(b)) => {
                NaiveDateTime::parse_from_str(a, TIMESTAMP_FORMAT).ok().map(|a| a.cmp(b))
            }
            (SqlValue::Timestamp(a), SqlValue::Text(b)) => {
                NaiveDateTime::parse_from_str(b, TIMESTAMP_FORMAT).ok().map(|b| a.cmp(&b))
            }
            _ => None,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_literal_escapes_quotes() {
        assert_eq!(SqlValue::from("O'Neil").render_literal(), "'O''Neil'");
        assert_eq!(SqlValue::Null.render_literal(), "NULL");
    }

    #[test]
    fn null_never_compares() {
        assert_eq!(SqlValue::Null.compare(&SqlValue::Null), None);
        assert_eq!(SqlValue::Int(1).compare(&SqlValue::Float(1.0)), Some(Ordering::Equal));
    }
}
