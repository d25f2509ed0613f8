//! Sobre uniforme de resultados `{ParameterNames, Records, TotalRecords}`.

use serde::Serialize;

use crate::store::{Row, SqlValue, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShapedResult {
    pub parameter_names: Vec<String>,
    pub records: Vec<Row>,
    pub total_records: u64,
}

impl ShapedResult {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.parameter_names.iter().position(|n| n == name)
    }

    /// Valores de una columna en todas las filas.
    pub fn values(&self, name: &str) -> Vec<&SqlValue> {
        match self.column(name) {
            Some(i) => self.records.iter().filter_map(|r| r.get(i)).collect(),
            None => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `TotalRecords` es el número de filas recibidas.
pub fn shape(names: &[&str], rows: Vec<Row>) -> Result<ShapedResult, StoreError> {
    let total = rows.len() as u64;
    paged(names, rows, total)
}

/// `total` viene de un recuento aparte, previo a la paginación.
pub fn paged(names: &[&str], rows: Vec<Row>, total: u64) -> Result<ShapedResult, StoreError> {
    if let Some(bad) = rows.iter().find(|r| r.len() != names.len()) {
        return Err(StoreError::Decode(format!("row has {} columns, expected {}", bad.len(), names.len())));
    }
    Ok(ShapedResult { parameter_names: names.iter().map(|n| n.to_string()).collect(), records: rows, total_records: total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_with_service_keys() {
        let r = shape(&["RunNumber"], vec![vec![SqlValue::Int(1234)]]).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({"ParameterNames": ["RunNumber"], "Records": [[1234]], "TotalRecords": 1}));
    }

    #[test]
    fn width_mismatch_is_a_decode_error() {
        assert!(matches!(shape(&["A", "B"], vec![vec![SqlValue::Null]]), Err(StoreError::Decode(_))));
    }
}
