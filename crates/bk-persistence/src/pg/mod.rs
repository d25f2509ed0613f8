//! Implementación Postgres (Diesel) de `CatalogStore`.
//!
//! El núcleo entrega SQL ya compuesto; aquí sólo se ejecuta y se decodifica.
//! Cada fila vuelve como un objeto JSON (`row_to_json`) con las columnas en
//! el orden de la consulta, y se convierte a `SqlValue` celda a celda. Las
//! consultas compuestas usan alias posicionales (`c0..cN`) para que dos
//! columnas homónimas de tablas distintas no colapsen en la misma clave.
//!
//! Los procedimientos del catálogo se invocan como funciones:
//! `SELECT * FROM schema.proc(args)` envuelto igual que una consulta.

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::Text;
use log::{debug, warn};
use serde_json::Value;

use bk_core::sql::{Insert, Select};
use bk_core::{CatalogStore, Row, SqlValue, StoreError};

use crate::config::DbConfig;
use crate::error::PersistenceError;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Contrato: devuelve una conexión válida o `PersistenceError::TransientIo`.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PooledConnection, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`.
#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

#[derive(QueryableByName, Debug)]
struct JsonRow {
    #[diesel(sql_type = Text)]
    payload: String,
}

/// Retry simple con backoff lineal (hasta 3 reintentos: 15ms, 30ms, 45ms).
/// Sólo se usa para lecturas; las inserciones no se repiten.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if e.is_retryable() && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms", attempts + 1, e, delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Convierte una celda JSON al valor del núcleo. Los booleanos se leen como
/// 0/1; arreglos y objetos quedan como texto JSON.
pub fn json_to_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Int(b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Int(i),
            None => n.as_f64().map(SqlValue::Float).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Decodifica una fila serializada por `row_to_json`, respetando el orden de
/// las claves.
pub fn decode_row(raw: &str) -> Result<Row, PersistenceError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map.into_iter().map(|(_, v)| json_to_value(v)).collect()),
        Ok(other) => Err(PersistenceError::Decode(format!("expected a JSON object, got {other}"))),
        Err(e) => Err(PersistenceError::Decode(e.to_string())),
    }
}

fn wrap_rows(sql: &str) -> String {
    format!("SELECT row_to_json(q)::text AS payload FROM ({sql}) q")
}

fn procedure_sql(name: &str, args: &[SqlValue], expects_output: bool, bulk: Option<&[SqlValue]>) -> String {
    let mut rendered: Vec<String> = args.iter().map(SqlValue::render_literal).collect();
    if let Some(items) = bulk {
        rendered.push(format!("ARRAY[{}]",
                              items.iter().map(SqlValue::render_literal).collect::<Vec<_>>().join(", ")));
    }
    let call = format!("{name}({})", rendered.join(", "));
    if expects_output {
        wrap_rows(&format!("SELECT * FROM {call}"))
    } else {
        format!("SELECT {call}")
    }
}

/// Store Postgres del catálogo.
#[derive(Clone)]
pub struct PgCatalogStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgCatalogStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn load(&self, sql: &str) -> Result<Vec<Row>, PersistenceError> {
        debug!("pg:load sql={sql}");
        let rows: Vec<JsonRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::sql_query(sql).load(&mut conn).map_err(PersistenceError::from)
        })?;
        rows.iter().map(|r| decode_row(&r.payload)).collect()
    }

    fn execute(&self, sql: &str) -> Result<usize, PersistenceError> {
        debug!("pg:execute sql={sql}");
        let mut conn = self.provider.connection()?;
        diesel::sql_query(sql).execute(&mut conn).map_err(PersistenceError::from)
    }
}

impl<P: ConnectionProvider> CatalogStore for PgCatalogStore<P> {
    /// Texto SQL libre. Columnas homónimas colapsan en una sola clave; las
    /// consultas compuestas pasan por `select`.
    fn query(&self, sql: &str) -> Result<Vec<Row>, StoreError> {
        Ok(self.load(&wrap_rows(sql))?)
    }

    fn call_procedure(&self,
                      name: &str,
                      args: &[SqlValue],
                      expects_output: bool,
                      bulk: Option<&[SqlValue]>)
                      -> Result<Vec<Row>, StoreError> {
        let sql = procedure_sql(name, args, expects_output, bulk);
        let result = if expects_output { self.load(&sql) } else { self.execute(&sql).map(|_| Vec::new()) };
        result.map_err(|e| StoreError::Procedure { name: name.to_string(), message: e.to_string() })
    }

    fn select(&self, select: &Select) -> Result<Vec<Row>, StoreError> {
        Ok(self.load(&wrap_rows(&select.to_positional_sql()))?)
    }

    fn insert(&self, insert: &Insert) -> Result<(), StoreError> {
        let affected = self.execute(&insert.to_sql())?;
        debug!("pg:insert table={} rows={affected}", insert.table);
        Ok(())
    }
}

/// Construye un pool Postgres r2d2 a partir de URL.
///
/// Si `min_size > max_size` se usa `min_size = max_size`. El esquema del
/// catálogo pertenece al servicio; aquí no se migra nada.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder().min_idle(Some(validated_min.min(validated_max)))
                         .max_size(validated_max)
                         .build(manager)
                         .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))
}

/// Stores de lectura y escritura según `DbConfig`. Sin `DATABASE_READ_URL`
/// ambos comparten el mismo pool.
pub fn build_stores(cfg: &DbConfig)
                    -> Result<(PgCatalogStore<PoolProvider>, PgCatalogStore<PoolProvider>), PersistenceError> {
    let writer = build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)?;
    let reader = match &cfg.read_url {
        Some(url) => build_pool(url, cfg.min_connections, cfg.max_connections)?,
        None => writer.clone(),
    };
    Ok((PgCatalogStore::new(PoolProvider { pool: reader }), PgCatalogStore::new(PoolProvider { pool: writer })))
}

/// Carga `.env`, lee la configuración y construye ambos stores.
pub fn build_stores_from_env() -> Result<(PgCatalogStore<PoolProvider>, PgCatalogStore<PoolProvider>), PersistenceError>
{
    let cfg = DbConfig::from_env()?;
    build_stores(&cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_call_renders_literals_and_bulk_array() {
        let sql = procedure_sql("bookkeeping.getJobInputFiles", &[SqlValue::Int(4)], true, None);
        assert_eq!(sql,
                   "SELECT row_to_json(q)::text AS payload FROM (SELECT * FROM bookkeeping.getJobInputFiles(4)) q");
        let sql = procedure_sql("bookkeeping.bulkUpdate",
                                &["Y".into()],
                                false,
                                Some(&[SqlValue::Int(1), SqlValue::Int(2)]));
        assert_eq!(sql, "SELECT bookkeeping.bulkUpdate('Y', ARRAY[1, 2])");
    }

    #[test]
    fn decoded_row_keeps_column_order() {
        let row = decode_row(r#"{"c0": "/lhcb/x.dst", "c1": 42, "c2": 1.5, "c3": null, "c4": true}"#).unwrap();
        assert_eq!(row,
                   vec![SqlValue::Text("/lhcb/x.dst".into()),
                        SqlValue::Int(42),
                        SqlValue::Float(1.5),
                        SqlValue::Null,
                        SqlValue::Int(1)]);
        assert!(matches!(decode_row("[1, 2]"), Err(PersistenceError::Decode(_))));
    }
}
