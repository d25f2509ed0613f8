//! bk-persistence
//!
//! Backend Postgres del catálogo: pool r2d2 de Diesel, configuración desde
//! `.env` y un `CatalogStore` que ejecuta el SQL compuesto por `bk-core`.
//!
//! Módulos:
//! - `pg`: `PgCatalogStore` y construcción de pools.
//! - `config`: carga de configuración desde .env.
//! - `error`: `PersistenceError` y su traducción a `StoreError`.

pub mod config;
pub mod error;
pub mod pg;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, build_stores, build_stores_from_env, ConnectionProvider, PgCatalogStore, PgPool,
             PoolProvider};
