//! Configuración de conexión desde variables de entorno.
//! `DATABASE_URL` es obligatoria; `DATABASE_READ_URL` permite separar la
//! conexión de lectura de la de escritura.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    /// Réplica de lectura; `None` usa `url` para ambas direcciones.
    pub read_url: Option<String>,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        init_dotenv();
        let url = env::var("DATABASE_URL").map_err(|_| PersistenceError::Config("DATABASE_URL is not set".into()))?;
        let read_url = env::var("DATABASE_READ_URL").ok().filter(|v| !v.trim().is_empty());
        let min_connections = parse_or("DATABASE_MIN_CONNECTIONS", 2)?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 16)?;
        Ok(Self { url, read_url, min_connections, max_connections })
    }

    pub fn reader_url(&self) -> &str {
        self.read_url.as_deref().unwrap_or(&self.url)
    }
}

fn parse_or(name: &str, default: u32) -> Result<u32, PersistenceError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim()
                      .parse()
                      .map_err(|_| PersistenceError::Config(format!("{name} must be a positive integer, got {raw:?}"))),
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
