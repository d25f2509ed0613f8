//! Compositor de predicados.
//!
//! Cada faceta es una función pura `(valor, Composition, use_primary_tables)
//! -> Result<Composition, CatalogError>`. `Composition` acumula las tablas
//! del FROM, las uniones estructurales y el filtro de facetas; se aplica una
//! faceta detrás de otra y el primer error aborta la composición.
//!
//! `use_primary_tables` elige entre dos caminos de unión equivalentes: las
//! tablas `files`/`jobs` o la vista materializada `productionoutputfiles`.
//! Una tabla ya presente no se vuelve a unir.

pub mod catalog;
pub mod runs;
pub mod steps;

use bk_domain::Facet;

use crate::errors::CatalogError;
use crate::schema::{self, data_quality, file_types, files, jobs, production_output, productions};
use crate::sql::{Column, Predicate, Select, TableRef, TableSet};
use crate::store::SqlValue;

pub use catalog::{condition_description, conditions, config_name, config_version, data_quality, event_type,
                  file_type, processing_pass, production, replica, visibility};
pub use runs::{date_range, job_times, run_numbers, tcks};
pub use steps::{sort, step_facets};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub tables: TableSet,
    pub joins: Vec<Predicate>,
    pub filter: Vec<Predicate>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_table(table: TableRef) -> Self {
        let mut comp = Self::new();
        comp.tables.add(table);
        comp
    }

    /// `files f, jobs j` unidas por `f.jobid = j.jobid`.
    pub fn primary() -> Self {
        Self::from_table(schema::FILES).with_table(schema::JOBS, [Predicate::join(files::JOBID, jobs::JOBID)])
    }

    /// Vista de salidas de producción con su contenedor.
    pub fn view() -> Self {
        Self::from_table(schema::PRODUCTION_OUTPUT)
            .with_table(schema::PRODUCTIONS, [Predicate::join(production_output::PRODUCTION, productions::PRODUCTION)])
    }

    pub fn steps() -> Self {
        Self::from_table(schema::STEPS)
    }

    /// Añade la tabla con sus uniones; si ya estaba no hace nada.
    pub fn with_table<I>(mut self, table: TableRef, joins: I) -> Self
        where I: IntoIterator<Item = Predicate>
    {
        if self.tables.add(table) {
            self.joins.extend(joins);
        }
        self
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.filter.push(predicate);
        self
    }

    pub fn and_opt(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(p) => self.and(p),
            None => self,
        }
    }

    pub fn has_filter(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn production_column(use_primary_tables: bool) -> Column {
        if use_primary_tables { jobs::PRODUCTION } else { production_output::PRODUCTION }
    }

    pub(crate) fn ensure_jobs(self, use_primary_tables: bool) -> Self {
        let join = if use_primary_tables {
            Predicate::join(files::JOBID, jobs::JOBID)
        } else {
            Predicate::join(jobs::PRODUCTION, production_output::PRODUCTION)
        };
        self.with_table(schema::JOBS, [join])
    }

    pub(crate) fn ensure_files(self, use_primary_tables: bool) -> Self {
        self.ensure_jobs(use_primary_tables)
            .with_table(schema::FILES, [Predicate::join(files::JOBID, jobs::JOBID)])
    }

    pub(crate) fn ensure_container(self, use_primary_tables: bool) -> Self {
        if use_primary_tables {
            self.ensure_jobs(true)
                .with_table(schema::PRODUCTIONS, [Predicate::join(productions::PRODUCTION, jobs::PRODUCTION)])
        } else {
            self.with_table(schema::PRODUCTIONS,
                            [Predicate::join(production_output::PRODUCTION, productions::PRODUCTION)])
        }
    }

    pub(crate) fn ensure_file_types(self, use_primary_tables: bool) -> Self {
        let col = if use_primary_tables { files::FILETYPEID } else { production_output::FILETYPEID };
        self.with_table(schema::FILE_TYPES, [Predicate::join(col, file_types::FILETYPEID)])
    }

    pub(crate) fn ensure_data_quality(self, use_primary_tables: bool) -> Self {
        self.ensure_files(use_primary_tables)
            .with_table(schema::DATA_QUALITY, [Predicate::join(files::QUALITYID, data_quality::QUALITYID)])
    }

    pub fn into_select(self, columns: &[Column]) -> Select {
        let mut select = Select::columns(columns);
        select.tables = self.tables;
        select.joins = self.joins;
        select.filter = self.filter;
        select
    }
}

/// Predicado de una faceta genérica: escalar ⇒ igualdad, lista ⇒ grupo OR.
/// Una lista vacía no tiene significado y se rechaza.
pub(crate) fn facet_predicate<T>(facet: &str,
                                 column: Column,
                                 value: &Facet<T>)
                                 -> Result<Option<Predicate>, CatalogError>
    where T: Clone + Into<SqlValue>
{
    match value {
        Facet::Unconstrained => Ok(None),
        Facet::One(v) => Ok(Some(Predicate::eq(column, v.clone()))),
        Facet::Many(vs) if vs.is_empty() => Err(CatalogError::invalid(facet, "empty list")),
        Facet::Many(vs) => Ok(Some(Predicate::any_of(column, vs.iter().cloned()))),
    }
}

/// Valor escalar de una faceta que no admite listas.
pub(crate) fn scalar<'a, T>(facet: &str, value: &'a Facet<T>) -> Result<Option<&'a T>, CatalogError> {
    match value {
        Facet::Unconstrained => Ok(None),
        Facet::One(v) => Ok(Some(v)),
        Facet::Many(_) => Err(CatalogError::invalid(facet, "expected a single value, got a list")),
    }
}
