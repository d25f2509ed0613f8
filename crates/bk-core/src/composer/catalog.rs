//! Facetas de catálogo: configuración, condiciones, processing pass, tipos de
//! evento y archivo, producción, calidad y banderas.

use bk_domain::{Facet, PassPath, ReplicaFlag, Visibility};
use log::debug;

use super::{facet_predicate, scalar, Composition};
use crate::constants::RAW_FILE_TYPE;
use crate::errors::CatalogError;
use crate::facets::names;
use crate::passes::PassResolver;
use crate::schema::{self, configurations, data_quality as dq, data_taking_conditions as daq, file_types, files,
                    production_output, productions, simulation_conditions as sim};
use crate::sql::{CmpOp, Column, Predicate, Select, TableRef};
use crate::store::CatalogStore;

fn with_configuration(comp: Composition, use_primary_tables: bool) -> Composition {
    comp.ensure_container(use_primary_tables)
        .with_table(schema::CONFIGURATIONS,
                    [Predicate::join(configurations::CONFIGURATIONID, productions::CONFIGURATIONID)])
}

pub fn config_name(value: &Facet<String>,
                   comp: Composition,
                   use_primary_tables: bool)
                   -> Result<Composition, CatalogError> {
    let Some(p) = facet_predicate(names::CONFIG_NAME, configurations::CONFIGNAME, value)? else {
        return Ok(comp);
    };
    Ok(with_configuration(comp, use_primary_tables).and(p))
}

pub fn config_version(value: &Facet<String>,
                      comp: Composition,
                      use_primary_tables: bool)
                      -> Result<Composition, CatalogError> {
    let Some(p) = facet_predicate(names::CONFIG_VERSION, configurations::CONFIGVERSION, value)? else {
        return Ok(comp);
    };
    Ok(with_configuration(comp, use_primary_tables).and(p))
}

/// Ids explícitos de condición. Simulación y toma de datos se excluyen
/// mutuamente.
pub fn conditions(simulation: &Facet<i64>,
                  data_taking: &Facet<i64>,
                  comp: Composition,
                  use_primary_tables: bool)
                  -> Result<Composition, CatalogError> {
    if !simulation.is_unconstrained() && !data_taking.is_unconstrained() {
        return Err(CatalogError::invalid(names::CONDITION_DESCRIPTION,
                                         "simulation and data-taking conditions are mutually exclusive"));
    }
    let sim_p = facet_predicate(names::SIMULATION_CONDITION, productions::SIMID, simulation)?;
    let daq_p = facet_predicate(names::DATA_TAKING_CONDITION, productions::DAQPERIODID, data_taking)?;
    match sim_p.or(daq_p) {
        Some(p) => Ok(comp.ensure_container(use_primary_tables).and(p)),
        None => Ok(comp),
    }
}

/// Descripción de condición: se busca primero como condición de toma de
/// datos y después como condición de simulación.
pub fn condition_description<S: CatalogStore + ?Sized>(value: &Facet<String>,
                                                       comp: Composition,
                                                       use_primary_tables: bool,
                                                       store: &S)
                                                       -> Result<Composition, CatalogError> {
    let Some(description) = scalar(names::CONDITION_DESCRIPTION, value)? else {
        return Ok(comp);
    };
    let lookup = |table: TableRef, id: Column, desc: Column| -> Result<Option<i64>, CatalogError> {
        let mut select = Select::columns(&[id]);
        select.tables.add(table);
        select.filter.push(Predicate::eq(desc, description));
        Ok(store.select(&select)?.first().and_then(|r| r.first()).and_then(|v| v.as_i64()))
    };
    let predicate = if let Some(id) = lookup(schema::DATA_TAKING_CONDITIONS, daq::DAQPERIODID, daq::DESCRIPTION)? {
        Predicate::eq(productions::DAQPERIODID, id)
    } else if let Some(id) = lookup(schema::SIMULATION_CONDITIONS, sim::SIMID, sim::SIMDESCRIPTION)? {
        Predicate::eq(productions::SIMID, id)
    } else {
        return Err(CatalogError::NotFound(format!("condition description {description}")));
    };
    Ok(comp.ensure_container(use_primary_tables).and(predicate))
}

/// La ruta se normaliza y se traduce al conjunto de nodos que la resuelven.
/// La ruta raíz no restringe nada.
pub fn processing_pass<S: CatalogStore>(value: &Facet<String>,
                                        comp: Composition,
                                        use_primary_tables: bool,
                                        resolver: &PassResolver<S>)
                                        -> Result<Composition, CatalogError> {
    let Some(raw) = scalar(names::PROCESSING_PASS, value)? else {
        return Ok(comp);
    };
    let path = PassPath::parse(raw).map_err(|e| CatalogError::from_domain(names::PROCESSING_PASS, e))?;
    if path.is_root() {
        return Ok(comp);
    }
    let ids = resolver.resolve_all(&path)?;
    if ids.is_empty() {
        return Err(CatalogError::invalid(names::PROCESSING_PASS, format!("path not found: {path}")));
    }
    debug!("composer:processing_pass path={path} ids={ids:?}");
    Ok(comp.ensure_container(use_primary_tables).and(Predicate::any_of(productions::PROCESSINGID, ids)))
}

pub fn event_type(value: &Facet<i64>, comp: Composition, use_primary_tables: bool) -> Result<Composition, CatalogError> {
    let col = if use_primary_tables { files::EVENTTYPEID } else { production_output::EVENTTYPEID };
    let predicate = facet_predicate(names::EVENT_TYPE, col, value)?;
    Ok(comp.and_opt(predicate))
}

pub fn production(value: &Facet<i64>, comp: Composition, use_primary_tables: bool) -> Result<Composition, CatalogError> {
    let col = Composition::production_column(use_primary_tables);
    let predicate = facet_predicate(names::PRODUCTION, col, value)?;
    Ok(comp.and_opt(predicate))
}

/// Un único tipo `RAW` restringe además a producciones de datos reales
/// (id negativo). No se generaliza a otros tipos.
pub fn file_type(value: &Facet<String>, comp: Composition, use_primary_tables: bool) -> Result<Composition, CatalogError> {
    let Some(p) = facet_predicate(names::FILE_TYPE, file_types::NAME, value)? else {
        return Ok(comp);
    };
    let comp = comp.ensure_file_types(use_primary_tables).and(p);
    if value.as_one().map(String::as_str) == Some(RAW_FILE_TYPE) {
        let col = Composition::production_column(use_primary_tables);
        return Ok(comp.and(Predicate::cmp(col, CmpOp::Lt, 0i64)));
    }
    Ok(comp)
}

pub fn data_quality(value: &Facet<String>,
                    comp: Composition,
                    use_primary_tables: bool)
                    -> Result<Composition, CatalogError> {
    let Some(p) = facet_predicate(names::DATA_QUALITY, dq::DATAQUALITYFLAG, value)? else {
        return Ok(comp);
    };
    Ok(comp.ensure_data_quality(use_primary_tables).and(p))
}

/// Sólo `Y`/`N`; cualquier valor que empiece por `A` equivale a todos.
pub fn visibility(value: &Facet<String>, comp: Composition, use_primary_tables: bool) -> Result<Composition, CatalogError> {
    let Some(raw) = scalar(names::VISIBLE, value)? else {
        return Ok(comp);
    };
    let Some(flag) = Visibility::parse(raw).map_err(|e| CatalogError::from_domain(names::VISIBLE, e))? else {
        return Ok(comp);
    };
    let col = if use_primary_tables { files::VISIBILITYFLAG } else { production_output::VISIBLE };
    Ok(comp.and(Predicate::eq(col, flag.as_literal())))
}

/// Sólo `Yes`/`No`; cualquier valor que empiece por `A` equivale a todos.
pub fn replica(value: &Facet<String>, comp: Composition, use_primary_tables: bool) -> Result<Composition, CatalogError> {
    let Some(raw) = scalar(names::REPLICA_FLAG, value)? else {
        return Ok(comp);
    };
    let Some(flag) = ReplicaFlag::parse(raw).map_err(|e| CatalogError::from_domain(names::REPLICA_FLAG, e))? else {
        return Ok(comp);
    };
    let col = if use_primary_tables { files::GOTREPLICA } else { production_output::GOTREPLICA };
    Ok(comp.and(Predicate::eq(col, flag.as_literal())))
}
