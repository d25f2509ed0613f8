//! Facetas de ejecución: números de run, TCK y rangos temporales.

use bk_domain::Facet;
use chrono::{NaiveDate, NaiveDateTime};

use super::{facet_predicate, scalar, Composition};
use crate::errors::CatalogError;
use crate::facets::names;
use crate::sql::{CmpOp, Column, Predicate};
use crate::schema::{files, jobs};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Acepta `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` o `YYYY-MM-DD`.
pub fn parse_date(facet: &str, raw: &str) -> Result<NaiveDateTime, CatalogError> {
    let raw = raw.trim();
    DATE_FORMATS.iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
                .ok_or_else(|| CatalogError::invalid(facet, format!("unparseable date {raw:?}")))
}

/// Lista y rango son dos formas de la misma faceta: si llegan ambas se
/// combinan como `(rango) OR (lista)`.
pub fn run_numbers(list: &Facet<i64>,
                   start: &Facet<i64>,
                   end: &Facet<i64>,
                   comp: Composition,
                   use_primary_tables: bool)
                   -> Result<Composition, CatalogError> {
    let listed = facet_predicate(names::RUN_NUMBER, jobs::RUNNUMBER, list)?;
    let mut bounds = Vec::new();
    if let Some(s) = scalar(names::START_RUN, start)? {
        bounds.push(Predicate::cmp(jobs::RUNNUMBER, CmpOp::Ge, *s));
    }
    if let Some(e) = scalar(names::END_RUN, end)? {
        bounds.push(Predicate::cmp(jobs::RUNNUMBER, CmpOp::Le, *e));
    }
    if listed.is_none() && bounds.is_empty() {
        return Ok(comp);
    }
    let mut comp = comp.ensure_jobs(use_primary_tables);
    match listed {
        Some(l) if !bounds.is_empty() => comp = comp.and(Predicate::Or(vec![Predicate::And(bounds), l])),
        Some(l) => comp = comp.and(l),
        None => comp.filter.extend(bounds),
    }
    Ok(comp)
}

pub fn tcks(value: &Facet<String>, comp: Composition, use_primary_tables: bool) -> Result<Composition, CatalogError> {
    let Some(p) = facet_predicate(names::TCK, jobs::TCK, value)? else {
        return Ok(comp);
    };
    Ok(comp.ensure_jobs(use_primary_tables).and(p))
}

/// Rango `[start, end]` sobre `column`. Con inicio y sin fin, el fin es
/// `now`: la misma consulta en otro momento puede devolver otras filas.
pub(crate) fn timestamp_range(column: Column,
                              start: &Facet<String>,
                              end: &Facet<String>,
                              now: NaiveDateTime)
                              -> Result<Vec<Predicate>, CatalogError> {
    let start = scalar(names::START_DATE, start)?.map(|s| parse_date(names::START_DATE, s)).transpose()?;
    let end = scalar(names::END_DATE, end)?.map(|e| parse_date(names::END_DATE, e)).transpose()?;
    let end = match (start, end) {
        (Some(_), None) => Some(now),
        (_, e) => e,
    };
    let mut out = Vec::new();
    if let Some(s) = start {
        out.push(Predicate::cmp(column, CmpOp::Ge, s));
    }
    if let Some(e) = end {
        out.push(Predicate::cmp(column, CmpOp::Le, e));
    }
    Ok(out)
}

/// Fecha de inserción del archivo.
pub fn date_range(start: &Facet<String>,
                  end: &Facet<String>,
                  comp: Composition,
                  use_primary_tables: bool,
                  now: NaiveDateTime)
                  -> Result<Composition, CatalogError> {
    let predicates = timestamp_range(files::INSERTTIMESTAMP, start, end, now)?;
    if predicates.is_empty() {
        return Ok(comp);
    }
    let mut comp = comp.ensure_files(use_primary_tables);
    comp.filter.extend(predicates);
    Ok(comp)
}

/// Inicio y fin del job, independientes entre sí.
pub fn job_times(start: &Facet<String>,
                 end: &Facet<String>,
                 comp: Composition,
                 use_primary_tables: bool)
                 -> Result<Composition, CatalogError> {
    let start = scalar(names::JOB_START_DATE, start)?.map(|s| parse_date(names::JOB_START_DATE, s)).transpose()?;
    let end = scalar(names::JOB_END_DATE, end)?.map(|e| parse_date(names::JOB_END_DATE, e)).transpose()?;
    if start.is_none() && end.is_none() {
        return Ok(comp);
    }
    let mut comp = comp.ensure_jobs(use_primary_tables);
    if let Some(s) = start {
        comp = comp.and(Predicate::cmp(jobs::JOBSTART, CmpOp::Ge, s));
    }
    if let Some(e) = end {
        comp = comp.and(Predicate::cmp(jobs::JOBEND, CmpOp::Le, e));
    }
    Ok(comp)
}
