//! Facetas del listado de steps y ordenación.

use bk_domain::{Facet, Visibility};
use chrono::NaiveDateTime;

use super::runs::timestamp_range;
use super::{facet_predicate, scalar, Composition};
use crate::errors::CatalogError;
use crate::facets::{names, CatalogQuery, SortSpec};
use crate::schema::steps as s;
use crate::sql::{Column, OrderBy, Predicate};

fn step_visibility(value: &Facet<String>) -> Result<Option<Predicate>, CatalogError> {
    let Some(raw) = scalar(names::VISIBLE, value)? else {
        return Ok(None);
    };
    let flag = Visibility::parse(raw).map_err(|e| CatalogError::from_domain(names::VISIBLE, e))?;
    Ok(flag.map(|f| Predicate::eq(s::VISIBLE, f.as_literal())))
}

/// Aplica las facetas de step en orden fijo; la primera inválida aborta.
pub fn step_facets(q: &CatalogQuery, comp: Composition, now: NaiveDateTime) -> Result<Composition, CatalogError> {
    let mut comp = comp.and_opt(facet_predicate(names::STEP_ID, s::STEPID, &q.step_id)?)
                       .and_opt(facet_predicate(names::STEP_NAME, s::STEPNAME, &q.step_name)?)
                       .and_opt(facet_predicate(names::APPLICATION_NAME, s::APPLICATIONNAME, &q.application_name)?)
                       .and_opt(facet_predicate(names::APPLICATION_VERSION,
                                                s::APPLICATIONVERSION,
                                                &q.application_version)?)
                       .and_opt(facet_predicate(names::USABLE, s::USABLE, &q.usable)?)
                       .and_opt(step_visibility(&q.visible)?);
    comp.filter.extend(timestamp_range(s::INSERTTIMESTAMPS, &q.start_date, &q.end_date, now)?);
    Ok(comp)
}

/// Traduce la especificación de orden a una columna permitida. El nombre
/// del ítem se compara sin distinguir mayúsculas.
pub fn sort(spec: Option<&SortSpec>, allowed: &[(&str, Column)]) -> Result<Option<OrderBy>, CatalogError> {
    let Some(spec) = spec else {
        return Ok(None);
    };
    allowed.iter()
           .find(|(name, _)| name.eq_ignore_ascii_case(&spec.item))
           .map(|(_, column)| Some(OrderBy { column: *column, order: spec.order }))
           .ok_or_else(|| CatalogError::invalid(names::SORT, format!("unknown sort item {}", spec.item)))
}
