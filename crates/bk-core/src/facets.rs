//! Entrada de facetas: mapa disperso (JSON) y consulta tipada.
//!
//! Una clave ausente, `null` o el literal centinela (`"ALL"`) producen
//! `Facet::Unconstrained` antes de cualquier validación de tipo. Un arreglo
//! produce `Facet::Many`; cualquier otro valor, `Facet::One`.

use bk_domain::{Facet, SortOrder, SENTINEL};
use serde_json::{Map, Value};

use crate::errors::CatalogError;
use crate::sql::Paging;

/// Nombres de faceta aceptados en el mapa de entrada.
pub mod names {
    pub const CONFIG_NAME: &str = "ConfigName";
    pub const CONFIG_VERSION: &str = "ConfigVersion";
    pub const CONDITION_DESCRIPTION: &str = "ConditionDescription";
    pub const SIMULATION_CONDITION: &str = "SimulationCondition";
    pub const DATA_TAKING_CONDITION: &str = "DataTakingCondition";
    pub const PROCESSING_PASS: &str = "ProcessingPass";
    pub const EVENT_TYPE: &str = "EventType";
    pub const PRODUCTION: &str = "Production";
    pub const FILE_TYPE: &str = "FileType";
    pub const DATA_QUALITY: &str = "DataQuality";
    pub const RUN_NUMBER: &str = "RunNumber";
    pub const START_RUN: &str = "StartRun";
    pub const END_RUN: &str = "EndRun";
    pub const VISIBLE: &str = "Visible";
    pub const REPLICA_FLAG: &str = "ReplicaFlag";
    pub const START_DATE: &str = "StartDate";
    pub const END_DATE: &str = "EndDate";
    pub const TCK: &str = "TCK";
    pub const JOB_START_DATE: &str = "JobStartDate";
    pub const JOB_END_DATE: &str = "JobEndDate";
    pub const STEP_ID: &str = "StepId";
    pub const STEP_NAME: &str = "StepName";
    pub const APPLICATION_NAME: &str = "ApplicationName";
    pub const APPLICATION_VERSION: &str = "ApplicationVersion";
    pub const USABLE: &str = "Usable";
    pub const SORT: &str = "Sort";
    pub const START_ITEM: &str = "StartItem";
    pub const MAX_ITEM: &str = "MaxItem";
}

/// Tipos admitidos como valor escalar de faceta.
pub trait FacetScalar: Sized {
    const EXPECTED: &'static str;
    fn from_json(value: &Value) -> Option<Self>;
}

impl FacetScalar for i64 {
    const EXPECTED: &'static str = "an integer";
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FacetScalar for String {
    const EXPECTED: &'static str = "a string";
    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

fn is_sentinel(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some(SENTINEL)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetMap {
    inner: Map<String, Value>,
}

impl FacetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: Value) -> Result<Self, CatalogError> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            other => Err(CatalogError::invalid("facets", format!("expected an object, got {other}"))),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.inner.insert(name.to_string(), value.into());
        self
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Faceta escalar o lista.
    pub fn get<T: FacetScalar>(&self, name: &str) -> Result<Facet<T>, CatalogError> {
        let value = match self.inner.get(name) {
            None => return Ok(Facet::Unconstrained),
            Some(v) if is_sentinel(v) => return Ok(Facet::Unconstrained),
            Some(v) => v,
        };
        let convert = |v: &Value| {
            T::from_json(v).ok_or_else(|| CatalogError::invalid(name, format!("expected {}, got {v}", T::EXPECTED)))
        };
        match value {
            Value::Array(items) => Ok(Facet::Many(items.iter().map(convert).collect::<Result<_, _>>()?)),
            other => Ok(Facet::One(convert(other)?)),
        }
    }

    /// Faceta que sólo admite un valor.
    pub fn get_scalar<T: FacetScalar>(&self, name: &str) -> Result<Facet<T>, CatalogError> {
        match self.get(name)? {
            Facet::Many(_) => Err(CatalogError::invalid(name, "expected a single value, got a list")),
            other => Ok(other),
        }
    }
}

/// Especificación de orden: `{"Items": "StepId", "Order": "Desc"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub item: String,
    pub order: SortOrder,
}

impl SortSpec {
    fn from_json(value: &Value) -> Result<Self, CatalogError> {
        let obj = value.as_object()
                       .ok_or_else(|| CatalogError::invalid(names::SORT, "expected an object with Items and Order"))?;
        let item = obj.get("Items")
                      .and_then(Value::as_str)
                      .ok_or_else(|| CatalogError::invalid(names::SORT, "missing Items"))?
                      .to_string();
        let order = match obj.get("Order") {
            None => SortOrder::Asc,
            Some(Value::String(raw)) => SortOrder::parse(raw).map_err(|e| CatalogError::from_domain(names::SORT, e))?,
            Some(other) => return Err(CatalogError::invalid(names::SORT, format!("unknown order direction {other}"))),
        };
        Ok(Self { item, order })
    }
}

/// Consulta tipada con todas las facetas conocidas. Cada operación pública
/// usa el subconjunto que le corresponde.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub config_name: Facet<String>,
    pub config_version: Facet<String>,
    pub condition_description: Facet<String>,
    pub simulation_condition: Facet<i64>,
    pub data_taking_condition: Facet<i64>,
    pub processing_pass: Facet<String>,
    pub event_type: Facet<i64>,
    pub production: Facet<i64>,
    pub file_type: Facet<String>,
    pub data_quality: Facet<String>,
    pub run_numbers: Facet<i64>,
    pub start_run: Facet<i64>,
    pub end_run: Facet<i64>,
    pub visible: Facet<String>,
    pub replica: Facet<String>,
    pub start_date: Facet<String>,
    pub end_date: Facet<String>,
    pub tcks: Facet<String>,
    pub job_start: Facet<String>,
    pub job_end: Facet<String>,
    pub step_id: Facet<i64>,
    pub step_name: Facet<String>,
    pub application_name: Facet<String>,
    pub application_version: Facet<String>,
    pub usable: Facet<String>,
    pub sort: Option<SortSpec>,
    pub paging: Option<Paging>,
}

impl CatalogQuery {
    /// Construye la consulta; el primer error de forma aborta la lectura.
    pub fn from_facets(facets: &FacetMap) -> Result<Self, CatalogError> {
        use names::*;
        let sort = match facets.raw(SORT) {
            Some(v) if !is_sentinel(v) => Some(SortSpec::from_json(v)?),
            _ => None,
        };
        let start_item = facets.get_scalar::<i64>(START_ITEM)?;
        let max_item = facets.get_scalar::<i64>(MAX_ITEM)?;
        let paging = match (start_item.as_one(), max_item.as_one()) {
            (None, None) => None,
            (Some(&start), Some(&max)) if start >= 0 && max > 0 => {
                Some(Paging { start_item: start as u64, max_item: max as u64 })
            }
            (Some(_), Some(_)) => return Err(CatalogError::invalid(MAX_ITEM, "paging bounds must be positive")),
            (Some(_), None) => return Err(CatalogError::invalid(MAX_ITEM, "StartItem given without MaxItem")),
            (None, Some(_)) => return Err(CatalogError::invalid(START_ITEM, "MaxItem given without StartItem")),
        };
        Ok(Self { config_name: facets.get_scalar(CONFIG_NAME)?,
                  config_version: facets.get_scalar(CONFIG_VERSION)?,
                  condition_description: facets.get_scalar(CONDITION_DESCRIPTION)?,
                  simulation_condition: facets.get_scalar(SIMULATION_CONDITION)?,
                  data_taking_condition: facets.get_scalar(DATA_TAKING_CONDITION)?,
                  processing_pass: facets.get_scalar(PROCESSING_PASS)?,
                  event_type: facets.get(EVENT_TYPE)?,
                  production: facets.get(PRODUCTION)?,
                  file_type: facets.get(FILE_TYPE)?,
                  data_quality: facets.get(DATA_QUALITY)?,
                  run_numbers: facets.get(RUN_NUMBER)?,
                  start_run: facets.get_scalar(START_RUN)?,
                  end_run: facets.get_scalar(END_RUN)?,
                  visible: facets.get_scalar(VISIBLE)?,
                  replica: facets.get_scalar(REPLICA_FLAG)?,
                  start_date: facets.get_scalar(START_DATE)?,
                  end_date: facets.get_scalar(END_DATE)?,
                  tcks: facets.get(TCK)?,
                  job_start: facets.get_scalar(JOB_START_DATE)?,
                  job_end: facets.get_scalar(JOB_END_DATE)?,
                  step_id: facets.get(STEP_ID)?,
                  step_name: facets.get(STEP_NAME)?,
                  application_name: facets.get(APPLICATION_NAME)?,
                  application_version: facets.get(APPLICATION_VERSION)?,
                  usable: facets.get(USABLE)?,
                  sort,
                  paging })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sentinel_and_null_are_unconstrained() {
        let m = FacetMap::from_json(json!({"EventType": "ALL", "Production": null})).unwrap();
        assert_eq!(m.get::<i64>(names::EVENT_TYPE).unwrap(), Facet::Unconstrained);
        assert_eq!(m.get::<i64>(names::PRODUCTION).unwrap(), Facet::Unconstrained);
        assert_eq!(m.get::<i64>(names::RUN_NUMBER).unwrap(), Facet::Unconstrained);
    }

    #[test]
    fn list_and_scalar_shapes() {
        let m = FacetMap::new().with(names::RUN_NUMBER, json!([10, "20"])).with(names::EVENT_TYPE, 90000000);
        assert_eq!(m.get::<i64>(names::RUN_NUMBER).unwrap(), Facet::Many(vec![10, 20]));
        assert_eq!(m.get::<i64>(names::EVENT_TYPE).unwrap(), Facet::One(90000000));
    }

    #[test]
    fn malformed_tck_names_the_facet() {
        let m = FacetMap::new().with(names::TCK, json!({"bad": true}));
        let err = CatalogQuery::from_facets(&m).unwrap_err();
        assert_eq!(err.facet(), Some("TCK"));
    }

    #[test]
    fn sort_with_unknown_direction_fails() {
        let m = FacetMap::new().with(names::SORT, json!({"Items": "StepId", "Order": "Up"}));
        let err = CatalogQuery::from_facets(&m).unwrap_err();
        assert_eq!(err.facet(), Some("Sort"));
    }

    #[test]
    fn paging_requires_both_bounds() {
        let m = FacetMap::new().with(names::START_ITEM, 0);
        assert!(CatalogQuery::from_facets(&m).is_err());
        let m = FacetMap::new().with(names::START_ITEM, 0).with(names::MAX_ITEM, 25);
        let q = CatalogQuery::from_facets(&m).unwrap();
        assert_eq!(q.paging, Some(Paging { start_item: 0, max_item: 25 }));
    }

    #[test]
    fn processing_pass_must_be_scalar() {
        let m = FacetMap::new().with(names::PROCESSING_PASS, json!(["/Real Data", "/MC"]));
        assert_eq!(CatalogQuery::from_facets(&m).unwrap_err().facet(), Some("ProcessingPass"));
    }
}
