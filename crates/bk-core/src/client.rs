//! Fachada `Bookkeeping`: las operaciones públicas del núcleo.
//!
//! Cada listado compone sus facetas sobre una `Composition`, emite una única
//! consulta por el store de lectura (más un recuento cuando hay paginación) y
//! pasa las filas por el shaper. Las escrituras (rutas de processing pass) van
//! por el store de escritura.

use bk_domain::{PassPath, SortOrder, Step, Visibility};
use chrono::{NaiveDateTime, Utc};
use log::debug;

use crate::composer::{self, Composition};
use crate::errors::CatalogError;
use crate::facets::{names, CatalogQuery, FacetMap};
use crate::passes::{MaxPlusOne, NodeIdAllocator, PassResolver};
use crate::provenance::{self, AncestorsResult, DescendantsResult, StoreProvenance};
use crate::schema::{self, data_quality, file_types, files, jobs, production_output, runtime_projects, steps,
                    steps_container};
use crate::shaper::{self, ShapedResult};
use crate::sql::{CmpOp, Column, OrderBy, Paging, Predicate, Select, SelectItem};
use crate::store::{CatalogStore, Row, SqlValue, StoreError};

/// Reloj usado como fin implícito de los rangos de fecha abiertos.
pub type Clock = fn() -> NaiveDateTime;

pub fn system_clock() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub const FILE_COLUMNS: &[(&str, Column)] = &[("FileName", files::FILENAME),
                                               ("EventStat", files::EVENTSTAT),
                                               ("FileSize", files::FILESIZE),
                                               ("CreationDate", files::CREATIONDATE),
                                               ("JobStart", jobs::JOBSTART),
                                               ("JobEnd", jobs::JOBEND),
                                               ("WorkerNode", jobs::WORKERNODE),
                                               ("FileType", file_types::NAME),
                                               ("RunNumber", jobs::RUNNUMBER),
                                               ("FillNumber", jobs::FILLNUMBER),
                                               ("FullStat", files::FULLSTAT),
                                               ("DataqualityFlag", data_quality::DATAQUALITYFLAG),
                                               ("EventInputStat", files::EVENTINPUTSTAT),
                                               ("TotalLuminosity", jobs::TOTALLUMINOSITY),
                                               ("Luminosity", files::LUMINOSITY),
                                               ("InstLuminosity", files::INSTLUMINOSITY),
                                               ("TCK", jobs::TCK),
                                               ("GUID", files::GUID),
                                               ("ADLER32", files::ADLER32),
                                               ("EventType", files::EVENTTYPEID),
                                               ("MD5SUM", files::MD5SUM),
                                               ("VisibilityFlag", files::VISIBILITYFLAG),
                                               ("JobId", jobs::JOBID),
                                               ("GotReplica", files::GOTREPLICA),
                                               ("InsertTimeStamp", files::INSERTTIMESTAMP)];

pub const STEP_COLUMNS: &[(&str, Column)] = &[("StepId", steps::STEPID),
                                               ("StepName", steps::STEPNAME),
                                               ("ApplicationName", steps::APPLICATIONNAME),
                                               ("ApplicationVersion", steps::APPLICATIONVERSION),
                                               ("OptionFiles", steps::OPTIONFILES),
                                               ("DDDB", steps::DDDB),
                                               ("CONDDB", steps::CONDDB),
                                               ("ExtraPackages", steps::EXTRAPACKAGES),
                                               ("Visible", steps::VISIBLE),
                                               ("ProcessingPass", steps::PROCESSINGPASS),
                                               ("Usable", steps::USABLE),
                                               ("DQTag", steps::DQTAG),
                                               ("OptionsFormat", steps::OPTIONSFORMAT),
                                               ("isMulticore", steps::ISMULTICORE),
                                               ("SystemConfig", steps::SYSTEMCONFIG),
                                               ("mcTCK", steps::MCTCK)];

const SUMMARY_NAMES: &[&str] = &["NbofFiles", "NumberOfEvents", "FileSize", "Luminosity", "InstLuminosity"];

fn split(columns: &[(&'static str, Column)]) -> (Vec<&'static str>, Vec<Column>) {
    columns.iter().copied().unzip()
}

fn opt_text(v: &SqlValue) -> Option<String> {
    v.as_str().map(str::to_string)
}

fn req_text(v: &SqlValue, field: &str) -> Result<String, StoreError> {
    opt_text(v).ok_or_else(|| StoreError::Decode(format!("{field} is not text: {v:?}")))
}

fn decode_step(row: &Row, runtime_projects: Vec<i64>) -> Result<Step, StoreError> {
    if row.len() != STEP_COLUMNS.len() {
        return Err(StoreError::Decode(format!("step row has {} columns", row.len())));
    }
    let id = row[0].as_i64().ok_or_else(|| StoreError::Decode(format!("step id {:?}", row[0])))?;
    let visible = match Visibility::parse(&req_text(&row[8], "visible")?) {
        Ok(Some(v)) => v,
        _ => return Err(StoreError::Decode(format!("step {id} visible flag {:?}", row[8]))),
    };
    Ok(Step { id,
              name: req_text(&row[1], "stepname")?,
              application_name: req_text(&row[2], "applicationname")?,
              application_version: req_text(&row[3], "applicationversion")?,
              option_files: opt_text(&row[4]),
              dddb: opt_text(&row[5]),
              conddb: opt_text(&row[6]),
              extra_packages: opt_text(&row[7]),
              visible,
              usable: opt_text(&row[10]).unwrap_or_default(),
              dq_tag: opt_text(&row[11]),
              options_format: opt_text(&row[12]),
              is_multicore: row[13].as_str() == Some("Y"),
              system_config: opt_text(&row[14]),
              mc_tck: opt_text(&row[15]),
              runtime_projects })
}

pub struct Bookkeeping<S> {
    reader: S,
    writer: S,
    clock: Clock,
}

impl<S: CatalogStore + Clone> Bookkeeping<S> {
    /// Lectura y escritura por el mismo store.
    pub fn new(store: S) -> Self {
        Self::with_stores(store.clone(), store)
    }
}

impl<S: CatalogStore> Bookkeeping<S> {
    pub fn with_stores(reader: S, writer: S) -> Self {
        Self { reader, writer, clock: system_clock }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn reader(&self) -> &S {
        &self.reader
    }

    pub fn writer(&self) -> &S {
        &self.writer
    }

    /// Facetas comunes a archivos y producciones.
    fn compose_catalog(&self,
                       q: &CatalogQuery,
                       comp: Composition,
                       use_primary_tables: bool)
                       -> Result<Composition, CatalogError> {
        let up = use_primary_tables;
        let resolver = PassResolver::new(&self.reader);
        let comp = composer::config_name(&q.config_name, comp, up)?;
        let comp = composer::config_version(&q.config_version, comp, up)?;
        let comp = composer::condition_description(&q.condition_description, comp, up, &self.reader)?;
        let comp = composer::conditions(&q.simulation_condition, &q.data_taking_condition, comp, up)?;
        let comp = composer::processing_pass(&q.processing_pass, comp, up, &resolver)?;
        let comp = composer::event_type(&q.event_type, comp, up)?;
        let comp = composer::production(&q.production, comp, up)?;
        let comp = composer::file_type(&q.file_type, comp, up)?;
        let comp = composer::visibility(&q.visible, comp, up)?;
        composer::replica(&q.replica, comp, up)
    }

    fn compose_files(&self, q: &CatalogQuery) -> Result<Composition, CatalogError> {
        let comp = self.compose_catalog(q, Composition::primary(), true)?;
        let comp = composer::data_quality(&q.data_quality, comp, true)?;
        let comp = composer::run_numbers(&q.run_numbers, &q.start_run, &q.end_run, comp, true)?;
        let comp = composer::date_range(&q.start_date, &q.end_date, comp, true, (self.clock)())?;
        let comp = composer::tcks(&q.tcks, comp, true)?;
        composer::job_times(&q.job_start, &q.job_end, comp, true)
    }

    fn count(&self, select: &Select) -> Result<u64, CatalogError> {
        let rows = self.reader.select(&select.to_count())?;
        rows.first()
            .and_then(|r| r.first())
            .and_then(SqlValue::as_i64)
            .map(|n| n.max(0) as u64)
            .ok_or_else(|| StoreError::Decode("COUNT(*) returned no value".into()).into())
    }

    fn listing(&self,
               mut select: Select,
               names: &[&str],
               paging: Option<Paging>,
               always_count: bool)
               -> Result<ShapedResult, CatalogError> {
        let total = if paging.is_some() || always_count { Some(self.count(&select)?) } else { None };
        select.paging = paging;
        let rows = self.reader.select(&select)?;
        let shaped = match total {
            Some(t) => shaper::paged(names, rows, t)?,
            None => shaper::shape(names, rows)?,
        };
        Ok(shaped)
    }

    /// Búsqueda facetada de archivos sobre las tablas primarias.
    pub fn find(&self, facets: &FacetMap) -> Result<ShapedResult, CatalogError> {
        debug!("find:start facets={}", facets.len());
        let q = CatalogQuery::from_facets(facets)?;
        let comp = self.compose_files(&q)?.ensure_file_types(true).ensure_data_quality(true);
        let (names, columns) = split(FILE_COLUMNS);
        let order = composer::sort(q.sort.as_ref(), FILE_COLUMNS)?;
        let mut select = comp.into_select(&columns);
        select.order_by.push(order.unwrap_or(OrderBy { column: files::FILENAME, order: SortOrder::Asc }));
        let result = self.listing(select, &names, q.paging, false)?;
        debug!("find:done records={} total={}", result.records.len(), result.total_records);
        Ok(result)
    }

    /// Listado de steps; `TotalRecords` sale de un `COUNT(*)` con el mismo
    /// filtro, previo a la paginación.
    pub fn get_available_steps(&self, facets: &FacetMap) -> Result<ShapedResult, CatalogError> {
        debug!("steps:start facets={}", facets.len());
        let q = CatalogQuery::from_facets(facets)?;
        let comp = composer::step_facets(&q, Composition::steps(), (self.clock)())?;
        let (names, columns) = split(STEP_COLUMNS);
        let order = composer::sort(q.sort.as_ref(), STEP_COLUMNS)?;
        let mut select = comp.into_select(&columns);
        select.order_by.push(order.unwrap_or(OrderBy { column: steps::STEPID, order: SortOrder::Desc }));
        self.listing(select, &names, q.paging, true)
    }

    pub fn get_step(&self, step_id: i64) -> Result<Step, CatalogError> {
        let (_, columns) = split(STEP_COLUMNS);
        let mut select = Select::columns(&columns);
        select.tables.add(schema::STEPS);
        select.filter.push(Predicate::eq(steps::STEPID, step_id));
        let Some(row) = self.reader.select(&select)?.into_iter().next() else {
            return Err(CatalogError::NotFound(format!("step {step_id}")));
        };
        let mut rp = Select::columns(&[runtime_projects::RUNTIMEPROJECTID]);
        rp.tables.add(schema::RUNTIME_PROJECTS);
        rp.filter.push(Predicate::eq(runtime_projects::STEPID, step_id));
        rp.order_by.push(OrderBy { column: runtime_projects::RUNTIMEPROJECTID, order: SortOrder::Asc });
        let runtime: Vec<i64> = self.reader
                                    .select(&rp)?
                                    .iter()
                                    .filter_map(|r| r.first().and_then(SqlValue::as_i64))
                                    .collect();
        Ok(decode_step(&row, runtime)?)
    }

    /// Producciones distintas sobre la vista de salidas de producción.
    pub fn get_productions(&self, facets: &FacetMap) -> Result<ShapedResult, CatalogError> {
        let q = CatalogQuery::from_facets(facets)?;
        let comp = self.compose_catalog(&q, Composition::view(), false)?;
        let mut select = comp.into_select(&[production_output::PRODUCTION]);
        select.distinct = true;
        select.order_by.push(OrderBy { column: production_output::PRODUCTION, order: SortOrder::Asc });
        self.listing(select, &["Production/RunNumber"], None, false)
    }

    /// Runs distintos de producciones de datos reales (id negativo).
    pub fn get_runs(&self, facets: &FacetMap) -> Result<ShapedResult, CatalogError> {
        let q = CatalogQuery::from_facets(facets)?;
        let comp = self.compose_files(&q)?.and(Predicate::cmp(jobs::PRODUCTION, CmpOp::Lt, 0i64));
        let mut select = comp.into_select(&[jobs::RUNNUMBER]);
        select.distinct = true;
        select.order_by.push(OrderBy { column: jobs::RUNNUMBER, order: SortOrder::Asc });
        self.listing(select, &["RunNumber"], None, false)
    }

    /// Número de archivos y sumas de eventos, tamaño y luminosidad.
    pub fn get_files_summary(&self, facets: &FacetMap) -> Result<ShapedResult, CatalogError> {
        let q = CatalogQuery::from_facets(facets)?;
        let mut select = self.compose_files(&q)?.into_select(&[]);
        select.items = vec![SelectItem::Count(files::FILEID),
                            SelectItem::Sum(files::EVENTSTAT),
                            SelectItem::Sum(files::FILESIZE),
                            SelectItem::Sum(files::LUMINOSITY),
                            SelectItem::Sum(files::INSTLUMINOSITY)];
        self.listing(select, SUMMARY_NAMES, None, false)
    }

    /// Secuencia de steps de una producción, por nivel.
    pub fn get_production_steps(&self, production: i64) -> Result<ShapedResult, CatalogError> {
        let mut columns: Vec<(&str, Column)> = STEP_COLUMNS[..9].to_vec();
        columns.push(("Level", steps_container::STEP));
        let (names, cols) = split(&columns);
        let mut select = Select::columns(&cols);
        select.tables.add(schema::STEPS_CONTAINER);
        select.tables.add(schema::STEPS);
        select.joins.push(Predicate::join(steps_container::STEPID, steps::STEPID));
        select.filter.push(Predicate::eq(steps_container::PRODUCTION, production));
        select.order_by.push(OrderBy { column: steps_container::STEP, order: SortOrder::Asc });
        self.listing(select, &names, None, false)
    }

    fn parse_path(raw: &str) -> Result<PassPath, CatalogError> {
        PassPath::parse(raw).map_err(|e| CatalogError::from_domain(names::PROCESSING_PASS, e))
    }

    pub fn resolve_processing_pass_id(&self, path: &str) -> Result<i64, CatalogError> {
        let path = Self::parse_path(path)?;
        if path.is_root() {
            return Err(CatalogError::invalid(names::PROCESSING_PASS, "the root path has no node"));
        }
        PassResolver::new(&self.reader).resolve_path(&path)
    }

    /// Registra la ruta con el asignador `MAX(id)+1`. Las llamadas
    /// concurrentes deben serializarse fuera del núcleo.
    pub fn add_processing_pass_path(&self, path: &str) -> Result<Vec<i64>, CatalogError> {
        self.add_processing_pass_path_with(path, &MaxPlusOne)
    }

    pub fn add_processing_pass_path_with<A: NodeIdAllocator>(&self,
                                                             path: &str,
                                                             allocator: &A)
                                                             -> Result<Vec<i64>, CatalogError> {
        let path = Self::parse_path(path)?;
        debug!("passes:add path={path}");
        PassResolver::new(&self.writer).insert_path(&path, allocator)
    }

    pub fn list_processing_paths(&self, node_id: i64) -> Result<Vec<String>, CatalogError> {
        PassResolver::new(&self.reader).list_paths_from(node_id)
    }

    /// Hijos directos de una ruta; la raíz lista los árboles.
    pub fn list_processing_pass_children(&self, path: &str) -> Result<ShapedResult, CatalogError> {
        let path = Self::parse_path(path)?;
        let resolver = PassResolver::new(&self.reader);
        let parent = if path.is_root() { None } else { Some(resolver.resolve_path(&path)?) };
        let rows = resolver.children(parent)?
                           .into_iter()
                           .map(|n| vec![SqlValue::Int(n.id), SqlValue::Text(n.name)])
                           .collect();
        Ok(shaper::shape(&["ID", "Name"], rows)?)
    }

    pub fn get_file_ancestors(&self, lfns: &[String], depth: i64, check_replica: bool) -> AncestorsResult {
        provenance::ancestors(&StoreProvenance::new(&self.reader), lfns, depth, check_replica)
    }

    pub fn get_file_descendants(&self,
                                lfns: &[String],
                                depth: i64,
                                production: i64,
                                check_replica: bool)
                                -> DescendantsResult {
        provenance::descendants(&StoreProvenance::new(&self.reader), lfns, depth, production, check_replica)
    }
}
