//! Catálogo en memoria.
//!
//! Backend de paridad para tests y demos: mantiene las tablas del esquema de
//! bookkeeping en memoria y evalúa directamente los AST de `Select`/`Insert`
//! (producto cruzado con filtrado temprano, DISTINCT, ORDER BY, paginación y
//! agregados sin GROUP BY). Los procedimientos que consume el motor de
//! procedencia se emulan con consultas sobre las mismas tablas.
//!
//! El texto SQL crudo (`query`) no se evalúa: se registra y se rechaza como
//! `Unsupported`. Todas las sentencias renderizadas quedan registradas en
//! `statements()` para inspección.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use bk_domain::{DataTakingCondition, FileRecord, Job, ProcessingPassNode, Production, ReplicaFlag,
                SimulationCondition, Step, Visibility};
use log::debug;

use super::{CatalogStore, Row, SqlValue, StoreError};
use crate::constants::procedures;
use crate::schema::{self, TABLES};
use crate::sql::{Column, Insert, OrderBy, Predicate, Select, SelectItem, TableRef};
use bk_domain::SortOrder;

struct MemTable {
    columns: Vec<&'static str>,
    key: Option<usize>,
    rows: Vec<Row>,
}

impl MemTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

pub struct InMemoryCatalog {
    tables: RwLock<HashMap<&'static str, MemTable>>,
    statements: Mutex<Vec<String>>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory catalog lock poisoned".into())
}

impl InMemoryCatalog {
    /// Catálogo vacío con todas las tablas del esquema.
    pub fn new() -> Self {
        let tables = TABLES.iter()
                           .map(|def| {
                               let key = def.key.and_then(|k| def.columns.iter().position(|c| *c == k));
                               (def.name, MemTable { columns: def.columns.to_vec(), key, rows: Vec::new() })
                           })
                           .collect();
        Self { tables: RwLock::new(tables), statements: Mutex::new(Vec::new()) }
    }

    /// Sentencias registradas, en orden de emisión.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn clear_statements(&self) {
        if let Ok(mut s) = self.statements.lock() {
            s.clear();
        }
    }

    fn record(&self, statement: String) {
        debug!("memory:statement {statement}");
        if let Ok(mut s) = self.statements.lock() {
            s.push(statement);
        }
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().ok().and_then(|t| t.get(table).map(|m| m.rows.len())).unwrap_or(0)
    }

    /// Inserta una fila; las columnas no mencionadas quedan en NULL.
    pub fn insert_row(&self, table: &str, values: &[(&str, SqlValue)]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let mt = tables.get_mut(table)
                       .ok_or_else(|| StoreError::Query(format!("table {table} does not exist")))?;
        let mut row: Row = vec![SqlValue::Null; mt.columns.len()];
        for (col, value) in values {
            let idx = mt.column_index(col)
                        .ok_or_else(|| StoreError::Query(format!("column {table}.{col} does not exist")))?;
            row[idx] = value.clone();
        }
        if let Some(k) = mt.key {
            if mt.rows.iter().any(|r| r[k].compare(&row[k]) == Some(Ordering::Equal)) {
                return Err(StoreError::Query(format!("unique constraint violated: {table}.{} = {}",
                                                     mt.columns[k],
                                                     row[k].render_literal())));
            }
        }
        mt.rows.push(row);
        Ok(())
    }

    fn single_value(&self, select: &Select) -> Result<Option<SqlValue>, StoreError> {
        Ok(self.eval_select(select)?.into_iter().next().and_then(|r| r.into_iter().next()))
    }

    /// Busca la fila cuyo `match_cols` coincide y devuelve su id; si no existe,
    /// la inserta con `max(id)+1`.
    fn lookup_or_insert(&self,
                        table: TableRef,
                        id: Column,
                        match_cols: &[(Column, SqlValue)])
                        -> Result<i64, StoreError> {
        let mut sel = Select::columns(&[id]);
        sel.tables.add(table);
        sel.filter = match_cols.iter().map(|(c, v)| Predicate::eq(*c, v.clone())).collect();
        if let Some(existing) = self.single_value(&sel)?.and_then(|v| v.as_i64()) {
            return Ok(existing);
        }
        let mut max = Select { items: vec![SelectItem::Max(id)], ..Default::default() };
        max.tables.add(table);
        let next = self.single_value(&max)?.and_then(|v| v.as_i64()).unwrap_or(0) + 1;
        let mut values: Vec<(&str, SqlValue)> = vec![(id.name, next.into())];
        values.extend(match_cols.iter().map(|(c, v)| (c.name, v.clone())));
        self.insert_row(table.name, &values)?;
        Ok(next)
    }

    pub fn add_processing_node(&self, node: &ProcessingPassNode) -> Result<(), StoreError> {
        self.insert_row("processing",
                        &[("id", node.id.into()), ("parentid", node.parent_id.into()), ("name", (&node.name).into())])
    }

    pub fn add_file_type(&self, name: &str) -> Result<i64, StoreError> {
        use schema::file_types::*;
        self.lookup_or_insert(schema::FILE_TYPES, FILETYPEID, &[(NAME, name.into())])
    }

    pub fn add_data_quality(&self, id: i64, flag: &str) -> Result<(), StoreError> {
        self.insert_row("dataquality", &[("qualityid", id.into()), ("dataqualityflag", flag.into())])
    }

    pub fn add_configuration(&self, name: &str, version: &str) -> Result<i64, StoreError> {
        use schema::configurations::*;
        self.lookup_or_insert(schema::CONFIGURATIONS,
                              CONFIGURATIONID,
                              &[(CONFIGNAME, name.into()), (CONFIGVERSION, version.into())])
    }

    pub fn add_simulation_condition(&self, cond: &SimulationCondition) -> Result<(), StoreError> {
        self.insert_row("simulationconditions",
                        &[("simid", cond.id.into()), ("simdescription", (&cond.description).into())])
    }

    pub fn add_data_taking_condition(&self, cond: &DataTakingCondition) -> Result<(), StoreError> {
        self.insert_row("data_taking_conditions",
                        &[("daqperiodid", cond.id.into()), ("description", (&cond.description).into())])
    }

    /// Registra la producción en `productionscontainer` y sus pasos en
    /// `stepscontainer`.
    pub fn add_production(&self, production: &Production) -> Result<(), StoreError> {
        use bk_domain::ConditionRef;
        let config_id = self.add_configuration(&production.configuration.name, &production.configuration.version)?;
        let (simid, daqid) = match production.condition {
            Some(ConditionRef::Simulation(id)) => (Some(id), None),
            Some(ConditionRef::DataTaking(id)) => (None, Some(id)),
            None => (None, None),
        };
        self.insert_row("productionscontainer",
                        &[("production", production.id.get().into()),
                          ("processingid", production.processing_pass_id.into()),
                          ("configurationid", config_id.into()),
                          ("simid", simid.into()),
                          ("daqperiodid", daqid.into())])?;
        for step in &production.steps {
            self.insert_row("stepscontainer",
                            &[("production", production.id.get().into()),
                              ("stepid", step.step_id.into()),
                              ("step", step.level.into())])?;
        }
        Ok(())
    }

    pub fn add_production_output(&self,
                                 production: i64,
                                 step_id: i64,
                                 event_type: i64,
                                 file_type: &str,
                                 visible: Visibility,
                                 replica: ReplicaFlag)
                                 -> Result<(), StoreError> {
        let ftype = self.add_file_type(file_type)?;
        self.insert_row("productionoutputfiles",
                        &[("production", production.into()),
                          ("stepid", step_id.into()),
                          ("eventtypeid", event_type.into()),
                          ("filetypeid", ftype.into()),
                          ("visible", visible.as_literal().into()),
                          ("gotreplica", replica.as_literal().into())])
    }

    /// Inserta el step y sus runtime projects, que deben existir de antemano.
    pub fn add_step(&self, step: &Step) -> Result<(), StoreError> {
        let known: HashSet<i64> = {
            let tables = self.tables.read().map_err(|_| poisoned())?;
            tables.get("steps")
                  .map(|t| t.rows.iter().filter_map(|r| r[0].as_i64()).collect())
                  .unwrap_or_default()
        };
        step.check_runtime_projects(|id| known.contains(&id))
            .map_err(|e| StoreError::Query(format!("foreign key violated: {e}")))?;
        self.insert_row("steps",
                        &[("stepid", step.id.into()),
                          ("stepname", (&step.name).into()),
                          ("applicationname", (&step.application_name).into()),
                          ("applicationversion", (&step.application_version).into()),
                          ("optionfiles", step.option_files.clone().into()),
                          ("dddb", step.dddb.clone().into()),
                          ("conddb", step.conddb.clone().into()),
                          ("extrapackages", step.extra_packages.clone().into()),
                          ("visible", step.visible.as_literal().into()),
                          ("usable", (&step.usable).into()),
                          ("dqtag", step.dq_tag.clone().into()),
                          ("optionsformat", step.options_format.clone().into()),
                          ("ismulticore", if step.is_multicore { "Y" } else { "N" }.into()),
                          ("systemconfig", step.system_config.clone().into()),
                          ("mctck", step.mc_tck.clone().into())])?;
        for rp in &step.runtime_projects {
            self.insert_row("runtimeprojects", &[("stepid", step.id.into()), ("runtimeprojectid", (*rp).into())])?;
        }
        Ok(())
    }

    pub fn add_job(&self, job: &Job) -> Result<(), StoreError> {
        self.insert_row("jobs",
                        &[("jobid", job.id.into()),
                          ("production", job.production.get().into()),
                          ("runnumber", job.run_number.into()),
                          ("fillnumber", job.fill_number.into()),
                          ("tck", job.tck.clone().into()),
                          ("workernode", job.worker_node.clone().into()),
                          ("jobstart", job.job_start.into()),
                          ("jobend", job.job_end.into()),
                          ("totalluminosity", job.total_luminosity.into())])?;
        for fid in &job.input_file_ids {
            self.insert_row("inputfiles", &[("jobid", job.id.into()), ("fileid", (*fid).into())])?;
        }
        Ok(())
    }

    pub fn add_file(&self, file: &FileRecord) -> Result<(), StoreError> {
        let ftype = self.add_file_type(&file.file_type)?;
        self.insert_row("files",
                        &[("fileid", file.id.into()),
                          ("filename", (&file.name).into()),
                          ("jobid", file.job_id.into()),
                          ("eventtypeid", file.event_type_id.into()),
                          ("filetypeid", ftype.into()),
                          ("filesize", file.file_size.into()),
                          ("eventstat", file.event_stat.into()),
                          ("fullstat", file.event_stat.into()),
                          ("luminosity", file.luminosity.into()),
                          ("instluminosity", file.inst_luminosity.into()),
                          ("adler32", file.adler32.clone().into()),
                          ("md5sum", file.md5sum.clone().into()),
                          ("guid", file.guid.clone().into()),
                          ("gotreplica", file.replica.as_literal().into()),
                          ("visibilityflag", file.visibility.as_literal().into()),
                          ("qualityid", file.quality_id.into()),
                          ("creationdate", file.insert_time.into()),
                          ("inserttimestamp", file.insert_time.into())])
    }

    fn eval_select(&self, sel: &Select) -> Result<Vec<Row>, StoreError> {
        if let Some(inner) = &sel.source {
            let rows = self.eval_select(inner)?;
            return match sel.items.as_slice() {
                [SelectItem::CountAll] => Ok(vec![vec![SqlValue::Int(rows.len() as i64)]]),
                other => Err(StoreError::Unsupported(format!("{other:?} over a subquery"))),
            };
        }
        let tables = self.tables.read().map_err(|_| poisoned())?;
        let mut refs: Vec<(TableRef, &MemTable)> = Vec::with_capacity(sel.tables.len());
        for t in sel.tables.iter() {
            let mt = tables.get(t.name)
                           .ok_or_else(|| StoreError::Query(format!("table {} does not exist", t.name)))?;
            refs.push((*t, mt));
        }
        let ctx = EvalCtx { refs: &refs };
        let conds: Vec<&Predicate> = sel.conditions().collect();
        let mut applied = vec![false; conds.len()];

        // Producto cruzado incremental; cada condición se aplica en cuanto
        // todas sus tablas están ligadas.
        let mut bindings: Vec<Vec<&Row>> = vec![Vec::new()];
        for (k, (_, mt)) in refs.iter().enumerate() {
            let bound: Vec<&str> = refs[..=k].iter().map(|(t, _)| t.alias).collect();
            let ready: Vec<usize> = (0..conds.len()).filter(|&i| {
                                                        !applied[i]
                                                        && conds[i].aliases().iter().all(|a| bound.contains(a))
                                                    })
                                                    .collect();
            let mut next = Vec::new();
            for b in &bindings {
                for row in &mt.rows {
                    let mut candidate = b.clone();
                    candidate.push(row);
                    let mut keep = true;
                    for &i in &ready {
                        if !ctx.eval(conds[i], &candidate)? {
                            keep = false;
                            break;
                        }
                    }
                    if keep {
                        next.push(candidate);
                    }
                }
            }
            for i in ready {
                applied[i] = true;
            }
            bindings = next;
        }
        if let Some(i) = applied.iter().position(|a| !a) {
            return Err(StoreError::Query(format!("unknown table alias in {}", conds[i].render())));
        }

        if !sel.order_by.is_empty() {
            let keys: Vec<((usize, usize), SortOrder)> =
                sel.order_by
                   .iter()
                   .map(|OrderBy { column, order }| ctx.resolve(*column).map(|pos| (pos, *order)))
                   .collect::<Result<_, _>>()?;
            bindings.sort_by(|a, b| {
                for ((t, c), order) in &keys {
                    let ord = compare_for_sort(&a[*t][*c], &b[*t][*c]);
                    let ord = if *order == SortOrder::Desc { ord.reverse() } else { ord };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        let mut rows: Vec<Row> = if sel.items.iter().any(SelectItem::is_aggregate) {
            vec![ctx.aggregate(&sel.items, &bindings)?]
        } else {
            let positions: Vec<(usize, usize)> = sel.items
                                                    .iter()
                                                    .map(|item| match item {
                                                        SelectItem::Column(c) => ctx.resolve(*c),
                                                        other => Err(StoreError::Unsupported(format!("{other:?}"))),
                                                    })
                                                    .collect::<Result<_, _>>()?;
            bindings.iter().map(|b| positions.iter().map(|(t, c)| b[*t][*c].clone()).collect()).collect()
        };

        if sel.distinct {
            let mut seen = HashSet::new();
            rows.retain(|r| seen.insert(format!("{r:?}")));
        }
        if let Some(p) = sel.paging {
            rows = rows.into_iter().skip(p.start_item as usize).take(p.max_item as usize).collect();
        }
        Ok(rows)
    }

    fn file_shape(filter: Vec<Predicate>, from_inputs: bool) -> Select {
        use schema::{file_types, files, input_files, jobs};
        let mut sel = Select::columns(&[files::FILENAME,
                                        files::GOTREPLICA,
                                        files::EVENTSTAT,
                                        files::EVENTTYPEID,
                                        files::LUMINOSITY,
                                        files::INSTLUMINOSITY,
                                        file_types::NAME,
                                        jobs::PRODUCTION]);
        if from_inputs {
            sel.tables.add(schema::INPUT_FILES);
        }
        sel.tables.add(schema::FILES);
        sel.tables.add(schema::FILE_TYPES);
        sel.tables.add(schema::JOBS);
        if from_inputs {
            sel.joins.push(Predicate::join(input_files::FILEID, files::FILEID));
        }
        sel.joins.push(Predicate::join(files::FILETYPEID, file_types::FILETYPEID));
        sel.joins.push(Predicate::join(files::JOBID, jobs::JOBID));
        sel.filter = filter;
        sel.order_by.push(OrderBy { column: files::FILEID, order: SortOrder::Asc });
        sel
    }

    fn emulate_procedure(&self, name: &str, args: &[SqlValue]) -> Result<Vec<Row>, StoreError> {
        use schema::{files, input_files};
        let arg = args.first()
                      .cloned()
                      .ok_or_else(|| StoreError::Procedure { name: name.into(), message: "missing argument".into() })?;
        let sel = match name {
            procedures::FILE_ID | procedures::PRODUCING_JOB => {
                let col = if name == procedures::FILE_ID { files::FILEID } else { files::JOBID };
                let mut sel = Select::columns(&[col]);
                sel.tables.add(schema::FILES);
                sel.filter.push(Predicate::eq(files::FILENAME, arg));
                sel
            }
            procedures::JOB_INPUT_FILES => Self::file_shape(vec![Predicate::eq(input_files::JOBID, arg)], true),
            procedures::JOB_OUTPUT_FILES => Self::file_shape(vec![Predicate::eq(files::JOBID, arg)], false),
            procedures::CONSUMING_JOBS => {
                let mut sel = Select::columns(&[input_files::JOBID]);
                sel.distinct = true;
                sel.tables.add(schema::INPUT_FILES);
                sel.tables.add(schema::FILES);
                sel.joins.push(Predicate::join(input_files::FILEID, files::FILEID));
                sel.filter.push(Predicate::eq(files::FILENAME, arg));
                sel.order_by.push(OrderBy { column: input_files::JOBID, order: SortOrder::Asc });
                sel
            }
            other => {
                return Err(StoreError::Procedure { name: other.into(), message: "unknown procedure".into() })
            }
        };
        self.eval_select(&sel)
    }
}

fn compare_for_sort(a: &SqlValue, b: &SqlValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

struct EvalCtx<'a> {
    refs: &'a [(TableRef, &'a MemTable)],
}

impl EvalCtx<'_> {
    /// Posición (tabla ligada, índice de columna) de una columna.
    fn resolve(&self, col: Column) -> Result<(usize, usize), StoreError> {
        let t = self.refs
                    .iter()
                    .position(|(r, _)| r.alias == col.alias)
                    .ok_or_else(|| StoreError::Query(format!("unknown table alias {}", col.alias)))?;
        let c = self.refs[t].1
                            .column_index(col.name)
                            .ok_or_else(|| StoreError::Query(format!("column {col} does not exist")))?;
        Ok((t, c))
    }

    fn value<'r>(&self, binding: &[&'r Row], col: Column) -> Result<&'r SqlValue, StoreError> {
        let (t, c) = self.resolve(col)?;
        Ok(&binding[t][c])
    }

    fn eval(&self, p: &Predicate, binding: &[&Row]) -> Result<bool, StoreError> {
        Ok(match p {
            Predicate::Compare(c, op, v) => {
                self.value(binding, *c)?.compare(v).map(|o| op.holds(o)).unwrap_or(false)
            }
            Predicate::ColumnEq(a, b) => {
                self.value(binding, *a)?.compare(self.value(binding, *b)?) == Some(Ordering::Equal)
            }
            Predicate::IsNull(c) => self.value(binding, *c)?.is_null(),
            Predicate::And(ps) => {
                for q in ps {
                    if !self.eval(q, binding)? {
                        return Ok(false);
                    }
                }
                true
            }
            Predicate::Or(ps) => {
                for q in ps {
                    if self.eval(q, binding)? {
                        return Ok(true);
                    }
                }
                false
            }
        })
    }

    fn aggregate(&self, items: &[SelectItem], bindings: &[Vec<&Row>]) -> Result<Row, StoreError> {
        items.iter()
             .map(|item| {
                 Ok(match item {
                     SelectItem::CountAll => SqlValue::Int(bindings.len() as i64),
                     SelectItem::Count(c) => {
                         let (t, i) = self.resolve(*c)?;
                         SqlValue::Int(bindings.iter().filter(|b| !b[t][i].is_null()).count() as i64)
                     }
                     SelectItem::Sum(c) => {
                         let (t, i) = self.resolve(*c)?;
                         let vals: Vec<&SqlValue> =
                             bindings.iter().map(|b| &b[t][i]).filter(|v| !v.is_null()).collect();
                         if vals.is_empty() {
                             SqlValue::Null
                         } else if vals.iter().all(|v| matches!(v, SqlValue::Int(_))) {
                             SqlValue::Int(vals.iter().filter_map(|v| v.as_i64()).sum())
                         } else {
                             SqlValue::Float(vals.iter().filter_map(|v| v.as_f64()).sum())
                         }
                     }
                     SelectItem::Max(c) => {
                         let (t, i) = self.resolve(*c)?;
                         bindings.iter()
                                 .map(|b| &b[t][i])
                                 .filter(|v| !v.is_null())
                                 .max_by(|a, b| compare_for_sort(a, b))
                                 .cloned()
                                 .unwrap_or(SqlValue::Null)
                     }
                     SelectItem::Column(c) => {
                         return Err(StoreError::Unsupported(format!("column {c} mixed with aggregates")))
                     }
                 })
             })
             .collect()
    }
}

impl CatalogStore for InMemoryCatalog {
    fn query(&self, sql: &str) -> Result<Vec<Row>, StoreError> {
        self.record(sql.to_string());
        Err(StoreError::Unsupported("in-memory catalog does not evaluate raw SQL text".into()))
    }

    fn call_procedure(&self,
                      name: &str,
                      args: &[SqlValue],
                      _expects_output: bool,
                      bulk: Option<&[SqlValue]>)
                      -> Result<Vec<Row>, StoreError> {
        let mut rendered: Vec<String> = args.iter().map(SqlValue::render_literal).collect();
        if let Some(b) = bulk {
            rendered.push(format!("ARRAY[{}]", b.iter().map(SqlValue::render_literal).collect::<Vec<_>>().join(", ")));
        }
        self.record(format!("CALL {name}({})", rendered.join(", ")));
        self.emulate_procedure(name, args)
    }

    fn select(&self, select: &Select) -> Result<Vec<Row>, StoreError> {
        self.record(select.to_sql());
        self.eval_select(select)
    }

    fn insert(&self, insert: &Insert) -> Result<(), StoreError> {
        self.record(insert.to_sql());
        if insert.columns.len() != insert.values.len() {
            return Err(StoreError::Query("column/value count mismatch".into()));
        }
        let values: Vec<(&str, SqlValue)> =
            insert.columns.iter().copied().zip(insert.values.iter().cloned()).collect();
        self.insert_row(insert.table, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_is_rejected() {
        let cat = InMemoryCatalog::new();
        let node = ProcessingPassNode { id: 1, name: "Real Data".into(), parent_id: None };
        cat.add_processing_node(&node).unwrap();
        let err = cat.add_processing_node(&node).unwrap_err();
        assert!(matches!(err, StoreError::Query(m) if m.contains("unique constraint")));
    }

    #[test]
    fn raw_sql_is_recorded_and_rejected() {
        let cat = InMemoryCatalog::new();
        assert!(matches!(cat.query("SELECT 1"), Err(StoreError::Unsupported(_))));
        assert_eq!(cat.statements(), vec!["SELECT 1".to_string()]);
    }

    #[test]
    fn distinct_count_matches_distinct_rows() {
        let cat = InMemoryCatalog::new();
        for (id, parent, name) in [(1, None, "A"), (2, Some(1), "C"), (3, Some(1), "C"), (4, Some(2), "D")] {
            cat.add_processing_node(&ProcessingPassNode { id, name: name.into(), parent_id: parent }).unwrap();
        }
        use crate::schema::processing::*;
        let mut sel = Select::columns(&[NAME]);
        sel.distinct = true;
        sel.tables.add(crate::schema::PROCESSING);
        sel.paging = Some(crate::sql::Paging { start_item: 0, max_item: 1 });
        assert_eq!(cat.select(&sel.to_count()).unwrap(), vec![vec![SqlValue::Int(3)]]);
        sel.distinct = false;
        assert_eq!(cat.select(&sel.to_count()).unwrap(), vec![vec![SqlValue::Int(4)]]);
    }

    #[test]
    fn select_filters_orders_and_pages() {
        let cat = InMemoryCatalog::new();
        for (id, parent, name) in [(1, None, "A"), (2, Some(1), "B"), (3, Some(1), "C"), (4, Some(2), "C")] {
            cat.add_processing_node(&ProcessingPassNode { id, name: name.into(), parent_id: parent }).unwrap();
        }
        use crate::schema::processing::*;
        let mut sel = Select::columns(&[ID]);
        sel.tables.add(crate::schema::PROCESSING);
        sel.filter.push(Predicate::eq(NAME, "C"));
        sel.order_by.push(OrderBy { column: ID, order: SortOrder::Desc });
        let rows = cat.select(&sel).unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Int(4)], vec![SqlValue::Int(3)]]);

        sel.paging = Some(crate::sql::Paging { start_item: 1, max_item: 5 });
        assert_eq!(cat.select(&sel).unwrap(), vec![vec![SqlValue::Int(3)]]);

        let mut roots = Select::columns(&[ID]);
        roots.tables.add(crate::schema::PROCESSING);
        roots.filter.push(Predicate::IsNull(PARENTID));
        assert_eq!(cat.select(&roots).unwrap(), vec![vec![SqlValue::Int(1)]]);
    }

    #[test]
    fn max_over_empty_table_is_null() {
        let cat = InMemoryCatalog::new();
        let mut sel = Select { items: vec![SelectItem::Max(crate::schema::processing::ID)], ..Default::default() };
        sel.tables.add(crate::schema::PROCESSING);
        assert_eq!(cat.select(&sel).unwrap(), vec![vec![SqlValue::Null]]);
    }
}
