//! Resolución de rutas de processing pass sobre el bosque `processing`
//! (tabla plana con puntero al padre).
//!
//! Un nombre puede repetirse bajo padres distintos, así que una ruta sólo se
//! da por resuelta cuando la ruta completa reconstruida desde el nodo hasta
//! su raíz coincide con la pedida. La reconstrucción está acotada a
//! `MAX_PASS_HOPS` saltos.

use bk_domain::{PassPath, ProcessingPassNode};
use log::{debug, warn};

use super::allocator::NodeIdAllocator;
use crate::constants::MAX_PASS_HOPS;
use crate::errors::CatalogError;
use crate::facets::names;
use crate::schema::{self, processing};
use crate::sql::{Insert, OrderBy, Predicate, Select};
use crate::store::{CatalogStore, Row, SqlValue, StoreError};
use bk_domain::SortOrder;

pub struct PassResolver<S> {
    store: S,
}

fn node_from_row(row: &Row) -> Result<ProcessingPassNode, StoreError> {
    match row.as_slice() {
        [id, parent, name] => {
            let id = id.as_i64().ok_or_else(|| StoreError::Decode(format!("processing id {id:?}")))?;
            let parent_id = if parent.is_null() {
                None
            } else {
                Some(parent.as_i64().ok_or_else(|| StoreError::Decode(format!("processing parent {parent:?}")))?)
            };
            let name = name.as_str().ok_or_else(|| StoreError::Decode(format!("processing name {name:?}")))?;
            Ok(ProcessingPassNode { id, name: name.to_string(), parent_id })
        }
        other => Err(StoreError::Decode(format!("processing row has {} columns, expected 3", other.len()))),
    }
}

fn nodes_select(filter: Predicate) -> Select {
    let mut select = Select::columns(&[processing::ID, processing::PARENTID, processing::NAME]);
    select.tables.add(schema::PROCESSING);
    select.filter.push(filter);
    select.order_by.push(OrderBy { column: processing::ID, order: SortOrder::Asc });
    select
}

impl<S: CatalogStore> PassResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn nodes(&self, filter: Predicate) -> Result<Vec<ProcessingPassNode>, StoreError> {
        self.store.select(&nodes_select(filter))?.iter().map(node_from_row).collect()
    }

    pub fn node(&self, id: i64) -> Result<Option<ProcessingPassNode>, StoreError> {
        Ok(self.nodes(Predicate::eq(processing::ID, id))?.into_iter().next())
    }

    pub fn nodes_named(&self, name: &str) -> Result<Vec<ProcessingPassNode>, StoreError> {
        self.nodes(Predicate::eq(processing::NAME, name))
    }

    /// Hijos directos; `None` lista las raíces.
    pub fn children(&self, parent: Option<i64>) -> Result<Vec<ProcessingPassNode>, StoreError> {
        match parent {
            Some(id) => self.nodes(Predicate::eq(processing::PARENTID, id)),
            None => self.nodes(Predicate::IsNull(processing::PARENTID)),
        }
    }

    /// Ruta completa del nodo hasta su raíz. `None` si el recorrido supera
    /// `MAX_PASS_HOPS` saltos o encuentra un padre inexistente.
    pub fn full_path(&self, id: i64) -> Result<Option<PassPath>, StoreError> {
        let mut segments = Vec::new();
        let mut current = self.node(id)?;
        let mut hops = 0;
        while let Some(node) = current {
            segments.push(node.name);
            match node.parent_id {
                None => {
                    segments.reverse();
                    return Ok(Some(PassPath::from_segments(segments)));
                }
                Some(parent) => {
                    hops += 1;
                    if hops > MAX_PASS_HOPS {
                        warn!("passes:full_path node={id} exceeds {MAX_PASS_HOPS} hops");
                        return Ok(None);
                    }
                    current = self.node(parent)?;
                }
            }
        }
        warn!("passes:full_path node={id} has a dangling parent");
        Ok(None)
    }

    /// Todos los nodos cuya ruta completa es exactamente `path`, por id
    /// ascendente. Una ruta raíz no resuelve a ningún nodo.
    pub fn resolve_all(&self, path: &PassPath) -> Result<Vec<i64>, CatalogError> {
        let Some(first) = path.first() else {
            return Ok(Vec::new());
        };
        let mut frontier = self.nodes_named(first)?;
        for segment in &path.segments()[1..] {
            let mut next = Vec::new();
            for node in &frontier {
                next.extend(self.children(Some(node.id))?.into_iter().filter(|c| &c.name == segment));
            }
            frontier = next;
        }
        let mut matches = Vec::new();
        for leaf in frontier {
            if self.full_path(leaf.id)?.as_ref() == Some(path) {
                matches.push(leaf.id);
            }
        }
        matches.sort_unstable();
        matches.dedup();
        debug!("passes:resolve path={path} matches={}", matches.len());
        Ok(matches)
    }

    pub fn resolve_path(&self, path: &PassPath) -> Result<i64, CatalogError> {
        let matches = self.resolve_all(path)?;
        match matches.as_slice() {
            [] => Err(CatalogError::NotFound(format!("processing pass path not found: {path}"))),
            [id] => Ok(*id),
            [id, ..] => {
                warn!("passes:resolve path={path} ambiguous ids={matches:?}, using {id}");
                Ok(*id)
            }
        }
    }

    /// Crea los segmentos que falten de `path` y devuelve los ids nuevos, el
    /// más específico al final. Si la ruta ya existe completa devuelve una
    /// lista vacía.
    pub fn insert_path<A: NodeIdAllocator>(&self, path: &PassPath, allocator: &A) -> Result<Vec<i64>, CatalogError> {
        if path.is_root() {
            return Err(CatalogError::invalid(names::PROCESSING_PASS, "cannot insert an empty path"));
        }
        if path.depth() > MAX_PASS_HOPS + 1 {
            return Err(CatalogError::invalid(names::PROCESSING_PASS,
                                             format!("{path} is deeper than {} levels", MAX_PASS_HOPS + 1)));
        }
        let mut parent: Option<i64> = None;
        let mut created = Vec::new();
        for segment in path.segments() {
            let existing = self.children(parent)?.into_iter().find(|c| &c.name == segment);
            let id = match existing {
                Some(node) => node.id,
                None => {
                    let id = allocator.allocate(&self.store)?;
                    self.store.insert(&Insert { table: schema::PROCESSING.name,
                                                columns: vec![processing::ID.name,
                                                              processing::PARENTID.name,
                                                              processing::NAME.name],
                                                values: vec![id.into(),
                                                             SqlValue::from(parent),
                                                             segment.as_str().into()] })?;
                    created.push(id);
                    id
                }
            };
            parent = Some(id);
        }
        debug!("passes:insert path={path} created={created:?}");
        Ok(created)
    }

    /// Rutas completas del nodo y de todos los nodos alcanzables por debajo,
    /// en anchura.
    pub fn list_paths_from(&self, id: i64) -> Result<Vec<String>, CatalogError> {
        if self.node(id)?.is_none() {
            return Err(CatalogError::NotFound(format!("processing pass node {id}")));
        }
        let mut paths = Vec::new();
        let mut level = vec![id];
        for _ in 0..=MAX_PASS_HOPS {
            if level.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for node in level {
                if let Some(path) = self.full_path(node)? {
                    paths.push(path.to_string());
                }
                next.extend(self.children(Some(node))?.into_iter().map(|c| c.id));
            }
            level = next;
        }
        Ok(paths)
    }
}
