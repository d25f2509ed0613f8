use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use bk_domain::FileMetadata;

use super::{clamp_depth, Expansion, ProvenanceGraph};
use crate::store::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescendantsResult {
    pub successful: IndexMap<String, Vec<String>>,
    pub failed: Vec<String>,
    pub not_processed: Vec<String>,
    pub with_metadata: IndexMap<String, IndexMap<String, FileMetadata>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub store_errors: IndexMap<String, String>,
}

/// Resultado de expandir un archivo hacia delante.
#[derive(Debug, Clone, PartialEq)]
pub enum Descent {
    Expanded(Expansion),
    /// El archivo no existe en el catálogo.
    Unknown,
    /// Ningún job lo consume, o los que lo consumen no tienen salidas.
    NotProcessed,
}

/// Alcance de producción de una rama. `production == 0` no restringe.
/// Una vez que la rama ha entrado en la producción buscada (`found`), sólo
/// sigue por descendientes de esa misma producción.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionScope {
    pub production: i64,
    pub found: bool,
}

impl ProductionScope {
    pub fn new(production: i64) -> Self {
        Self { production, found: false }
    }

    fn is_target(&self, metadata: &FileMetadata) -> bool {
        self.production != 0 && metadata.production.map(|p| p.get()) == Some(self.production)
    }

    /// `None` si la rama debe descartar el archivo; si no, el alcance con el
    /// que seguir bajando.
    fn step(self, metadata: &FileMetadata) -> Option<Self> {
        let in_target = self.is_target(metadata);
        if self.found && !in_target {
            return None;
        }
        Some(Self { found: self.found || in_target, ..self })
    }
}

pub fn expand_descendants<G: ProvenanceGraph + ?Sized>(graph: &G,
                                                       lfn: &str,
                                                       depth: usize,
                                                       mut scope: ProductionScope,
                                                       check_replica: bool)
                                                       -> Result<Descent, StoreError> {
    if depth == 0 {
        return Ok(Descent::Expanded(Expansion::default()));
    }
    if graph.file_id(lfn)?.is_none() {
        return Ok(Descent::Unknown);
    }
    let jobs = graph.consuming_jobs(lfn)?;
    let mut expansion = Expansion::default();
    let mut any_output = false;
    for job in jobs {
        let outputs = graph.job_outputs(job)?;
        any_output |= !outputs.is_empty();
        for output in outputs {
            let Some(next_scope) = scope.step(&output.metadata) else {
                continue;
            };
            // Los hermanos posteriores heredan el alcance ya encontrado.
            if next_scope.found {
                scope = next_scope;
            }
            expansion.record(&output, !check_replica || output.metadata.has_replica());
            match expand_descendants(graph, &output.name, depth - 1, next_scope, check_replica)? {
                Descent::Expanded(deeper) => expansion.merge(deeper),
                other => debug!("descendants:leaf lfn={} {other:?}", output.name),
            }
        }
    }
    if !any_output {
        return Ok(Descent::NotProcessed);
    }
    Ok(Descent::Expanded(expansion))
}

/// Descendientes de cada semilla, con el mismo aislamiento por semilla que
/// `ancestors`.
pub fn descendants<G: ProvenanceGraph + ?Sized>(graph: &G,
                                                lfns: &[String],
                                                depth: i64,
                                                production: i64,
                                                check_replica: bool)
                                                -> DescendantsResult {
    let depth = clamp_depth(depth);
    let mut result = DescendantsResult::default();
    for lfn in lfns {
        if result.successful.contains_key(lfn) || result.failed.contains(lfn) || result.not_processed.contains(lfn) {
            continue;
        }
        debug!("descendants:seed lfn={lfn} depth={depth} production={production}");
        match expand_descendants(graph, lfn, depth, ProductionScope::new(production), check_replica) {
            Ok(Descent::Expanded(expansion)) => {
                result.successful.insert(lfn.clone(), expansion.names.into_iter().collect());
                result.with_metadata.insert(lfn.clone(), expansion.metadata);
            }
            Ok(Descent::Unknown) => result.failed.push(lfn.clone()),
            Ok(Descent::NotProcessed) => result.not_processed.push(lfn.clone()),
            Err(e) => {
                warn!("descendants:seed lfn={lfn} store error: {e}");
                result.failed.push(lfn.clone());
                result.store_errors.insert(lfn.clone(), e.to_string());
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use bk_domain::ProductionId;

    fn meta(production: i64) -> FileMetadata {
        FileMetadata { event_stat: None,
                       event_type: None,
                       luminosity: None,
                       inst_luminosity: None,
                       file_type: None,
                       got_replica: Some("Yes".into()),
                       production: Some(ProductionId(production)) }
    }

    #[test]
    fn scope_is_sticky_once_found() {
        let scope = ProductionScope::new(5);
        let entered = scope.step(&meta(5)).unwrap();
        assert!(entered.found);
        assert_eq!(entered.step(&meta(6)), None);
        assert!(scope.step(&meta(6)).is_some_and(|s| !s.found));
    }

    #[test]
    fn zero_production_never_restricts() {
        let scope = ProductionScope::new(0);
        assert_eq!(scope.step(&meta(0)), Some(scope));
    }
}
