use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use bk_domain::FileMetadata;

use super::{clamp_depth, Expansion, ProvenanceGraph};
use crate::store::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AncestorsResult {
    pub successful: IndexMap<String, Vec<String>>,
    pub failed: Vec<String>,
    pub with_metadata: IndexMap<String, IndexMap<String, FileMetadata>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub store_errors: IndexMap<String, String>,
}

/// Expande `lfn` hacia atrás `depth` niveles. `None` si no tiene job
/// productor.
pub fn expand_ancestors<G: ProvenanceGraph + ?Sized>(graph: &G,
                                                     lfn: &str,
                                                     depth: usize,
                                                     check_replica: bool)
                                                     -> Result<Option<Expansion>, StoreError> {
    if depth == 0 {
        return Ok(Some(Expansion::default()));
    }
    let Some(job) = graph.producing_job(lfn)? else {
        return Ok(None);
    };
    let mut expansion = Expansion::default();
    for input in graph.job_inputs(job)? {
        expansion.record(&input, !check_replica || input.metadata.has_replica());
        match expand_ancestors(graph, &input.name, depth - 1, check_replica)? {
            Some(deeper) => expansion.merge(deeper),
            None => debug!("ancestors:leaf lfn={} has no producing job", input.name),
        }
    }
    Ok(Some(expansion))
}

/// Ancestros de cada semilla. Un fallo en una semilla no afecta al resto.
pub fn ancestors<G: ProvenanceGraph + ?Sized>(graph: &G,
                                              lfns: &[String],
                                              depth: i64,
                                              check_replica: bool)
                                              -> AncestorsResult {
    let depth = clamp_depth(depth);
    let mut result = AncestorsResult::default();
    for lfn in lfns {
        if result.successful.contains_key(lfn) || result.failed.contains(lfn) {
            continue;
        }
        debug!("ancestors:seed lfn={lfn} depth={depth}");
        match expand_ancestors(graph, lfn, depth, check_replica) {
            Ok(Some(expansion)) => {
                result.successful.insert(lfn.clone(), expansion.names.into_iter().collect());
                result.with_metadata.insert(lfn.clone(), expansion.metadata);
            }
            Ok(None) => result.failed.push(lfn.clone()),
            Err(e) => {
                warn!("ancestors:seed lfn={lfn} store error: {e}");
                result.failed.push(lfn.clone());
                result.store_errors.insert(lfn.clone(), e.to_string());
            }
        }
    }
    result
}
