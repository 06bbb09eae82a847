use std::collections::HashSet;

use crate::error::CollectError;
use crate::models::DependencyId;

pub mod go;

/// Dependency-graph query of the build tool.
pub trait BuildGraph {
    /// Transitive dependency closure of `targets`, in the tool's order.
    fn dependencies(&self, targets: &[String]) -> Result<Vec<String>, CollectError>;

    /// The members of `ids` that are not part of the standard library.
    fn non_standard(&self, ids: &[String]) -> Result<Vec<String>, CollectError>;
}

/// Collect the non-standard transitive dependencies of `targets`.
///
/// Order follows the build graph; only exact duplicates are removed.
pub fn collect(graph: &dyn BuildGraph, targets: &[String]) -> Result<Vec<DependencyId>, CollectError> {
    let closure = graph.dependencies(targets)?;
    if closure.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let ids = graph
        .non_standard(&closure)?
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .map(DependencyId::new)
        .collect();

    Ok(ids)
}
