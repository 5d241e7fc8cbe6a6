//! Dead-branch pruning.
//!
//! A freshly built graph contains every type reachable from the region's
//! declarations, including whole branches that exist only because a shared
//! ancestor dragged them in. Pruning shrinks the graph in place to the
//! subgraph the region actually needs: every surviving type is either
//! in-region itself or an ancestor (via subtype edges) of a surviving
//! in-region type.
//!
//! The walk is bottom-up: a type's subtypes are pruned before the type's
//! own deadness is evaluated, and the subtype list is copied before
//! recursing because pruning children mutates it. A visited set makes the
//! walk cycle-tolerant. Running the pass again on an already-pruned graph
//! changes nothing.

use std::collections::HashSet;

use crate::element::ElementTree;
use crate::graph::{HierarchyGraph, TypeId};
use crate::region::Region;

/// Prune `graph` in place against `region`; returns how many types were
/// removed.
pub(crate) fn prune_dead_branches(
    graph: &mut HierarchyGraph,
    tree: &ElementTree,
    region: &Region,
) -> usize {
    let roots: Vec<TypeId> = graph
        .all_types()
        .into_iter()
        .filter(|&ty| graph.supertypes_of(ty).is_empty())
        .collect();
    let mut visited = HashSet::new();
    let mut removed = 0;
    for root in roots {
        prune_subtree(graph, tree, region, root, &mut visited, &mut removed);
    }
    removed
}

fn prune_subtree(
    graph: &mut HierarchyGraph,
    tree: &ElementTree,
    region: &Region,
    ty: TypeId,
    visited: &mut HashSet<TypeId>,
    removed: &mut usize,
) {
    if !visited.insert(ty) {
        return;
    }
    // Copy before recursing: pruning a child edits this list in place.
    let children: Vec<TypeId> = graph.subtypes_of(ty).to_vec();
    for child in children {
        prune_subtree(graph, tree, region, child, visited, removed);
    }
    let dead = graph.subtypes_of(ty).is_empty();
    if dead && !in_region(graph, tree, region, ty) {
        graph.remove_type(ty);
        *removed += 1;
    }
}

/// A type is in-region when its declaring element is covered by the
/// region. Placeholder types with no declaration are never in-region.
fn in_region(graph: &HierarchyGraph, tree: &ElementTree, region: &Region, ty: TypeId) -> bool {
    graph
        .entry(ty)
        .and_then(|e| e.declared_in)
        .is_some_and(|element| region.contains(tree, element))
}
