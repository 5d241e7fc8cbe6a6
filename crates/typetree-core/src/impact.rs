//! Change-impact filtering over a cached hierarchy.
//!
//! A built graph stays valid until the element model underneath it moves.
//! The filter is the caller-owned decision point: feed it every change
//! notification and it answers whether the cached graph has gone stale.
//! There is no listener registration and no global cache — the filter is
//! plain state, and after a rebuild the caller re-arms it with
//! [`reset`](ImpactFilter::reset).
//!
//! Staleness is deliberately coarse: once stale, the graph is discarded
//! and rebuilt whole. Only the decision to rebuild is incremental.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{ElementId, ElementTree};
use crate::graph::{HierarchyGraph, TypeName};
use crate::region::Region;
use crate::resolve::RelevanceChecker;

// ============================================================================
// Change Notifications
// ============================================================================

/// What happened to a changed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The element appeared.
    Added,
    /// The element disappeared.
    Removed,
    /// The element's content changed on disk.
    Modified,
    /// A working copy of the element was reconciled in memory.
    Reconciled,
}

/// One change notification from the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementChange {
    /// The element the change happened at.
    pub element: ElementId,
    /// What happened.
    pub kind: ChangeKind,
    /// Types declared by the changed unit, when the notifier knows them.
    /// Drives the tracked-type and missing-type checks; an empty list just
    /// skips those checks.
    pub declared_types: Vec<TypeName>,
}

impl ElementChange {
    /// A change with no declared-type detail.
    pub fn new(element: ElementId, kind: ChangeKind) -> Self {
        ElementChange {
            element,
            kind,
            declared_types: Vec::new(),
        }
    }

    /// Attach the types declared by the changed unit.
    pub fn with_declared_types(mut self, declared_types: Vec<TypeName>) -> Self {
        self.declared_types = declared_types;
        self
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Freshness of the cached hierarchy graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The cached graph still reflects the element model.
    Fresh,
    /// The cached graph must be discarded and rebuilt.
    Stale,
}

/// Decides whether a cached [`HierarchyGraph`] is invalidated by incoming
/// change notifications.
///
/// Snapshots the graph's tracked names, missing names, and focus at
/// construction; owns the region the graph was built against. Reusable
/// indefinitely — there is no terminal state.
#[derive(Debug)]
pub struct ImpactFilter {
    region: Region,
    focus: Option<TypeName>,
    tracked: HashSet<TypeName>,
    missing: HashSet<String>,
    state: Freshness,
}

impl ImpactFilter {
    /// Arm a filter for a freshly built `graph` and the `region` it was
    /// built against.
    pub fn new(region: Region, graph: &HierarchyGraph) -> Self {
        let tracked = graph
            .all_types()
            .into_iter()
            .filter_map(|ty| graph.name_of(ty).cloned())
            .collect();
        let missing = graph.missing_types().iter().cloned().collect();
        ImpactFilter {
            region,
            focus: graph.focus_type().cloned(),
            tracked,
            missing,
            state: Freshness::Fresh,
        }
    }

    /// Current freshness.
    pub fn state(&self) -> Freshness {
        self.state
    }

    /// Whether the cached graph must be discarded.
    pub fn is_stale(&self) -> bool {
        self.state == Freshness::Stale
    }

    /// Feed one change notification; returns whether the cached graph is
    /// stale now. Once stale, stays stale until [`reset`](Self::reset).
    pub fn notify<R: RelevanceChecker>(
        &mut self,
        tree: &ElementTree,
        relevance: &R,
        change: &ElementChange,
    ) -> bool {
        if self.state == Freshness::Stale {
            return true;
        }
        if self.affects_hierarchy(tree, relevance, change) {
            debug!(element = %change.element, kind = ?change.kind, "cached hierarchy went stale");
            self.state = Freshness::Stale;
        }
        self.is_stale()
    }

    fn affects_hierarchy<R: RelevanceChecker>(
        &self,
        tree: &ElementTree,
        relevance: &R,
        change: &ElementChange,
    ) -> bool {
        // A reconcile of a unit declaring a tracked type always triggers
        // re-evaluation, focus or not.
        if change.kind == ChangeKind::Reconciled
            && change
                .declared_types
                .iter()
                .any(|name| self.tracked.contains(name))
        {
            return true;
        }
        // A newly added unit can complete a previously unresolvable link.
        if change.kind == ChangeKind::Added
            && change
                .declared_types
                .iter()
                .any(|name| self.missing.contains(name.as_str()))
        {
            return true;
        }
        match &self.focus {
            Some(focus) => relevance.is_relevant(change.element, focus),
            None => self.region.contains(tree, change.element),
        }
    }

    /// Re-arm the filter after a rebuild.
    pub fn reset(&mut self, region: Region, graph: &HierarchyGraph) {
        *self = ImpactFilter::new(region, graph);
    }
}
