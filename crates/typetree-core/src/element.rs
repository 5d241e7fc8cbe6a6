//! Containment tree of opaque project elements.
//!
//! An element is a position in a containment hierarchy (workspace →
//! source root → package → source file). The hierarchy engine only needs
//! equality and parent lookup; kind and label exist for diagnostics and for
//! callers mapping their own project model onto the tree.
//!
//! Elements are arena-addressed: [`ElementId`] is an index into the tree's
//! node table, so parent and child lookups never form ownership cycles.

use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier for an element within one [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Create a new element ID.
    pub fn new(id: u32) -> Self {
        ElementId(id)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "elem_{}", self.0)
    }
}

// ============================================================================
// Element Kind
// ============================================================================

/// Kind of containment element.
///
/// The engine treats all kinds uniformly; the kind is carried for callers
/// and for diagnostics (e.g. distinguishing a source file from a compiled
/// class file in log output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Top-level container for everything the caller considers in scope.
    Workspace,
    /// A source or binary root (e.g. a source folder or an archive).
    SourceRoot,
    /// A package or namespace fragment under a root.
    Package,
    /// A source file holding type declarations.
    SourceFile,
    /// A compiled class file holding one type declaration.
    ClassFile,
}

// ============================================================================
// Element Tree
// ============================================================================

#[derive(Debug, Clone)]
struct ElementData {
    parent: Option<ElementId>,
    kind: ElementKind,
    label: String,
}

/// Arena-addressed containment tree.
///
/// IDs are allocated by [`insert_root`](ElementTree::insert_root) and
/// [`insert_child`](ElementTree::insert_child) and are only valid against
/// the tree that created them. Elements are never removed; the tree is a
/// read-consistent snapshot for the duration of one hierarchy build.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<ElementData>,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        ElementTree::default()
    }

    /// Insert a top-level element with no parent.
    pub fn insert_root(&mut self, kind: ElementKind, label: impl Into<String>) -> ElementId {
        self.insert(None, kind, label.into())
    }

    /// Insert an element under `parent`.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        kind: ElementKind,
        label: impl Into<String>,
    ) -> ElementId {
        debug_assert!((parent.0 as usize) < self.nodes.len());
        self.insert(Some(parent), kind, label.into())
    }

    fn insert(&mut self, parent: Option<ElementId>, kind: ElementKind, label: String) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(ElementData {
            parent,
            kind,
            label,
        });
        id
    }

    /// Parent of `element`, or `None` for a top-level element.
    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes[element.0 as usize].parent
    }

    /// Kind of `element`.
    pub fn kind(&self, element: ElementId) -> ElementKind {
        self.nodes[element.0 as usize].kind
    }

    /// Label of `element`.
    pub fn label(&self, element: ElementId) -> &str {
        &self.nodes[element.0 as usize].label
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ancestor chain of `element`, top-down, ending with `element` itself.
    pub fn ancestor_chain(&self, element: ElementId) -> Vec<ElementId> {
        let mut chain = vec![element];
        let mut current = element;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Whether `ancestor` is `element` itself or appears on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            current = self.parent(e);
        }
        false
    }
}
