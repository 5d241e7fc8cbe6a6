//! Region: compact membership index over a containment tree.
//!
//! A region is the caller-declared scope of a hierarchy build: a set of
//! elements meaning "this element and everything beneath it". Internally it
//! is an implicit trie over ancestor chains — one node per distinct chain
//! prefix ever inserted, arena-addressed to avoid parent/child ownership
//! cycles. A non-root node with no children is a *covering leaf*: every
//! element at or below it is in-region.
//!
//! Membership, insertion, and removal all cost O(chain depth). Adding a
//! broad element subsumes (discards) finer elements previously added
//! beneath it; adding a finer element under existing coverage is a no-op;
//! removal compacts the trie so no residual chain nodes remain.

use std::collections::BTreeMap;

use crate::element::{ElementId, ElementTree};

/// Index of the root sentinel node. The root represents "no restriction
/// inserted yet" and is never a covering leaf.
const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct RegionNode {
    /// Child element → arena index of its node. BTreeMap keeps
    /// [`Region::elements`] deterministic.
    children: BTreeMap<ElementId, usize>,
}

/// Compact membership index: a trie over element ancestor chains.
///
/// Not thread-safe; owned by a single builder invocation.
#[derive(Debug, Clone)]
pub struct Region {
    /// Node arena. Slots of compacted-away nodes stay allocated until the
    /// region is dropped; regions live for one logical query.
    nodes: Vec<RegionNode>,
}

impl Default for Region {
    fn default() -> Self {
        Region::new()
    }
}

impl Region {
    /// Create an empty region containing nothing.
    pub fn new() -> Self {
        Region {
            nodes: vec![RegionNode::default()],
        }
    }

    fn alloc(&mut self) -> usize {
        self.nodes.push(RegionNode::default());
        self.nodes.len() - 1
    }

    /// Add `element` (and implicitly everything beneath it) to the region.
    ///
    /// No-op if the element is already covered. Otherwise walks the ancestor
    /// chain top-down, creating one intermediate node per ancestor, then
    /// clears the element's own node — discarding any finer-grained
    /// elements previously added underneath it.
    pub fn add(&mut self, tree: &ElementTree, element: ElementId) {
        if self.contains(tree, element) {
            return;
        }
        let mut node = ROOT;
        for step in tree.ancestor_chain(element) {
            node = match self.nodes[node].children.get(&step) {
                Some(&next) => next,
                None => {
                    let next = self.alloc();
                    self.nodes[node].children.insert(step, next);
                    next
                }
            };
        }
        // The element's node becomes a covering leaf; prior sub-additions
        // are subsumed.
        self.nodes[node].children.clear();
    }

    /// Whether `element` is in-region (covered by some added element).
    ///
    /// Walks the ancestor chain resolving the most specific known node;
    /// true iff that node is a covering leaf and not the root sentinel.
    pub fn contains(&self, tree: &ElementTree, element: ElementId) -> bool {
        let mut node = ROOT;
        for step in tree.ancestor_chain(element) {
            match self.nodes[node].children.get(&step) {
                Some(&next) => node = next,
                // Chains are canonical, so an unknown step ends resolution.
                None => break,
            }
        }
        node != ROOT && self.nodes[node].children.is_empty()
    }

    /// Remove `element` from the region.
    ///
    /// Requires the exact chain to exist: removing an element that was never
    /// added at this granularity is a defined no-op returning `false`, even
    /// if a broader ancestor covers it. When the exact node exists, its
    /// children (finer sub-additions) are dropped and every newly childless
    /// node on the chain is deleted bottom-up, compacting the trie.
    ///
    /// Returns `true` iff the element itself was a covering leaf, i.e. had
    /// been explicitly added.
    pub fn remove(&mut self, tree: &ElementTree, element: ElementId) -> bool {
        let chain = tree.ancestor_chain(element);
        // (parent node, edge label, child node) per chain step.
        let mut path: Vec<(usize, ElementId, usize)> = Vec::with_capacity(chain.len());
        let mut node = ROOT;
        for step in chain {
            match self.nodes[node].children.get(&step) {
                Some(&next) => {
                    path.push((node, step, next));
                    node = next;
                }
                None => return false,
            }
        }
        let was_leaf = self.nodes[node].children.is_empty();
        self.nodes[node].children.clear();
        for (parent, step, child) in path.into_iter().rev() {
            if !self.nodes[child].children.is_empty() {
                break;
            }
            self.nodes[parent].children.remove(&step);
        }
        was_leaf
    }

    /// The maximal covering elements: the minimal generating set for this
    /// region, in deterministic order.
    pub fn elements(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_leaves(ROOT, &mut out);
        out
    }

    fn collect_leaves(&self, node: usize, out: &mut Vec<ElementId>) {
        for (&element, &child) in &self.nodes[node].children {
            if self.nodes[child].children.is_empty() {
                out.push(element);
            } else {
                self.collect_leaves(child, out);
            }
        }
    }

    /// Number of maximal covering elements.
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether the region contains nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }
}
