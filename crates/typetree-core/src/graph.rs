//! Hierarchy graph: the class/interface lattice.
//!
//! Types live in one arena-style table keyed by [`TypeId`]; edges are
//! adjacency lists of ids, never owning references. Three maps carry the
//! lattice: type → direct subtypes (ordered, duplicate-free), class →
//! superclass, type → superinterfaces. Every mutator keeps the subtype map
//! and the super maps bidirectionally consistent, and self-edges from
//! malformed input are refused at insertion.
//!
//! Provides:
//! - O(1) lookup by id and by qualified name
//! - Direct-edge queries in O(1) or O(children)
//! - Transitive queries (all subtypes / superclasses / superinterfaces /
//!   supertypes) that tolerate cycles via visited sets
//! - Deterministic iteration order (type table sorted by id)
//!
//! The graph is mutated only by the builder and the pruner; to collaborators
//! it is read-only until the impact filter invalidates it, at which point
//! the whole structure is discarded and rebuilt.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::element::ElementId;

// ============================================================================
// ID and Name Types
// ============================================================================

/// Unique identifier for a type within one [`HierarchyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Create a new type ID.
    pub fn new(id: u32) -> Self {
        TypeId(id)
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type_{}", self.0)
    }
}

/// Qualified type name: the stable identity key for a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name from a qualified name string.
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    /// The qualified name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::new(name)
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Modifier Flags
// ============================================================================

/// Modifier bits cached per type at build time.
///
/// Callers combine these with `|`; [`HierarchyGraph::cached_flags`] returns
/// [`modifiers::NONE`] for types whose declaration carried no modifiers or
/// was never found.
pub mod modifiers {
    /// No modifiers recorded.
    pub const NONE: u32 = 0;
    /// Publicly visible type.
    pub const PUBLIC: u32 = 1 << 0;
    /// Abstract class.
    pub const ABSTRACT: u32 = 1 << 1;
    /// Final (non-extendable) class.
    pub const FINAL: u32 = 1 << 2;
}

// ============================================================================
// Type Entry
// ============================================================================

/// One class or interface tracked by the hierarchy.
///
/// A type whose declaration was never found (it was only referenced as a
/// supertype) has `declared_in == None`: it participates in the lattice as
/// an isolated ancestor but is never in-region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Identifier within the owning graph.
    pub type_id: TypeId,
    /// Qualified name, the stable identity key.
    pub name: TypeName,
    /// Whether this is an interface declaration.
    pub is_interface: bool,
    /// Element declaring this type, when a declaration was found.
    pub declared_in: Option<ElementId>,
    /// Cached modifier bits, see [`modifiers`].
    pub flags: u32,
}

// ============================================================================
// Build Info
// ============================================================================

/// Metadata stamped onto a graph when a build completes.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// When the build finished.
    pub built_at: DateTime<Utc>,
    /// Types discovered before pruning.
    pub types_discovered: usize,
    /// Types removed by dead-branch pruning.
    pub types_pruned: usize,
}

// ============================================================================
// Hierarchy Graph
// ============================================================================

/// The class/interface lattice scoped to a region.
#[derive(Debug, Default)]
pub struct HierarchyGraph {
    /// Primary type table (BTreeMap for deterministic iteration).
    entries: BTreeMap<TypeId, TypeEntry>,
    /// Qualified name → type id.
    by_name: HashMap<TypeName, TypeId>,
    /// Type → direct subtypes, ordered and duplicate-free.
    subtypes: HashMap<TypeId, Vec<TypeId>>,
    /// Class → its superclass.
    superclass: HashMap<TypeId, TypeId>,
    /// Type → its superinterfaces.
    superinterfaces: HashMap<TypeId, Vec<TypeId>>,
    /// Classes with no tracked superclass; refreshed after build/prune.
    root_classes: Vec<TypeId>,
    /// Interfaces with no tracked superinterface; refreshed after build/prune.
    root_interfaces: Vec<TypeId>,
    /// Supertype names that could not be resolved during the build.
    missing_types: Vec<String>,
    /// Focus type the hierarchy was narrowed to, if any.
    focus: Option<TypeName>,
    /// Stamped when a build completes.
    build_info: Option<BuildInfo>,
    next_type_id: u32,
}

impl HierarchyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        HierarchyGraph::default()
    }

    // ------------------------------------------------------------------
    // Mutators (crate-internal: builder and pruner only)
    // ------------------------------------------------------------------

    fn next_type_id(&mut self) -> TypeId {
        let id = TypeId(self.next_type_id);
        self.next_type_id += 1;
        id
    }

    /// Look up or create the entry for `name`.
    ///
    /// A created entry is a placeholder: not an interface, no declaring
    /// element, no flags. [`insert_declared`](Self::insert_declared)
    /// upgrades it when a declaration turns up.
    pub(crate) fn intern(&mut self, name: &TypeName) -> TypeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.next_type_id();
        self.entries.insert(
            id,
            TypeEntry {
                type_id: id,
                name: name.clone(),
                is_interface: false,
                declared_in: None,
                flags: modifiers::NONE,
            },
        );
        self.by_name.insert(name.clone(), id);
        id
    }

    /// Record a resolved declaration, upgrading any placeholder entry.
    pub(crate) fn insert_declared(
        &mut self,
        name: &TypeName,
        element: ElementId,
        is_interface: bool,
        flags: u32,
    ) -> TypeId {
        let id = self.intern(name);
        let entry = self.entries.get_mut(&id).expect("interned entry exists");
        entry.is_interface = is_interface;
        entry.declared_in = Some(element);
        entry.flags = flags;
        id
    }

    fn add_subtype(&mut self, ty: TypeId, subtype: TypeId) {
        let subs = self.subtypes.entry(ty).or_default();
        if !subs.contains(&subtype) {
            subs.push(subtype);
        }
    }

    /// Record `superclass` as the superclass of `ty`, with the matching
    /// subtype back-reference. A self-edge is refused: it could only come
    /// from malformed input and would corrupt every downward traversal.
    pub(crate) fn set_superclass(&mut self, ty: TypeId, superclass: TypeId) {
        if ty == superclass {
            warn!(type_id = %ty, "type claims itself as superclass; edge ignored");
            return;
        }
        self.superclass.insert(ty, superclass);
        self.add_subtype(superclass, ty);
    }

    /// Record `superinterface` for `ty`, with the matching subtype
    /// back-reference. Self-edges are refused as in
    /// [`set_superclass`](Self::set_superclass).
    pub(crate) fn add_superinterface(&mut self, ty: TypeId, superinterface: TypeId) {
        if ty == superinterface {
            warn!(type_id = %ty, "type claims itself as superinterface; edge ignored");
            return;
        }
        let supers = self.superinterfaces.entry(ty).or_default();
        if !supers.contains(&superinterface) {
            supers.push(superinterface);
        }
        self.add_subtype(superinterface, ty);
    }

    /// Record a supertype name that could not be resolved.
    pub(crate) fn record_missing(&mut self, name: &str) {
        if !self.missing_types.iter().any(|m| m == name) {
            self.missing_types.push(name.to_string());
        }
    }

    pub(crate) fn set_focus(&mut self, focus: TypeName) {
        self.focus = Some(focus);
    }

    pub(crate) fn set_build_info(&mut self, info: BuildInfo) {
        self.build_info = Some(info);
    }

    /// Remove `ty` entirely: its table entry, its subtype-map entry, and
    /// the back-references held by its superclass and superinterfaces.
    ///
    /// Callers remove leaves only; `ty` must have no remaining subtypes.
    pub(crate) fn remove_type(&mut self, ty: TypeId) {
        debug_assert!(self.subtypes.get(&ty).is_none_or(|subs| subs.is_empty()));
        if let Some(superclass) = self.superclass.remove(&ty) {
            if let Some(subs) = self.subtypes.get_mut(&superclass) {
                subs.retain(|&s| s != ty);
            }
        }
        if let Some(supers) = self.superinterfaces.remove(&ty) {
            for superinterface in supers {
                if let Some(subs) = self.subtypes.get_mut(&superinterface) {
                    subs.retain(|&s| s != ty);
                }
            }
        }
        self.subtypes.remove(&ty);
        if let Some(entry) = self.entries.remove(&ty) {
            self.by_name.remove(&entry.name);
        }
    }

    /// Keep only the types in `keep`, dropping every edge touching a
    /// removed type. Used to narrow a built graph to a focus branch.
    pub(crate) fn retain(&mut self, keep: &HashSet<TypeId>) {
        self.entries.retain(|id, _| keep.contains(id));
        self.by_name.retain(|_, id| keep.contains(id));
        self.superclass
            .retain(|ty, superclass| keep.contains(ty) && keep.contains(superclass));
        self.superinterfaces.retain(|ty, _| keep.contains(ty));
        for supers in self.superinterfaces.values_mut() {
            supers.retain(|s| keep.contains(s));
        }
        self.subtypes.retain(|ty, _| keep.contains(ty));
        for subs in self.subtypes.values_mut() {
            subs.retain(|s| keep.contains(s));
        }
    }

    /// Recompute the cached root-class and root-interface lists.
    ///
    /// Called once when a build (and its prune pass) completes, so the root
    /// queries stay O(1) without threading root bookkeeping through every
    /// mutation.
    pub(crate) fn refresh_roots(&mut self) {
        self.root_classes = self
            .entries
            .values()
            .filter(|e| !e.is_interface && !self.superclass.contains_key(&e.type_id))
            .map(|e| e.type_id)
            .collect();
        self.root_interfaces = self
            .entries
            .values()
            .filter(|e| {
                e.is_interface
                    && self
                        .superinterfaces
                        .get(&e.type_id)
                        .is_none_or(|supers| supers.is_empty())
            })
            .map(|e| e.type_id)
            .collect();
    }

    // ------------------------------------------------------------------
    // Direct queries
    // ------------------------------------------------------------------

    /// Whether a type with this qualified name is tracked.
    pub fn contains(&self, name: &TypeName) -> bool {
        self.by_name.contains_key(name)
    }

    /// Resolve a qualified name to its type id.
    pub fn lookup(&self, name: &TypeName) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// The entry for `ty`, if tracked.
    pub fn entry(&self, ty: TypeId) -> Option<&TypeEntry> {
        self.entries.get(&ty)
    }

    /// Qualified name of `ty`, if tracked.
    pub fn name_of(&self, ty: TypeId) -> Option<&TypeName> {
        self.entries.get(&ty).map(|e| &e.name)
    }

    /// Whether `ty` is an interface. Untracked ids answer `false`.
    pub fn is_interface(&self, ty: TypeId) -> bool {
        self.entries.get(&ty).is_some_and(|e| e.is_interface)
    }

    /// Cached modifier bits for `ty`, [`modifiers::NONE`] if untracked.
    pub fn cached_flags(&self, ty: TypeId) -> u32 {
        self.entries.get(&ty).map_or(modifiers::NONE, |e| e.flags)
    }

    /// Direct subtypes of `ty`, in discovery order.
    pub fn subtypes_of(&self, ty: TypeId) -> &[TypeId] {
        self.subtypes.get(&ty).map(|subs| subs.as_slice()).unwrap_or(&[])
    }

    /// Direct subtypes of a class. Empty for interfaces.
    pub fn subclasses_of(&self, ty: TypeId) -> Vec<TypeId> {
        if self.is_interface(ty) {
            return Vec::new();
        }
        self.subtypes_of(ty).to_vec()
    }

    /// Superclass of a class, if tracked. `None` for interfaces.
    pub fn superclass_of(&self, ty: TypeId) -> Option<TypeId> {
        if self.is_interface(ty) {
            return None;
        }
        self.superclass.get(&ty).copied()
    }

    /// Direct superinterfaces of `ty`.
    pub fn superinterfaces_of(&self, ty: TypeId) -> &[TypeId] {
        self.superinterfaces
            .get(&ty)
            .map(|supers| supers.as_slice())
            .unwrap_or(&[])
    }

    /// Direct supertypes of `ty`: its superinterfaces, then its superclass.
    pub fn supertypes_of(&self, ty: TypeId) -> Vec<TypeId> {
        let mut supers = self.superinterfaces_of(ty).to_vec();
        if let Some(superclass) = self.superclass_of(ty) {
            supers.push(superclass);
        }
        supers
    }

    /// All tracked types, sorted by id.
    pub fn all_types(&self) -> Vec<TypeId> {
        self.entries.keys().copied().collect()
    }

    /// All tracked classes, sorted by id.
    pub fn all_classes(&self) -> Vec<TypeId> {
        self.entries
            .values()
            .filter(|e| !e.is_interface)
            .map(|e| e.type_id)
            .collect()
    }

    /// All tracked interfaces, sorted by id.
    pub fn all_interfaces(&self) -> Vec<TypeId> {
        self.entries
            .values()
            .filter(|e| e.is_interface)
            .map(|e| e.type_id)
            .collect()
    }

    /// Classes with no tracked superclass.
    pub fn root_classes(&self) -> &[TypeId] {
        &self.root_classes
    }

    /// Interfaces with no tracked superinterface.
    pub fn root_interfaces(&self) -> &[TypeId] {
        &self.root_interfaces
    }

    /// Number of tracked types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the graph tracks no types.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Supertype names that could not be resolved during the build.
    pub fn missing_types(&self) -> &[String] {
        &self.missing_types
    }

    /// The focus type this hierarchy was narrowed to, if any.
    pub fn focus_type(&self) -> Option<&TypeName> {
        self.focus.as_ref()
    }

    /// Build metadata, present once a build has completed.
    pub fn build_info(&self) -> Option<&BuildInfo> {
        self.build_info.as_ref()
    }

    // ------------------------------------------------------------------
    // Transitive queries (cycle-safe)
    // ------------------------------------------------------------------

    /// All transitive subtypes of `ty`, duplicate-free, preorder.
    pub fn all_subtypes_of(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(ty);
        self.collect_subtypes(ty, &mut seen, &mut out);
        out
    }

    fn collect_subtypes(&self, ty: TypeId, seen: &mut HashSet<TypeId>, out: &mut Vec<TypeId>) {
        for &sub in self.subtypes_of(ty) {
            if seen.insert(sub) {
                out.push(sub);
                self.collect_subtypes(sub, seen, out);
            }
        }
    }

    /// The superclass chain of `ty`, nearest first. Stops on a repeated
    /// type, so malformed cyclic input terminates.
    pub fn all_superclasses_of(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(ty);
        let mut current = self.superclass_of(ty);
        while let Some(superclass) = current {
            if !seen.insert(superclass) {
                break;
            }
            out.push(superclass);
            current = self.superclass_of(superclass);
        }
        out
    }

    /// All transitive superinterfaces of `ty`, reached through both the
    /// superinterface edges and the superclass chain.
    pub fn all_superinterfaces_of(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(ty);
        self.collect_supertypes(ty, false, &mut seen, &mut out);
        out
    }

    /// All transitive supertypes of `ty`: superinterfaces plus every
    /// superclass on the way up.
    pub fn all_supertypes_of(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(ty);
        self.collect_supertypes(ty, true, &mut seen, &mut out);
        out
    }

    fn collect_supertypes(
        &self,
        ty: TypeId,
        include_classes: bool,
        seen: &mut HashSet<TypeId>,
        out: &mut Vec<TypeId>,
    ) {
        for &superinterface in self.superinterfaces_of(ty) {
            if seen.insert(superinterface) {
                out.push(superinterface);
                self.collect_supertypes(superinterface, include_classes, seen, out);
            }
        }
        if let Some(superclass) = self.superclass_of(ty) {
            if seen.insert(superclass) {
                if include_classes {
                    out.push(superclass);
                }
                self.collect_supertypes(superclass, include_classes, seen, out);
            }
        }
    }

    /// Classes directly implementing the interface `ty`. Empty when `ty`
    /// is not an interface.
    pub fn implementing_classes_of(&self, ty: TypeId) -> Vec<TypeId> {
        if !self.is_interface(ty) {
            return Vec::new();
        }
        self.direct_dependents(ty, false)
    }

    /// Interfaces directly extending the interface `ty`. Empty when `ty`
    /// is not an interface.
    pub fn extending_interfaces_of(&self, ty: TypeId) -> Vec<TypeId> {
        if !self.is_interface(ty) {
            return Vec::new();
        }
        self.direct_dependents(ty, true)
    }

    fn direct_dependents(&self, ty: TypeId, interfaces: bool) -> Vec<TypeId> {
        self.entries
            .values()
            .filter(|e| e.is_interface == interfaces)
            .filter(|e| self.superinterfaces_of(e.type_id).contains(&ty))
            .map(|e| e.type_id)
            .collect()
    }
}

// ============================================================================
// Display
// ============================================================================

impl std::fmt::Display for HierarchyGraph {
    /// Indented textual dump of the lattice, for debugging and golden
    /// assertions. Cycle-safe: a type already printed on the current root's
    /// walk is not expanded again.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.focus {
            Some(focus) => writeln!(f, "Focus: {focus}")?,
            None => writeln!(f, "Focus: <none>")?,
        }
        writeln!(f, "Sub types of root classes:")?;
        for &root in &self.root_classes {
            self.fmt_subtree(f, root, 1, &mut HashSet::new())?;
        }
        writeln!(f, "Sub types of root interfaces:")?;
        for &root in &self.root_interfaces {
            self.fmt_subtree(f, root, 1, &mut HashSet::new())?;
        }
        Ok(())
    }
}

impl HierarchyGraph {
    fn fmt_subtree(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        ty: TypeId,
        depth: usize,
        seen: &mut HashSet<TypeId>,
    ) -> std::fmt::Result {
        let Some(entry) = self.entries.get(&ty) else {
            return Ok(());
        };
        let kind = if entry.is_interface {
            "interface"
        } else {
            "class"
        };
        writeln!(f, "{:indent$}{kind} {}", "", entry.name, indent = depth * 2)?;
        if !seen.insert(ty) {
            return Ok(());
        }
        for &sub in self.subtypes_of(ty) {
            self.fmt_subtree(f, sub, depth + 1, seen)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(graph: &mut HierarchyGraph, name: &str, is_interface: bool) -> TypeId {
        graph.insert_declared(
            &TypeName::from(name),
            ElementId::new(0),
            is_interface,
            modifiers::PUBLIC,
        )
    }

    #[test]
    fn edges_are_bidirectional() {
        let mut graph = HierarchyGraph::new();
        let object = declared(&mut graph, "Object", false);
        let foo = declared(&mut graph, "Foo", false);
        let iface = declared(&mut graph, "Runnable", true);
        graph.set_superclass(foo, object);
        graph.add_superinterface(foo, iface);

        assert_eq!(graph.superclass_of(foo), Some(object));
        assert_eq!(graph.subtypes_of(object), &[foo]);
        assert_eq!(graph.superinterfaces_of(foo), &[iface]);
        assert_eq!(graph.subtypes_of(iface), &[foo]);
        assert_eq!(graph.cached_flags(foo), modifiers::PUBLIC);
        assert_eq!(graph.cached_flags(TypeId::new(99)), modifiers::NONE);
    }

    #[test]
    fn edge_insertion_is_idempotent() {
        let mut graph = HierarchyGraph::new();
        let object = declared(&mut graph, "Object", false);
        let foo = declared(&mut graph, "Foo", false);
        graph.set_superclass(foo, object);
        graph.set_superclass(foo, object);

        assert_eq!(graph.subtypes_of(object), &[foo]);
    }

    #[test]
    fn self_edge_is_refused() {
        let mut graph = HierarchyGraph::new();
        let foo = declared(&mut graph, "Foo", false);
        graph.set_superclass(foo, foo);
        graph.add_superinterface(foo, foo);

        assert_eq!(graph.superclass_of(foo), None);
        assert!(graph.superinterfaces_of(foo).is_empty());
        assert!(graph.subtypes_of(foo).is_empty());
    }

    #[test]
    fn intern_then_declare_upgrades_placeholder() {
        let mut graph = HierarchyGraph::new();
        let name = TypeName::from("Foo");
        let placeholder = graph.intern(&name);
        assert_eq!(graph.entry(placeholder).unwrap().declared_in, None);

        let declared = graph.insert_declared(&name, ElementId::new(3), true, modifiers::NONE);
        assert_eq!(placeholder, declared);
        let entry = graph.entry(declared).unwrap();
        assert!(entry.is_interface);
        assert_eq!(entry.declared_in, Some(ElementId::new(3)));
    }

    #[test]
    fn interfaces_have_no_superclass() {
        let mut graph = HierarchyGraph::new();
        let iface = declared(&mut graph, "Runnable", true);
        let other = declared(&mut graph, "Object", false);
        // The builder never sets a superclass on an interface; even if the
        // raw map held one, the query surface would hide it.
        graph.superclass.insert(iface, other);
        assert_eq!(graph.superclass_of(iface), None);
        assert!(graph.subclasses_of(iface).is_empty());
    }

    #[test]
    fn transitive_subtypes_tolerate_cycles() {
        let mut graph = HierarchyGraph::new();
        let a = declared(&mut graph, "A", false);
        let b = declared(&mut graph, "B", false);
        graph.set_superclass(a, b);
        graph.set_superclass(b, a); // malformed input

        let subs = graph.all_subtypes_of(a);
        assert_eq!(subs, vec![b]);
        let supers = graph.all_superclasses_of(a);
        assert_eq!(supers, vec![b]);
        assert_eq!(graph.all_types().len(), 2);
    }

    #[test]
    fn transitive_supertypes_cross_both_edge_kinds() {
        let mut graph = HierarchyGraph::new();
        let object = declared(&mut graph, "Object", false);
        let base = declared(&mut graph, "Base", false);
        let foo = declared(&mut graph, "Foo", false);
        let closeable = declared(&mut graph, "Closeable", true);
        let auto = declared(&mut graph, "AutoCloseable", true);
        graph.set_superclass(base, object);
        graph.set_superclass(foo, base);
        graph.add_superinterface(base, closeable);
        graph.add_superinterface(closeable, auto);

        let all_supers = graph.all_supertypes_of(foo);
        assert!(all_supers.contains(&base));
        assert!(all_supers.contains(&object));
        assert!(all_supers.contains(&closeable));
        assert!(all_supers.contains(&auto));
        assert_eq!(all_supers.len(), 4);

        let ifaces = graph.all_superinterfaces_of(foo);
        assert_eq!(ifaces.len(), 2);
        assert!(ifaces.contains(&closeable));
        assert!(ifaces.contains(&auto));

        assert_eq!(graph.all_superclasses_of(foo), vec![base, object]);
    }

    #[test]
    fn implementors_and_extenders() {
        let mut graph = HierarchyGraph::new();
        let iface = declared(&mut graph, "Shape", true);
        let sub_iface = declared(&mut graph, "Polygon", true);
        let class = declared(&mut graph, "Circle", false);
        graph.add_superinterface(sub_iface, iface);
        graph.add_superinterface(class, iface);

        assert_eq!(graph.implementing_classes_of(iface), vec![class]);
        assert_eq!(graph.extending_interfaces_of(iface), vec![sub_iface]);
        // Not an interface: both queries answer empty.
        assert!(graph.implementing_classes_of(class).is_empty());
        assert!(graph.extending_interfaces_of(class).is_empty());
    }

    #[test]
    fn roots_are_refreshed_on_demand() {
        let mut graph = HierarchyGraph::new();
        let object = declared(&mut graph, "Object", false);
        let foo = declared(&mut graph, "Foo", false);
        let runnable = declared(&mut graph, "Runnable", true);
        let callable = declared(&mut graph, "Callable", true);
        graph.set_superclass(foo, object);
        graph.add_superinterface(callable, runnable);
        graph.refresh_roots();

        assert_eq!(graph.root_classes(), &[object]);
        assert_eq!(graph.root_interfaces(), &[runnable]);
    }

    #[test]
    fn remove_type_detaches_back_references() {
        let mut graph = HierarchyGraph::new();
        let object = declared(&mut graph, "Object", false);
        let iface = declared(&mut graph, "Runnable", true);
        let foo = declared(&mut graph, "Foo", false);
        graph.set_superclass(foo, object);
        graph.add_superinterface(foo, iface);

        graph.remove_type(foo);
        assert!(graph.subtypes_of(object).is_empty());
        assert!(graph.subtypes_of(iface).is_empty());
        assert!(!graph.contains(&TypeName::from("Foo")));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn display_renders_indented_lattice() {
        let mut graph = HierarchyGraph::new();
        let object = declared(&mut graph, "Object", false);
        let foo = declared(&mut graph, "Foo", false);
        declared(&mut graph, "Runnable", true);
        graph.set_superclass(foo, object);
        graph.refresh_roots();
        graph.set_focus(TypeName::from("Foo"));

        let rendered = graph.to_string();
        assert_eq!(
            rendered,
            "Focus: Foo\n\
             Sub types of root classes:\n\
             \x20 class Object\n\
             \x20   class Foo\n\
             Sub types of root interfaces:\n\
             \x20 interface Runnable\n"
        );
    }

    #[test]
    fn missing_types_are_deduplicated() {
        let mut graph = HierarchyGraph::new();
        graph.record_missing("a.b.Gone");
        graph.record_missing("a.b.Gone");
        graph.record_missing("a.b.AlsoGone");
        assert_eq!(graph.missing_types(), &["a.b.Gone", "a.b.AlsoGone"]);
    }
}
