//! Hierarchy construction scoped to a region.
//!
//! The builder seeds a work-list with every declaration found under the
//! region's covering elements, then drains it: each type's declared
//! superclass and superinterfaces are resolved through the caller's
//! [`TypeResolver`], edges land in the graph (placeholder entries are
//! created for supertypes whose declarations have not been visited yet),
//! and newly discovered supertypes join the work-list. A visited set keyed
//! by qualified name guarantees each type is pushed at most once, so
//! malformed cyclic input still terminates.
//!
//! Supertype resolution works at unit granularity: when an unfocused build
//! locates the declaration of a supertype outside the region, the other
//! types declared in that unit are resolved along with it. Whatever the
//! region turns out not to need is removed again by the prune pass.
//!
//! Construction is all-or-nothing: the graph is assembled privately and
//! only returned once the build, the prune pass, and any focus narrowing
//! have completed. Cancellation is polled once per work-list item and
//! unwinds the whole build; a caller's previously cached graph is never
//! touched.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::element::{ElementId, ElementTree};
use crate::error::{BuildError, BuildResult};
use crate::graph::{BuildInfo, HierarchyGraph, TypeId, TypeName};
use crate::prune::prune_dead_branches;
use crate::region::Region;
use crate::resolve::{Cancellation, SuperRef, TypeResolver};

// ============================================================================
// Options
// ============================================================================

/// Options for one hierarchy build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// When set, the output is narrowed to the branch containing this
    /// type: the focus itself, its transitive supertypes, and its
    /// transitive subtypes. A focus that is never discovered yields an
    /// empty graph.
    pub focus: Option<TypeName>,
}

impl BuildOptions {
    /// Options for an unfocused build over the whole region.
    pub fn new() -> Self {
        BuildOptions::default()
    }

    /// Options narrowing the build to the branch containing `focus`.
    pub fn focused(focus: impl Into<TypeName>) -> Self {
        BuildOptions {
            focus: Some(focus.into()),
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Build the type hierarchy scoped to `region`, then prune dead branches
/// and apply focus narrowing when configured.
///
/// Returns a complete, internally consistent graph, or
/// [`BuildError::Cancelled`] if `cancel` fired mid-build.
pub fn build_hierarchy<R: TypeResolver, C: Cancellation>(
    tree: &ElementTree,
    region: &Region,
    resolver: &R,
    cancel: &C,
    options: BuildOptions,
) -> BuildResult<HierarchyGraph> {
    HierarchyBuilder {
        tree,
        region,
        resolver,
        cancel,
        options,
        graph: HierarchyGraph::new(),
        visited: HashSet::new(),
        queue: VecDeque::new(),
    }
    .build()
}

// ============================================================================
// Builder
// ============================================================================

struct HierarchyBuilder<'a, R: TypeResolver, C: Cancellation> {
    tree: &'a ElementTree,
    region: &'a Region,
    resolver: &'a R,
    cancel: &'a C,
    options: BuildOptions,
    graph: HierarchyGraph,
    /// Names already pushed onto the work-list; each type is resolved at
    /// most once, which bounds the build even on cyclic input.
    visited: HashSet<TypeName>,
    queue: VecDeque<TypeName>,
}

impl<R: TypeResolver, C: Cancellation> HierarchyBuilder<'_, R, C> {
    fn build(mut self) -> BuildResult<HierarchyGraph> {
        self.seed()?;
        self.resolve_all()?;

        let types_discovered = self.graph.len();
        let types_pruned = prune_dead_branches(&mut self.graph, self.tree, self.region);
        if let Some(focus) = self.options.focus.clone() {
            narrow_to_focus(&mut self.graph, &focus);
        }
        self.graph.refresh_roots();

        let built_at: DateTime<Utc> = std::time::SystemTime::now().into();
        self.graph.set_build_info(BuildInfo {
            built_at,
            types_discovered,
            types_pruned,
        });
        debug!(
            types = self.graph.len(),
            pruned = types_pruned,
            "hierarchy build complete"
        );
        Ok(self.graph)
    }

    /// Seed the work-list with every declaration under the region's
    /// covering elements, plus the focus type's declaration when one is
    /// configured outside those roots.
    fn seed(&mut self) -> BuildResult<()> {
        for root in self.region.elements() {
            if self.cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }
            for decl in self.resolver.declarations_under(root) {
                self.graph
                    .insert_declared(&decl.name, decl.element, decl.is_interface, decl.flags);
                if self.visited.insert(decl.name.clone()) {
                    self.queue.push_back(decl.name);
                }
            }
        }
        if let Some(focus) = self.options.focus.clone() {
            if !self.visited.contains(&focus) {
                self.ensure_tracked(&focus);
            }
        }
        Ok(())
    }

    /// Drain the work-list, resolving each type's supertype references and
    /// inserting edges. Unresolved references are recorded as missing and
    /// treated as "no declared link".
    fn resolve_all(&mut self) -> BuildResult<()> {
        while let Some(name) = self.queue.pop_front() {
            if self.cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }
            let ty = self.graph.lookup(&name).expect("queued type is tracked");
            if !self.graph.is_interface(ty) {
                match self.resolver.superclass_of(&name) {
                    SuperRef::Resolved(superclass) => {
                        let superclass_id = self.ensure_tracked(&superclass);
                        self.graph.set_superclass(ty, superclass_id);
                    }
                    SuperRef::Missing(missing) => self.graph.record_missing(&missing),
                    SuperRef::Absent => {}
                }
            }
            for reference in self.resolver.superinterfaces_of(&name) {
                match reference {
                    SuperRef::Resolved(superinterface) => {
                        let superinterface_id = self.ensure_tracked(&superinterface);
                        self.graph.add_superinterface(ty, superinterface_id);
                    }
                    SuperRef::Missing(missing) => self.graph.record_missing(&missing),
                    SuperRef::Absent => {}
                }
            }
        }
        Ok(())
    }

    /// Track `name`, locating its declaration on first sight. A type whose
    /// declaration exists joins the work-list for its own supertype
    /// resolution; a type with no declaration anywhere stays an isolated
    /// placeholder with no super-structure.
    ///
    /// Resolution works at unit granularity: in an unfocused build, the
    /// other types declared in the same unit join the hierarchy too, and
    /// the prune pass drops the ones the region never needed.
    fn ensure_tracked(&mut self, name: &TypeName) -> TypeId {
        if let Some(ty) = self.graph.lookup(name) {
            return ty;
        }
        match self.resolver.declaration_of(name) {
            Some(decl) => {
                let ty = self
                    .graph
                    .insert_declared(name, decl.element, decl.is_interface, decl.flags);
                self.visited.insert(name.clone());
                self.queue.push_back(name.clone());
                if self.options.focus.is_none() {
                    self.sweep_unit(decl.element);
                }
                ty
            }
            None => {
                self.visited.insert(name.clone());
                self.graph.intern(name)
            }
        }
    }

    /// Enqueue every declaration in `element`'s unit.
    fn sweep_unit(&mut self, element: ElementId) {
        for decl in self.resolver.declarations_under(element) {
            self.graph
                .insert_declared(&decl.name, decl.element, decl.is_interface, decl.flags);
            if self.visited.insert(decl.name.clone()) {
                self.queue.push_back(decl.name);
            }
        }
    }
}

/// Narrow `graph` to the branch containing `focus`: the focus type, its
/// transitive supertypes, and its transitive subtypes.
fn narrow_to_focus(graph: &mut HierarchyGraph, focus: &TypeName) {
    match graph.lookup(focus) {
        Some(ty) => {
            let mut keep: HashSet<TypeId> = HashSet::new();
            keep.insert(ty);
            keep.extend(graph.all_supertypes_of(ty));
            keep.extend(graph.all_subtypes_of(ty));
            graph.retain(&keep);
        }
        None => *graph = HierarchyGraph::new(),
    }
    graph.set_focus(focus.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::resolve::{CancelFlag, NeverCancelled};
    use crate::test_fixtures::FixtureModel;

    /// One package with Foo extends Base, Base in a file outside the
    /// region, plus an interface implemented by Foo.
    fn model() -> (FixtureModel, Region) {
        let mut model = FixtureModel::new();
        let ws = model.tree.insert_root(ElementKind::Workspace, "ws");
        let pkg = model.tree.insert_child(ws, ElementKind::Package, "pkg");
        let foo_file = model
            .tree
            .insert_child(pkg, ElementKind::SourceFile, "Foo.src");
        let base_file = model
            .tree
            .insert_child(ws, ElementKind::SourceFile, "Base.src");

        model.class("pkg.Foo", foo_file);
        model.class("Base", base_file);
        model.interface("pkg.Marker", foo_file);
        model.extends("pkg.Foo", "Base");
        model.implements("pkg.Foo", "pkg.Marker");

        let mut region = Region::new();
        region.add(&model.tree, pkg);
        (model, region)
    }

    #[test]
    fn builds_edges_through_the_resolver() {
        let (model, region) = model();
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();

        let foo = graph.lookup(&TypeName::from("pkg.Foo")).unwrap();
        let base = graph.lookup(&TypeName::from("Base")).unwrap();
        let marker = graph.lookup(&TypeName::from("pkg.Marker")).unwrap();

        assert_eq!(graph.superclass_of(foo), Some(base));
        assert_eq!(graph.superinterfaces_of(foo), &[marker]);
        assert_eq!(graph.subtypes_of(base), &[foo]);
        assert_eq!(graph.root_classes(), &[base]);
        assert_eq!(graph.root_interfaces(), &[marker]);
        assert!(graph.missing_types().is_empty());
        assert!(graph.build_info().is_some());
    }

    #[test]
    fn out_of_region_ancestor_survives_for_in_region_subtype() {
        let (model, region) = model();
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();

        // Base's file is outside the region, but Foo beneath it is inside.
        assert!(graph.contains(&TypeName::from("Base")));
        assert_eq!(graph.build_info().unwrap().types_pruned, 0);
    }

    #[test]
    fn unresolved_superclass_is_recorded_as_missing() {
        let mut model = FixtureModel::new();
        let ws = model.tree.insert_root(ElementKind::Workspace, "ws");
        let file = model.tree.insert_child(ws, ElementKind::SourceFile, "A.src");
        model.class("A", file);
        model.extends_missing("A", "gone.Superclass");

        let mut region = Region::new();
        region.add(&model.tree, file);
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();

        let a = graph.lookup(&TypeName::from("A")).unwrap();
        assert_eq!(graph.superclass_of(a), None);
        assert_eq!(graph.missing_types(), &["gone.Superclass"]);
    }

    #[test]
    fn undeclared_supertype_becomes_isolated_placeholder() {
        let mut model = FixtureModel::new();
        let ws = model.tree.insert_root(ElementKind::Workspace, "ws");
        let file = model.tree.insert_child(ws, ElementKind::SourceFile, "A.src");
        model.class("A", file);
        model.extends("A", "Ghost"); // resolves, but no declaration exists

        let mut region = Region::new();
        region.add(&model.tree, file);
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();

        let ghost = graph.lookup(&TypeName::from("Ghost")).unwrap();
        assert_eq!(graph.entry(ghost).unwrap().declared_in, None);
        assert_eq!(graph.supertypes_of(ghost), Vec::new());
        assert_eq!(graph.root_classes(), &[ghost]);
    }

    #[test]
    fn cyclic_supertypes_terminate() {
        let mut model = FixtureModel::new();
        let ws = model.tree.insert_root(ElementKind::Workspace, "ws");
        let file = model.tree.insert_child(ws, ElementKind::SourceFile, "AB.src");
        model.class("A", file);
        model.class("B", file);
        model.extends("A", "B");
        model.extends("B", "A"); // malformed

        let mut region = Region::new();
        region.add(&model.tree, file);
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&TypeName::from("A")));
        assert!(graph.contains(&TypeName::from("B")));
    }

    #[test]
    fn self_supertype_is_dropped() {
        let mut model = FixtureModel::new();
        let ws = model.tree.insert_root(ElementKind::Workspace, "ws");
        let file = model.tree.insert_child(ws, ElementKind::SourceFile, "A.src");
        model.class("A", file);
        model.extends("A", "A");

        let mut region = Region::new();
        region.add(&model.tree, file);
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();

        let a = graph.lookup(&TypeName::from("A")).unwrap();
        assert_eq!(graph.superclass_of(a), None);
        assert!(graph.subtypes_of(a).is_empty());
    }

    #[test]
    fn cancellation_unwinds_the_build() {
        let (model, region) = model();
        let flag = CancelFlag::new();
        flag.cancel();

        let result = build_hierarchy(&model.tree, &region, &model, &flag, BuildOptions::new());
        assert_eq!(result.unwrap_err(), BuildError::Cancelled);
    }

    #[test]
    fn focus_narrows_to_one_branch() {
        let mut model = FixtureModel::new();
        let ws = model.tree.insert_root(ElementKind::Workspace, "ws");
        let pkg = model.tree.insert_child(ws, ElementKind::Package, "pkg");
        let file = model
            .tree
            .insert_child(pkg, ElementKind::SourceFile, "All.src");
        model.class("Base", file);
        model.class("Left", file);
        model.class("LeftChild", file);
        model.class("Right", file);
        model.extends("Left", "Base");
        model.extends("LeftChild", "Left");
        model.extends("Right", "Base");

        let mut region = Region::new();
        region.add(&model.tree, pkg);
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::focused("Left"),
        )
        .unwrap();

        assert_eq!(graph.focus_type(), Some(&TypeName::from("Left")));
        assert!(graph.contains(&TypeName::from("Left")));
        assert!(graph.contains(&TypeName::from("LeftChild")));
        assert!(graph.contains(&TypeName::from("Base")));
        assert!(!graph.contains(&TypeName::from("Right")));

        let base = graph.lookup(&TypeName::from("Base")).unwrap();
        let left = graph.lookup(&TypeName::from("Left")).unwrap();
        assert_eq!(graph.subtypes_of(base), &[left]);
    }

    #[test]
    fn unknown_focus_yields_empty_graph() {
        let (model, region) = model();
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::focused("no.such.Type"),
        )
        .unwrap();

        assert!(graph.is_empty());
        assert_eq!(graph.focus_type(), Some(&TypeName::from("no.such.Type")));
    }

    #[test]
    fn empty_region_builds_empty_graph() {
        let model = FixtureModel::new();
        let region = Region::new();
        let graph = build_hierarchy(
            &model.tree,
            &region,
            &model,
            &NeverCancelled,
            BuildOptions::new(),
        )
        .unwrap();
        assert!(graph.is_empty());
        assert!(graph.root_classes().is_empty());
    }
}
