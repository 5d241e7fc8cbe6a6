//! In-memory fixture model for unit tests.
//!
//! Bundles an element tree with a map-backed [`TypeResolver`] so tests can
//! declare a small project, carve a region out of it, and run real builds
//! without any index infrastructure.

use std::collections::{BTreeMap, HashMap};

use crate::element::{ElementId, ElementTree};
use crate::graph::TypeName;
use crate::resolve::{SuperRef, TypeDecl, TypeResolver};

pub(crate) struct FixtureModel {
    pub(crate) tree: ElementTree,
    decls: BTreeMap<TypeName, TypeDecl>,
    superclasses: HashMap<TypeName, SuperRef>,
    superinterfaces: HashMap<TypeName, Vec<SuperRef>>,
}

impl FixtureModel {
    pub(crate) fn new() -> Self {
        FixtureModel {
            tree: ElementTree::new(),
            decls: BTreeMap::new(),
            superclasses: HashMap::new(),
            superinterfaces: HashMap::new(),
        }
    }

    pub(crate) fn class(&mut self, name: &str, element: ElementId) {
        self.decls
            .insert(TypeName::from(name), TypeDecl::class(name, element));
    }

    pub(crate) fn interface(&mut self, name: &str, element: ElementId) {
        self.decls
            .insert(TypeName::from(name), TypeDecl::interface(name, element));
    }

    pub(crate) fn extends(&mut self, sub: &str, superclass: &str) {
        self.superclasses.insert(
            TypeName::from(sub),
            SuperRef::Resolved(TypeName::from(superclass)),
        );
    }

    pub(crate) fn extends_missing(&mut self, sub: &str, name: &str) {
        self.superclasses
            .insert(TypeName::from(sub), SuperRef::Missing(name.to_string()));
    }

    pub(crate) fn implements(&mut self, sub: &str, superinterface: &str) {
        self.superinterfaces
            .entry(TypeName::from(sub))
            .or_default()
            .push(SuperRef::Resolved(TypeName::from(superinterface)));
    }
}

impl TypeResolver for FixtureModel {
    fn declarations_under(&self, root: ElementId) -> Vec<TypeDecl> {
        self.decls
            .values()
            .filter(|decl| self.tree.is_ancestor_or_self(root, decl.element))
            .cloned()
            .collect()
    }

    fn superclass_of(&self, ty: &TypeName) -> SuperRef {
        self.superclasses
            .get(ty)
            .cloned()
            .unwrap_or(SuperRef::Absent)
    }

    fn superinterfaces_of(&self, ty: &TypeName) -> Vec<SuperRef> {
        self.superinterfaces.get(ty).cloned().unwrap_or_default()
    }

    fn declaration_of(&self, ty: &TypeName) -> Option<TypeDecl> {
        self.decls.get(ty).cloned()
    }
}
