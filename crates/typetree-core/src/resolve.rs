//! Collaborator interfaces consumed by the hierarchy engine.
//!
//! The engine never parses source or touches an index itself; the
//! surrounding system supplies a [`TypeResolver`] for name resolution, a
//! [`RelevanceChecker`] for focus-mode change relevance, and a
//! [`Cancellation`] signal polled during long builds. Plain data types
//! ([`TypeDecl`], [`SuperRef`]) cross the boundary; the graph and its ids
//! stay on the engine's side.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::graph::TypeName;

// ============================================================================
// Boundary Data Types
// ============================================================================

/// A resolved type declaration reported by a [`TypeResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Qualified name of the declared type.
    pub name: TypeName,
    /// Element (source file, class file) declaring the type.
    pub element: ElementId,
    /// Whether the declaration is an interface.
    pub is_interface: bool,
    /// Modifier bits, see [`crate::graph::modifiers`].
    pub flags: u32,
}

impl TypeDecl {
    /// Create a class declaration with no modifiers.
    pub fn class(name: impl Into<TypeName>, element: ElementId) -> Self {
        TypeDecl {
            name: name.into(),
            element,
            is_interface: false,
            flags: crate::graph::modifiers::NONE,
        }
    }

    /// Create an interface declaration with no modifiers.
    pub fn interface(name: impl Into<TypeName>, element: ElementId) -> Self {
        TypeDecl {
            name: name.into(),
            element,
            is_interface: true,
            flags: crate::graph::modifiers::NONE,
        }
    }

    /// Attach modifier bits.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }
}

/// Outcome of resolving one declared supertype reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperRef {
    /// The reference resolved to a type identity.
    Resolved(TypeName),
    /// The reference names a type that could not be resolved; the name is
    /// recorded as missing and the link treated as absent.
    Missing(String),
    /// No supertype declared.
    Absent,
}

// ============================================================================
// Resolver
// ============================================================================

/// External name-resolution service.
///
/// Implemented by the surrounding system on top of whatever index or AST
/// infrastructure it owns. All methods are infallible at this boundary:
/// resolution failures are expressed in the returned data
/// ([`SuperRef::Missing`], empty vectors, `None`), never as errors.
pub trait TypeResolver {
    /// All type declarations contained in `root` (the element itself and
    /// everything beneath it).
    fn declarations_under(&self, root: ElementId) -> Vec<TypeDecl>;

    /// The declared superclass of the class named `ty`.
    fn superclass_of(&self, ty: &TypeName) -> SuperRef;

    /// The declared superinterfaces of `ty`, in declaration order.
    fn superinterfaces_of(&self, ty: &TypeName) -> Vec<SuperRef>;

    /// Locate the declaration of `ty`, wherever it lives. `None` means the
    /// type has no declaration anywhere and is tracked as an isolated
    /// placeholder with no super-structure.
    fn declaration_of(&self, ty: &TypeName) -> Option<TypeDecl>;
}

// ============================================================================
// Delta Relevance
// ============================================================================

/// Decides whether a changed element is relevant to a focus type.
///
/// Consulted only when a focus type narrows the hierarchy; the general
/// ancestor/descendant analysis lives with the caller's index
/// infrastructure, outside this engine.
pub trait RelevanceChecker {
    /// Whether a change under `element` can affect the branch containing
    /// `focus`.
    fn is_relevant(&self, element: ElementId, focus: &TypeName) -> bool;
}

/// A [`RelevanceChecker`] that never reports a match. Useful for callers
/// that build without a focus type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRelevant;

impl RelevanceChecker for NeverRelevant {
    fn is_relevant(&self, _element: ElementId, _focus: &TypeName) -> bool {
        false
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation signal, polled once per work-list item during
/// a build.
pub trait Cancellation {
    /// Whether the caller has requested cancellation.
    fn is_cancelled(&self) -> bool;
}

/// A [`Cancellation`] that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl Cancellation for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shareable cancellation flag backed by an atomic.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        CancelFlag::default()
    }

    /// Request cancellation; every subsequent poll answers `true`.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
