// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! The localizer only talks to the page and to persistent storage through
//! these interfaces, so it runs the same against a browser binding, a parsed
//! markup file, or a test double.
//!
//! # Available Ports
//!
//! - [`document`]: the "document view" over annotated elements
//! - [`preferences`]: key-value persistence of the language preference
//!
//! # Design Notes
//!
//! - Both traits are object-safe and used as `&mut dyn ...`
//! - Document operations are infallible; an unknown node is ignored
//! - Only preference writes return a `Result`

pub mod document;
pub mod preferences;

pub use document::{AnnotatedElement, DocumentView, ElementKind, ElementSpec, NodeId};
pub use preferences::PreferenceStore;
