// SPDX-License-Identifier: MPL-2.0
//! Concrete adapters for the ports in [`crate::port`].
//!
//! - [`markup`]: `quick-xml` backed document tree
//! - [`preferences`]: CBOR file and in-memory preference stores

pub mod markup;
pub mod preferences;

pub use markup::MarkupDocument;
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore};
