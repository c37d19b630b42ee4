// SPDX-License-Identifier: MPL-2.0
//! `page_l10n` swaps the visible text of annotated page markup to match a
//! persisted language preference.
//!
//! The [`localizer::Localizer`] owns the current language and talks to the
//! page through the [`port::DocumentView`] trait and to storage through the
//! [`port::PreferenceStore`] trait. [`infrastructure`] provides a parsed
//! markup document and file/memory preference stores.

pub mod config;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod localizer;
pub mod paths;
pub mod port;

pub use i18n::{Locale, TranslationTable};
pub use localizer::Localizer;
