// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! This module provides the closed set of supported locales and the static
//! translation table built from embedded Fluent files.
//!
//! # Features
//!
//! - Locale detection from the operating system, reduced to the primary language
//! - Embedded `.ftl` translation files, one per supported locale
//! - Total lookups: a missing translation yields the key itself

pub mod locale;
pub mod table;

pub use locale::{detect_environment_locale, Locale, UnsupportedLocale};
pub use table::TranslationTable;
