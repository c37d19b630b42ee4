// SPDX-License-Identifier: MPL-2.0
//! The localization applier.
//!
//! [`Localizer`] owns the current language and the translation table. It
//! reaches the page and the persisted preference only through the
//! [`DocumentView`] and [`PreferenceStore`] ports it is handed on each call,
//! so the same value drives a parsed markup file, a browser binding, or a
//! test double.
//!
//! Nothing here returns an error. Missing translations leave elements as
//! they are, unsupported codes fall back to [`Locale::default`], and a failed
//! preference write is logged and otherwise ignored.

pub mod selector;

use crate::config::{Config, DocumentConfig};
use crate::i18n::{detect_environment_locale, Locale, TranslationTable};
use crate::port::{DocumentView, NodeId, PreferenceStore};

/// Picks the starting language.
///
/// A stored preference wins when present, even if it is unsupported (it then
/// resolves to the default rather than consulting the environment). Without
/// a stored value the environment locale is reduced to its primary language.
pub fn resolve_locale(stored: Option<&str>, environment: Option<&str>) -> Locale {
    let candidate = match stored.map(str::trim).filter(|s| !s.is_empty()) {
        Some(code) => Locale::from_code(code),
        None => environment.and_then(Locale::from_tag),
    };
    candidate.unwrap_or_default()
}

#[derive(Debug)]
pub struct Localizer {
    table: TranslationTable,
    contract: DocumentConfig,
    storage_key: String,
    current: Locale,
}

impl Localizer {
    /// Creates a localizer on the default language without touching any
    /// document or store.
    pub fn new(table: TranslationTable, config: &Config) -> Self {
        Self {
            table,
            contract: config.document.clone(),
            storage_key: config.general.storage_key().to_string(),
            current: Locale::default(),
        }
    }

    /// Runs the page-load sequence using the operating system locale.
    pub fn initialize(
        table: TranslationTable,
        config: &Config,
        store: &dyn PreferenceStore,
        document: &mut dyn DocumentView,
    ) -> Self {
        let environment = detect_environment_locale();
        Self::initialize_with_locale(table, config, store, document, environment.as_deref())
    }

    /// Runs the page-load sequence with an explicit environment locale.
    ///
    /// Resolves the language, applies it to `document`, then renders the
    /// language selector if the page has a mount container for it.
    pub fn initialize_with_locale(
        table: TranslationTable,
        config: &Config,
        store: &dyn PreferenceStore,
        document: &mut dyn DocumentView,
        environment: Option<&str>,
    ) -> Self {
        let localizer = Self::restore(table, config, store, environment);
        localizer.apply_language(localizer.current, document);
        localizer.render_language_selector(document);
        localizer
    }

    /// Resolves the starting language from `store` and `environment`
    /// without touching any document.
    pub fn restore(
        table: TranslationTable,
        config: &Config,
        store: &dyn PreferenceStore,
        environment: Option<&str>,
    ) -> Self {
        let mut localizer = Self::new(table, config);
        let stored = store.get(&localizer.storage_key);
        localizer.current = resolve_locale(stored.as_deref(), environment);
        tracing::debug!(
            stored = ?stored,
            environment = ?environment,
            "initial language {}",
            localizer.current
        );
        localizer
    }

    pub fn current_locale(&self) -> Locale {
        self.current
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Switches to `locale`, persists it, and re-applies the document.
    pub fn set_language(
        &mut self,
        locale: Locale,
        store: &mut dyn PreferenceStore,
        document: &mut dyn DocumentView,
    ) {
        self.current = locale;
        if let Err(error) = store.set(&self.storage_key, locale.code()) {
            tracing::warn!("failed to persist language {}: {}", locale, error);
        }
        self.apply_language(locale, document);
    }

    /// Switches to the language named by `code`.
    ///
    /// An unsupported code is ignored: nothing is persisted, the document is
    /// left alone, and `false` is returned.
    pub fn set_language_code(
        &mut self,
        code: &str,
        store: &mut dyn PreferenceStore,
        document: &mut dyn DocumentView,
    ) -> bool {
        match Locale::from_code(code) {
            Some(locale) => {
                self.set_language(locale, store, document);
                true
            }
            None => {
                tracing::warn!("ignoring unsupported language code {:?}", code);
                false
            }
        }
    }

    /// Rewrites the document for `locale` and returns how many elements
    /// received a translation.
    ///
    /// Only elements carrying the translation attribute are visited. An
    /// element whose key has no translation keeps its current content.
    pub fn apply_language(&self, locale: Locale, document: &mut dyn DocumentView) -> usize {
        document.set_language(locale.code());

        let mut translated = 0;
        for element in document.annotated_elements(self.contract.translation_attribute()) {
            match self.table.lookup(locale, &element.key) {
                Some(value) => {
                    element.kind.write(document, element.node, &value);
                    translated += 1;
                }
                None => tracing::debug!("no {} translation for {:?}", locale, element.key),
            }
        }

        if let Some(selector) = document.element_by_id(self.contract.selector_id()) {
            document.set_control_value(selector, locale.code());
        }

        translated
    }

    /// Translation of `key` in the current language, or `key` itself.
    pub fn translate(&self, key: &str) -> String {
        self.table.translate(self.current, key)
    }

    /// Injects the language selector if the page has a mount container and
    /// the selector is not already there.
    pub fn render_language_selector(&self, document: &mut dyn DocumentView) -> Option<NodeId> {
        selector::render(document, &self.contract, self.current)
    }
}
