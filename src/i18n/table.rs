// SPDX-License-Identifier: MPL-2.0
//! Static translation table backed by Fluent bundles.
//!
//! One `.ftl` file per supported locale is embedded from `assets/i18n/`.
//! The table is built once and never mutated afterwards.

use super::locale::Locale;
use fluent_bundle::{FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::fmt;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

pub struct TranslationTable {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::embedded()
    }
}

impl fmt::Debug for TranslationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locales: Vec<_> = self.bundles.keys().map(|l| l.code()).collect();
        locales.sort_unstable();
        f.debug_struct("TranslationTable")
            .field("locales", &locales)
            .finish()
    }
}

impl TranslationTable {
    /// Builds the table from the translation files compiled into the binary.
    pub fn embedded() -> Self {
        let sources = Locale::ALL.into_iter().filter_map(|locale| {
            let filename = format!("{}.ftl", locale.code());
            match Asset::get(&filename) {
                Some(content) => Some((
                    locale,
                    String::from_utf8_lossy(content.data.as_ref()).to_string(),
                )),
                None => {
                    tracing::warn!("missing translation asset {}", filename);
                    None
                }
            }
        });
        Self::from_sources(sources)
    }

    /// Builds the table from Fluent sources, one per locale.
    ///
    /// Entries that fail to parse are skipped; the rest of the file is kept.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (Locale, S)>,
        S: Into<String>,
    {
        let mut bundles = HashMap::new();

        for (locale, source) in sources {
            let resource = match FluentResource::try_new(source.into()) {
                Ok(resource) => resource,
                Err((resource, errors)) => {
                    tracing::warn!(
                        "{} translation has {} parse error(s); keeping valid entries",
                        locale,
                        errors.len()
                    );
                    resource
                }
            };

            let mut bundle = FluentBundle::new(vec![locale.language_identifier()]);
            // Values are written verbatim into markup, so no bidi isolation marks.
            bundle.set_use_isolating(false);
            if let Err(errors) = bundle.add_resource(resource) {
                tracing::warn!("{} translation has {} duplicate(s)", locale, errors.len());
            }
            bundles.insert(locale, bundle);
        }

        Self { bundles }
    }

    /// Looks up `key` for `locale`.
    ///
    /// Returns `None` when the locale has no bundle, the key is unknown, the
    /// message has no value, formatting fails, or the value is empty.
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<String> {
        let bundle = self.bundles.get(&locale)?;
        let pattern = bundle.get_message(key)?.value()?;
        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() || value.is_empty() {
            return None;
        }
        Some(value.into_owned())
    }

    /// Returns the translation of `key`, or `key` itself when missing.
    pub fn translate(&self, locale: Locale, key: &str) -> String {
        self.lookup(locale, key).unwrap_or_else(|| key.to_string())
    }

    pub fn has_locale(&self, locale: Locale) -> bool {
        self.bundles.contains_key(&locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &[(&str, &str, &str)] = &[
        ("login_title", "Casino Login", "Casino Login"),
        ("email_label", "Email", "Email"),
        ("password_label", "Contraseña", "Password"),
        ("login_btn", "Iniciar Sesión", "Log In"),
        ("welcome_msg", "¡Bienvenido! Redirigiendo...", "Welcome! Redirecting..."),
        ("error_msg", "Error al iniciar sesión", "Login failed"),
        (
            "connection_error",
            "Error de conexión. Intenta nuevamente.",
            "Connection error. Please try again.",
        ),
        ("admin_title", "Administrador", "Administrator"),
        ("support_agent", "Agente de Soporte", "Support Agent"),
        ("auditor_panel", "Panel Auditor", "Auditor Panel"),
    ];

    #[test]
    fn embedded_table_covers_every_locale() {
        let table = TranslationTable::embedded();
        for locale in Locale::ALL {
            assert!(table.has_locale(locale), "missing bundle for {}", locale);
        }
    }

    #[test]
    fn embedded_table_returns_shipped_strings() {
        let table = TranslationTable::embedded();
        for (key, es, en) in SHIPPED {
            assert_eq!(table.lookup(Locale::Es, key).as_deref(), Some(*es));
            assert_eq!(table.lookup(Locale::En, key).as_deref(), Some(*en));
        }
    }

    #[test]
    fn translate_falls_back_to_key() {
        let table = TranslationTable::embedded();
        assert_eq!(table.translate(Locale::En, "no_such_key"), "no_such_key");
        assert_eq!(table.lookup(Locale::Es, "no_such_key"), None);
    }

    #[test]
    fn missing_locale_falls_back_to_key() {
        let table = TranslationTable::from_sources([(Locale::Es, "greeting = Hola\n")]);
        assert!(!table.has_locale(Locale::En));
        assert_eq!(table.translate(Locale::En, "greeting"), "greeting");
        assert_eq!(table.translate(Locale::Es, "greeting"), "Hola");
    }

    #[test]
    fn broken_entries_do_not_discard_valid_ones() {
        let table = TranslationTable::from_sources([(
            Locale::En,
            "good = Fine\nthis is not fluent\nalso_good = Also fine\n",
        )]);
        assert_eq!(table.lookup(Locale::En, "good").as_deref(), Some("Fine"));
        assert_eq!(
            table.lookup(Locale::En, "also_good").as_deref(),
            Some("Also fine")
        );
    }

    #[test]
    fn attribute_only_message_counts_as_missing() {
        let table = TranslationTable::from_sources([(Locale::En, "only_attr =\n    .title = T\n")]);
        assert_eq!(table.lookup(Locale::En, "only_attr"), None);
        assert_eq!(table.translate(Locale::En, "only_attr"), "only_attr");
    }

    #[test]
    fn debug_lists_locales() {
        let table = TranslationTable::embedded();
        let rendered = format!("{:?}", table);
        assert!(rendered.contains("\"en\""));
        assert!(rendered.contains("\"es\""));
    }
}
