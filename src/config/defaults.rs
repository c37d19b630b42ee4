// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for the document
//! contract and persistence key used when `settings.toml` leaves a field
//! unset.

// ==========================================================================
// Persistence Defaults
// ==========================================================================

/// Key under which the language code is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "appLang";

// ==========================================================================
// Document Contract Defaults
// ==========================================================================

/// Attribute holding the translation key of an annotated element.
pub const DEFAULT_TRANSLATION_ATTRIBUTE: &str = "data-i18n";

/// Element id of the visible language-selector control.
pub const DEFAULT_SELECTOR_ID: &str = "lang-selector";

/// Element id of the wrapper injected around the selector control.
pub const DEFAULT_SELECTOR_CONTAINER_ID: &str = "lang-container";

/// Class of the container that receives the selector control.
pub const DEFAULT_MOUNT_CLASS: &str = "login-container";

/// Script run by the selector's `onchange` handler in the served page.
pub const DEFAULT_SELECTOR_ONCHANGE: &str = "i18n.setLanguage(this.value)";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(!DEFAULT_STORAGE_KEY.is_empty());
    assert!(!DEFAULT_TRANSLATION_ATTRIBUTE.is_empty());
    assert!(!DEFAULT_SELECTOR_ID.is_empty());
    assert!(!DEFAULT_SELECTOR_CONTAINER_ID.is_empty());
    assert!(!DEFAULT_MOUNT_CLASS.is_empty());
    assert!(!DEFAULT_SELECTOR_ONCHANGE.is_empty());
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_ids_are_distinct() {
        assert_ne!(DEFAULT_SELECTOR_ID, DEFAULT_SELECTOR_CONTAINER_ID);
    }

    #[test]
    fn translation_attribute_is_a_data_attribute() {
        assert!(DEFAULT_TRANSLATION_ATTRIBUTE.starts_with("data-"));
    }
}
