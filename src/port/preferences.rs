// SPDX-License-Identifier: MPL-2.0
//! Preference store port: key-value persistence across sessions.

use crate::error::Result;

/// Port for persisting string preferences.
///
/// # Example
///
/// ```
/// use page_l10n::infrastructure::MemoryPreferenceStore;
/// use page_l10n::port::PreferenceStore;
///
/// let mut store = MemoryPreferenceStore::default();
/// store.set("appLang", "en").unwrap();
/// assert_eq!(store.get("appLang").as_deref(), Some("en"));
/// ```
pub trait PreferenceStore {
    /// Returns the stored value, or `None` if the key was never written or
    /// cannot be read.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`](crate::error::Error) if the backing storage
    /// cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// Consumed as `&mut dyn PreferenceStore`.
const _: Option<&dyn PreferenceStore> = None;
