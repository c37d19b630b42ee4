// SPDX-License-Identifier: MPL-2.0
//! The closed set of supported locales and environment locale detection.

use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// Every supported locale, in selector order.
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    /// Short language code, as persisted and written to the document.
    pub fn code(self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    /// Label shown in the language selector.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::Es => "Español 🇪🇸",
            Locale::En => "English 🇺🇸",
        }
    }

    pub fn language_identifier(self) -> LanguageIdentifier {
        self.code().parse().unwrap_or_default()
    }

    /// Matches an exact supported code, ignoring case and surrounding space.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
    }

    /// Maps any locale tag onto a supported locale by its primary language
    /// subtag, so `en-US`, `en_GB.UTF-8` and `EN` all resolve to [`Locale::En`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        let language = primary_language(tag)?;
        Self::from_code(&language)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a code names no supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLocale(pub String);

impl fmt::Display for UnsupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale: {:?}", self.0)
    }
}

impl std::error::Error for UnsupportedLocale {}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

/// Extracts the primary language subtag from a locale tag.
///
/// POSIX tags such as `pt_BR.UTF-8@euro` carry suffixes that BCP 47 parsing
/// rejects, so they are cut down before handing the tag to `unic-langid`.
fn primary_language(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        return None;
    }
    if let Ok(id) = tag.parse::<LanguageIdentifier>() {
        return Some(id.language.as_str().to_string());
    }
    let head = tag.split(['-', '_', '.', '@']).next()?;
    head.parse::<LanguageIdentifier>()
        .ok()
        .map(|id| id.language.as_str().to_string())
}

/// Returns the operating system's preferred locale tag, if any.
pub fn detect_environment_locale() -> Option<String> {
    sys_locale::get_locale()
}
