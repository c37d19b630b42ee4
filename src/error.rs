// SPDX-License-Identifier: MPL-2.0
//! Errors raised at the I/O edges of the crate.
//!
//! Localization itself never fails: lookups fall back to the key and
//! unsupported languages fall back to the default. Only reading and writing
//! files and parsing markup can produce an [`Error`].

use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Preferences(String),
    Markup(MarkupError),
}

/// Specific failures while loading or writing a markup document.
#[derive(Debug, Clone)]
pub enum MarkupError {
    /// The parser rejected the input.
    Malformed(String),

    /// A closing tag had no matching opening tag.
    UnexpectedClose(String),

    /// The document ended while elements were still open.
    UnclosedElement(String),

    /// The document contains no element at all.
    Empty,
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::Malformed(msg) => write!(f, "malformed markup: {}", msg),
            MarkupError::UnexpectedClose(name) => {
                write!(f, "closing tag </{}> has no matching opening tag", name)
            }
            MarkupError::UnclosedElement(name) => write!(f, "element <{}> is never closed", name),
            MarkupError::Empty => write!(f, "document has no root element"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Preferences(e) => write!(f, "Preferences Error: {}", e),
            Error::Markup(e) => write!(f, "Markup Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<MarkupError> for Error {
    fn from(err: MarkupError) -> Self {
        Error::Markup(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Markup(MarkupError::Malformed(err.to_string()))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Markup(MarkupError::Malformed(err.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn markup_error_wraps_into_error() {
        let err: Error = MarkupError::UnclosedElement("div".to_string()).into();
        assert_eq!(
            format!("{}", err),
            "Markup Error: element <div> is never closed"
        );
    }

    #[test]
    fn markup_error_display_names_tag() {
        let err = MarkupError::UnexpectedClose("span".to_string());
        assert!(format!("{}", err).contains("</span>"));
        assert_eq!(format!("{}", MarkupError::Empty), "document has no root element");
    }
}
