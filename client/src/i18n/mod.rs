//! Internationalisation: supported languages, dictionaries, lookup and formatting.

pub mod dictionary;
pub mod format;
pub mod languages;
pub mod resolver;

pub use languages::{Language, LanguageCode, SUPPORTED_LANGUAGES};
pub use resolver::{I18n, LanguageState};
