//! Supported UI languages.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Hi,
    Bn,
    Te,
    Ta,
    Mr,
}

/// Display metadata for a language picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Language {
    pub code: LanguageCode,
    /// Native name.
    pub name: &'static str,
    pub flag: &'static str,
}

pub const SUPPORTED_LANGUAGES: [Language; 6] = [
    Language { code: LanguageCode::En, name: "English", flag: "🇺🇸" },
    Language { code: LanguageCode::Hi, name: "हिंदी", flag: "🇮🇳" },
    Language { code: LanguageCode::Bn, name: "বাংলা", flag: "🇧🇩" },
    Language { code: LanguageCode::Te, name: "తెలుగు", flag: "🇮🇳" },
    Language { code: LanguageCode::Ta, name: "தமிழ்", flag: "🇮🇳" },
    Language { code: LanguageCode::Mr, name: "मराठी", flag: "🇮🇳" },
];

impl LanguageCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Bn => "bn",
            Self::Te => "te",
            Self::Ta => "ta",
            Self::Mr => "mr",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        SUPPORTED_LANGUAGES.iter().map(|lang| lang.code).find(|code| code.as_str() == raw)
    }

    /// Match a BCP 47 tag such as `hi-IN` by its primary subtag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?;
        Self::parse(&primary.to_ascii_lowercase())
    }

    pub fn info(self) -> &'static Language {
        let index = SUPPORTED_LANGUAGES.iter().position(|lang| lang.code == self).unwrap_or(0);
        &SUPPORTED_LANGUAGES[index]
    }

    /// Locale passed to formatters. English renders with Indian conventions.
    pub fn locale(self) -> &'static str {
        match self {
            Self::En => "en-IN",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
