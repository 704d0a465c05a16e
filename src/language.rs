use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Target languages offered for translation and speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Tamil,
    Hindi,
    Telugu,
    Malayalam,
    Kannada,
    Marathi,
    Gujarati,
    Bengali,
    Urdu,
    English,
}

/// Writing system a language is rendered in. Fonts are chosen per script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Tamil,
    Devanagari,
    Telugu,
    Malayalam,
    Kannada,
    Gujarati,
    Bengali,
    Arabic,
    Latin,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0} (expected one of: {names})", names = Language::names().join(", "))]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Language; 10] = [
        Language::Tamil,
        Language::Hindi,
        Language::Telugu,
        Language::Malayalam,
        Language::Kannada,
        Language::Marathi,
        Language::Gujarati,
        Language::Bengali,
        Language::Urdu,
        Language::English,
    ];

    /// ISO 639-1 code passed to the translator and the synthesizer.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Tamil => "ta",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Malayalam => "ml",
            Language::Kannada => "kn",
            Language::Marathi => "mr",
            Language::Gujarati => "gu",
            Language::Bengali => "bn",
            Language::Urdu => "ur",
            Language::English => "en",
        }
    }

    /// Lowercase display name, also used in output filenames.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Tamil => "tamil",
            Language::Hindi => "hindi",
            Language::Telugu => "telugu",
            Language::Malayalam => "malayalam",
            Language::Kannada => "kannada",
            Language::Marathi => "marathi",
            Language::Gujarati => "gujarati",
            Language::Bengali => "bengali",
            Language::Urdu => "urdu",
            Language::English => "english",
        }
    }

    pub fn script(&self) -> Script {
        match self {
            Language::Tamil => Script::Tamil,
            Language::Hindi | Language::Marathi => Script::Devanagari,
            Language::Telugu => Script::Telugu,
            Language::Malayalam => Script::Malayalam,
            Language::Kannada => Script::Kannada,
            Language::Gujarati => Script::Gujarati,
            Language::Bengali => Script::Bengali,
            Language::Urdu => Script::Arabic,
            Language::English => Script::Latin,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|l| l.name()).collect()
    }
}

impl Script {
    pub fn as_str(&self) -> &'static str {
        match self {
            Script::Tamil => "tamil",
            Script::Devanagari => "devanagari",
            Script::Telugu => "telugu",
            Script::Malayalam => "malayalam",
            Script::Kannada => "kannada",
            Script::Gujarati => "gujarati",
            Script::Bengali => "bengali",
            Script::Arabic => "arabic",
            Script::Latin => "latin",
        }
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts either the name or the code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.name() == needle || l.code() == needle)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
