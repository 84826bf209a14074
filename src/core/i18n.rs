//! Display languages for localized copy and translation targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the site copy and translation endpoint work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Vi,
    En,
    Zh,
    Ko,
    Ja,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Vi,
        Language::En,
        Language::Zh,
        Language::Ko,
        Language::Ja,
    ];

    /// ISO 639-1 code, as used in wire payloads and config.
    pub fn code(self) -> &'static str {
        match self {
            Language::Vi => "vi",
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ko => "ko",
            Language::Ja => "ja",
        }
    }

    /// English name, as the translation endpoint expects in prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::Vi => "Vietnamese",
            Language::En => "English",
            Language::Zh => "Chinese (Simplified)",
            Language::Ko => "Korean",
            Language::Ja => "Japanese",
        }
    }

    /// Name in the language itself, for switcher-style UI labels.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Vi => "Tiếng Việt",
            Language::En => "English",
            Language::Zh => "中文",
            Language::Ko => "한국어",
            Language::Ja => "日本語",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Language::Vi => "🇻🇳",
            Language::En => "🇬🇧",
            Language::Zh => "🇨🇳",
            Language::Ko => "🇰🇷",
            Language::Ja => "🇯🇵",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vi" => Ok(Language::Vi),
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            "ko" => Ok(Language::Ko),
            "ja" => Ok(Language::Ja),
            other => Err(format!("unknown language code: {other}")),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Vi
    }
}

/// Pick the vi or en variant of a bilingual field for a display language.
/// Site copy is authored in Vietnamese and English; every other display
/// language falls back to English.
pub fn pick_localized<'a>(lang: Language, vi: &'a str, en: &'a str) -> &'a str {
    match lang {
        Language::Vi => vi,
        _ => en,
    }
}
