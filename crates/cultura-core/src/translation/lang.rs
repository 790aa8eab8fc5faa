//! Supported language codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    As,
    Mni,
    Bn,
    Hi,
}

impl Lang {
    pub fn all() -> &'static [Lang] {
        &[Lang::En, Lang::As, Lang::Mni, Lang::Bn, Lang::Hi]
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::As => "as",
            Lang::Mni => "mni",
            Lang::Bn => "bn",
            Lang::Hi => "hi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::As => "Assamese",
            Lang::Mni => "Manipuri",
            Lang::Bn => "Bengali",
            Lang::Hi => "Hindi",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::As => "অসমীয়া",
            Lang::Mni => "ꯃꯅꯤꯄꯨꯔꯤ",
            Lang::Bn => "বাংলা",
            Lang::Hi => "हिन्दी",
        }
    }

    pub fn script(self) -> &'static str {
        match self {
            Lang::En => "Latin",
            Lang::As | Lang::Bn => "Bengali",
            Lang::Mni => "Meetei Mayek",
            Lang::Hi => "Devanagari",
        }
    }

    /// Code understood by the BHASHINI pipeline. Identical to [`Lang::code`] for every supported language.
    pub fn bhashini_code(self) -> &'static str {
        self.code()
    }

    /// Position in [`Lang::all`]; used to index per-language tables.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::all()
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnsupportedLanguage(s.to_string()))
    }
}

/// Language metadata as exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    pub script: &'static str,
}

impl From<Lang> for LanguageInfo {
    fn from(lang: Lang) -> Self {
        Self {
            code: lang.code(),
            name: lang.name(),
            native_name: lang.native_name(),
            script: lang.script(),
        }
    }
}

pub fn supported_languages() -> Vec<LanguageInfo> {
    Lang::all().iter().copied().map(LanguageInfo::from).collect()
}

/// Every ordered pair of distinct supported languages.
pub fn supported_pairs() -> Vec<(Lang, Lang)> {
    Lang::all()
        .iter()
        .flat_map(|&source| {
            Lang::all()
                .iter()
                .filter(move |&&target| target != source)
                .map(move |&target| (source, target))
        })
        .collect()
}

/// Guess the language of `text` from its script.
///
/// Meetei Mayek is Manipuri, Devanagari is Hindi. Bengali script is Assamese when it
/// uses ৰ or ৱ (letters Bengali lacks), Bengali otherwise. Anything else is English.
pub fn detect_language(text: &str) -> Lang {
    let mut bengali_script = false;
    for ch in text.chars() {
        match ch {
            '\u{ABC0}'..='\u{ABFF}' | '\u{AAE0}'..='\u{AAFF}' => return Lang::Mni,
            '\u{0900}'..='\u{097F}' => return Lang::Hi,
            'ৰ' | 'ৱ' => return Lang::As,
            '\u{0980}'..='\u{09FF}' => bengali_script = true,
            _ => {}
        }
    }
    if bengali_script {
        Lang::Bn
    } else {
        Lang::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes_case_insensitively() {
        assert_eq!("mni".parse::<Lang>().unwrap(), Lang::Mni);
        assert_eq!(" AS ".parse::<Lang>().unwrap(), Lang::As);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "fr".parse::<Lang>().unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedLanguage(code) if code == "fr"));
    }

    #[test]
    fn twenty_directed_pairs() {
        let pairs = supported_pairs();
        assert_eq!(pairs.len(), 20);
        assert!(pairs.iter().all(|(s, t)| s != t));
    }

    #[test]
    fn detects_scripts() {
        assert_eq!(detect_language("Bihu festival"), Lang::En);
        assert_eq!(detect_language("বিহু উৎসৱ"), Lang::As);
        assert_eq!(detect_language("বিহু উৎসব"), Lang::Bn);
        assert_eq!(detect_language("ꯕꯤꯍꯨ ꯆꯥꯡ"), Lang::Mni);
        assert_eq!(detect_language("बिहू त्योहार"), Lang::Hi);
    }

    #[test]
    fn index_matches_all_order() {
        for (i, lang) in Lang::all().iter().enumerate() {
            assert_eq!(lang.index(), i);
        }
    }
}
