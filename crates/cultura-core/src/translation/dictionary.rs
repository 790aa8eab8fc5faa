//! Static translation tables and the offline substitution helpers built on them.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::Lang;

/// Culturally significant phrases with human-curated translations, indexed by [`Lang::index`].
const CURATED_PHRASES: &[(&str, [&str; 5])] = &[
    (
        "Cultural Heritage of Northeast India",
        [
            "Cultural Heritage of Northeast India",
            "উত্তৰ-পূৰ্ব ভাৰতৰ সাংস্কৃতিক ঐতিহ্য",
            "ꯅꯣꯡꯄꯣꯛ-ꯅꯨꯡꯁꯤꯠꯀꯤ ꯚꯥꯔꯇꯀꯤ ꯀꯂꯆꯔꯦꯜ ꯍꯦꯔꯤꯇꯦꯖ",
            "উত্তর-পূর্ব ভারতের সাংস্কৃতিক ঐতিহ্য",
            "उत्तर-पूर्व भारत की सांस्कृतिक विरासत",
        ],
    ),
    (
        "Explore traditions, festivals, and rituals",
        [
            "Explore traditions, festivals, and rituals",
            "পৰম্পৰা, উৎসৱ আৰু ৰীতি-নীতি অন্বেষণ কৰক",
            "ꯇ꯭ꯔꯦꯗꯤꯁꯟ, ꯐꯦꯁ꯭ꯇꯤꯚꯦꯜ ꯑꯃꯁꯨꯡ ꯔꯤꯆꯨꯑꯦꯜ ꯊꯤꯖꯤꯅꯕ",
            "ঐতিহ্য, উৎসব এবং আচার-অনুষ্ঠান অন্বেষণ করুন",
            "परंपराओं, त्योहारों और रीति-रिवाजों का अन्वेषण करें",
        ],
    ),
    ("Festival", ["Festival", "উৎসৱ", "ꯆꯥꯡ", "উৎসব", "त्योहार"]),
    ("Ritual", ["Ritual", "ৰীতি-নীতি", "ꯔꯤꯆꯨꯑꯦꯜ", "আচার", "रीति"]),
    ("Community", ["Community", "সম্প্ৰদায়", "ꯀꯝꯌꯨꯅꯤꯇꯤ", "সম্প্রদায়", "समुदाय"]),
    ("Tradition", ["Tradition", "পৰম্পৰা", "ꯇ꯭ꯔꯦꯗꯤꯁꯟ", "ঐতিহ্য", "परंपरा"]),
    (
        "Bihu Festival",
        ["Bihu Festival", "বিহু উৎসৱ", "ꯕꯤꯍꯨ ꯆꯥꯡ", "বিহু উৎসব", "बिहू त्योहार"],
    ),
    (
        "Hornbill Festival",
        [
            "Hornbill Festival",
            "হৰ্নবিল উৎসৱ",
            "ꯍꯣꯔꯅꯕꯤꯜ ꯆꯥꯡ",
            "হর্নবিল উৎসব",
            "हॉर्नबिल त्योहार",
        ],
    ),
    (
        "Lai Haraoba",
        ["Lai Haraoba", "লাই হাৰাওবা", "ꯂꯥꯏ ꯍꯔꯥꯎꯕ", "লাই হারাওবা", "लाई हराओबा"],
    ),
];

/// English term -> (Assamese, Manipuri). Breadth over curation.
const OFFLINE_TERMS: &[(&str, &str, &str)] = &[
    ("hello", "নমস্কাৰ", "ꯈꯨꯔꯨꯝꯖꯔꯤ"),
    ("welcome", "স্বাগতম", "ꯇꯔꯥꯝꯅ"),
    ("thank you", "ধন্যবাদ", "ꯊꯥꯒꯠꯆꯔꯤ"),
    ("please", "অনুগ্ৰহ কৰি", "ꯆꯥꯅꯕꯤꯗꯨꯅ"),
    ("yes", "হয়", "ꯍꯣꯏ"),
    ("no", "নহয়", "ꯅꯠꯇꯦ"),
    ("festival", "উৎসৱ", "ꯆꯥꯡ"),
    ("ritual", "ৰীতি-নীতি", "ꯔꯤꯆꯨꯑꯦꯜ"),
    ("tradition", "পৰম্পৰা", "ꯇ꯭ꯔꯦꯗꯤꯁꯟ"),
    ("culture", "সংস্কৃতি", "ꯀꯂꯆꯔ"),
    ("heritage", "ঐতিহ্য", "ꯍꯦꯔꯤꯇꯦꯖ"),
    ("community", "সম্প্ৰদায়", "ꯀꯝꯌꯨꯅꯤꯇꯤ"),
    ("dance", "নৃত্য", "ꯖꯒꯣꯏ"),
    ("music", "সংগীত", "ꯏꯁꯩ"),
    ("food", "খাদ্য", "ꯆꯥꯛ"),
    ("language", "ভাষা", "ꯂꯣꯟ"),
    ("bihu", "বিহু", "ꯕꯤꯍꯨ"),
    ("durga puja", "দুৰ্গা পূজা", "ꯗꯨꯔꯒ ꯄꯨꯖ"),
    ("kali puja", "কালী পূজা", "ꯀꯥꯂꯤ ꯄꯨꯖ"),
    ("poila boishakh", "পহিলা বৈশাখ", "ꯄꯣꯏꯂ ꯕꯣꯏꯁꯥꯈ"),
    ("lai haraoba", "লাই হাৰাওবা", "ꯂꯥꯏ ꯍꯔꯥꯎꯕ"),
    ("yaoshang", "যাওশাং", "ꯌꯥꯎꯁꯥꯡ"),
    ("ningol chakouba", "নিংগোল চাকৌবা", "ꯅꯤꯡꯒꯣꯜ ꯆꯥꯀꯧꯕ"),
    ("good morning", "শুভ ৰাতিপুৱা", "ꯅꯨꯡꯁꯤꯠ ꯅꯨꯡꯥꯏꯕ"),
    ("good evening", "শুভ সন্ধিয়া", "ꯅꯨꯃꯤꯗꯥꯡ ꯅꯨꯡꯥꯏꯕ"),
    ("how are you", "আপুনি কেনে আছে", "ꯅꯍꯥꯛ ꯀꯔꯝꯅ ꯂꯩꯔꯤꯕꯒꯦ"),
    ("what is your name", "আপোনাৰ নাম কি", "ꯅꯍꯥꯛꯀꯤ ꯃꯤꯡ ꯀꯔꯤꯅꯣ"),
    ("where are you from", "আপুনি ক'ৰ পৰা আহিছে", "ꯅꯍꯥꯛ ꯀꯗꯥꯏꯗꯨꯗꯒꯤ ꯂꯥꯛꯂꯤꯕꯒꯦ"),
    ("temple", "মন্দিৰ", "ꯂꯥꯏꯁꯪ"),
    ("prayer", "প্ৰাৰ্থনা", "ꯄ꯭ꯔꯥꯔ꯭ꯊꯅ"),
    ("god", "ভগৱান", "ꯂꯥꯏ"),
    ("goddess", "দেৱী", "ꯂꯥꯏꯅꯨꯡꯁꯤ"),
    ("sacred", "পবিত্ৰ", "ꯁꯦꯡꯕ"),
    ("blessing", "আশীৰ্বাদ", "ꯑꯁꯤꯔꯕꯥꯗ"),
    ("ceremony", "অনুষ্ঠান", "ꯑꯅꯨꯁ꯭ꯊꯥꯟ"),
    ("celebration", "উদযাপন", "ꯅꯨꯡꯥꯏꯕ"),
    ("mountain", "পৰ্বত", "ꯆꯤꯡ"),
    ("river", "নদী", "ꯇꯨꯔꯦꯜ"),
    ("forest", "অৰণ্য", "ꯎꯃꯪ"),
    ("village", "গাঁও", "ꯈꯨꯉ꯭ꯒꯪ"),
    ("city", "চহৰ", "ꯁꯍꯔ"),
    ("home", "ঘৰ", "ꯌꯨꯝ"),
    ("family", "পৰিয়াল", "ꯏꯃꯨꯡ"),
    ("friend", "বন্ধু", "ꯃꯔꯨꯞ"),
    ("morning", "ৰাতিপুৱা", "ꯅꯨꯡꯁꯤꯠ"),
    ("evening", "সন্ধিয়া", "ꯅꯨꯃꯤꯗꯥꯡ"),
    ("night", "ৰাতি", "ꯅꯨꯃꯤꯗꯥꯡ"),
    ("day", "দিন", "ꯅꯨꯃꯤꯠ"),
    ("spring", "বসন্ত", "ꯕꯁꯟꯇ"),
    ("summer", "গ্ৰীষ্ম", "ꯅꯨꯡꯍꯤꯠꯄ"),
    ("winter", "শীত", "ꯁꯤꯠꯄ"),
    ("rain", "বৰষুণ", "ꯅꯣꯡ"),
    ("i love you", "মই তোমাক ভাল পাওঁ", "ꯑꯩ ꯅꯍꯥꯀꯨ ꯅꯨꯡꯁꯤꯕ"),
    ("beautiful", "সুন্দৰ", "ꯐꯖꯕ"),
    ("delicious", "সুস্বাদু", "ꯃꯆꯤ ꯐꯕ"),
    ("happy", "আনন্দিত", "ꯍꯔꯥꯎꯕ"),
    ("sad", "দুখী", "ꯅꯨꯡꯉꯥꯏꯇꯕ"),
    ("love", "প্ৰেম", "ꯅꯨꯡꯁꯤꯕ"),
    ("peace", "শান্তি", "ꯁꯥꯟꯇꯤ"),
    ("water", "পানী", "ꯏꯁꯤꯡ"),
    ("fire", "জুই", "ꯃꯩ"),
    ("earth", "পৃথিৱী", "ꯃꯥꯂꯦꯝ"),
    ("sky", "আকাশ", "ꯑꯇꯤꯌ"),
    ("sun", "সূৰ্য", "ꯅꯨꯃꯤꯠ"),
    ("moon", "চন্দ্ৰ", "ꯊ"),
    ("star", "তৰা", "ꯊꯥꯡꯖꯤꯡ"),
    ("flower", "ফুল", "ꯂꯩ"),
    ("tree", "গছ", "ꯎ"),
    ("bird", "চৰাই", "ꯎꯆꯦꯛ"),
    ("fish", "মাছ", "ꯉ"),
    ("book", "কিতাপ", "ꯂꯥꯏꯔꯤꯛ"),
    ("school", "বিদ্যালয়", "ꯁ꯭ꯀꯨꯜ"),
    ("teacher", "শিক্ষক", "ꯑꯣꯖ"),
    ("student", "ছাত্ৰ", "ꯃꯍꯩꯔꯣꯏ"),
    ("mother", "মা", "ꯏꯃ"),
    ("father", "দেউতা", "ꯄꯄ"),
    ("brother", "ভাই", "ꯃꯅꯥꯎ"),
    ("sister", "ভনী", "ꯏꯆꯤꯜ"),
    ("child", "শিশু", "ꯑꯉꯥꯡ"),
    ("man", "মানুহ", "ꯃꯤꯑꯣꯏ"),
    ("woman", "মহিলা", "ꯅꯨꯄꯤ"),
    ("old", "পুৰণি", "ꯑꯔꯤꯕ"),
    ("new", "নতুন", "ꯑꯅꯧꯕ"),
    ("big", "ডাঙৰ", "ꯆꯥꯎꯕ"),
    ("small", "সৰু", "ꯄꯤꯀꯄ"),
    ("good", "ভাল", "ꯐꯕ"),
    ("bad", "বেয়া", "ꯐꯠꯇꯕ"),
];

/// Sentence openers, lowercase English -> target-language equivalent.
const PATTERNS_AS: &[(&str, &str)] = &[
    ("what is", "কি"),
    ("where is", "ক'ত আছে"),
    ("how to", "কেনেকৈ"),
    ("tell me about", "মোক কওক"),
    ("i want to", "মই বিচাৰো"),
    ("can you", "আপুনি পাৰিবনে"),
    ("this is", "এইটো"),
    ("that is", "সেইটো"),
];

const PATTERNS_MNI: &[(&str, &str)] = &[
    ("what is", "ꯀꯔꯤꯅꯣ"),
    ("where is", "ꯀꯗꯥ ꯂꯩꯔꯤꯕꯒꯦ"),
    ("how to", "ꯀꯔꯝꯅ"),
    ("tell me about", "ꯑꯩꯉꯣꯟꯗ ꯍꯥꯌꯕꯤꯌꯨ"),
    ("i want to", "ꯑꯩ ꯄꯥꯝꯃꯤ"),
    ("can you", "ꯅꯍꯥꯛꯅ ꯉꯝꯕ"),
    ("this is", "ꯃꯁꯤ"),
    ("that is", "ꯃꯗꯨ"),
];

fn patterns_for(target: Lang) -> &'static [(&'static str, &'static str)] {
    match target {
        Lang::As => PATTERNS_AS,
        Lang::Mni => PATTERNS_MNI,
        Lang::En | Lang::Bn | Lang::Hi => &[],
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Curated translation of `text` into `target`, matched by lowercase trimmed equality.
///
/// Phrases are keyed in English, so English is never a curated target.
pub fn curated_phrase(text: &str, target: Lang) -> Option<&'static str> {
    if target == Lang::En {
        return None;
    }
    let needle = normalize(text);
    CURATED_PHRASES
        .iter()
        .find(|(phrase, _)| phrase.to_lowercase() == needle)
        .map(|(_, translations)| translations[target.index()])
}

pub fn curated_phrase_count() -> usize {
    CURATED_PHRASES.len()
}

/// Bilingual word/phrase dictionary. Seeded from a static table, extendable at runtime.
#[derive(Debug)]
pub struct OfflineDictionary {
    entries: RwLock<HashMap<String, HashMap<Lang, String>>>,
}

impl Default for OfflineDictionary {
    fn default() -> Self {
        let entries = OFFLINE_TERMS
            .iter()
            .map(|&(english, assamese, manipuri)| {
                let translations = HashMap::from([
                    (Lang::As, assamese.to_string()),
                    (Lang::Mni, manipuri.to_string()),
                ]);
                (english.to_string(), translations)
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl OfflineDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact lookup by lowercase trimmed text.
    pub fn lookup(&self, text: &str, target: Lang) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&normalize(text)).and_then(|t| t.get(&target)).cloned()
    }

    pub fn has_translation(&self, text: &str, target: Lang) -> bool {
        self.lookup(text, target).is_some()
    }

    /// Add or replace the Assamese/Manipuri translations of an English term.
    pub fn add_translation(&self, english: &str, assamese: &str, manipuri: &str) {
        let key = normalize(english);
        if key.is_empty() {
            return;
        }
        let translations = HashMap::from([
            (Lang::As, assamese.to_string()),
            (Lang::Mni, manipuri.to_string()),
        ]);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, translations);
    }

    /// All English terms, sorted.
    pub fn terms(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut terms: Vec<String> = entries.keys().cloned().collect();
        terms.sort();
        terms
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Replace every ASCII-case-insensitive occurrence of `needle` (lowercase ASCII) in `haystack`.
fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `haystack`.
    let lowered = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (idx, _) in lowered.match_indices(needle) {
        out.push_str(&haystack[last..idx]);
        out.push_str(replacement);
        last = idx + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}

/// Substitute the sentence-opener templates of `target`. Returns `None` when nothing matched.
pub fn substitute_patterns(text: &str, target: Lang) -> Option<String> {
    let mut result = text.to_string();
    for (english, translation) in patterns_for(target) {
        result = replace_ignore_ascii_case(&result, english, translation);
    }
    (result != text).then_some(result)
}

fn substitute_curated_phrases(text: &str, target: Lang) -> String {
    if target == Lang::En {
        return text.to_string();
    }
    // Longest first so "Bihu Festival" wins over "Festival".
    let mut phrases: Vec<_> = CURATED_PHRASES.iter().filter(|(p, _)| p.is_ascii()).collect();
    phrases.sort_by_key(|(p, _)| std::cmp::Reverse(p.len()));

    let mut result = text.to_string();
    for (phrase, translations) in phrases {
        result = replace_ignore_ascii_case(
            &result,
            &phrase.to_ascii_lowercase(),
            translations[target.index()],
        );
    }
    result
}

/// Translate token by token, keeping untranslated tokens verbatim.
/// Returns `None` unless at least one token was translated.
pub fn translate_word_by_word(text: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut translated_any = false;
    let words: Vec<String> = text
        .split_whitespace()
        .map(|token| {
            let clean: String = token
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
                .to_lowercase();
            match (!clean.is_empty()).then(|| lookup(&clean)).flatten() {
                Some(translation) => {
                    translated_any = true;
                    translation
                }
                None => token.to_string(),
            }
        })
        .collect();
    translated_any.then(|| words.join(" "))
}

/// Last-resort heuristic: templates, then embedded curated phrases, then word-by-word
/// over both the offline dictionary and the single-word curated phrases.
pub fn heuristic_translate(text: &str, target: Lang, dictionary: &OfflineDictionary) -> Option<String> {
    let mut working = substitute_patterns(text, target).unwrap_or_else(|| text.to_string());
    working = substitute_curated_phrases(&working, target);
    if let Some(words) = translate_word_by_word(&working, |word| {
        dictionary
            .lookup(word, target)
            .or_else(|| curated_phrase(word, target).map(str::to_string))
    }) {
        working = words;
    }
    (working != text).then_some(working)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_match_is_case_and_whitespace_insensitive() {
        assert_eq!(curated_phrase("Festival", Lang::As), Some("উৎসৱ"));
        assert_eq!(curated_phrase("  bihu festival ", Lang::Hi), Some("बिहू त्योहार"));
        assert_eq!(curated_phrase("Festivals", Lang::As), None);
    }

    #[test]
    fn english_is_not_a_curated_target() {
        assert_eq!(curated_phrase("festival", Lang::En), None);
        let dict = OfflineDictionary::new();
        assert_eq!(heuristic_translate("festival music", Lang::En, &dict), None);
    }

    #[test]
    fn offline_dictionary_lookup_and_learning() {
        let dict = OfflineDictionary::new();
        assert_eq!(dict.lookup("Thank You", Lang::Mni).as_deref(), Some("ꯊꯥꯒꯠꯆꯔꯤ"));
        assert!(!dict.has_translation("festival", Lang::Bn));

        assert!(!dict.has_translation("hornbill", Lang::As));
        dict.add_translation("Hornbill", "ধনেশ", "ꯍꯣꯔꯅꯕꯤꯜ");
        assert_eq!(dict.lookup("hornbill", Lang::As).as_deref(), Some("ধনেশ"));
        assert!(dict.terms().contains(&"hornbill".to_string()));
    }

    #[test]
    fn patterns_replace_case_insensitively_and_keep_the_rest() {
        assert_eq!(
            substitute_patterns("What is Bihu?", Lang::As).as_deref(),
            Some("কি Bihu?")
        );
        assert_eq!(
            substitute_patterns("TELL ME ABOUT Wangala", Lang::Mni).as_deref(),
            Some("ꯑꯩꯉꯣꯟꯗ ꯍꯥꯌꯕꯤꯌꯨ Wangala")
        );
        assert_eq!(substitute_patterns("What is Bihu?", Lang::Hi), None);
        assert_eq!(substitute_patterns("Wangala", Lang::As), None);
    }

    #[test]
    fn word_by_word_needs_one_hit_and_keeps_unknown_tokens() {
        let dict = OfflineDictionary::new();
        let lookup = |w: &str| dict.lookup(w, Lang::As);
        assert_eq!(
            translate_word_by_word("Sacred river Brahmaputra", lookup).as_deref(),
            Some("পবিত্ৰ নদী Brahmaputra")
        );
        assert_eq!(translate_word_by_word("Brahmaputra Majuli", lookup), None);
    }

    #[test]
    fn word_by_word_strips_punctuation_for_lookup() {
        let dict = OfflineDictionary::new();
        let out = translate_word_by_word("music, dance!", |w| dict.lookup(w, Lang::As));
        assert_eq!(out.as_deref(), Some("সংগীত নৃত্য"));
    }

    #[test]
    fn heuristic_reaches_bengali_through_curated_words() {
        let dict = OfflineDictionary::new();
        assert_eq!(
            heuristic_translate("Bihu Festival celebrations", Lang::Bn, &dict).as_deref(),
            Some("বিহু উৎসব celebrations")
        );
        assert_eq!(
            heuristic_translate("Community Tradition", Lang::Hi, &dict).as_deref(),
            Some("समुदाय परंपरा")
        );
        assert_eq!(heuristic_translate("Brahmaputra", Lang::Hi, &dict), None);
    }
}
