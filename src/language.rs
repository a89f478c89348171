use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Returned when no profile matches or the text is too short to judge.
pub const UNKNOWN_LANGUAGE: &str = "und";

/// Fewer word tokens than this always detect as [`UNKNOWN_LANGUAGE`].
const MIN_TOKENS: usize = 2;

/// Assigns an ISO 639-1 code to a text.
pub trait LanguageDetector: Send + Sync {
    /// Deterministic; never fails for any string input.
    fn detect(&self, text: &str) -> String;
}

struct Profile {
    code: &'static str,
    stopwords: &'static [&'static str],
    /// Characters that almost only occur in this language.
    markers: &'static [char],
}

// Order matters: ties go to the earlier profile.
const PROFILES: &[Profile] = &[
    Profile {
        code: "en",
        stopwords: &[
            "the", "and", "is", "are", "was", "were", "of", "to", "in", "that", "this", "it",
            "for", "with", "on", "you", "be", "have", "has", "not", "what", "why", "how",
            "they", "he", "she", "we", "i", "my", "your", "from", "at", "by", "an", "will",
            "would", "about", "just", "do", "does", "did", "can", "if", "or", "but", "who",
        ],
        markers: &[],
    },
    Profile {
        code: "pt",
        stopwords: &[
            "o", "os", "as", "um", "uma", "de", "do", "da", "dos", "das", "em", "no", "na",
            "nos", "nas", "que", "é", "não", "com", "para", "por", "se", "mais", "mas", "como",
            "ele", "ela", "eles", "isso", "este", "esta", "foi", "são", "muito", "também",
            "você", "eu", "meu", "minha", "ao", "pelo", "pela",
        ],
        markers: &['ã', 'õ', 'ç', 'ê', 'ô'],
    },
    Profile {
        code: "es",
        stopwords: &[
            "el", "la", "los", "las", "un", "una", "de", "del", "en", "que", "es", "y", "no",
            "con", "para", "por", "se", "más", "pero", "como", "lo", "le", "su", "sus", "este",
            "esta", "fue", "son", "muy", "también", "yo", "mi", "al", "hay", "porque", "qué",
            "está", "ya", "todo",
        ],
        markers: &['ñ', '¿', '¡'],
    },
    Profile {
        code: "fr",
        stopwords: &[
            "le", "la", "les", "un", "une", "de", "des", "du", "et", "est", "en", "que", "qui",
            "dans", "pour", "pas", "sur", "avec", "ce", "cette", "il", "elle", "nous", "vous",
            "ils", "je", "mais", "ou", "au", "aux", "sont", "été", "très", "plus",
        ],
        markers: &['è', 'ù', 'œ', 'ë'],
    },
    Profile {
        code: "de",
        stopwords: &[
            "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "zu", "den", "dem", "mit",
            "von", "auf", "für", "im", "sich", "auch", "es", "ich", "du", "wir", "sie", "aber",
            "wie", "noch", "nach", "bei", "sind", "war", "wird", "oder",
        ],
        markers: &['ß', 'ä', 'ö', 'ü'],
    },
    Profile {
        code: "it",
        stopwords: &[
            "il", "lo", "la", "gli", "le", "un", "una", "di", "del", "della", "che", "è", "e",
            "non", "per", "con", "sono", "come", "ma", "anche", "questo", "questa", "nel",
            "nella", "io", "tu", "lui", "lei", "noi", "più", "molto", "perché",
        ],
        markers: &['ì', 'ò'],
    },
];

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"[\p{L}\p{M}]+").expect("token pattern is valid"))
}

/// Stopword-frequency detector over a fixed set of European languages.
pub struct StopwordDetector {
    profiles: Vec<(&'static str, HashSet<&'static str>, &'static [char])>,
}

impl Default for StopwordDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordDetector {
    pub fn new() -> Self {
        let profiles = PROFILES
            .iter()
            .map(|p| (p.code, p.stopwords.iter().copied().collect(), p.markers))
            .collect();
        Self { profiles }
    }

    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|(code, _, _)| *code).collect()
    }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = token_regex()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();
        if tokens.len() < MIN_TOKENS {
            return UNKNOWN_LANGUAGE.to_string();
        }

        let mut best: Option<(&str, usize)> = None;
        for (code, stopwords, markers) in &self.profiles {
            let hits = tokens.iter().filter(|t| stopwords.contains(*t)).count()
                + lowered.chars().filter(|c| markers.contains(c)).count();
            // Strictly greater keeps the earliest profile on ties
            if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
                best = Some((code, hits));
            }
        }

        best.map_or_else(|| UNKNOWN_LANGUAGE.to_string(), |(code, _)| code.to_string())
    }
}

/// Map a display language name (English, Portuguese or Spanish spelling) to its code.
pub fn code_for_name(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "english" | "inglês" | "ingles" | "inglés" => Some("en"),
        "portuguese" | "português" | "portugues" | "portugués" => Some("pt"),
        "spanish" | "espanhol" | "español" | "espanol" => Some("es"),
        "french" | "francês" | "francés" => Some("fr"),
        "german" | "alemão" | "alemán" => Some("de"),
        "italian" | "italiano" => Some("it"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> String {
        StopwordDetector::new().detect(text)
    }

    #[test]
    fn test_detects_common_languages() {
        assert_eq!(detect("Why is the government doing this to the people?"), "en");
        assert_eq!(detect("O governo não fez nada para a população"), "pt");
        assert_eq!(detect("¿Por qué el gobierno no hace nada por la gente?"), "es");
        assert_eq!(detect("Le gouvernement ne fait rien pour les citoyens et la ville"), "fr");
        assert_eq!(detect("Die Regierung ist nicht für die Menschen da"), "de");
    }

    #[test]
    fn test_short_or_empty_text_is_unknown() {
        assert_eq!(detect(""), UNKNOWN_LANGUAGE);
        assert_eq!(detect("   "), UNKNOWN_LANGUAGE);
        assert_eq!(detect("Hello"), UNKNOWN_LANGUAGE);
        assert_eq!(detect("12345 !!!"), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_no_stopwords_is_unknown() {
        assert_eq!(detect("Zxqv blorpt frumious"), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = StopwordDetector::new();
        let text = "de la de la";
        let first = detector.detect(text);
        for _ in 0..10 {
            assert_eq!(detector.detect(text), first);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(code_for_name("Português"), Some("pt"));
        assert_eq!(code_for_name("Inglês"), Some("en"));
        assert_eq!(code_for_name("Espanhol"), Some("es"));
        assert_eq!(code_for_name("Klingon"), None);
    }
}
