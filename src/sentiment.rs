//! Rule-based sentiment scoring.
//!
//! Valences come from a [`Lexicon`]; negations, boosters, contrastive "but",
//! capitalised emphasis and exclamation marks adjust them. The summed valence
//! is squashed into a compound score in `[-1.0, 1.0]`.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::error::ScoreError;
use crate::lexicon::Lexicon;

/// Compound scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Normalisation constant: `x / sqrt(x^2 + ALPHA)`.
const ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const BOOSTER_INCREMENT: f64 = 0.293;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// How many preceding tokens can negate or boost a sentiment word.
const LOOKBACK: usize = 3;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "cant", "dont", "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "wont", "wouldnt",
    "shouldnt", "couldnt", "aint", "hardly", "rarely", "seldom", "without", "nunca", "nada",
    "nadie", "não", "nao", "jamais", "ni", "nem",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 1.0),
    ("completely", 1.0),
    ("extremely", 1.0),
    ("incredibly", 1.0),
    ("really", 1.0),
    ("so", 1.0),
    ("totally", 1.0),
    ("very", 1.0),
    ("highly", 1.0),
    ("hugely", 1.0),
    ("most", 1.0),
    ("muy", 1.0),
    ("muito", 1.0),
    ("barely", -1.0),
    ("kinda", -1.0),
    ("marginally", -1.0),
    ("slightly", -1.0),
    ("somewhat", -1.0),
    ("little", -1.0),
];

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| {
        Regex::new(r"[\p{L}\p{M}\p{N}]+(?:['’][\p{L}]+)*").expect("word pattern is valid")
    })
}

/// Scores the emotional valence of a piece of text.
pub trait SentimentScorer: Send + Sync {
    /// Compound valence in `[-1.0, 1.0]`. Must be a pure function of `text`.
    fn score(&self, text: &str) -> Result<f64, ScoreError>;
}

/// Lexicon-driven scorer used by default.
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer {
    lexicon: Lexicon,
}

#[derive(Debug)]
struct Token {
    lower: String,
    shouting: bool,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn tokenize(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            if is_url(chunk) {
                continue;
            }
            for m in word_regex().find_iter(chunk) {
                let word = m.as_str();
                let letters = word.chars().filter(|c| c.is_alphabetic()).count();
                tokens.push(Token {
                    lower: word.to_lowercase(),
                    shouting: letters > 1 && word.chars().all(|c| !c.is_lowercase()),
                });
            }
        }
        tokens
    }

    fn valence_at(&self, tokens: &[Token], index: usize, mixed_case: bool) -> Option<f64> {
        let token = &tokens[index];
        let mut valence = self.lexicon.valence(&token.lower)?;
        if valence == 0.0 {
            return Some(0.0);
        }

        if mixed_case && token.shouting {
            valence += CAPS_INCREMENT * valence.signum();
        }

        let start = index.saturating_sub(LOOKBACK);
        for (distance, prior) in tokens[start..index].iter().rev().enumerate() {
            if let Some(direction) = booster(&prior.lower) {
                let damping = 1.0 - 0.05 * distance as f64;
                valence += BOOSTER_INCREMENT * direction * valence.signum() * damping;
            }
        }

        if tokens[start..index].iter().any(|prior| is_negation(&prior.lower)) {
            valence *= NEGATION_SCALAR;
        }

        Some(valence)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        if let Some(c) = text
            .chars()
            .find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
        {
            return Err(ScoreError::Malformed(format!(
                "control character U+{:04X}",
                c as u32
            )));
        }

        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return Ok(0.0);
        }

        let mixed_case = tokens.iter().any(|t| t.shouting) && tokens.iter().any(|t| !t.shouting);
        let but_index = tokens
            .iter()
            .position(|t| matches!(t.lower.as_str(), "but" | "pero" | "mas"));

        let mut sum = 0.0;
        for index in 0..tokens.len() {
            if let Some(mut valence) = self.valence_at(&tokens, index, mixed_case) {
                match but_index {
                    Some(b) if index < b => valence *= 0.5,
                    Some(b) if index > b => valence *= 1.5,
                    _ => {}
                }
                sum += valence;
            }
        }

        if sum != 0.0 {
            let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
            sum += EXCLAMATION_INCREMENT * exclamations as f64 * sum.signum();
        }

        let compound = normalize(sum);
        if !compound.is_finite() {
            return Err(ScoreError::NonFinite(compound));
        }
        Ok(compound)
    }
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn is_negation(word: &str) -> bool {
    let stripped: String = word.chars().filter(|c| *c != '\'' && *c != '’').collect();
    NEGATIONS.contains(&stripped.as_str())
}

fn booster(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, direction)| *direction)
}

fn is_url(chunk: &str) -> bool {
    matches!(Url::parse(chunk), Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some())
}
