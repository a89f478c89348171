use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::LexiconError;

// Include the default lexicon at compile time
const DEFAULT_LEXICON: &str = include_str!("../default_lexicon.txt");

const LOCAL_LEXICON_FILE: &str = "lexicon.txt";

/// Word valences on the `[-4.0, 4.0]` scale used by the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    words: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Lexicon {
    /// The lexicon compiled into the binary.
    pub fn embedded() -> Self {
        // Lenient parsing never fails; bad lines are only logged.
        Self::parse(DEFAULT_LEXICON, false).unwrap_or_else(|_| Self {
            words: HashMap::new(),
        })
    }

    /// Parse `word<TAB>valence` lines. With `strict`, the first bad line is an
    /// error; otherwise it is skipped with a warning.
    pub fn parse(content: &str, strict: bool) -> Result<Self, LexiconError> {
        let mut words = HashMap::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse_entry(line) {
                Ok((word, valence)) => {
                    words.insert(word, valence);
                }
                Err(reason) if strict => {
                    return Err(LexiconError::InvalidEntry {
                        line: line_num + 1,
                        reason,
                    })
                }
                Err(reason) => {
                    warn!(action = "parse", component = "lexicon_entry", line_number = line_num + 1, error = %reason, "Invalid lexicon entry")
                }
            }
        }

        Ok(Self { words })
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn insert(&mut self, word: &str, valence: f64) {
        self.words.insert(word.to_lowercase(), valence.clamp(-4.0, 4.0));
    }
}

fn parse_entry(line: &str) -> Result<(String, f64), String> {
    let mut fields = line.split_whitespace();
    let word = fields.next().ok_or_else(|| "missing word".to_string())?;
    let valence = fields
        .next()
        .ok_or_else(|| format!("missing valence for '{word}'"))?;
    if fields.next().is_some() {
        return Err(format!("unexpected trailing fields for '{word}'"));
    }
    let valence: f64 = valence
        .parse()
        .map_err(|e| format!("bad valence for '{word}': {e}"))?;
    if !valence.is_finite() || !(-4.0..=4.0).contains(&valence) {
        return Err(format!("valence for '{word}' outside [-4, 4]"));
    }
    Ok((word.to_lowercase(), valence))
}

/// Resolve the lexicon: an explicit file (strict), then `lexicon.txt` in the
/// working directory (lenient), then the embedded default.
pub fn load_lexicon(lexicon_file_path: Option<&Path>) -> Result<Lexicon, LexiconError> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "lexicon_loading",
        "Starting lexicon loading"
    );

    let lexicon = if let Some(path) = lexicon_file_path {
        info!(action = "load", component = "lexicon_file", file_path = ?path, "Loading lexicon from specified file");
        if !path.exists() {
            return Err(LexiconError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let lexicon = Lexicon::parse(&content, true)?;
        info!(action = "loaded", component = "lexicon_file", word_count = lexicon.len(), file_path = ?path, "Loaded lexicon from file");
        lexicon
    } else {
        let default_file = Path::new(LOCAL_LEXICON_FILE);
        let mut lexicon = None;
        if default_file.exists() {
            info!(action = "load", component = "default_lexicon_file", file_path = ?default_file, "Loading lexicon from default file");
            let content = fs::read_to_string(default_file)?;
            let parsed = Lexicon::parse(&content, false)?;
            info!(action = "loaded", component = "default_lexicon_file", word_count = parsed.len(), file_path = ?default_file, "Loaded lexicon from default file");
            if !parsed.is_empty() {
                lexicon = Some(parsed);
            }
        }

        // If nothing usable was found locally, use embedded defaults
        lexicon.unwrap_or_else(|| {
            info!(
                action = "load",
                component = "embedded_lexicon",
                "Using embedded default lexicon"
            );
            Lexicon::embedded()
        })
    };

    info!(
        action = "complete",
        component = "lexicon_loading",
        word_count = lexicon.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Lexicon ready"
    );
    Ok(lexicon)
}

/// Write the embedded lexicon to `lexicon.txt` so it can be edited.
pub fn init_default_lexicon() -> Result<&'static Path, LexiconError> {
    let default_file = Path::new(LOCAL_LEXICON_FILE);

    if default_file.exists() {
        return Err(LexiconError::AlreadyExists);
    }

    fs::write(default_file, DEFAULT_LEXICON)?;
    Ok(default_file)
}
