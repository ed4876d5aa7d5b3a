use std::collections::{HashMap, HashSet};

use regex::Regex;
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, TxtStatsError};

/// Chat shorthand dropped from word clouds alongside the English stopwords
pub const EXTRA_STOPWORDS: [&str; 7] = ["u", "ull", "youre", "ure", "i", "ill", "im"];

/// Word weights in [-1, 1]
const POLARITY_LEXICON: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("happy", 0.8),
    ("glad", 0.5),
    ("love", 0.5),
    ("lovely", 0.5),
    ("like", 0.2),
    ("best", 1.0),
    ("better", 0.5),
    ("awesome", 1.0),
    ("perfect", 1.0),
    ("beautiful", 0.85),
    ("nice", 0.6),
    ("fun", 0.3),
    ("funny", 0.25),
    ("cute", 0.5),
    ("cool", 0.35),
    ("excited", 0.375),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("sweet", 0.35),
    ("yay", 0.5),
    ("proud", 0.8),
    ("lucky", 0.33),
    ("interesting", 0.5),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("hate", -0.8),
    ("sad", -0.5),
    ("sorry", -0.5),
    ("angry", -0.5),
    ("upset", -0.4),
    ("annoying", -0.8),
    ("annoyed", -0.4),
    ("tired", -0.4),
    ("sick", -0.7),
    ("boring", -1.0),
    ("stupid", -0.8),
    ("worried", -0.25),
    ("scared", -0.5),
    ("hard", -0.3),
    ("wrong", -0.5),
    ("ugh", -0.5),
    ("mad", -0.6),
    ("crazy", -0.6),
    ("disappointed", -0.75),
];

/// Multipliers applied to the next scored word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.3),
    ("super", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.4),
    ("totally", 1.3),
    ("pretty", 0.9),
    ("quite", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.7),
];

/// Words that flip and dampen the next scored word
const NEGATIONS: &[&str] = &["not", "no", "never", "dont", "don't", "isnt", "isn't", "wasnt", "wasn't", "cant", "can't"];

/// Scaling applied to a negated word's polarity
const NEGATION_FACTOR: f64 = -0.5;

/// Text processing for word clouds and message polarity
pub struct NlpProcessor {
    word_regex: Regex,
    stopwords: HashSet<String>,
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl NlpProcessor {
    /// Processor using the English stopword list plus `extra_stopwords`
    pub fn new<S: AsRef<str>>(extra_stopwords: &[S]) -> Result<Self> {
        // Words of two or more characters, apostrophes kept
        let word_regex = Regex::new(r"\w[\w']+")
            .map_err(|e| TxtStatsError::InvalidConfig(format!("Failed to compile word regex: {e}")))?;

        let mut stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(|word| word.to_string().to_lowercase())
            .collect();
        stopwords.extend(extra_stopwords.iter().map(|word| word.as_ref().trim().to_lowercase()));

        Ok(Self {
            word_regex,
            stopwords,
            lexicon: POLARITY_LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        })
    }

    /// Processor with the built-in extra stopwords
    pub fn with_default_stopwords() -> Result<Self> {
        Self::new(EXTRA_STOPWORDS.as_slice())
    }

    /// True if `word` is excluded from clouds, ignoring case
    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Lowercase cloud tokens of `text`, stopwords and numbers removed
    #[must_use]
    pub fn cloud_tokens(&self, text: &str) -> Vec<String> {
        let normalized = text.nfc().collect::<String>().to_lowercase();

        self.word_regex
            .find_iter(&normalized)
            .map(|m| {
                let word = m.as_str();
                word.strip_suffix("'s").unwrap_or(word).to_string()
            })
            .filter(|word| !word.is_empty())
            .filter(|word| !word.chars().all(|c| c.is_numeric()))
            .filter(|word| !self.stopwords.contains(word))
            .collect()
    }

    /// Word frequencies over `texts`, most frequent first, plurals folded
    /// into their singular. Ties are broken alphabetically.
    pub fn word_frequencies<'a, I>(&self, texts: I) -> Vec<(String, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for token in self.cloud_tokens(text) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut frequencies: Vec<_> = normalize_plurals(counts).into_iter().collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        frequencies
    }

    /// Polarity of `text` in [-1, 1]; 0 when no scored word appears
    #[must_use]
    pub fn polarity(&self, text: &str) -> f64 {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        let mut total = 0.0;
        let mut scored = 0_u32;

        for (i, word) in words.iter().enumerate() {
            let Some(&weight) = self.lexicon.get(word.as_str()) else {
                continue;
            };

            let mut score = weight;
            if let Some(&intensity) = i
                .checked_sub(1)
                .and_then(|prev| self.intensifiers.get(words[prev].as_str()))
            {
                score *= intensity;
            }

            let negated = words[i.saturating_sub(2)..i]
                .iter()
                .any(|w| NEGATIONS.contains(&w.as_str()));
            if negated {
                score *= NEGATION_FACTOR;
            }

            total += score;
            scored += 1;
        }

        if scored == 0 {
            0.0
        } else {
            (total / f64::from(scored)).clamp(-1.0, 1.0)
        }
    }
}

/// Fold plural keys into their singular where both occur
/// (`cats` into `cat`, `boxes` into `box`).
#[must_use]
pub fn normalize_plurals(counts: HashMap<String, usize>) -> HashMap<String, usize> {
    let mut folded: HashMap<String, usize> = HashMap::with_capacity(counts.len());
    let mut plurals = Vec::new();

    for (word, count) in counts {
        if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
            plurals.push((word, count));
        } else {
            folded.insert(word, count);
        }
    }

    for (word, count) in plurals {
        let candidates = [word.strip_suffix("es"), word.strip_suffix('s')];
        let singular = candidates
            .into_iter()
            .flatten()
            .find(|s| folded.contains_key(*s))
            .map(ToString::to_string);

        match singular {
            Some(singular) => *folded.entry(singular).or_insert(0) += count,
            None => *folded.entry(word).or_insert(0) += count,
        }
    }

    folded
}
