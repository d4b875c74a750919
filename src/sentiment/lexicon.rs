use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::sync::OnceLock;

use regex::Regex;

use super::classifier::PolarityScorer;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"[a-z]+(?:'[a-z]+)?|[.!?;,]").expect("token pattern is valid")
    })
}

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("cool", 0.35),
    ("enjoy", 0.4),
    ("enjoyed", 0.5),
    ("epic", 0.6),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("favorite", 0.5),
    ("favourite", 0.5),
    ("fun", 0.3),
    ("funny", 0.25),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("hilarious", 0.5),
    ("incredible", 0.9),
    ("informative", 0.5),
    ("interesting", 0.5),
    ("legend", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("thanks", 0.3),
    ("useful", 0.3),
    ("wonderful", 1.0),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("clickbait", -0.6),
    ("cringe", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("dislike", -0.5),
    ("fake", -0.5),
    ("garbage", -0.7),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("lame", -0.5),
    ("meh", -0.3),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scam", -0.8),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("toxic", -0.6),
    ("trash", -0.7),
    ("ugly", -0.7),
    ("unfunny", -0.5),
    ("useless", -0.5),
    ("waste", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("most", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.5),
    ("totally", 1.3),
    ("very", 1.3),
];

const NEGATORS: &[&str] = &[
    "cannot", "hardly", "neither", "never", "no", "nor", "not", "nothing", "without",
];

/// Flip-and-dampen factor applied to a word preceded by a negator.
const NEGATION_FACTOR: f64 = -0.5;

/// Word-list polarity model for short comments.
///
/// The score is the mean polarity of the known words in the text, each scaled by
/// the intensifiers and negators directly in front of it.
pub struct LexiconScorer {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negators: HashSet<&'static str>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            words: POSITIVE_WORDS
                .iter()
                .chain(NEGATIVE_WORDS)
                .copied()
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
        }
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token) || token.ends_with("n't")
    }

    fn score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();

        let mut hits: Vec<f64> = Vec::new();
        let mut multiplier: f64 = 1.0;
        let mut negated = false;

        for token in token_re().find_iter(&lowered).map(|m| m.as_str()) {
            if self.is_negator(token) {
                negated = !negated;
            } else if let Some(factor) = self.intensifiers.get(token) {
                multiplier *= *factor;
            } else if let Some(polarity) = self.words.get(token) {
                let mut value = polarity * multiplier;
                if negated {
                    value *= NEGATION_FACTOR;
                }
                hits.push(value);
                multiplier = 1.0;
                negated = false;
            } else {
                // Modifiers only reach the word right after them
                multiplier = 1.0;
                negated = false;
            }
        }

        if hits.is_empty() {
            return 0.0;
        }

        let mean = hits.iter().sum::<f64>() / hits.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexiconScorer {
    type Error = Infallible;

    fn polarity(&self, text: &str) -> Result<f64, Infallible> {
        Ok(self.score(text))
    }
}
