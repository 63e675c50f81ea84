//! Lexicon-based polarity scorer for English text.
//!
//! Each opinion word has a prior score in `[-1, 1]`. A negator among the two preceding tokens
//! flips and halves the word's score; an intensifier scales it by 1.5. The text score is the
//! mean of the adjusted word scores, clamped to `[-1, 1]`, or `0.0` when no opinion word occurs.

use anyhow::Result;
use std::collections::HashMap;

use crate::PolarityScorer;

const OPINION_WORDS: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.9),
    ("awesome", 0.9),
    ("wonderful", 0.9),
    ("fantastic", 0.9),
    ("perfect", 1.0),
    ("nice", 0.6),
    ("love", 0.8),
    ("loved", 0.8),
    ("like", 0.4),
    ("liked", 0.4),
    ("enjoy", 0.6),
    ("enjoyed", 0.6),
    ("happy", 0.8),
    ("glad", 0.6),
    ("pleased", 0.6),
    ("beautiful", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("helpful", 0.6),
    ("useful", 0.5),
    ("thanks", 0.4),
    ("thank", 0.4),
    ("fine", 0.3),
    ("cool", 0.4),
    ("fun", 0.5),
    ("easy", 0.4),
    ("recommend", 0.5),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.6),
    ("poor", -0.6),
    ("hate", -0.9),
    ("hated", -0.9),
    ("dislike", -0.5),
    ("sad", -0.6),
    ("angry", -0.7),
    ("annoying", -0.6),
    ("annoyed", -0.6),
    ("boring", -0.5),
    ("broken", -0.6),
    ("wrong", -0.5),
    ("useless", -0.8),
    ("disappointed", -0.7),
    ("disappointing", -0.7),
    ("slow", -0.4),
    ("problem", -0.4),
    ("difficult", -0.4),
    ("ugly", -0.7),
    ("fail", -0.6),
    ("failed", -0.6),
    ("sorry", -0.3),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "dont",
    "doesnt", "didnt", "isnt", "wasnt", "arent", "werent", "wont", "cant", "couldnt",
    "shouldnt", "wouldnt",
];

const INTENSIFIERS: &[&str] = &[
    "very",
    "really",
    "extremely",
    "so",
    "too",
    "totally",
    "absolutely",
    "incredibly",
    "super",
    "highly",
];

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.5;
const LOOKBACK: usize = 2;

/// Local, dependency-free [`PolarityScorer`].
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: OPINION_WORDS.iter().copied().collect(),
        }
    }

    /// Mean adjusted score of the opinion words in `text`.
    pub fn score(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut matched = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&prior) = self.lexicon.get(token.as_str()) else {
                continue;
            };
            let mut score = prior;
            for previous in tokens[i.saturating_sub(LOOKBACK)..i].iter().rev() {
                if NEGATORS.contains(&previous.as_str()) {
                    score *= NEGATION_FACTOR;
                } else if INTENSIFIERS.contains(&previous.as_str()) {
                    score *= INTENSIFIER_FACTOR;
                }
            }
            total += score;
            matched += 1;
        }

        if matched == 0 {
            0.0
        } else {
            (total / matched as f64).clamp(-1.0, 1.0)
        }
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64> {
        Ok(self.score(text))
    }
}

/// Lowercased word tokens; apostrophes are dropped so "don't" matches "dont".
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .map(|word| {
            word.chars()
                .filter(|c| *c != '\'' && *c != '’')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}
