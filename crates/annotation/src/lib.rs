//! # annotation
//!
//! Annotates inbound text before it is stored: translation to a reference language
//! ([`Translator`]) and a sentiment tag derived from a polarity score ([`PolarityScorer`]).
//! [`AnnotationFacade`] runs both and never fails; upstream errors degrade to the original text
//! and [`Sentiment::Unknown`](intake_core::Sentiment::Unknown).

mod facade;
mod lexicon;
mod translator;

pub use facade::{Annotation, AnnotationFacade};
pub use lexicon::LexiconScorer;
pub use translator::{GoogleTranslator, DEFAULT_TARGET_LANG, DEFAULT_TRANSLATE_BASE_URL};

use anyhow::Result;
use async_trait::async_trait;

/// Machine translation into a fixed target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Signed sentiment score for a text; positive values are favourable.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64>;
}
