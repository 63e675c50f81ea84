use intake_core::Sentiment;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{PolarityScorer, Translator};

/// Result of [`AnnotationFacade::annotate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub translated_text: String,
    pub sentiment: Sentiment,
}

/// Translation and sentiment behind one handle. Both calls are isolated: a failing translator
/// does not prevent classification, and neither ever returns an error.
#[derive(Clone)]
pub struct AnnotationFacade {
    translator: Arc<dyn Translator>,
    scorer: Arc<dyn PolarityScorer>,
}

impl AnnotationFacade {
    pub fn new(translator: Arc<dyn Translator>, scorer: Arc<dyn PolarityScorer>) -> Self {
        Self { translator, scorer }
    }

    /// Translated text, or `text` unchanged when translation fails or comes back blank.
    pub async fn translate(&self, text: &str) -> String {
        match self.translator.translate(text).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => {
                warn!("Translation returned empty text, keeping original");
                text.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Translation failed, keeping original");
                text.to_string()
            }
        }
    }

    /// Sentiment bucket of the polarity score; [`Sentiment::Unknown`] on scorer failure.
    pub fn classify_sentiment(&self, text: &str) -> Sentiment {
        match self.scorer.polarity(text) {
            Ok(score) => {
                let sentiment = Sentiment::from_polarity(score);
                debug!(score, sentiment = %sentiment, "Classified sentiment");
                sentiment
            }
            Err(e) => {
                warn!(error = %e, "Sentiment scoring failed");
                Sentiment::Unknown
            }
        }
    }

    /// Translates, then classifies the translated text.
    pub async fn annotate(&self, text: &str) -> Annotation {
        let translated_text = self.translate(text).await;
        let sentiment = self.classify_sentiment(&translated_text);
        Annotation {
            translated_text,
            sentiment,
        }
    }
}
