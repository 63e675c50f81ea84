//! Component factory: builds the DispatchContext from config and an opened store. Isolates
//! assembly logic from the runner.

use anyhow::Result;
use annotation::{AnnotationFacade, GoogleTranslator, LexiconScorer};
use dispatcher::{DispatchContext, Dispatcher, ReferralLedger, SearchOrchestrator, StubWebSearch};
use llm_client::{mask_token, GenerationFacade, LlmProvider};
use std::sync::Arc;
use storage::RecordStore;
use tracing::{info, instrument};

use crate::config::BotConfig;

/// Builds every facade the dispatcher needs. The store is opened by the caller, which owns
/// its lifecycle.
#[instrument(skip(config, store))]
pub fn build_dispatch_context(
    config: &BotConfig,
    store: Arc<dyn RecordStore>,
) -> Result<DispatchContext> {
    let llm_client = config.llm.build_client()?;
    let generation = GenerationFacade::new(llm_client);

    let translator = GoogleTranslator::new(config.translate_target_lang.clone())
        .with_base_url(config.translate_base_url.clone())
        .with_timeout(config.request_timeout())?;
    let annotation = AnnotationFacade::new(Arc::new(translator), Arc::new(LexiconScorer::new()));

    let search = SearchOrchestrator::new(Arc::new(StubWebSearch), generation.clone());
    let referral = ReferralLedger::new(store.clone(), config.referral_bonus);

    let api_key = match config.llm.provider {
        LlmProvider::Gemini => config.llm.gemini_api_key.as_deref(),
        LlmProvider::OpenAI => config.llm.openai_api_key.as_deref(),
    };
    info!(
        provider = %config.llm.provider,
        api_key = %mask_token(api_key.unwrap_or_default()),
        translate_target = %config.translate_target_lang,
        referral_bonus = config.referral_bonus,
        "Dispatch context built"
    );

    Ok(DispatchContext {
        store,
        annotation,
        generation,
        search,
        referral,
    })
}

/// Convenience wrapper around [`build_dispatch_context`].
pub fn build_dispatcher(config: &BotConfig, store: Arc<dyn RecordStore>) -> Result<Dispatcher> {
    Ok(Dispatcher::new(build_dispatch_context(config, store)?))
}
