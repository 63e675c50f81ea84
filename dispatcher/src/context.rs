use annotation::AnnotationFacade;
use llm_client::GenerationFacade;
use std::sync::Arc;
use storage::RecordStore;

use crate::referral::ReferralLedger;
use crate::search::SearchOrchestrator;

/// Shared handles the dispatcher runs against. Built once at startup; every field is cheap to
/// clone and safe to share between event tasks.
#[derive(Clone)]
pub struct DispatchContext {
    pub store: Arc<dyn RecordStore>,
    pub annotation: AnnotationFacade,
    pub generation: GenerationFacade,
    pub search: SearchOrchestrator,
    pub referral: ReferralLedger,
}
