//! # dispatcher
//!
//! The transport hands over an already classified [`InboundEvent`](intake_core::InboundEvent)
//! and [`Dispatcher::dispatch`] runs the fixed chain of its variant:
//!
//! - registration: lookup, insert, optional referral credit, contact request
//! - contact share: phone and referral code saved on the user
//! - text: translate, classify, persist inbound, generate, persist outbound
//! - media: describe image or document, persist file record
//! - search: web search, summarize, persist search record
//!
//! Upstream services degrade to fallback values inside their facades; only store failures
//! abort a chain, and they still produce a reply.

mod context;
mod dispatcher;
mod error;
mod referral;
pub mod replies;
mod search;

pub use context::DispatchContext;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use referral::{parse_referral_code, referral_code_for, ReferralLedger, ReferralOutcome};
pub use search::{SearchOrchestrator, StubWebSearch, WebSearch, SUMMARY_FALLBACK};
