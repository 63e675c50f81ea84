//! Referral codes and bonus crediting.
//!
//! A referral code is `REF` followed by the referrer's chat identity in decimal, so it can be
//! decoded without a lookup table.

use std::sync::Arc;
use storage::RecordStore;
use tracing::{debug, error, info, instrument, warn};

const REFERRAL_PREFIX: &str = "REF";

/// Deterministic referral code of a chat identity.
pub fn referral_code_for(chat_id: i64) -> String {
    format!("{}{}", REFERRAL_PREFIX, chat_id)
}

/// Decodes a referral code back to the referrer's chat identity.
pub fn parse_referral_code(code: &str) -> Option<i64> {
    code.trim()
        .strip_prefix(REFERRAL_PREFIX)
        .filter(|digits| !digits.starts_with('+'))
        .and_then(|digits| digits.parse().ok())
}

/// What [`ReferralLedger::credit`] did. Only `Credited` and `PartiallyCredited` change balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferralOutcome {
    Credited { referrer: i64, amount: u32 },
    InvalidCode,
    UnknownReferrer(i64),
    UnknownUser(i64),
    SelfReferral,
    /// The referrer was credited but crediting the new user failed; only the referrer's
    /// balance changed.
    PartiallyCredited { referrer: i64, amount: u32 },
    /// The store failed before any balance changed; the error was logged.
    StoreFailed,
}

/// Credits a fixed bonus to both the referrer and the referred user.
#[derive(Clone)]
pub struct ReferralLedger {
    store: Arc<dyn RecordStore>,
    bonus: u32,
}

impl ReferralLedger {
    pub fn new(store: Arc<dyn RecordStore>, bonus: u32) -> Self {
        Self { store, bonus }
    }

    pub fn bonus(&self) -> u32 {
        self.bonus
    }

    /// Validates `referral_code` and credits both users. Never fails: every rejected or failed
    /// credit is reported through the returned outcome.
    #[instrument(skip(self), fields(bonus = self.bonus))]
    pub async fn credit(&self, referral_code: &str, new_user: i64) -> ReferralOutcome {
        let Some(referrer) = parse_referral_code(referral_code) else {
            debug!(referral_code, "Ignoring malformed referral code");
            return ReferralOutcome::InvalidCode;
        };

        match self.store.find_user(referrer).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                info!(referrer, "Referral code names an unknown user");
                return ReferralOutcome::UnknownReferrer(referrer);
            }
            Err(e) => {
                warn!(error = %e, referrer, "Referrer lookup failed");
                return ReferralOutcome::StoreFailed;
            }
        }

        match self.store.find_user(new_user).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                info!(new_user, "Referred user is not registered");
                return ReferralOutcome::UnknownUser(new_user);
            }
            Err(e) => {
                warn!(error = %e, new_user, "Referred user lookup failed");
                return ReferralOutcome::StoreFailed;
            }
        }

        if referrer == new_user {
            info!(new_user, "Ignoring self-referral");
            return ReferralOutcome::SelfReferral;
        }

        if let Err(e) = self.store.credit_bonus(referrer, self.bonus).await {
            warn!(error = %e, referrer, "Failed to credit referrer bonus");
            return ReferralOutcome::StoreFailed;
        }
        if let Err(e) = self.store.credit_bonus(new_user, self.bonus).await {
            error!(
                error = %e,
                referrer,
                new_user,
                amount = self.bonus,
                "Referral partially credited: referrer credited, new user not"
            );
            return ReferralOutcome::PartiallyCredited {
                referrer,
                amount: self.bonus,
            };
        }

        info!(referrer, new_user, amount = self.bonus, "Referral bonus credited");
        ReferralOutcome::Credited {
            referrer,
            amount: self.bonus,
        }
    }
}
