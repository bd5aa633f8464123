// src/consent.rs
//! Cookie-consent preferences, their stored JSON blob and the re-prompt rule

use anyhow::{Context, Result};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Key the consent blob is stored under on the client.
pub const STORAGE_KEY: &str = "cookie-consent";

pub const DEFAULT_REPROMPT_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    /// Always true; essential cookies cannot be declined.
    pub essential: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub timestamp: DateTime<Utc>,
}

impl Consent {
    pub fn accept_all(now: DateTime<Utc>) -> Self {
        Self::custom(true, true, now)
    }

    pub fn reject_non_essential(now: DateTime<Utc>) -> Self {
        Self::custom(false, false, now)
    }

    pub fn custom(analytics: bool, marketing: bool, now: DateTime<Utc>) -> Self {
        Self {
            essential: true,
            analytics,
            marketing,
            timestamp: now,
        }
    }

    pub fn parse_blob(blob: &str) -> Result<Self> {
        let mut consent: Consent =
            serde_json::from_str(blob).context("Failed to parse consent blob")?;
        consent.essential = true;
        Ok(consent)
    }

    pub fn to_blob(&self) -> String {
        serde_json::json!({
            "essential": true,
            "analytics": self.analytics,
            "marketing": self.marketing,
            "timestamp": self.timestamp,
        })
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "kebab-case")]
pub enum ConsentChoice {
    AcceptAll,
    RejectNonEssential,
    Custom {
        #[serde(default)]
        analytics: bool,
        #[serde(default)]
        marketing: bool,
    },
}

impl ConsentChoice {
    pub fn resolve(self, now: DateTime<Utc>) -> Consent {
        match self {
            Self::AcceptAll => Consent::accept_all(now),
            Self::RejectNonEssential => Consent::reject_non_essential(now),
            Self::Custom {
                analytics,
                marketing,
            } => Consent::custom(analytics, marketing, now),
        }
    }
}

/// How long a recorded choice stays valid before the banner shows again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentPolicy {
    pub reprompt_after: Months,
}

impl Default for ConsentPolicy {
    fn default() -> Self {
        Self {
            reprompt_after: Months::new(DEFAULT_REPROMPT_MONTHS),
        }
    }
}

impl ConsentPolicy {
    pub fn needs_prompt(&self, stored: Option<&Consent>, now: DateTime<Utc>) -> bool {
        let Some(consent) = stored else {
            return true;
        };
        // No representable cutoff: ask again.
        match now.checked_sub_months(self.reprompt_after) {
            Some(cutoff) => consent.timestamp < cutoff,
            None => true,
        }
    }

    /// Decode a raw stored blob and decide whether to show the banner.
    /// Unreadable blobs count as no consent.
    pub fn status(&self, blob: Option<&str>, now: DateTime<Utc>) -> ConsentStatus {
        let consent = blob.and_then(|raw| match Consent::parse_blob(raw) {
            Ok(consent) => Some(consent),
            Err(e) => {
                warn!("Ignoring stored consent: {:#}", e);
                None
            }
        });
        let show_banner = self.needs_prompt(consent.as_ref(), now);
        debug!("Consent status: stored={}, show_banner={}", consent.is_some(), show_banner);
        ConsentStatus {
            consent,
            show_banner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatus {
    pub consent: Option<Consent>,
    pub show_banner: bool,
}

/// Where the consent blob lives between visits.
pub trait ConsentStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, blob: String);
}

/// Read and resolve consent against a store.
pub struct ConsentManager<S> {
    store: S,
    policy: ConsentPolicy,
}

impl<S: ConsentStore> ConsentManager<S> {
    pub fn new(store: S, policy: ConsentPolicy) -> Self {
        Self { store, policy }
    }

    pub fn status(&self, now: DateTime<Utc>) -> ConsentStatus {
        self.policy.status(self.store.read().as_deref(), now)
    }

    pub fn resolve(&mut self, choice: ConsentChoice, now: DateTime<Utc>) -> Consent {
        let consent = choice.resolve(now);
        self.store.write(consent.to_blob());
        consent
    }
}
