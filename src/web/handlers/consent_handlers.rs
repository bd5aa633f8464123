// src/web/handlers/consent_handlers.rs

use crate::consent::{
    Consent, ConsentChoice, ConsentManager, ConsentPolicy, ConsentStatus, ConsentStore,
    STORAGE_KEY,
};
use crate::web::types::*;

use chrono::Utc;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

/// The consent blob lives in a client cookie under the storage key.
pub struct CookieConsentStore<'a, 'r> {
    jar: &'a CookieJar<'r>,
}

impl<'a, 'r> CookieConsentStore<'a, 'r> {
    pub fn new(jar: &'a CookieJar<'r>) -> Self {
        Self { jar }
    }
}

impl ConsentStore for CookieConsentStore<'_, '_> {
    fn read(&self) -> Option<String> {
        self.jar
            .get(STORAGE_KEY)
            .map(|cookie| cookie.value().to_string())
    }

    fn write(&mut self, blob: String) {
        self.jar.add(
            Cookie::build((STORAGE_KEY, blob))
                .path("/")
                .same_site(SameSite::Lax)
                .permanent(),
        );
    }
}

pub async fn consent_status_handler(
    cookies: &CookieJar<'_>,
    policy: &State<ConsentPolicy>,
) -> Json<DataResponse<ConsentStatus>> {
    let manager = ConsentManager::new(CookieConsentStore::new(cookies), **policy);
    let status = manager.status(Utc::now());
    let message = if status.show_banner {
        "Cookie preferences required".to_string()
    } else {
        "Cookie preferences on record".to_string()
    };
    Json(DataResponse::success(message, status))
}

pub async fn save_consent_handler(
    choice: Json<ConsentChoice>,
    cookies: &CookieJar<'_>,
    policy: &State<ConsentPolicy>,
) -> Json<DataResponse<Consent>> {
    let mut manager = ConsentManager::new(CookieConsentStore::new(cookies), **policy);
    let consent = manager.resolve(choice.into_inner(), Utc::now());
    info!(
        "Cookie consent saved: analytics={}, marketing={}",
        consent.analytics, consent.marketing
    );
    Json(DataResponse::success(
        "Cookie preferences saved".to_string(),
        consent,
    ))
}
