use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use landing_hub_core::events::bus::EventBus;
use landing_hub_core::media::MediaStore;
use landing_hub_whatsapp::WhatsAppClient;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::dispatcher::BroadcastRegistry;

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor. Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    pool: PgPool,
    config: AppConfig,
    event_bus: EventBus,
    media: MediaStore,
    whatsapp: Option<WhatsAppClient>,
    broadcasts: BroadcastRegistry,
    /// Pending Google sign-ins: CSRF state -> PKCE verifier secret.
    google_pending: Mutex<HashMap<String, String>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, event_bus: EventBus) -> Self {
        let media = MediaStore::new(config.media_root.clone(), config.public_base_url.clone());
        let whatsapp = config.whatsapp.clone().map(WhatsAppClient::new);

        Self {
            inner: Arc::new(InnerState {
                pool,
                config,
                event_bus,
                media,
                whatsapp,
                broadcasts: BroadcastRegistry::default(),
                google_pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }

    pub fn whatsapp(&self) -> Option<&WhatsAppClient> {
        self.inner.whatsapp.as_ref()
    }

    pub fn broadcasts(&self) -> &BroadcastRegistry {
        &self.inner.broadcasts
    }

    /// Stash a pending Google sign-in under its CSRF state.
    pub fn remember_google_state(&self, csrf_state: String, pkce_verifier: String) {
        self.inner
            .google_pending
            .lock()
            .expect("google state lock poisoned")
            .insert(csrf_state, pkce_verifier);
    }

    /// Take back the PKCE verifier for a callback; each state is single-use.
    pub fn take_google_state(&self, csrf_state: &str) -> Option<String> {
        self.inner
            .google_pending
            .lock()
            .expect("google state lock poisoned")
            .remove(csrf_state)
    }
}
