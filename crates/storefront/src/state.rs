//! Page state shared across handlers.

use std::sync::Arc;

use crate::carousel::{CarouselController, GroupSpec};
use crate::config::SiteConfig;
use crate::services::auth::SessionStore;
use crate::services::purchase::PurchaseGate;
use crate::services::tips::TipStore;
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::views::AuthView;

/// State of one page load.
///
/// This struct is cheaply cloneable via `Arc`. The stores it holds are the
/// only way page handlers reach storage.
#[derive(Clone)]
pub struct SiteState {
    inner: Arc<SiteStateInner>,
}

struct SiteStateInner {
    config: SiteConfig,
    sessions: SessionStore,
    tips: TipStore,
    purchases: PurchaseGate,
}

impl SiteState {
    /// Create page state over explicit storage backends.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `durable` - Origin-wide storage (users, session, tips)
    /// * `ephemeral` - Tab-scoped storage (purchase-entry flag)
    #[must_use]
    pub fn new(config: SiteConfig, durable: Arc<dyn Storage>, ephemeral: Arc<dyn Storage>) -> Self {
        Self {
            inner: Arc::new(SiteStateInner {
                sessions: SessionStore::new(durable.clone()),
                tips: TipStore::new(durable),
                purchases: PurchaseGate::new(ephemeral),
                config,
            }),
        }
    }

    /// Create page state with file-backed durable storage at
    /// `config.storage_path` and fresh in-memory tab storage.
    #[must_use]
    pub fn load(config: SiteConfig) -> Self {
        let durable = Arc::new(FileStorage::new(config.storage_path.clone()));
        tracing::debug!(path = %durable.path().display(), "Durable storage opened");
        Self::new(config, durable, Arc::new(MemoryStorage::new()))
    }

    /// Create page state entirely in memory.
    #[must_use]
    pub fn in_memory(config: SiteConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
        )
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get a reference to the tip store.
    #[must_use]
    pub fn tips(&self) -> &TipStore {
        &self.inner.tips
    }

    /// Get a reference to the purchase-entry gate.
    #[must_use]
    pub fn purchases(&self) -> &PurchaseGate {
        &self.inner.purchases
    }

    /// Chrome for the current session.
    #[must_use]
    pub fn auth_view(&self) -> AuthView {
        AuthView::from_session(
            self.sessions().get_session().as_ref(),
            &self.config().login_url,
        )
    }

    /// Start every carousel on the page. Must be called inside a tokio
    /// runtime.
    #[must_use]
    pub fn initialize_carousels(&self, groups: Vec<GroupSpec>) -> CarouselController {
        CarouselController::initialize_all(groups, self.config().carousel_interval)
    }
}
