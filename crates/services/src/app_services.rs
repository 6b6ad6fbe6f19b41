use std::sync::Arc;

use leoula_core::Catalog;
use leoula_core::model::ExplainerSettings;
use storage::{MissedWordsStore, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::explain::{ExplanationProvider, ExplanationService};
use crate::sessions::SessionLoopService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    session_loop: Arc<SessionLoopService>,
    explainer: Arc<dyn ExplanationProvider>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the HTTP client fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: ExplainerSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, settings)
    }

    /// Build services that forget everything on exit.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn in_memory(clock: Clock, settings: ExplainerSettings) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock, settings)
    }

    /// Build services over an already-open storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        settings: ExplainerSettings,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(Catalog::builtin());
        let store = MissedWordsStore::new(Arc::clone(&storage.kv));
        let session_loop = Arc::new(SessionLoopService::new(clock, Arc::clone(&catalog), store));
        let explainer: Arc<dyn ExplanationProvider> = Arc::new(ExplanationService::new(settings)?);

        Ok(Self {
            catalog,
            session_loop,
            explainer,
        })
    }

    /// Swap the explanation backend, e.g. for a canned provider in tests.
    #[must_use]
    pub fn with_explainer(mut self, explainer: Arc<dyn ExplanationProvider>) -> Self {
        self.explainer = explainer;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn explainer(&self) -> Arc<dyn ExplanationProvider> {
        Arc::clone(&self.explainer)
    }
}
