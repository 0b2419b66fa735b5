// ── Application context ──
//
// Explicitly constructed owner of the four stores, the metadata client,
// and any background tasks. Cheap to clone; every clone shares state.
// `dispose()` cancels everything derived from the context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use marquee_api::{TmdbClient, TransportConfig};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::auth::{AuthService, IdentityProvider, spawn_identity_bridge};
use crate::config::ContextConfig;
use crate::error::CoreError;
use crate::fetch::{CatalogService, FetchScope, FetchTracker};
use crate::model::ThemePreference;
use crate::storage::Storage;
use crate::store::{
    CatalogState, CatalogStore, MyListState, MyListStore, SessionState, SessionStore, ThemeStore,
};
use crate::stream::StoreStream;

#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: ContextConfig,
    client: Option<TmdbClient>,
    session: Arc<SessionStore>,
    my_list: MyListStore,
    theme: ThemeStore,
    catalog: Arc<CatalogStore>,
    fetches: Arc<FetchTracker>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl AppContext {
    /// Build the context. Persisted stores are loaded from `storage`
    /// immediately; a metadata client is built when credentials exist.
    pub fn new(config: ContextConfig, storage: Arc<dyn Storage>) -> Result<Self, CoreError> {
        let client = match config.credentials.clone() {
            Some(credentials) => {
                let transport = TransportConfig::default().with_timeout(config.timeout);
                Some(TmdbClient::new(
                    config.api_url.as_str(),
                    credentials,
                    &transport,
                    Some(&config.language),
                )?)
            }
            None => {
                debug!("no API credentials; catalog fetches disabled");
                None
            }
        };

        let my_list = MyListStore::load(Arc::clone(&storage));
        let theme = ThemeStore::load(storage);
        info!(
            my_list = my_list.len(),
            theme = %theme.get(),
            online = client.is_some(),
            "application context ready"
        );

        Ok(Self {
            inner: Arc::new(ContextInner {
                config,
                client,
                session: Arc::new(SessionStore::new()),
                my_list,
                theme,
                catalog: Arc::new(CatalogStore::new()),
                fetches: Arc::new(FetchTracker::default()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
                disposed: AtomicBool::new(false),
            }),
        })
    }

    pub fn config(&self) -> &ContextConfig {
        &self.inner.config
    }

    pub fn client(&self) -> Option<&TmdbClient> {
        self.inner.client.as_ref()
    }

    // ── Stores ───────────────────────────────────────────────────────

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn my_list(&self) -> &MyListStore {
        &self.inner.my_list
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    pub fn subscribe_session(&self) -> StoreStream<SessionState> {
        self.inner.session.subscribe()
    }

    pub fn subscribe_my_list(&self) -> StoreStream<MyListState> {
        self.inner.my_list.subscribe()
    }

    pub fn subscribe_theme(&self) -> StoreStream<ThemePreference> {
        self.inner.theme.subscribe()
    }

    pub fn subscribe_catalog(&self) -> StoreStream<CatalogState> {
        self.inner.catalog.subscribe()
    }

    // ── Services ─────────────────────────────────────────────────────

    /// New fetch scope, cancelled by drop or by `dispose()`.
    pub fn fetch_scope(&self) -> FetchScope {
        FetchScope::new(&self.inner.cancel)
    }

    /// Catalog fetcher. Requires API credentials.
    pub fn catalog_service(&self) -> Result<CatalogService, CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Disposed);
        }
        let client = self.inner.client.clone().ok_or_else(|| CoreError::Config {
            message: "no API key or access token configured".into(),
        })?;
        Ok(CatalogService::new(
            client,
            Arc::clone(&self.inner.catalog),
            Arc::clone(&self.inner.fetches),
        ))
    }

    /// Start forwarding the provider's auth state into the session store.
    pub async fn attach_identity(&self, provider: &dyn IdentityProvider) -> Result<(), CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Disposed);
        }
        let handle = spawn_identity_bridge(
            provider.subscribe(),
            Arc::clone(&self.inner.session),
            Arc::clone(&self.inner.catalog),
            self.inner.cancel.child_token(),
        );
        self.inner.task_handles.lock().await.push(handle);
        Ok(())
    }

    /// Attach the provider and return an auth service bound to it.
    pub async fn auth(&self, provider: Arc<dyn IdentityProvider>) -> Result<AuthService, CoreError> {
        self.attach_identity(provider.as_ref()).await?;
        Ok(AuthService::new(
            provider,
            Arc::clone(&self.inner.session),
            Arc::clone(&self.inner.catalog),
        ))
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Cancel all scopes and background tasks and wait for the tasks to
    /// finish. Safe to call more than once.
    pub async fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("application context disposed");
    }
}
