//! Application state for the dashboard server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use qchain_ai::TextGenerator;
use qchain_core::{LatestAnalysis, QchainConfig, SessionUser, UserDirectory};
use qchain_ledger::{ExplorerClient, JsonRpcClient, Ledger, WalletSession};
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// One logged-in browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub wallet: Option<WalletSession>,
    pub latest_analysis: Option<LatestAnalysis>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(user: SessionUser) -> Self {
        Self {
            user,
            wallet: None,
            latest_analysis: None,
            created_at: Utc::now(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Loaded configuration.
    pub config: QchainConfig,
    /// Job log.
    pub ledger: Arc<dyn Ledger>,
    /// Analysis and chat model.
    pub generator: Arc<dyn TextGenerator>,
    /// Demo accounts.
    pub users: RwLock<UserDirectory>,
    /// Bearer token -> session.
    pub sessions: RwLock<FxHashMap<String, Session>>,
    /// Node used for wallet balances. Balances are omitted without it.
    pub rpc: Option<JsonRpcClient>,
    /// Explorer used for the TPS widget.
    pub explorer: Option<ExplorerClient>,
}

impl AppState {
    /// Create state with the demo user directory and no node or explorer access.
    pub fn new(
        config: QchainConfig,
        ledger: Arc<dyn Ledger>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            ledger,
            generator,
            users: RwLock::new(UserDirectory::with_defaults()),
            sessions: RwLock::new(FxHashMap::default()),
            rpc: None,
            explorer: None,
        }
    }

    /// Use a specific (possibly file-backed) user directory.
    pub fn with_users(mut self, users: UserDirectory) -> Self {
        self.users = RwLock::new(users);
        self
    }

    /// Enable wallet balance lookups.
    pub fn with_rpc(mut self, rpc: JsonRpcClient) -> Self {
        self.rpc = Some(rpc);
        self
    }

    /// Enable the TPS endpoint.
    pub fn with_explorer(mut self, explorer: ExplorerClient) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Start a session for `user` and return its bearer token.
    pub async fn open_session(&self, user: SessionUser) -> String {
        let token = Uuid::new_v4().simple().to_string();
        info!(email = %user.email, role = %user.role, "Session opened");
        self.sessions
            .write()
            .await
            .insert(token.clone(), Session::new(user));
        token
    }

    /// End a session. Returns whether it existed.
    pub async fn close_session(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(ref s) = removed {
            info!(email = %s.user.email, "Session closed");
        }
        removed.is_some()
    }

    /// Snapshot of a session.
    pub async fn session(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Mutate a session in place. Returns `None` when the token is unknown.
    pub async fn update_session<F, T>(&self, token: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut Session) -> T,
    {
        self.sessions.write().await.get_mut(token).map(f)
    }
}
