// Application facade - the one object the presentation layer holds on to
use tracing::info;

use crate::{
    backend::{MemoryBackend, SqliteBackend, StorageBackend},
    config::{BackendKind, Config},
    credentials::CredentialStore,
    link::AffiliateLinks,
    registry::SupplyRegistry,
    session::{SessionTable, SessionToken},
    Error, Result,
};

/// Accounts, sessions and supply lists over one storage backend
///
/// Create one at startup and pass it to whatever handles user actions.
/// There is no global state behind it.
pub struct Supplyify<B: StorageBackend> {
    backend: B,
    sessions: SessionTable,
    links: AffiliateLinks,
}

impl<B: StorageBackend> Supplyify<B> {
    pub fn new(backend: B, links: AffiliateLinks) -> Self {
        Self {
            backend,
            sessions: SessionTable::new(),
            links,
        }
    }

    pub fn register(&mut self, email: &str, password: &str, confirm: &str) -> Result<()> {
        CredentialStore::new(&mut self.backend).register(email, password, confirm)
    }

    /// Check credentials and open a session
    pub fn login(&mut self, email: &str, password: &str) -> Result<SessionToken> {
        let account = CredentialStore::new(&mut self.backend).authenticate(email, password)?;
        let token = self.sessions.open(&account.email);

        info!("{} logged in", account.email);
        Ok(token)
    }

    /// Returns false if the session was already closed
    pub fn logout(&mut self, token: &SessionToken) -> bool {
        self.sessions.close(token)
    }

    /// Email of the logged-in account
    pub fn whoami(&self, token: &SessionToken) -> Result<&str> {
        self.sessions.email(token).ok_or(Error::InvalidSession)
    }

    /// Supply list of the account behind `token`
    pub fn registry(&mut self, token: &SessionToken) -> Result<SupplyRegistry<'_, B>> {
        let owner = self.sessions.email(token).ok_or(Error::InvalidSession)?;
        Ok(SupplyRegistry::new(&mut self.backend, owner, &self.links))
    }

    /// Affiliate search link for a free-text query
    pub fn build_link(&self, query: &str) -> String {
        self.links.build(query)
    }
}

/// Build the app with whichever backend the config asks for
pub fn open_from_config(config: &Config) -> Result<Supplyify<Box<dyn StorageBackend>>> {
    let backend: Box<dyn StorageBackend> = match config.storage.backend {
        BackendKind::Sqlite => {
            let path = config.storage.database_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let path = path
                .to_str()
                .ok_or_else(|| Error::ConfigError(format!("Non UTF-8 database path: {:?}", path)))?;

            info!("Using SQLite storage at {}", path);
            Box::new(SqliteBackend::open(path)?)
        }
        BackendKind::Memory => {
            info!("Using in-memory storage, nothing will be saved");
            Box::new(MemoryBackend::new())
        }
    };

    Ok(Supplyify::new(backend, AffiliateLinks::from_config(&config.affiliate)))
}
