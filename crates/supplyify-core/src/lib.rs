// Core business logic: accounts, supply lists, depletion estimates, affiliate links
pub mod app;
pub mod backend;
pub mod config;
pub mod credentials;
pub mod error;
pub mod estimate;
pub mod link;
pub mod models;
pub mod registry;
pub mod session;

pub use app::{open_from_config, Supplyify};
pub use backend::{MemoryBackend, SqliteBackend, StorageBackend};
pub use config::Config;
pub use credentials::CredentialStore;
pub use error::Error;
pub use estimate::{estimate, DepletionEstimate, LOW_STOCK_DAYS};
pub use link::{build_link, AffiliateLinks, AFFILIATE_DISCLOSURE};
pub use models::{ItemId, SupplyItem, SupplyStatus};
pub use registry::SupplyRegistry;
pub use session::SessionToken;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
