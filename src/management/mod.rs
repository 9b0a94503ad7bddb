mod auth;
mod cache;

pub use auth::CredentialProvider;
pub use auth::default_credentials;
pub use auth::StaticCredential;
pub use auth::TokenManager;
pub use cache::Cache;
pub use cache::CacheKey;
pub use cache::CacheStore;
pub use cache::FsStore;
pub use cache::MemoryStore;
