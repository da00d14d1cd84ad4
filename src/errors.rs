use thiserror::Error;

/// Failures reported by the upstream wearable-data provider.
///
/// Only `Auth` is fatal to a whole sync; everything else is isolated to the
/// metric family that hit it.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected the credentials")]
    Auth,
    #[error("unable to reach the provider: {0}")]
    Connectivity(String),
    #[error("provider rate limit exceeded")]
    RateLimited,
    #[error("provider returned an unexpected response: {0}")]
    Upstream(String),
    #[error("failed to decode provider payload: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
