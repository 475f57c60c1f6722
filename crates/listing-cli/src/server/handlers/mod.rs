//! API request handlers.

mod mappings;
mod meta;
mod templates;
mod upload;

pub use mappings::*;
pub use meta::*;
pub use templates::*;
pub use upload::*;

use crate::server::error::ApiError;

/// Run blocking library work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> listing::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Worker task failed: {}", e)))?
        .map_err(ApiError::from)
}
