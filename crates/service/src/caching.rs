//! Fire-and-forget cache invalidation.

use photoquest_core::cache_key::CacheKey;
use photoquest_store::CacheService;

/// Invalidate a cached view. Failures are logged and swallowed: a stale
/// cache entry must never fail the mutation that produced it.
pub(crate) async fn invalidate(cache: &dyn CacheService, key: CacheKey) {
    if let Err(err) = cache.invalidate(key).await {
        tracing::warn!(key = %key, error = %err, "Cache invalidation failed");
    }
}
