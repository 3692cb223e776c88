//! Tool-call signature correlation cache.
//!
//! Maps a `tool_use` id to the `thoughtSignature` the backend attached to the
//! matching `functionCall`. Written by response transformation, read by request
//! transformation. Bounded by capacity and TTL.

use super::signature_metrics::record_signature_cache;
use gravitate_types::SignatureCacheConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    timestamp: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self { data, timestamp: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.timestamp.elapsed() > ttl
    }
}

pub struct SignatureCache {
    tool_signatures: RwLock<HashMap<String, CacheEntry<String>>>,
    capacity: usize,
    ttl: Duration,
}

impl Default for SignatureCache {
    fn default() -> Self {
        Self::from_config(&SignatureCacheConfig::default())
    }
}

impl SignatureCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { tool_signatures: RwLock::new(HashMap::new()), capacity: capacity.max(1), ttl }
    }

    pub fn from_config(config: &SignatureCacheConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_secs))
    }

    pub fn put(&self, tool_use_id: &str, signature: String) {
        if tool_use_id.is_empty() || signature.is_empty() {
            return;
        }

        let mut cache = self.tool_signatures.write();
        tracing::debug!("[SignatureCache] Caching tool signature for id: {}", tool_use_id);
        record_signature_cache("store");
        cache.insert(tool_use_id.to_string(), CacheEntry::new(signature));

        if cache.len() > self.capacity {
            let before = cache.len();
            let ttl = self.ttl;
            cache.retain(|_, v| !v.is_expired(ttl));

            while cache.len() > self.capacity {
                let Some(oldest) =
                    cache.iter().min_by_key(|(_, v)| v.timestamp).map(|(k, _)| k.clone())
                else {
                    break;
                };
                cache.remove(&oldest);
            }

            tracing::debug!(
                "[SignatureCache] Tool cache cleanup: {} -> {} entries",
                before,
                cache.len()
            );
        }
    }

    pub fn get(&self, tool_use_id: &str) -> Option<String> {
        let cache = self.tool_signatures.read();
        if let Some(entry) = cache.get(tool_use_id) {
            if !entry.is_expired(self.ttl) {
                tracing::debug!("[SignatureCache] Hit tool signature for id: {}", tool_use_id);
                record_signature_cache("hit");
                return Some(entry.data.clone());
            }
        }
        record_signature_cache("miss");
        None
    }

    pub fn len(&self) -> usize {
        self.tool_signatures.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
