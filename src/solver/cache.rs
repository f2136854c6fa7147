use crate::dns::DynRecordClient;
use crate::error::Error;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;

/// DNS clients keyed by zone identifier.
///
/// At most one client is ever built per zone: the lock is held across the lookup and the
/// construction of a missing client.
#[derive(Default)]
pub struct ClientCache {
    clients: Mutex<HashMap<String, DynRecordClient>>,
}

impl ClientCache {
    /// Returns the client cached for `zone_id`, or awaits `build` and caches its result.
    ///
    /// Nothing is cached when `build` fails.
    pub async fn get_or_try_insert<F, Fut>(
        &self,
        zone_id: &str,
        build: F,
    ) -> Result<DynRecordClient, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DynRecordClient, Error>>,
    {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(zone_id) {
            return Ok(client.clone());
        }
        let client = build().await?;
        clients.insert(zone_id.to_string(), client.clone());
        Ok(client)
    }

    /// Drops every cached client.
    pub async fn clear(&self) {
        self.clients.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{RecordClient, TxtRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct NoopClient;

    #[async_trait::async_trait]
    impl RecordClient for NoopClient {
        async fn create_txt(&self, _: &str, _: &str, _: &str) -> Result<(), Error> {
            Ok(())
        }

        async fn find_txt(&self, fqdn: &str, _: &str, _: &str) -> Result<TxtRecord, Error> {
            Err(Error::RecordNotFound(fqdn.to_string()))
        }

        async fn delete_txt(&self, _: &str, _: &str) -> Result<(), Error> {
            Ok(())
        }
    }

    fn noop() -> DynRecordClient {
        Arc::new(NoopClient)
    }

    #[tokio::test]
    async fn builds_once_per_zone() {
        let cache = ClientCache::default();
        let counter = AtomicUsize::new(0);
        let builds = &counter;
        let build = move || async move {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(noop())
        };

        let a = cache.get_or_try_insert("zone-1", build).await.unwrap();
        let b = cache.get_or_try_insert("zone-1", build).await.unwrap();
        let c = cache.get_or_try_insert("zone-2", build).await.unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn failed_build_is_not_cached() {
        let cache = ClientCache::default();
        let err = cache
            .get_or_try_insert("zone-1", || async { Err(Error::NotInitialized) })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty().await);

        cache
            .get_or_try_insert("zone-1", || async { Ok(noop()) })
            .await
            .unwrap();
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_client() {
        let cache = Arc::new(ClientCache::default());
        let builds = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                let builds = builds.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_try_insert("zone-1", || async move {
                            builds.fetch_add(1, Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            Ok(noop())
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut clients = Vec::new();
        for handle in handles {
            clients.push(handle.await.unwrap());
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(clients.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
