//! TTL-bounded, single-flight cache around the status query
//!
//! `wg show all dump` is not free to run on every request, so the snapshot
//! it produces is cached for a configurable window. The whole
//! check-age/query/parse/publish sequence runs under one lock: however many
//! requests observe a stale snapshot at once, exactly one query runs and
//! everyone waits for its result.

use crate::names::PeerNameTable;
use crate::stats::models::StatsSnapshot;
use crate::stats::parser::parse_dump;
use crate::stats::query::{Clock, StatusQuery};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CacheSlot {
    snapshot: Arc<StatsSnapshot>,
    refreshed_at: Instant,
}

pub struct StatsCache {
    ttl: Duration,
    key_display_len: usize,
    names: PeerNameTable,
    query: Arc<dyn StatusQuery>,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CacheSlot>>,
}

impl StatsCache {
    pub fn new(
        names: PeerNameTable,
        query: Arc<dyn StatusQuery>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        key_display_len: usize,
    ) -> Self {
        Self {
            ttl,
            key_display_len,
            names,
            query,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached snapshot while it is within the TTL, otherwise
    /// refresh and return the new one. Never fails: a query or parse error
    /// becomes the degraded error snapshot, cached for a full TTL like any
    /// success so a broken backend is not hammered.
    pub async fn fetch(&self) -> Arc<StatsSnapshot> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            let age = self.clock.now().duration_since(cached.refreshed_at);
            if age <= self.ttl {
                return cached.snapshot.clone();
            }
        }

        let snapshot = Arc::new(self.refresh().await);
        *slot = Some(CacheSlot {
            snapshot: snapshot.clone(),
            refreshed_at: self.clock.now(),
        });
        snapshot
    }

    async fn refresh(&self) -> StatsSnapshot {
        let result = match self.query.dump().await {
            Ok(output) => parse_dump(&output, &self.names, self.key_display_len),
            Err(e) => Err(e),
        };

        match result {
            Ok(interfaces) => StatsSnapshot::Interfaces(interfaces),
            Err(e) => {
                tracing::error!("WireGuard fetch failed: {:#}", e);
                StatsSnapshot::error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DUMP: &str = "wg0\tabc123\tPRIV\t(none)\t10.0.0.2/32\t0\t100\t200\toff\n";

    /// Counts queries; optionally fails the first `fail_first` calls or
    /// sleeps to hold the refresh open.
    struct MockQuery {
        calls: AtomicUsize,
        fail_first: usize,
        delay: Option<Duration>,
    }

    impl MockQuery {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: 0,
                delay: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusQuery for MockQuery {
        async fn dump(&self) -> anyhow::Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if call < self.fail_first {
                anyhow::bail!("wg show exited with exit status: 1");
            }
            Ok(DUMP.to_string())
        }
    }

    /// Clock that only moves when the test says so.
    struct ManualClock {
        start: Instant,
        offset: std::sync::Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                offset: std::sync::Mutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    fn cache_with(
        query: Arc<MockQuery>,
        clock: Arc<ManualClock>,
        names: PeerNameTable,
    ) -> StatsCache {
        StatsCache::new(names, query, clock, Duration::from_secs(5), 44)
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_reuses_snapshot() {
        let query = Arc::new(MockQuery::new());
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(query.clone(), clock.clone(), PeerNameTable::default());

        let first = cache.fetch().await;
        clock.advance(Duration::from_secs(3));
        let second = cache.fetch().await;

        assert_eq!(query.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_fetch_after_ttl_refreshes_once() {
        let query = Arc::new(MockQuery::new());
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(query.clone(), clock.clone(), PeerNameTable::default());

        cache.fetch().await;
        clock.advance(Duration::from_secs(6));
        cache.fetch().await;
        cache.fetch().await;

        assert_eq!(query.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_fetches_run_one_query() {
        let query = Arc::new(MockQuery {
            calls: AtomicUsize::new(0),
            fail_first: 0,
            delay: Some(Duration::from_millis(50)),
        });
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(cache_with(
            query.clone(),
            clock,
            PeerNameTable::default(),
        ));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.fetch().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(query.calls(), 1);
    }

    #[tokio::test]
    async fn test_query_failure_yields_cached_error_payload() {
        let query = Arc::new(MockQuery {
            calls: AtomicUsize::new(0),
            fail_first: 1,
            delay: None,
        });
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(query.clone(), clock.clone(), PeerNameTable::default());

        let first = cache.fetch().await;
        assert_eq!(*first, StatsSnapshot::error());

        // backend has recovered, but the error payload honors the TTL
        clock.advance(Duration::from_secs(2));
        let second = cache.fetch().await;
        assert_eq!(*second, StatsSnapshot::error());
        assert_eq!(query.calls(), 1);

        clock.advance(Duration::from_secs(6));
        let third = cache.fetch().await;
        assert!(matches!(*third, StatsSnapshot::Interfaces(_)));
        assert_eq!(query.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_resolves_names_end_to_end() {
        let names = PeerNameTable::parse("[Peer]\n# tag_Alice\nPublicKey = abc123\n");
        let query = Arc::new(MockQuery::new());
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(query, clock, names);

        let snapshot = cache.fetch().await;
        let StatsSnapshot::Interfaces(interfaces) = snapshot.as_ref() else {
            panic!("expected interfaces, got {snapshot:?}");
        };
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].0, "wg0");

        let peer = &interfaces[0].1.peers[0];
        assert_eq!(peer.peer_name, "Alice");
        assert_eq!(peer.public_key, "abc123");
        assert_eq!(peer.endpoint, "");
        assert_eq!(peer.latest_handshake, 0);
        assert_eq!(peer.transfer_rx, 100);
        assert_eq!(peer.transfer_tx, 200);
    }
}
