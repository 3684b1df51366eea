//! Trade session state
//!
//! A session remembers recently seen token records by address and the
//! transaction ids it has already handled. Both maps are bounded and
//! expiring, and a session is an explicit value: callers create one and
//! pass it where it is needed.
use std::time::Duration;

use crate::config::SessionConfig;
use crate::logger::{self, LogTag};
use crate::tokens::TokenRecord;

pub mod cache;

pub use cache::{CacheConfig, CacheManager, CacheMetrics};

pub struct TradeSession {
    tokens: CacheManager<String, TokenRecord>,
    processed_transactions: CacheManager<String, ()>,
}

impl TradeSession {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            tokens: CacheManager::new(CacheConfig {
                ttl: Duration::from_secs(config.token_cache_ttl_secs),
                capacity: config.token_cache_capacity,
            }),
            processed_transactions: CacheManager::new(CacheConfig {
                ttl: Duration::from_secs(config.processed_tx_ttl_secs),
                capacity: config.processed_tx_capacity,
            }),
        }
    }

    /// Remember token records by address, replacing older copies
    ///
    /// Records with an empty address are skipped. Returns how many were stored.
    pub fn remember_tokens<'a>(&self, tokens: impl IntoIterator<Item = &'a TokenRecord>) -> usize {
        let mut stored = 0;
        for token in tokens {
            if token.address.is_empty() {
                continue;
            }
            self.tokens.insert(token.address.clone(), token.clone());
            stored += 1;
        }
        logger::debug(
            LogTag::Session,
            &format!("Remembered {} tokens ({} cached)", stored, self.tokens.len()),
        );
        stored
    }

    pub fn lookup_token(&self, address: &str) -> Option<TokenRecord> {
        let found = self.tokens.get(&address.to_string());
        if found.is_none() {
            logger::debug(LogTag::Session, &format!("Token {} not in session", address));
        }
        found
    }

    /// Record a transaction id; true only the first time it is seen within the TTL
    pub fn mark_transaction_processed(&self, signature: &str) -> bool {
        let first_seen = self
            .processed_transactions
            .insert_if_absent(signature.to_string(), ());
        if !first_seen {
            logger::debug(
                LogTag::Session,
                &format!("Transaction {} already processed", signature),
            );
        }
        first_seen
    }

    /// Drop expired entries from both caches
    pub fn purge_expired(&self) -> usize {
        self.tokens.purge_expired() + self.processed_transactions.purge_expired()
    }

    pub fn token_cache_metrics(&self) -> CacheMetrics {
        self.tokens.metrics()
    }

    pub fn transaction_cache_metrics(&self) -> CacheMetrics {
        self.processed_transactions.metrics()
    }

    pub fn cached_token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn session() -> TradeSession {
        TradeSession::new(&SessionConfig::default())
    }

    #[test]
    fn test_remember_and_lookup() {
        let session = session();
        let tokens = vec![
            TokenRecord::new("addr1").with_identity("Foo", "FOO"),
            TokenRecord::new("").with_identity("Nameless", "NL"),
        ];
        assert_eq!(session.remember_tokens(&tokens), 1);

        let found = session.lookup_token("addr1").unwrap();
        assert_eq!(found.symbol.as_deref(), Some("FOO"));
        assert!(session.lookup_token("missing").is_none());

        let metrics = session.token_cache_metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
    }

    #[test]
    fn test_newer_record_replaces_older() {
        let session = session();
        session.remember_tokens(&[TokenRecord::new("addr").with_metrics(1.0, 0.0, 0.0)]);
        session.remember_tokens(&[TokenRecord::new("addr").with_metrics(2.0, 0.0, 0.0)]);
        assert_eq!(session.cached_token_count(), 1);
        assert_eq!(session.lookup_token("addr").unwrap().volume_24h, 2.0);
    }

    #[test]
    fn test_transaction_dedup() {
        let session = session();
        assert!(session.mark_transaction_processed("sig1"));
        assert!(!session.mark_transaction_processed("sig1"));
        assert!(session.mark_transaction_processed("sig2"));
    }

    #[test]
    fn test_transactions_expire() {
        let session = TradeSession::new(&SessionConfig {
            processed_tx_ttl_secs: 0,
            ..SessionConfig::default()
        });
        assert!(session.mark_transaction_processed("sig"));
        thread::sleep(Duration::from_millis(20));
        assert!(session.mark_transaction_processed("sig"));
    }

    #[test]
    fn test_token_capacity_bound() {
        let session = TradeSession::new(&SessionConfig {
            token_cache_capacity: 2,
            ..SessionConfig::default()
        });
        let tokens: Vec<TokenRecord> = ["a", "b", "c"].iter().map(|a| TokenRecord::new(*a)).collect();
        session.remember_tokens(&tokens);
        assert_eq!(session.cached_token_count(), 2);
        assert!(session.lookup_token("a").is_none());
        assert_eq!(session.token_cache_metrics().evictions, 1);
    }

    #[test]
    fn test_concurrent_marking_yields_single_winner() {
        let session = Arc::new(session());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                thread::spawn(move || session.mark_transaction_processed("shared"))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|first| *first)
            .count();
        assert_eq!(winners, 1);
    }
}
