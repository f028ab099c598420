// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signing key lookup.
//!
//! [`JwksClient`] fetches the user pool's JSON Web Key Set and caches it for a
//! configurable TTL. A `kid` missing from a fresh cache triggers one refetch,
//! which picks up rotated keys without waiting for expiry. Refetches for
//! unknown kids are spaced at least [`MIN_REFETCH_INTERVAL`] apart.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::error::AuthError;

/// Upper bound on a single JWKS request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimum age of the cached set before an unknown kid may trigger a refetch.
pub const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

#[async_trait]
pub trait KeySource: Send + Sync {
	/// The verification key for `kid`, or `None` if the issuer has no such key.
	async fn find(&self, kid: &str) -> Result<Option<Jwk>, AuthError>;
}

/// A fixed key set. Useful in tests and for pinned keys.
pub struct StaticKeySource {
	keys: JwkSet,
}

impl StaticKeySource {
	pub fn new(keys: JwkSet) -> Self {
		Self { keys }
	}
}

#[async_trait]
impl KeySource for StaticKeySource {
	async fn find(&self, kid: &str) -> Result<Option<Jwk>, AuthError> {
		Ok(self.keys.find(kid).cloned())
	}
}

#[derive(Debug, PartialEq)]
enum Lookup {
	Hit(Jwk),
	/// The cache is fresh but lacks the kid, and was fetched too recently to
	/// refetch.
	Absent,
	/// The cache is fresh but lacks the kid.
	Miss,
	/// Nothing cached, or the cache has expired.
	Stale,
}

struct KeyCache {
	ttl: Duration,
	min_refetch: Duration,
	entry: Option<(JwkSet, Instant)>,
}

impl KeyCache {
	fn new(ttl: Duration, min_refetch: Duration) -> Self {
		Self {
			ttl,
			min_refetch,
			entry: None,
		}
	}

	fn lookup(&self, kid: &str, now: Instant) -> Lookup {
		match &self.entry {
			Some((keys, fetched_at)) => {
				let age = now.saturating_duration_since(*fetched_at);
				if age >= self.ttl {
					return Lookup::Stale;
				}
				match keys.find(kid) {
					Some(jwk) => Lookup::Hit(jwk.clone()),
					None if age < self.min_refetch => Lookup::Absent,
					None => Lookup::Miss,
				}
			}
			None => Lookup::Stale,
		}
	}

	fn store(&mut self, keys: JwkSet, now: Instant) {
		self.entry = Some((keys, now));
	}
}

/// JWKS fetched over HTTPS and cached.
pub struct JwksClient {
	http: reqwest::Client,
	url: String,
	cache: RwLock<KeyCache>,
}

impl JwksClient {
	pub fn new(url: impl Into<String>, ttl: Duration) -> Result<Self, AuthError> {
		Self::with_limits(url, ttl, FETCH_TIMEOUT, MIN_REFETCH_INTERVAL)
	}

	pub fn with_limits(
		url: impl Into<String>,
		ttl: Duration,
		timeout: Duration,
		min_refetch: Duration,
	) -> Result<Self, AuthError> {
		let http = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| AuthError::JwksFetch(e.to_string()))?;
		Ok(Self {
			http,
			url: url.into(),
			cache: RwLock::new(KeyCache::new(ttl, min_refetch)),
		})
	}

	#[instrument(skip(self), fields(url = %self.url))]
	async fn fetch(&self) -> Result<JwkSet, AuthError> {
		let response = self
			.http
			.get(&self.url)
			.send()
			.await
			.map_err(|e| AuthError::JwksFetch(e.to_string()))?
			.error_for_status()
			.map_err(|e| AuthError::JwksFetch(e.to_string()))?;

		let keys: JwkSet = response
			.json()
			.await
			.map_err(|e| AuthError::JwksFetch(e.to_string()))?;

		debug!(keys = keys.keys.len(), "fetched JWKS");
		Ok(keys)
	}
}

#[async_trait]
impl KeySource for JwksClient {
	async fn find(&self, kid: &str) -> Result<Option<Jwk>, AuthError> {
		match self.cache.read().await.lookup(kid, Instant::now()) {
			Lookup::Hit(jwk) => return Ok(Some(jwk)),
			Lookup::Absent => return Ok(None),
			Lookup::Miss | Lookup::Stale => {}
		}

		// Re-check under the write lock so at most one fetch is in flight.
		let mut cache = self.cache.write().await;
		match cache.lookup(kid, Instant::now()) {
			Lookup::Hit(jwk) => return Ok(Some(jwk)),
			Lookup::Absent => return Ok(None),
			Lookup::Miss => debug!(kid, "kid not in cached JWKS, refetching"),
			Lookup::Stale => debug!("JWKS cache empty or expired"),
		}

		let keys = self.fetch().await?;
		let found = keys.find(kid).cloned();
		if found.is_none() {
			warn!(kid, "kid not present in JWKS");
		}
		cache.store(keys, Instant::now());
		Ok(found)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use tokio::net::TcpListener;

	fn key_set(kids: &[&str]) -> JwkSet {
		let keys: Vec<_> = kids
			.iter()
			.map(|kid| {
				serde_json::json!({
					"kty": "RSA",
					"kid": kid,
					"use": "sig",
					"alg": "RS256",
					"n": "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qTRsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA84-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWFLU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw",
					"e": "AQAB"
				})
			})
			.collect();
		serde_json::from_value(serde_json::json!({ "keys": keys })).unwrap()
	}

	#[test]
	fn test_empty_cache_is_stale() {
		let cache = KeyCache::new(Duration::from_secs(60), Duration::ZERO);
		assert_eq!(cache.lookup("a", Instant::now()), Lookup::Stale);
	}

	#[test]
	fn test_fresh_cache_hits_and_misses() {
		let now = Instant::now();
		let mut cache = KeyCache::new(Duration::from_secs(60), Duration::ZERO);
		cache.store(key_set(&["a"]), now);

		assert!(matches!(cache.lookup("a", now), Lookup::Hit(_)));
		assert_eq!(cache.lookup("b", now), Lookup::Miss);
	}

	#[test]
	fn test_expired_cache_is_stale() {
		let now = Instant::now();
		let mut cache = KeyCache::new(Duration::from_secs(60), Duration::ZERO);
		cache.store(key_set(&["a"]), now);

		assert_eq!(
			cache.lookup("a", now + Duration::from_secs(61)),
			Lookup::Stale
		);
	}

	#[test]
	fn test_recent_fetch_suppresses_refetch() {
		let now = Instant::now();
		let mut cache = KeyCache::new(Duration::from_secs(3600), Duration::from_secs(30));
		cache.store(key_set(&["a"]), now);

		assert_eq!(cache.lookup("b", now + Duration::from_secs(5)), Lookup::Absent);
		assert_eq!(cache.lookup("b", now + Duration::from_secs(30)), Lookup::Miss);
		assert!(matches!(
			cache.lookup("a", now + Duration::from_secs(5)),
			Lookup::Hit(_)
		));
	}

	/// Serve `keys` over plain HTTP, counting connections.
	async fn serve_jwks(keys: JwkSet) -> (String, Arc<AtomicUsize>) {
		let body = serde_json::to_string(&keys).unwrap();
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = hits.clone();
		tokio::spawn(async move {
			while let Ok((mut socket, _)) = listener.accept().await {
				counter.fetch_add(1, Ordering::SeqCst);
				let body = body.clone();
				tokio::spawn(async move {
					let mut buf = [0u8; 4096];
					let _ = socket.read(&mut buf).await;
					let response = format!(
						"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
						body.len()
					);
					let _ = socket.write_all(response.as_bytes()).await;
					let _ = socket.shutdown().await;
				});
			}
		});
		(format!("http://{addr}/.well-known/jwks.json"), hits)
	}

	#[tokio::test]
	async fn test_unknown_kid_does_not_refetch_within_interval() {
		let (url, hits) = serve_jwks(key_set(&["a"])).await;
		let client = JwksClient::with_limits(
			url,
			Duration::from_secs(3600),
			Duration::from_secs(5),
			Duration::from_secs(30),
		)
		.unwrap();

		assert!(client.find("a").await.unwrap().is_some());
		assert_eq!(hits.load(Ordering::SeqCst), 1);

		for _ in 0..10 {
			assert!(client.find("forged").await.unwrap().is_none());
		}
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_unknown_kid_refetches_after_interval() {
		let (url, hits) = serve_jwks(key_set(&["a"])).await;
		let client = JwksClient::with_limits(
			url,
			Duration::from_secs(3600),
			Duration::from_secs(5),
			Duration::ZERO,
		)
		.unwrap();

		assert!(client.find("a").await.unwrap().is_some());
		assert!(client.find("rotated").await.unwrap().is_none());
		assert_eq!(hits.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_stalled_endpoint_times_out() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			let mut held = Vec::new();
			while let Ok((socket, _)) = listener.accept().await {
				held.push(socket);
			}
		});

		let client = JwksClient::with_limits(
			format!("http://{addr}/.well-known/jwks.json"),
			Duration::from_secs(3600),
			Duration::from_millis(200),
			MIN_REFETCH_INTERVAL,
		)
		.unwrap();

		let result = tokio::time::timeout(Duration::from_secs(5), client.find("a"))
			.await
			.expect("fetch should give up before the outer timeout");
		assert!(matches!(result, Err(AuthError::JwksFetch(_))));
	}

	#[tokio::test]
	async fn test_static_source() {
		let source = StaticKeySource::new(key_set(&["a", "b"]));
		assert!(source.find("b").await.unwrap().is_some());
		assert!(source.find("c").await.unwrap().is_none());
	}
}
