//! Per-domain session management
//!
//! Sessions are created lazily on the first request to a domain and reused
//! until [`SessionManager::close_all`] runs or the last open
//! [`SessionScope`] is dropped. Each session is a dedicated
//! `reqwest::Client` with its own cookie store, so cookies set by one
//! retailer are replayed only to that retailer and vanish on teardown.

use crate::config::ScraperConfig;
use crate::session::headers::{browser_headers, detect_bot_challenge};
use crate::url::{clean_url, origin_of, session_key};
use crate::{Result, ScoutError};
use rand::Rng;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Connection pool, cookie jar and header state for one domain
#[derive(Debug)]
pub struct DomainSession {
    key: String,
    client: Client,
    last_headers: Mutex<Option<HeaderMap>>,
    requests: AtomicU64,
}

impl DomainSession {
    fn new(key: String, config: &ScraperConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            key,
            client,
            last_headers: Mutex::new(None),
            requests: AtomicU64::new(0),
        })
    }

    /// Domain (with port, if any) this session serves
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of requests issued through this session
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Header set assigned to the most recent request
    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.last_headers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn rotate_headers(&self, referer: &str) -> HeaderMap {
        let headers = browser_headers(referer);
        *self
            .last_headers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(headers.clone());
        headers
    }
}

/// Owns every open domain session
#[derive(Debug)]
pub struct SessionManager {
    config: ScraperConfig,
    sessions: Mutex<HashMap<String, Arc<DomainSession>>>,

    /// Number of live scopes; sessions are torn down when it returns to zero
    scopes: Mutex<usize>,
}

impl SessionManager {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            config: config.clone(),
            sessions: Mutex::new(HashMap::new()),
            scopes: Mutex::new(0),
        }
    }

    /// Returns the session for the URL's domain, opening one if needed
    pub fn session_for(&self, url: &Url) -> Result<Arc<DomainSession>> {
        let key = session_key(url)?;
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(session) = sessions.get(&key) {
            return Ok(session.clone());
        }

        tracing::debug!("Opening session for {}", key);
        let session = DomainSession::new(key.clone(), &self.config).map_err(|source| {
            ScoutError::Network {
                url: url.to_string(),
                source,
            }
        })?;
        let session = Arc::new(session);
        sessions.insert(key, session.clone());
        Ok(session)
    }

    /// Fetches a page body through the domain's session
    ///
    /// # Request Flow
    ///
    /// 1. Strip tracking parameters from the URL
    /// 2. Look up (or open) the domain session
    /// 3. Sleep a random delay between the configured bounds
    /// 4. Send a GET with freshly rotated headers; cookies ride along
    /// 5. Classify the response
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `Timeout` |
    /// | Connection/transport failure | `Network` |
    /// | HTTP 403 | `Forbidden` (retryable) |
    /// | HTTP 404 | `NotFound` (not retryable) |
    /// | Other non-2xx | `HttpStatus` |
    /// | Challenge marker in body | `BotDetected` |
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let url = clean_url(url)?;
        let session = self.session_for(&url)?;
        let referer = origin_of(&url)?;

        let delay = self.pacing_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let headers = session.rotate_headers(&referer);
        session.requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("GET {} (session {})", url, session.key());

        let response = session
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            tracing::warn!(
                "Access forbidden for {}. The site may be blocking automated requests.",
                url
            );
            return Err(ScoutError::Forbidden {
                url: url.to_string(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            tracing::warn!("Page not found for {}", url);
            return Err(ScoutError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ScoutError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))?;

        if let Some(marker) = detect_bot_challenge(&body) {
            tracing::warn!("Bot challenge served for {} (marker: {})", url, marker);
            return Err(ScoutError::BotDetected {
                url: url.to_string(),
                marker: marker.to_string(),
            });
        }

        Ok(body)
    }

    /// Number of sessions currently open
    pub fn open_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Closes every open session, dropping their connections and cookies
    ///
    /// Returns how many sessions were closed.
    pub fn close_all(&self) -> usize {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let closed = sessions.len();
        sessions.clear();
        if closed > 0 {
            tracing::debug!("Closed {} session(s)", closed);
        }
        closed
    }

    /// Opens a scope over the current search cycle
    ///
    /// Scopes nest: sessions are closed only when the last open scope is
    /// dropped, so an outer cycle keeps cookies alive across inner passes
    /// and concurrent cycles do not tear each other down.
    pub fn scope(&self) -> SessionScope<'_> {
        *self
            .scopes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        SessionScope { manager: self }
    }

    /// Number of scopes currently open
    pub fn open_scopes(&self) -> usize {
        *self
            .scopes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release_scope(&self) {
        let mut scopes = self
            .scopes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *scopes = scopes.saturating_sub(1);
        // Closed under the scope lock so a scope opened meanwhile cannot lose its sessions
        if *scopes == 0 {
            self.close_all();
        }
    }

    fn pacing_delay(&self) -> Duration {
        let min = self.config.min_request_delay_ms;
        let max = self.config.max_request_delay_ms.max(min);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Guard that closes every session once no other scope is open
///
/// Held for the duration of a search cycle so sessions are released whether
/// the cycle finished normally, returned early, or panicked.
pub struct SessionScope<'a> {
    manager: &'a SessionManager,
}

impl Drop for SessionScope<'_> {
    fn drop(&mut self) {
        self.manager.release_scope();
    }
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> ScoutError {
    if error.is_timeout() {
        ScoutError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScoutError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
