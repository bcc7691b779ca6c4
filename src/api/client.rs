use crate::feed::{FilterState, NewsItem, PAGE_SIZE};
use futures::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use thiserror::Error;
use url::{Host, Url};

/// Largest response body accepted from the news API (5MB).
const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure API URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Request interrupted: {0}")]
    Interrupted(String),
}

/// Which filter vocabulary to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    Categories,
    Tags,
}

impl Vocabulary {
    fn path(self) -> &'static str {
        match self {
            Self::Categories => "data/news/categories",
            Self::Tags => "data/news/tags",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Categories => "Category",
            Self::Tags => "Tag",
        }
    }
}

/// Client for the remote news API.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, and the
/// token is shared through a `SecretString` clone.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NewsClient {
    /// Build a client for `base_url`.
    ///
    /// The base URL must use HTTPS. Plain HTTP is accepted only when the host
    /// is exactly `localhost`, `127.0.0.1` or `::1`, so tests can run against
    /// a local server.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        token: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        // Trailing slash so that `join` appends instead of replacing the last segment.
        let base_url = Url::parse(&format!("{}/", trimmed))
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(trimmed.to_string()));
        }

        match base_url.scheme() {
            "https" => {}
            "http" if is_loopback_host(&base_url) => {
                tracing::warn!(base_url = %base_url, "Using non-HTTPS API URL (loopback only)");
            }
            _ => {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS API URL");
                return Err(ApiError::InsecureBaseUrl);
            }
        }

        Ok(Self {
            http,
            base_url,
            token,
            timeout,
        })
    }

    /// URL for one page of the feed, with filter parameters when set.
    pub fn page_url(&self, page: u32, limit: usize, filter: &FilterState) -> Result<Url, ApiError> {
        let mut url = self.endpoint("data/news")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &page.to_string())
                .append_pair("limit", &limit.to_string())
                .append_pair("token", self.token.expose_secret());
            if let Some(category) = filter.category() {
                query.append_pair("category", category);
            }
            if let Some(tag) = filter.tag() {
                query.append_pair("tag", tag);
            }
        }
        Ok(url)
    }

    /// URL for a filter vocabulary.
    pub fn vocabulary_url(&self, kind: Vocabulary) -> Result<Url, ApiError> {
        let mut url = self.endpoint(kind.path())?;
        url.query_pairs_mut()
            .append_pair("token", self.token.expose_secret());
        Ok(url)
    }

    /// Fetch one page of news items.
    ///
    /// A `null` body is an empty page. Any other non-array body is a
    /// [`ApiError::Decode`] so a bad response never reads as end-of-data.
    pub async fn fetch_page(
        &self,
        page: u32,
        filter: &FilterState,
    ) -> Result<Vec<NewsItem>, ApiError> {
        let url = self.page_url(page, PAGE_SIZE, filter)?;
        tracing::debug!(
            page,
            category = ?filter.category(),
            tag = ?filter.tag(),
            "Fetching news page"
        );
        let items: Vec<NewsItem> = self.get_json(url).await?;
        tracing::debug!(page, count = items.len(), "News page received");
        Ok(items)
    }

    /// Fetch the available categories or tags.
    pub async fn fetch_vocabulary(&self, kind: Vocabulary) -> Result<Vec<String>, ApiError> {
        let url = self.vocabulary_url(kind)?;
        let mut values: Vec<String> = self.get_json(url).await?;
        values.retain(|v| !v.trim().is_empty());
        tracing::debug!(kind = ?kind, count = values.len(), "Vocabulary received");
        Ok(values)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        let bytes = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.get_bytes(url))
                .await
                .map_err(|_| ApiError::Timeout(limit))??,
            None => self.get_bytes(url).await?,
        };
        decode_array(&bytes)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }
        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

/// Decode a JSON array body, mapping `null` (or an empty body) to no items.
fn decode_array<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let parsed: Option<Vec<T>> = serde_json::from_slice(bytes)?;
    Ok(parsed.unwrap_or_default())
}

/// Plain HTTP is only trusted for these hosts; compared on the parsed host,
/// never on a string prefix.
fn is_loopback_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(addr)) => addr == Ipv4Addr::LOCALHOST,
        Some(Host::Ipv6(addr)) => addr == Ipv6Addr::LOCALHOST,
        None => false,
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if usize::try_from(len).map_or(true, |len| len > limit) {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }
    read_limited_stream(response.bytes_stream(), limit).await
}

/// Collect a chunked body, failing as soon as it grows past `limit`. Bodies
/// without a Content-Length header are only bounded here.
async fn read_limited_stream<S, B, E>(stream: S, limit: usize) -> Result<Vec<u8>, ApiError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    ApiError: From<E>,
{
    let mut stream = std::pin::pin!(stream);
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let chunk = chunk.as_ref();
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(chunk);
    }
    Ok(bytes)
}
