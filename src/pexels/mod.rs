use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use rand::Rng;
use reqwest::{
    Client as HttpClient, RequestBuilder,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

pub mod error;
pub mod models;
pub mod result;

pub use error::Error;
pub use models::*;
pub use result::Result;

macro_rules! pexels_api {
    ($end_point:expr) => {
        concat!("https://api.pexels.com", $end_point)
    };
}

macro_rules! query_params {
    ($($key:expr => $value:expr),+ $(,)?) => {
        &[
            $(($key, $value.to_string())),+
        ]
    };
}

pub const PHOTO_API: &str = pexels_api!("/v1");
pub const VIDEO_API: &str = pexels_api!("/videos");

pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

/// Highest page index drawn by [`Client::random_photo`] and [`Client::random_video`].
pub const RANDOM_PAGE_MAX: u32 = 1000;

#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    photo_api: String,
    video_api: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ClientBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            photo_api: PHOTO_API.to_string(),
            video_api: VIDEO_API.to_string(),
            timeout: None,
            user_agent: concat!("pexels/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn photo_base_url<T: Into<String>>(mut self, url: T) -> Self {
        self.photo_api = url.into();
        self
    }

    pub fn video_base_url<T: Into<String>>(mut self, url: T) -> Self {
        self.video_api = url.into();
        self
    }

    /// Deadline applied to every request, from connect until the body is read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent<T: Into<String>>(mut self, user_agent: T) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<Client> {
        // The API expects the bare key, without a scheme.
        let mut auth = HeaderValue::from_str(&self.api_key).map_err(|_| Error::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut http = HttpClient::builder()
            .default_headers(headers)
            .user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(Client {
            http: http.build()?,
            photo_api: self.photo_api.trim_end_matches('/').into(),
            video_api: self.video_api.trim_end_matches('/').into(),
            remaining: Arc::new(AtomicU32::new(0)),
        })
    }
}

/// Pexels API client.
///
/// Cloning is cheap: clones share the connection pool and the rate limit
/// counter.
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    photo_api: Arc<str>,
    video_api: Arc<str>,
    remaining: Arc<AtomicU32>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("photo_api", &self.photo_api)
            .field("video_api", &self.video_api)
            .field("remaining", &self.remaining_requests())
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new<T: AsRef<str>>(api_key: T) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder<T: AsRef<str>>(api_key: T) -> ClientBuilder {
        ClientBuilder::new(api_key.as_ref().to_string())
    }

    /// Value of the last `X-RateLimit-Remaining` header seen, or 0 before
    /// any successful call reported one.
    pub fn remaining_requests(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    #[instrument(skip(self))]
    pub async fn search_photos(&self, query: &str, per_page: u32, page: u32) -> Result<SearchResult> {
        let request = self
            .http
            .get(format!("{}/search", self.photo_api))
            .query(query_params!(
                "query" => query,
                "per_page" => per_page,
                "page" => page,
            ));

        self.fetch(request).await
    }

    #[instrument(skip(self))]
    pub async fn curated_photos(&self, per_page: u32, page: u32) -> Result<CuratedResult> {
        let request = self
            .http
            .get(format!("{}/curated", self.photo_api))
            .query(query_params!(
                "per_page" => per_page,
                "page" => page,
            ));

        self.fetch(request).await
    }

    #[instrument(skip(self))]
    pub async fn get_photo(&self, id: u32) -> Result<Photo> {
        let request = self.http.get(format!("{}/photos/{}", self.photo_api, id));

        self.fetch(request).await
    }

    /// Fetches the single curated photo on a randomly drawn page.
    ///
    /// Returns `Ok(None)` when that page does not hold exactly one photo,
    /// which happens when the draw lands past the end of the feed. Pages are
    /// drawn from `0..=RANDOM_PAGE_MAX`, so this is not a uniform sample of
    /// the whole feed.
    pub async fn random_photo(&self) -> Result<Option<Photo>> {
        let page = random_page();
        let result = self.curated_photos(1, page).await?;

        Ok(exactly_one(result.photos, page))
    }

    #[instrument(skip(self))]
    pub async fn search_videos(&self, query: &str, per_page: u32, page: u32) -> Result<VideoSearchResult> {
        let request = self
            .http
            .get(format!("{}/search", self.video_api))
            .query(query_params!(
                "query" => query,
                "per_page" => per_page,
                "page" => page,
            ));

        self.fetch(request).await
    }

    #[instrument(skip(self))]
    pub async fn popular_videos(&self, per_page: u32, page: u32) -> Result<PopularVideos> {
        let request = self
            .http
            .get(format!("{}/popular", self.video_api))
            .query(query_params!(
                "per_page" => per_page,
                "page" => page,
            ));

        self.fetch(request).await
    }

    /// Same as [`Client::random_photo`], over the popular videos feed.
    pub async fn random_video(&self) -> Result<Option<Video>> {
        let page = random_page();
        let result = self.popular_videos(1, page).await?;

        Ok(exactly_one(result.videos, page))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send_request(request).await?;

        serde_json::from_slice(&body).map_err(Error::InvalidResponse)
    }

    async fn send_request(&self, request: RequestBuilder) -> Result<Bytes> {
        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(%status, len = body.len(), "received response");

        if !status.is_success() {
            warn!(%status, "API request failed");

            return Err(Error::Status {
                status,
                headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        self.track_rate_limit(&headers)?;

        Ok(body)
    }

    fn track_rate_limit(&self, headers: &HeaderMap) -> Result<()> {
        let Some(value) = headers
            .get(RATE_LIMIT_REMAINING)
            .filter(|value| !value.is_empty())
        else {
            info!("{RATE_LIMIT_REMAINING} header is missing");
            return Ok(());
        };

        let value = String::from_utf8_lossy(value.as_bytes());
        let remaining = value
            .trim()
            .parse::<u32>()
            .map_err(|source| Error::RateLimitHeader {
                value: value.to_string(),
                source,
            })?;

        self.remaining.store(remaining, Ordering::Relaxed);

        Ok(())
    }
}

fn random_page() -> u32 {
    rand::thread_rng().gen_range(0..=RANDOM_PAGE_MAX)
}

fn exactly_one<T>(mut items: Vec<T>, page: u32) -> Option<T> {
    if items.len() != 1 {
        debug!(page, count = items.len(), "random page did not hold exactly one item");
        return None;
    }

    items.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_page_stays_in_range() {
        for _ in 0..10_000 {
            assert!(random_page() <= RANDOM_PAGE_MAX);
        }
    }

    #[test]
    fn exactly_one_rejects_empty_and_many() {
        assert_eq!(exactly_one(vec![7], 3), Some(7));
        assert_eq!(exactly_one(Vec::<u32>::new(), 3), None);
        assert_eq!(exactly_one(vec![1, 2], 3), None);
    }

    #[test]
    fn build_rejects_keys_that_are_not_header_values() {
        assert!(matches!(Client::new("bad\nkey"), Err(Error::InvalidApiKey)));
        assert!(matches!(Client::new("bad\u{7f}key"), Err(Error::InvalidApiKey)));
    }

    #[test]
    fn build_accepts_any_opaque_key() {
        assert!(Client::new("").is_ok());
        assert!(Client::new("563492ad6f91700001000001 with spaces").is_ok());
    }

    #[test]
    fn builder_trims_trailing_slashes() {
        let client = Client::builder("key")
            .photo_base_url("http://localhost:1234/v1/")
            .video_base_url("http://localhost:1234/videos//")
            .build()
            .unwrap();

        assert_eq!(&*client.photo_api, "http://localhost:1234/v1");
        assert_eq!(&*client.video_api, "http://localhost:1234/videos");
        assert_eq!(client.remaining_requests(), 0);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = Client::new("super-secret-key").unwrap();

        assert!(!format!("{client:?}").contains("super-secret-key"));
    }
}
