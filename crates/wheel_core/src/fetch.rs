use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{FetchError, ImageHandle};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_IMAGE_URL: &str = "https://loremflickr.com/320/240";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;
const USER_AGENT: &str = concat!("wheel_core/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_image(&self) -> Result<ImageHandle, FetchError>;
}

#[derive(Debug, Error)]
pub enum FetcherConfigError {
    #[error("invalid image url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported image url scheme '{0}'; expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpImageFetcher {
    client: Client,
    endpoint: Url,
    max_body_bytes: usize,
}

impl HttpImageFetcher {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetcherConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| FetcherConfigError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(FetcherConfigError::UnsupportedScheme(
                endpoint.scheme().to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            max_body_bytes: DEFAULT_MAX_IMAGE_BYTES,
        })
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn body_too_large(&self) -> FetchError {
        FetchError::Decode(format!("image body exceeds {} bytes", self.max_body_bytes))
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_image(&self) -> Result<ImageHandle, FetchError> {
        let mut response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "image provider rejected request");
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                warn!(endpoint = %self.endpoint, length, "image body too large");
                return Err(self.body_too_large());
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_transport_error)? {
            if bytes.len() + chunk.len() > self.max_body_bytes {
                warn!(endpoint = %self.endpoint, "image body too large");
                return Err(self.body_too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!(endpoint = %self.endpoint, bytes = bytes.len(), "image downloaded");

        tokio::task::spawn_blocking(move || decode_image(&bytes))
            .await
            .map_err(|_| FetchError::Unavailable)?
    }
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<ImageHandle, FetchError> {
    let decoded = image::load_from_memory(bytes).map_err(|err| FetchError::Decode(err.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageHandle::from_rgba(width, height, rgba.into_raw())
        .ok_or_else(|| FetchError::Decode("decoded buffer has unexpected length".to_string()))
}

pub struct UnavailableImageFetcher;

#[async_trait]
impl ImageFetcher for UnavailableImageFetcher {
    async fn fetch_image(&self) -> Result<ImageHandle, FetchError> {
        Err(FetchError::Unavailable)
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
