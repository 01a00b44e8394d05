use crate::domain::model::Dataset;
use crate::domain::ports::{ConfigProvider, Fetcher};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const ACCESS_CODE_PARAM: &str = "AccessCode";

/// Fetches dataset JSON from the Traveler Info REST service.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| EtlError::InvalidConfigValueError {
            field: "source.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    /// Endpoint URL of `dataset`, without credentials. Safe to log.
    pub fn dataset_url(&self, dataset: Dataset) -> Result<Url> {
        self.base_url
            .join(dataset.endpoint_path())
            .map_err(|e| EtlError::ConfigError {
                message: format!("Cannot build URL for {}: {}", dataset, e),
            })
    }

    fn request_url(&self, dataset: Dataset, access_code: &str) -> Result<Url> {
        let mut url = self.dataset_url(dataset)?;
        url.query_pairs_mut()
            .append_pair(ACCESS_CODE_PARAM, access_code);
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, dataset: Dataset, access_code: &str) -> Result<String> {
        let display_url = self.dataset_url(dataset)?;
        tracing::info!("Contacting {}...", display_url);

        let url = self.request_url(dataset, access_code)?;
        // reqwest errors carry the request URL, which includes the access code
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EtlError::ApiError(e.without_url()))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                status: status.as_u16(),
                url: display_url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| EtlError::ApiError(e.without_url()))?;
        tracing::debug!("Received {} bytes for {}", body.len(), dataset);

        Ok(body)
    }
}
