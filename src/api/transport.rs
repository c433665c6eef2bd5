//! Pluggable HTTP transport.
//!
//! [`query`](crate::api::query::query) builds an [`ApiRequest`] and hands it to
//! a [`Transport`]. The production implementation is [`HttpTransport`], a thin
//! wrapper around `reqwest::Client`; tests substitute their own.

use crate::api::error::BoxError;
use crate::config::config::DashboardConfig;
use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::future::Future;
use tracing::debug;

/// One POST to the dashboard.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// A fully read response. Holding the body by value means the underlying
/// connection has already been released.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub trait Transport: Send + Sync {
    fn post(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = std::result::Result<ApiResponse, BoxError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration: the configured proxy if one is
    /// set, otherwise reqwest's default of honouring `HTTP(S)_PROXY`, plus the
    /// optional request timeout.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let mut builder = Client::builder();

        if let Some(proxy) = &config.proxy {
            let proxy_url = format!("http://{}:{}", proxy.host, proxy.port);
            let proxy = reqwest::Proxy::all(&proxy_url)
                .with_context(|| format!("Failed to create HTTP proxy with URL {}", proxy_url))?;
            builder = builder.proxy(proxy);
        }

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Transport for HttpTransport {
    async fn post(&self, request: ApiRequest) -> std::result::Result<ApiResponse, BoxError> {
        let mut builder = self.client.post(&request.url).headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!("dashboard replied {} with {} bytes", status, body.len());

        Ok(ApiResponse { status, body })
    }
}
