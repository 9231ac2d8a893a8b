//! Upstream contact API over HTTP/JSON.

use crate::DataSource;
use async_trait::async_trait;
use bytes::Bytes;
use caravel_config::UpstreamConfig;
use caravel_core::{
    headers, upstream_response, BoxResponse, CaravelError, CaravelResult, RequestContext,
    APPLICATION_JSON,
};
use http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// [`DataSource`] backed by the upstream contact API.
///
/// `get` maps to `GET {base_url}/{key}`, `create` to `POST {base_url}` and
/// `update` to `PUT {base_url}`. Anything other than a 200 is an error that
/// still carries the upstream response.
pub struct HttpDataSource {
    client: Client,
    base_url: Url,
}

impl HttpDataSource {
    /// Creates a source with a default client.
    pub fn new(base_url: &str) -> CaravelResult<Self> {
        Self::from_config(&UpstreamConfig {
            base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        })
    }

    /// Creates a source with a client tuned from configuration.
    pub fn from_config(config: &UpstreamConfig) -> CaravelResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| CaravelError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(client, &config.base_url)
    }

    /// Creates a source around an existing client.
    pub fn with_client(client: Client, base_url: &str) -> CaravelResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            CaravelError::Configuration(format!("Invalid upstream base URL '{}': {}", base_url, e))
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, key: &str) -> CaravelResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CaravelError::internal(format!("Upstream base URL '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }

    async fn send(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        body: Option<Bytes>,
    ) -> CaravelResult<BoxResponse> {
        let mut outbound = headers::forwardable(ctx.headers());
        outbound.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

        let mut request = self.client.request(method.clone(), url.clone()).headers(outbound);
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(left) = ctx.remaining() {
            if left.is_zero() {
                return Err(CaravelError::Timeout(format!(
                    "{} {} skipped: request deadline already passed",
                    method, url
                )));
            }
            request = request.timeout(left);
        }

        debug!(parent: ctx.span(), %method, %url, "Calling upstream");

        let response = request.send().await.map_err(|e| transport_error(&method, &url, &e))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&method, &url, &e))?;

        let converted = upstream_response(status, response_headers, body);

        if status != StatusCode::OK {
            debug!(parent: ctx.span(), %method, %url, status = status.as_u16(), "Upstream returned non-200");
            return Err(CaravelError::UpstreamStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                response: Some(Box::new(converted)),
            });
        }

        Ok(Box::new(converted))
    }
}

fn transport_error(method: &Method, url: &Url, err: &reqwest::Error) -> CaravelError {
    if err.is_timeout() {
        CaravelError::Timeout(format!("{} {}: {}", method, url, err))
    } else {
        CaravelError::upstream(format!("{} {}: {}", method, url, err))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn get(&self, ctx: &RequestContext, key: &str) -> CaravelResult<BoxResponse> {
        let url = self.item_url(key)?;
        self.send(ctx, Method::GET, url, None).await
    }

    async fn create(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse> {
        self.send(ctx, Method::POST, self.base_url.clone(), Some(body)).await
    }

    async fn update(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse> {
        self.send(ctx, Method::PUT, self.base_url.clone(), Some(body)).await
    }
}
