//! reqwest implementation of the remote gateway

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::{classify_response, GatewayError, GatewayResponse, Method, RemoteGateway};
use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// HTTP client for the catalog API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Builds a gateway from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::Config(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self {
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
            timeout: config.timeout(),
            client,
        })
    }

    /// Returns the base URL this gateway was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RemoteGateway for HttpGateway {
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
    ) -> std::result::Result<GatewayResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .client
            .request(to_reqwest_method(method), &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        // Race the exchange against the timer; a timeout counts as unreachable.
        let (status, text) = match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => {
                tracing::warn!("{method} {endpoint} timed out after {:?}", self.timeout);
                return Err(GatewayError::Unreachable(format!(
                    "Request timed out after {} ms",
                    self.timeout.as_millis()
                )));
            }
            Ok(Err(error)) => {
                tracing::warn!("{method} {endpoint} failed: {error}");
                return Err(GatewayError::Unreachable(format!(
                    "Request failed: {error}"
                )));
            }
            Ok(Ok(exchange)) => exchange,
        };

        tracing::debug!("{method} {endpoint} -> HTTP {status}");
        classify_response(status, text)
    }
}

const fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}
