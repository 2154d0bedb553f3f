use reqwest::{Client, ClientBuilder};
use std::{sync::Arc, time::Duration};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::errors::RpcError;

/// Maximum retries for 5xx responses and connection failures.
const MAX_RETRIES: u32 = 2;

/// Longest response body excerpt carried in an [`RpcError::HttpError`].
const MAX_ERROR_BODY: usize = 256;

/// Configuration for HTTP client concurrency and timeout behavior.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum number of concurrent HTTP requests allowed
    pub concurrent_limit: usize,
    /// Permit acquisition timeout in milliseconds
    pub permit_timeout_ms: u64,
    /// Connect timeout for new connections
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { concurrent_limit: 64, permit_timeout_ms: 2_000, connect_timeout: Duration::from_secs(5) }
    }
}

/// HTTP client with semaphore-based concurrency control.
///
/// Registry reads fan out in parallel; the semaphore keeps a burst of reconciliations from
/// opening an unbounded number of connections to the node.
pub struct HttpClient {
    client: Client,
    concurrent_limit: Arc<Semaphore>,
    config: HttpClientConfig,
}

/// RAII guard ensuring semaphore permits are always released.
struct PermitGuard {
    _permit: OwnedSemaphorePermit,
    semaphore: Arc<Semaphore>,
}

impl PermitGuard {
    fn new(permit: OwnedSemaphorePermit, semaphore: Arc<Semaphore>) -> Self {
        Self { _permit: permit, semaphore }
    }
}

impl Drop for PermitGuard {
    fn drop(&mut self) {
        tracing::trace!(
            available_permits = self.semaphore.available_permits(),
            "permit guard dropped"
        );
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    pub fn new() -> Result<Self, RpcError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Maps network errors to short descriptions that never echo the node URL.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_body() || error.is_decode() {
            "response body error".to_string()
        } else if error.is_redirect() {
            "unexpected redirect".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// Creates a new HTTP client with the provided configuration.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, RpcError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(config.connect_timeout)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("registrar-core/", env!("CARGO_PKG_VERSION")))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                RpcError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self {
            client,
            concurrent_limit: Arc::new(Semaphore::new(config.concurrent_limit)),
            config,
        })
    }

    /// Sends a JSON body with HTTP POST, bounded by the concurrency semaphore.
    ///
    /// 5xx responses and connection failures are retried with exponential backoff.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Timeout`] if permit acquisition or the request times out
    /// - [`RpcError::ConcurrencyLimit`] if the semaphore is closed
    /// - [`RpcError::HttpError`] for non-success HTTP status codes
    /// - [`RpcError::ConnectionFailed`] when retries are exhausted
    pub async fn send_request(
        &self,
        url: &str,
        body: bytes::Bytes,
        timeout: Duration,
    ) -> Result<bytes::Bytes, RpcError> {
        let permit = tokio::time::timeout(
            Duration::from_millis(self.config.permit_timeout_ms),
            Arc::clone(&self.concurrent_limit).acquire_owned(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                available_permits = self.concurrent_limit.available_permits(),
                "http client semaphore acquisition timeout"
            );
            RpcError::Timeout
        })?
        .map_err(|_| RpcError::ConcurrencyLimit(url.to_string()))?;

        let _permit_guard = PermitGuard::new(permit, self.concurrent_limit.clone());

        let mut retries = 0;

        loop {
            let result = self
                .client
                .post(url)
                .header("content-type", "application/json")
                .body(body.clone())
                .timeout(timeout)
                .send()
                .await;

            match result {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.bytes().await.map_err(RpcError::Network);
                    } else if response.status().is_server_error() && retries < MAX_RETRIES {
                        retries += 1;
                        tokio::time::sleep(Duration::from_millis(100 * (1 << retries))).await;
                        continue;
                    }

                    let status = response.status().as_u16();
                    let mut text = response.text().await.unwrap_or_default();
                    if text.len() > MAX_ERROR_BODY {
                        let mut cut = MAX_ERROR_BODY;
                        while !text.is_char_boundary(cut) {
                            cut -= 1;
                        }
                        text.truncate(cut);
                        text.push_str("... (truncated)");
                    }
                    tracing::debug!(status, "http request failed");
                    return Err(RpcError::HttpError(status, text));
                }
                Err(e) if !e.is_timeout() && retries < MAX_RETRIES => {
                    retries += 1;
                    tokio::time::sleep(Duration::from_millis(100 * (1 << retries))).await;
                }
                Err(e) => {
                    if e.is_timeout() {
                        return Err(RpcError::Timeout);
                    }
                    return Err(RpcError::ConnectionFailed(Self::sanitize_network_error(&e)));
                }
            }
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.concurrent_limit.available_permits()
    }
}
