//! HTTP client side of the gateway: one outbound POST per inbound request.

pub mod endpoint;

pub use endpoint::{should_retry, Endpoint, Failure};

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::error::GatewayError;

// Upper bound of the random delay added before a retry
const RETRY_JITTER_MS: u64 = 50;

// Characters of a failing backend body kept for diagnostics
const DETAIL_CHARS: usize = 256;

/// Forwards canonical requests to the prediction backend.
///
/// Holds no per-request state; the reqwest client only pools connections.
pub struct Dispatcher {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry_delay: Duration,
}

impl Dispatcher {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts `body` to `endpoint` and returns the raw success body
    pub async fn dispatch<B>(&self, endpoint: Endpoint, body: &B) -> Result<Vec<u8>, GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut attempt = 1;

        loop {
            debug!("[dispatch] {} attempt {}: POST {}", endpoint, attempt, url);

            match self.client.post(&url).json(body).send().await {
                Ok(response) => return self.read_response(endpoint, response).await,
                Err(err) => {
                    let failure = Failure::classify(&err);
                    if should_retry(endpoint, attempt, failure) {
                        let delay = self.retry_delay + jitter();
                        warn!(
                            "[dispatch] {} attempt {} failed ({}), retrying in {}ms",
                            endpoint,
                            attempt,
                            err,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    warn!("[dispatch] {} failed after {} attempt(s): {}", endpoint, attempt, err);
                    return Err(self.unavailable(endpoint, failure, &err));
                }
            }
        }
    }

    async fn read_response(
        &self,
        endpoint: Endpoint,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, GatewayError> {
        let status = response.status();

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .map(|text| text.trim().chars().take(DETAIL_CHARS).collect::<String>())
                .filter(|text| !text.is_empty());
            warn!("[dispatch] {} answered HTTP {}", endpoint, status.as_u16());
            return Err(GatewayError::BackendError {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.unavailable(endpoint, Failure::classify(&err), &err))?;
        debug!("[dispatch] {} answered HTTP {} ({} bytes)", endpoint, status.as_u16(), body.len());
        Ok(body.to_vec())
    }

    fn unavailable(&self, endpoint: Endpoint, failure: Failure, err: &reqwest::Error) -> GatewayError {
        let reason = match failure {
            Failure::Timeout => format!(
                "{} timed out after {}ms",
                endpoint,
                self.timeout.as_millis()
            ),
            Failure::Connect => format!("could not connect to {}", self.base_url),
            Failure::Other => format!("{} request failed: {}", endpoint, err),
        };
        GatewayError::BackendUnavailable(reason)
    }
}

fn jitter() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(0..=RETRY_JITTER_MS))
}
