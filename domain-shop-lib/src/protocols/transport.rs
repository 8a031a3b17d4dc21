//! HTTP transport for the reseller interface.
//!
//! Operations talk to the registrar through the [`Transport`] trait so tests
//! can substitute a recorded or counting fake.

use crate::error::DomainShopError;
use crate::Result;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Performs one GET and hands back the raw body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns `DomainShopError::Transport` when the request cannot be sent,
    /// times out, or the server answers with a non-success status.
    async fn get(&self, url: Url) -> Result<Vec<u8>>;
}

/// reqwest-backed transport with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| {
                DomainShopError::transport_with_source(
                    "Failed to create registrar HTTP client",
                    e.to_string(),
                )
            })?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        let response = self.http_client.get(url.clone()).send().await?;

        let status = response.status();
        debug!(host = url.host_str().unwrap_or_default(), %status, "registrar response");
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DomainShopError::transport("Registrar rate limit exceeded"));
        }
        if !status.is_success() {
            return Err(DomainShopError::transport(format!(
                "Registrar answered with HTTP {}",
                status
            )));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RegistrarCredentials, RegistrarEnvironment};
    use crate::protocols::RegistrarCommand;
    use crate::types::SubAccountRequest;

    #[tokio::test]
    async fn test_connection_failure_never_exposes_credentials() {
        let credentials =
            RegistrarCredentials::new("reseller", "TOPSECRETPW", RegistrarEnvironment::Test);
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let base = "http://127.0.0.1:1/interface.asp";

        let request = SubAccountRequest::new("newuser", "hunter22", "new@example.com");
        for command in [
            RegistrarCommand::get_domains(&credentials),
            RegistrarCommand::create_sub_account(&request, &credentials),
        ] {
            let err = transport
                .get(command.to_url(base).unwrap())
                .await
                .unwrap_err();
            assert!(matches!(err, DomainShopError::Transport { .. }), "{err}");

            let printed = format!("{} {:?}", err, err);
            assert!(!printed.contains("TOPSECRETPW"), "{printed}");
            assert!(!printed.contains("hunter22"), "{printed}");
        }
    }
}
