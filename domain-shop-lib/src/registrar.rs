//! Registrar client implementation.
//!
//! This module provides the `RegistrarClient` that turns typed operations into
//! reseller interface commands, sends each one over a [`Transport`] and
//! interprets the parsed reply.

use crate::config::RegistrarCredentials;
use crate::protocols::{
    normalize_registration, HttpTransport, RegistrarCommand, RegistrarReply, ReplyValue, Transport,
};
use crate::types::{AccountDomain, ContactInfo, NormalizedRegistrationResult, SubAccountRequest};
use crate::validate::validate_sub_account;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// RRP code the `Check` command returns for a domain that can be registered.
pub const RRP_AVAILABLE: &str = "210";

/// Client for the reseller interface.
///
/// Holds only immutable credentials and a shared transport, so one instance
/// can serve any number of concurrent callers. Every operation performs
/// exactly one HTTP round trip, with no retries and no caching.
///
/// # Example
///
/// ```rust,no_run
/// use domain_shop_lib::{RegistrarClient, RegistrarCredentials, RegistrarEnvironment};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = RegistrarCredentials::new("reseller", "secret", RegistrarEnvironment::Test);
///     let client = RegistrarClient::new(credentials, Duration::from_secs(30))?;
///     let available = client.check_availability("example.com").await?;
///     println!("Available: {}", available);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RegistrarClient {
    credentials: RegistrarCredentials,
    transport: Arc<dyn Transport>,
}

impl RegistrarClient {
    /// Create a client backed by an HTTP transport with the given timeout.
    pub fn new(
        credentials: RegistrarCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(credentials, Arc::new(transport)))
    }

    /// Create a client that sends commands through `transport`.
    pub fn with_transport(credentials: RegistrarCredentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub fn credentials(&self) -> &RegistrarCredentials {
        &self.credentials
    }

    /// Check whether a domain can be registered.
    ///
    /// Availability is read from the envelope's `RRPCode` only: `210` means
    /// available, any other code or a missing code means not available.
    ///
    /// # Errors
    ///
    /// - `MalformedDomain` if the domain is not exactly SLD.TLD
    /// - `Transport` / `Parse` if the round trip or the reply fails
    pub async fn check_availability(&self, domain_name: &str) -> Result<bool> {
        let command = RegistrarCommand::check(domain_name, &self.credentials)?;
        let reply = self.execute(&command).await?;

        let code = reply.envelope_text("RRPCode").map(str::trim);
        let available = code == Some(RRP_AVAILABLE);
        debug!(domain = domain_name, rrp_code = ?code, available, "availability checked");
        Ok(available)
    }

    /// Register a domain and return the raw parsed reply.
    ///
    /// Fails before anything is sent with `MissingContactInfo` when
    /// `contact_info` is `None`, or `Validation` when the period is outside
    /// 1-10 years.
    pub async fn register_domain(
        &self,
        domain_name: &str,
        contact_info: Option<&ContactInfo>,
        registration_period: u32,
    ) -> Result<RegistrarReply> {
        let command = RegistrarCommand::purchase(
            domain_name,
            contact_info,
            registration_period,
            &self.credentials,
        )?;
        self.execute(&command).await
    }

    /// Register a domain and reduce the reply to a normalized result.
    ///
    /// A registrar-side rejection is returned as `Ok` with a
    /// `not_registered` outcome; only transport and parse failures are
    /// errors.
    pub async fn register_domain_normalized(
        &self,
        domain_name: &str,
        contact_info: Option<&ContactInfo>,
        registration_period: u32,
    ) -> Result<NormalizedRegistrationResult> {
        let reply = self
            .register_domain(domain_name, contact_info, registration_period)
            .await?;
        Ok(normalize_registration(&reply))
    }

    /// List domains owned by an account, pairing domains with expirations
    /// positionally.
    ///
    /// Domains without a matching expiration get `None`; surplus expirations
    /// are dropped.
    pub async fn list_domains_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountDomain>> {
        debug!(account_id, "listing account domains");
        let reply = self
            .execute(&RegistrarCommand::get_domains(&self.credentials))
            .await?;

        let domains = reply.find_texts("domain");
        let mut expirations = reply.find_texts("expiration").into_iter();
        if domains.len() < expirations.len() {
            warn!(
                account_id,
                domains = domains.len(),
                expirations = expirations.len(),
                "reply carries more expirations than domains"
            );
        }

        Ok(domains
            .into_iter()
            .map(|domain| AccountDomain {
                domain_name: domain.to_string(),
                expiration: expirations.next().map(str::to_string),
            })
            .collect())
    }

    /// Create a sub-account under the reseller account.
    ///
    /// The request is validated before any network call.
    pub async fn create_sub_account(
        &self,
        request: &SubAccountRequest,
    ) -> Result<bool> {
        validate_sub_account(request)?;
        let reply = self
            .execute(&RegistrarCommand::create_sub_account(request, &self.credentials))
            .await?;
        Ok(reply_succeeded(&reply))
    }

    /// Whether the reseller's sub-account listing succeeded.
    pub async fn list_sub_accounts(&self) -> Result<bool> {
        let reply = self
            .execute(&RegistrarCommand::get_sub_accounts(&self.credentials))
            .await?;
        Ok(reply_succeeded(&reply))
    }

    async fn execute(&self, command: &RegistrarCommand) -> Result<RegistrarReply> {
        let url = command.to_url(self.credentials.base_url())?;
        debug!(
            command = command.name(),
            sld = command.get("SLD"),
            tld = command.get("TLD"),
            "sending registrar command"
        );

        let body = self.transport.get(url).await?;
        let reply = RegistrarReply::from_bytes(body)?;

        if let Some(errors) = reply.envelope_text("ErrCount").filter(|count| *count != "0") {
            debug!(command = command.name(), error_count = errors, "registrar reported errors");
        }
        Ok(reply)
    }
}

impl std::fmt::Debug for RegistrarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Envelope present, `ErrCount` of zero, and `Done` true when reported.
fn reply_succeeded(reply: &RegistrarReply) -> bool {
    let Some(envelope) = reply.interface_response() else {
        return false;
    };
    let text = |key: &str| envelope.get(key).and_then(ReplyValue::as_text).map(str::trim);

    let no_errors = text("ErrCount") == Some("0");
    let done = match envelope.get("Done") {
        None => true,
        Some(_) => text("Done").is_some_and(|done| done.eq_ignore_ascii_case("true")),
    };
    no_errors && done
}
