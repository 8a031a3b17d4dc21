//! Error handling for registrar and generation operations.
//!
//! This module defines a single error type covering every way a call can fail
//! before, during or after the network round trip. Registrar business failures
//! (an RRP code other than 200) are *not* errors: they are normal outcomes
//! reported through [`crate::NormalizedRegistrationResult`].

use thiserror::Error;

/// Main error type for domain-shop operations.
///
/// Variants fall into two families:
/// - client errors, raised before any network call (`Validation`,
///   `MissingContactInfo`, `MalformedDomain`)
/// - upstream failures, raised once a call was attempted (`Transport`,
///   `Parse`, `Generation`)
///
/// `Config` is only produced while loading settings at startup.
#[derive(Debug, Clone, Error)]
pub enum DomainShopError {
    /// Caller-supplied contact info or domain name violates a syntactic rule
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Registration attempted without registrant contact information
    #[error("Contact information is required for domain registration")]
    MissingContactInfo,

    /// Domain cannot be split into exactly a second-level and top-level label
    #[error("Malformed domain '{domain}': {reason}")]
    MalformedDomain { domain: String, reason: String },

    /// Network-related errors (connection, timeout, HTTP status, etc.)
    #[error("Transport error: {message}{}", describe_cause(.cause))]
    Transport {
        message: String,
        cause: Option<String>,
    },

    /// Reply body was not UTF-8 or not well-formed XML/JSON
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    /// The generation workflow answered, but not with usable domains
    #[error("Generation failed: {message}")]
    Generation { message: String },

    /// Configuration errors (missing or invalid settings)
    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn describe_cause(cause: &Option<String>) -> String {
    match cause {
        Some(cause) => format!(" (source: {})", cause),
        None => String::new(),
    }
}

impl DomainShopError {
    /// Create a new validation error for a named field.
    pub fn validation<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new malformed domain error.
    pub fn malformed_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::MalformedDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new transport error.
    pub fn transport<M: Into<String>>(message: M) -> Self {
        Self::Transport {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a new transport error with source information.
    pub fn transport_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::Transport {
            message: message.into(),
            cause: Some(source.into()),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
            content: None,
        }
    }

    /// Create a new parse error keeping a snippet of the offending content.
    pub fn parse_with_content<M: Into<String>, C: Into<String>>(message: M, content: C) -> Self {
        Self::Parse {
            message: message.into(),
            content: Some(content.into()),
        }
    }

    /// Create a new generation error.
    pub fn generation<M: Into<String>>(message: M) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the caller's input.
    ///
    /// These are always raised before a network call is attempted.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::MissingContactInfo | Self::MalformedDomain { .. }
        )
    }

    /// Check if this error came from talking to an upstream service.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Parse { .. } | Self::Generation { .. }
        )
    }
}

impl From<reqwest::Error> for DomainShopError {
    fn from(err: reqwest::Error) -> Self {
        // Registrar URLs carry the reseller password in the query string
        let err = err.without_url();
        if err.is_timeout() {
            Self::transport_with_source("Request timed out", describe_reqwest(&err))
        } else if err.is_connect() {
            Self::transport_with_source("Connection failed", describe_reqwest(&err))
        } else if err.is_decode() {
            Self::parse(format!("Failed to decode response body: {}", describe_reqwest(&err)))
        } else {
            Self::transport_with_source("HTTP request failed", describe_reqwest(&err))
        }
    }
}

/// The error and its sources joined with `: `.
fn describe_reqwest(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}

impl From<quick_xml::Error> for DomainShopError {
    fn from(err: quick_xml::Error) -> Self {
        Self::parse(format!("Malformed XML: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for DomainShopError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::parse(format!("Response body is not valid UTF-8: {}", err))
    }
}

impl From<serde_json::Error> for DomainShopError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(format!("JSON parsing failed: {}", err))
    }
}
