//! Core data types for registrant contacts, registrations and generation.
//!
//! Raw `*Input` types are what callers deserialize from requests; the
//! validated counterparts are only produced by [`crate::validate`] and are
//! the only shapes the registrar client accepts.

use serde::{Deserialize, Serialize};

/// Registrant contact information exactly as supplied by a caller.
///
/// Nothing here has been checked yet; pass it through
/// [`crate::validate_contact_info`] to obtain a [`ContactInfo`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ContactInfoInput {
    pub last_name: String,
    pub address1: String,
    pub city: String,
    pub postal_code: String,
    /// Two-letter ISO country code, any case
    pub country: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Dialing prefix, with or without a leading `+`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Validated registrant identity and address.
///
/// Only [`crate::validate_contact_info`] builds one, so every instance holds:
/// - `country` matches `^[A-Z]{2}$`
/// - `phone`, when present, is 8-15 ASCII digits
/// - `phone_country_code`, when present, is `+` followed by 1-3 digits
/// - required fields are non-blank
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactInfo {
    pub(crate) last_name: String,
    pub(crate) address1: String,
    pub(crate) city: String,
    pub(crate) postal_code: String,
    pub(crate) country: String,
    pub(crate) email: String,
    pub(crate) first_name: Option<String>,
    pub(crate) organization: Option<String>,
    pub(crate) address2: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) phone_country_code: Option<String>,
    pub(crate) phone: Option<String>,
}

impl ContactInfo {
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn address1(&self) -> &str {
        &self.address1
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Upper-cased ISO country code
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn address2(&self) -> Option<&str> {
        self.address2.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Dialing prefix with its leading `+`
    pub fn phone_country_code(&self) -> Option<&str> {
        self.phone_country_code.as_deref()
    }

    /// Digits only
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Phone number in the registrar's `+CC.NUMBER` notation.
    ///
    /// Falls back to the bare digits when no country code was given, and to
    /// an empty string when there is no phone at all.
    pub fn registrar_phone(&self) -> String {
        match (&self.phone_country_code, &self.phone) {
            (Some(code), Some(phone)) => format!("{}.{}", code, phone),
            (None, Some(phone)) => phone.clone(),
            (_, None) => String::new(),
        }
    }
}

/// A validated request to register one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRegistrationRequest {
    /// Lower-cased hostname, 3-253 characters, at least one dot
    pub domain_name: String,
    pub contact_info: ContactInfo,
    /// Registration period in years (1-10)
    pub registration_period: u32,
}

/// Default registration period in years.
pub const DEFAULT_REGISTRATION_PERIOD: u32 = 1;

/// Whether a registration went through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered,
    NotRegistered,
}

impl std::fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationOutcome::Registered => write!(f, "registered"),
            RegistrationOutcome::NotRegistered => write!(f, "not_registered"),
        }
    }
}

/// The caller-facing summary of a registration attempt.
///
/// Produced deterministically from a registrar reply; see
/// [`crate::normalize_registration`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRegistrationResult {
    pub outcome: RegistrationOutcome,

    /// Registrar's `OrderStatus`, only present when registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,

    /// Human-readable explanation or the registrar's order description
    pub detail: String,
}

impl NormalizedRegistrationResult {
    pub fn registered<S: Into<String>, D: Into<String>>(order_status: S, detail: D) -> Self {
        Self {
            outcome: RegistrationOutcome::Registered,
            order_status: Some(order_status.into()),
            detail: detail.into(),
        }
    }

    pub fn not_registered<D: Into<String>>(detail: D) -> Self {
        Self {
            outcome: RegistrationOutcome::NotRegistered,
            order_status: None,
            detail: detail.into(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.outcome == RegistrationOutcome::Registered
    }
}

/// One domain owned by a registrar account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountDomain {
    pub domain_name: String,
    /// `None` when the reply carried fewer expirations than domains
    pub expiration: Option<String>,
}

/// Placeholder phone the registrar requires for new sub-accounts.
pub const DEFAULT_SUB_ACCOUNT_PHONE: &str = "+1.1234567890";

/// Parameters for creating a sub-account under the reseller account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubAccountRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Registrar-format phone; defaults to [`DEFAULT_SUB_ACCOUNT_PHONE`]
    pub phone: Option<String>,
}

impl SubAccountRequest {
    pub fn new<U: Into<String>, P: Into<String>, E: Into<String>>(
        username: U,
        password: P,
        email: E,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_name<F: Into<String>, L: Into<String>>(mut self, first: F, last: L) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_phone<P: Into<String>>(mut self, phone: P) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Input to the external domain-name generation workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    pub count: u32,
}

impl GenerationRequest {
    pub fn new<N: Into<String>>(name: N, count: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            keywords: String::new(),
            count,
        }
    }
}

/// A candidate domain proposed by the generation workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedDomain {
    pub name: String,
    pub price: f64,
}
