//! # Domain Shop Library
//!
//! Registrant validation, an eNom reseller interface client and a
//! domain-name generation client.
//!
//! Every caller-supplied value is validated before a request leaves the
//! process. Registrar replies are parsed into a generic XML tree, and
//! registration replies are reduced to a stable
//! [`NormalizedRegistrationResult`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_shop_lib::{
//!     validate_registration_request, ContactInfoInput, RegistrarClient, Settings,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(None)?;
//!     let client = RegistrarClient::new(
//!         settings.registrar.credentials.clone(),
//!         settings.registrar.timeout,
//!     )?;
//!
//!     let contact = ContactInfoInput {
//!         last_name: "Doe".into(),
//!         address1: "123 Main St".into(),
//!         city: "Anytown".into(),
//!         postal_code: "12345".into(),
//!         country: "us".into(),
//!         email: "john@example.com".into(),
//!         ..Default::default()
//!     };
//!     let request = validate_registration_request("example.com", Some(&contact), None)?;
//!     let result = client
//!         .register_domain_normalized(
//!             &request.domain_name,
//!             Some(&request.contact_info),
//!             request.registration_period,
//!         )
//!         .await?;
//!
//!     println!("{}: {}", result.outcome, result.detail);
//!     Ok(())
//! }
//! ```

// Re-export main public API types and functions
// This makes them available as domain_shop_lib::TypeName
pub use config::{
    FileConfig, GenerationSettings, RegistrarCredentials, RegistrarEnvironment,
    RegistrarSettings, ServerSettings, Settings,
};
pub use error::DomainShopError;
pub use generate::{DomainGenerator, GenerationClient};
pub use protocols::{
    normalize_registration, split_domain, HttpTransport, RegistrarCommand, RegistrarReply,
    ReplyMap, ReplyValue, Transport,
};
pub use registrar::RegistrarClient;
pub use reqwest::Url;
pub use types::{
    AccountDomain, ContactInfo, ContactInfoInput, DomainRegistrationRequest, GeneratedDomain,
    GenerationRequest, NormalizedRegistrationResult, RegistrationOutcome, SubAccountRequest,
    DEFAULT_REGISTRATION_PERIOD,
};
pub use validate::{
    validate_contact_info, validate_country, validate_domain_name, validate_email,
    validate_generation_request, validate_phone, validate_phone_country_code,
    validate_registration_period, validate_registration_request, validate_sub_account,
};

// Public modules
pub mod config;
pub mod generate;
pub mod protocols;

// Internal modules - their contents are re-exported above
mod error;
mod registrar;
mod types;
mod validate;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainShopError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
