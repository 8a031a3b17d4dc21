//! Validation for registrant contacts, domain names and request parameters.
//!
//! Every function here is pure: no I/O, no partial results. Anything that
//! reaches the registrar client has been through one of these checks first.

use crate::error::DomainShopError;
use crate::types::{
    ContactInfo, ContactInfoInput, DomainRegistrationRequest, GenerationRequest,
    SubAccountRequest, DEFAULT_REGISTRATION_PERIOD,
};
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

/// Longest accepted hostname.
pub const MAX_DOMAIN_LENGTH: usize = 253;
/// Shortest accepted hostname. Length is checked before grammar.
pub const MIN_DOMAIN_LENGTH: usize = 3;
/// Registrar limits for `NumYears`.
pub const MAX_REGISTRATION_PERIOD: u32 = 10;
/// Upper bound on names requested from the generation workflow.
pub const MAX_GENERATION_COUNT: u32 = 100;

lazy_static! {
    static ref HOSTNAME: Regex = Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$"
    )
    .expect("hostname pattern is valid");
    static ref COUNTRY_CODE: Regex = Regex::new(r"^[A-Z]{2}$").expect("country pattern is valid");
    static ref EMAIL: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
}

/// Validate and normalize a domain name.
///
/// # Arguments
///
/// * `domain` - The domain name to validate (e.g., "Example.com")
///
/// # Returns
///
/// The trimmed, lower-cased domain name.
///
/// # Errors
///
/// Returns `DomainShopError::Validation` on field `domain_name` if the
/// length is outside [3, 253], it has no dot, or it breaks hostname grammar.
pub fn validate_domain_name(domain: &str) -> Result<String> {
    let domain = domain.trim();

    if domain.len() < MIN_DOMAIN_LENGTH || domain.len() > MAX_DOMAIN_LENGTH {
        return Err(DomainShopError::validation(
            "domain_name",
            format!(
                "length must be between {} and {} characters",
                MIN_DOMAIN_LENGTH, MAX_DOMAIN_LENGTH
            ),
        ));
    }

    if !domain.contains('.') {
        return Err(DomainShopError::validation(
            "domain_name",
            "must contain at least one dot",
        ));
    }

    if !HOSTNAME.is_match(domain) {
        return Err(DomainShopError::validation(
            "domain_name",
            "is not a valid hostname",
        ));
    }

    Ok(domain.to_ascii_lowercase())
}

/// Validate a two-letter ISO country code, normalizing it to upper case.
pub fn validate_country(country: &str) -> Result<String> {
    let country = country.trim().to_uppercase();
    if !COUNTRY_CODE.is_match(&country) {
        return Err(DomainShopError::validation(
            "country",
            "must be a two-letter ISO country code",
        ));
    }
    Ok(country)
}

/// Validate a phone number, returning its digits only.
///
/// Spaces, dashes and parentheses are stripped first; what remains must be
/// 8-15 ASCII digits.
pub fn validate_phone(phone: &str) -> Result<String> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainShopError::validation(
            "phone",
            "must contain only digits and separators",
        ));
    }

    if !(8..=15).contains(&cleaned.len()) {
        return Err(DomainShopError::validation(
            "phone",
            "must contain between 8 and 15 digits",
        ));
    }

    Ok(cleaned)
}

/// Validate a phone dialing prefix, normalizing it to `+<digits>`.
pub fn validate_phone_country_code(code: &str) -> Result<String> {
    let code = code.trim();
    let digits = code.strip_prefix('+').unwrap_or(code);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainShopError::validation(
            "phone_country_code",
            "must contain only digits",
        ));
    }

    if digits.len() > 3 {
        return Err(DomainShopError::validation(
            "phone_country_code",
            "must contain between 1 and 3 digits",
        ));
    }

    Ok(format!("+{}", digits))
}

/// Validate an email address shape (`local@domain.tld`).
pub fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();
    if !EMAIL.is_match(email) {
        return Err(DomainShopError::validation(
            "email",
            "is not a valid email address",
        ));
    }
    Ok(email.to_string())
}

/// Check that a registration period is within the registrar's range.
pub fn validate_registration_period(years: u32) -> Result<u32> {
    if !(1..=MAX_REGISTRATION_PERIOD).contains(&years) {
        return Err(DomainShopError::validation(
            "registration_period",
            format!("must be between 1 and {} years", MAX_REGISTRATION_PERIOD),
        ));
    }
    Ok(years)
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainShopError::validation(field, "is required"));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate raw contact input into a [`ContactInfo`].
///
/// Blank optional fields are dropped rather than rejected. The first
/// violated rule is reported.
pub fn validate_contact_info(input: &ContactInfoInput) -> Result<ContactInfo> {
    let last_name = required("last_name", &input.last_name)?;
    let address1 = required("address1", &input.address1)?;
    let city = required("city", &input.city)?;
    let postal_code = required("postal_code", &input.postal_code)?;
    let country = validate_country(&input.country)?;
    let email = validate_email(&required("email", &input.email)?)?;

    let phone_country_code = optional(input.phone_country_code.as_ref())
        .map(|code| validate_phone_country_code(&code))
        .transpose()?;
    let phone = optional(input.phone.as_ref())
        .map(|phone| validate_phone(&phone))
        .transpose()?;

    Ok(ContactInfo {
        last_name,
        address1,
        city,
        postal_code,
        country,
        email,
        first_name: optional(input.first_name.as_ref()),
        organization: optional(input.organization.as_ref()),
        address2: optional(input.address2.as_ref()),
        state: optional(input.state.as_ref()),
        phone_country_code,
        phone,
    })
}

/// Build a validated registration request from caller input.
///
/// # Errors
///
/// - `MissingContactInfo` if `contact_info` is `None`
/// - `Validation` for any domain, contact or period violation
pub fn validate_registration_request(
    domain_name: &str,
    contact_info: Option<&ContactInfoInput>,
    registration_period: Option<u32>,
) -> Result<DomainRegistrationRequest> {
    let domain_name = validate_domain_name(domain_name)?;
    let contact_info = contact_info.ok_or(DomainShopError::MissingContactInfo)?;
    let contact_info = validate_contact_info(contact_info)?;
    let registration_period = validate_registration_period(
        registration_period.unwrap_or(DEFAULT_REGISTRATION_PERIOD),
    )?;

    Ok(DomainRegistrationRequest {
        domain_name,
        contact_info,
        registration_period,
    })
}

/// Validate the credentials and email of a new sub-account.
pub fn validate_sub_account(request: &SubAccountRequest) -> Result<()> {
    required("username", &request.username)?;
    required("password", &request.password)?;
    validate_email(&required("email", &request.email)?)?;
    Ok(())
}

/// Validate a generation request before it is sent to the workflow.
pub fn validate_generation_request(request: &GenerationRequest) -> Result<()> {
    required("name", &request.name)?;
    if !(1..=MAX_GENERATION_COUNT).contains(&request.count) {
        return Err(DomainShopError::validation(
            "count",
            format!("must be between 1 and {}", MAX_GENERATION_COUNT),
        ));
    }
    Ok(())
}
