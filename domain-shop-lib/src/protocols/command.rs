//! Registrar command construction.
//!
//! Each reseller interface call is an HTTP GET whose query string carries the
//! command name, the reseller credentials and command-specific parameters.
//! Builders here are deterministic: the same inputs always produce the same
//! ordered parameter list.

use crate::config::RegistrarCredentials;
use crate::error::DomainShopError;
use crate::types::{ContactInfo, SubAccountRequest, DEFAULT_SUB_ACCOUNT_PHONE};
use crate::validate::validate_registration_period;
use crate::Result;
use reqwest::Url;
use std::fmt;

/// Parameter keys whose values must never be printed.
const SECRET_KEYS: &[&str] = &["PW", "pw", "NewPW", "ConfirmPW"];

/// A single reseller interface command, ready to be sent.
#[derive(Clone, PartialEq)]
pub struct RegistrarCommand {
    name: &'static str,
    params: Vec<(&'static str, String)>,
}

/// Split a domain into its second-level and top-level labels.
///
/// The reseller interface addresses domains as an SLD/TLD pair, so anything
/// but exactly two non-empty labels is rejected.
///
/// # Examples
///
/// ```
/// use domain_shop_lib::split_domain;
///
/// assert_eq!(split_domain("example.com").unwrap(), ("example", "com"));
/// assert!(split_domain("example").is_err());
/// assert!(split_domain("www.example.com").is_err());
/// ```
pub fn split_domain(domain: &str) -> Result<(&str, &str)> {
    let mut labels = domain.split('.');
    match (labels.next(), labels.next(), labels.next()) {
        (Some(sld), Some(tld), None) if !sld.is_empty() && !tld.is_empty() => Ok((sld, tld)),
        (_, None, _) => Err(DomainShopError::malformed_domain(
            domain,
            "expected a second-level and top-level label separated by a dot",
        )),
        _ => Err(DomainShopError::malformed_domain(
            domain,
            "expected exactly two labels (SLD.TLD)",
        )),
    }
}

impl RegistrarCommand {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            params: vec![("command", name.to_string())],
        }
    }

    fn param<V: Into<String>>(mut self, key: &'static str, value: V) -> Self {
        self.params.push((key, value.into()));
        self
    }

    fn xml(self) -> Self {
        self.param("ResponseType", "XML")
    }

    /// `Check`: availability of one domain.
    pub fn check(
        domain_name: &str,
        credentials: &RegistrarCredentials,
    ) -> Result<Self> {
        let (sld, tld) = split_domain(domain_name)?;
        Ok(Self::new("Check")
            .param("SLD", sld)
            .param("TLD", tld)
            .param("UID", credentials.reseller_id())
            .param("PW", credentials.reseller_password())
            .xml())
    }

    /// `Purchase`: register a domain for the given registrant.
    ///
    /// Optional contact fields that are absent are sent as empty strings.
    ///
    /// # Errors
    ///
    /// - `MissingContactInfo` when `contact_info` is `None`
    /// - `MalformedDomain` when the domain is not exactly SLD.TLD
    /// - `Validation` when the period is outside 1-10 years
    pub fn purchase(
        domain_name: &str,
        contact_info: Option<&ContactInfo>,
        registration_period: u32,
        credentials: &RegistrarCredentials,
    ) -> Result<Self> {
        let contact = contact_info.ok_or(DomainShopError::MissingContactInfo)?;
        let (sld, tld) = split_domain(domain_name)?;
        let registration_period = validate_registration_period(registration_period)?;
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();

        Ok(Self::new("Purchase")
            .param("SLD", sld)
            .param("TLD", tld)
            .param("UID", credentials.reseller_id())
            .param("PW", credentials.reseller_password())
            .param("NumYears", registration_period.to_string())
            .xml()
            .param("RegistrantFirstName", opt(&contact.first_name))
            .param("RegistrantLastName", contact.last_name.as_str())
            .param("RegistrantOrganizationName", opt(&contact.organization))
            .param("RegistrantAddress1", contact.address1.as_str())
            .param("RegistrantAddress2", opt(&contact.address2))
            .param("RegistrantCity", contact.city.as_str())
            .param("RegistrantStateProvince", opt(&contact.state))
            .param("RegistrantPostalCode", contact.postal_code.as_str())
            .param("RegistrantCountry", contact.country.as_str())
            .param("RegistrantPhone", contact.registrar_phone())
            .param("RegistrantEmailAddress", contact.email.as_str()))
    }

    /// `GetDomains`: domains owned by the authenticated account.
    pub fn get_domains(credentials: &RegistrarCredentials) -> Self {
        Self::new("GetDomains")
            .param("UID", credentials.reseller_id())
            .param("PW", credentials.reseller_password())
            .param("Tab", "Sub_IOwn")
            .xml()
    }

    /// `CreateSubAccount`: a new account under the reseller.
    pub fn create_sub_account(
        request: &SubAccountRequest,
        credentials: &RegistrarCredentials,
    ) -> Self {
        let mut command = Self::new("CreateSubAccount")
            .param("uid", credentials.reseller_id())
            .param("pw", credentials.reseller_password())
            .param("NewUID", request.username.as_str())
            .param("NewPW", request.password.as_str())
            .param("ConfirmPW", request.password.as_str())
            .param("RegistrantEmailAddress", request.email.as_str())
            .param(
                "RegistrantPhone",
                request
                    .phone
                    .as_deref()
                    .unwrap_or(DEFAULT_SUB_ACCOUNT_PHONE),
            );
        if let Some(first) = &request.first_name {
            command = command.param("RegistrantFirstName", first.as_str());
        }
        if let Some(last) = &request.last_name {
            command = command.param("RegistrantLastName", last.as_str());
        }
        command.xml()
    }

    /// `GetSubAccounts`: sub-accounts of the reseller.
    pub fn get_sub_accounts(credentials: &RegistrarCredentials) -> Self {
        Self::new("GetSubAccounts")
            .param("uid", credentials.reseller_id())
            .param("pw", credentials.reseller_password())
            .xml()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full request URL: `base` plus the form-encoded parameters.
    pub fn to_url(&self, base: &str) -> Result<Url> {
        Url::parse_with_params(base, &self.params).map_err(|e| {
            DomainShopError::config(format!("Invalid registrar endpoint '{}': {}", base, e))
        })
    }
}

impl fmt::Debug for RegistrarCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.params {
            if SECRET_KEYS.contains(key) {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistrarEnvironment;

    fn credentials() -> RegistrarCredentials {
        RegistrarCredentials::new("reseller", "s3cret", RegistrarEnvironment::Test)
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            last_name: "Doe".into(),
            address1: "123 Main St".into(),
            city: "Anytown".into(),
            postal_code: "12345".into(),
            country: "US".into(),
            email: "john@example.com".into(),
            first_name: None,
            organization: None,
            address2: None,
            state: None,
            phone_country_code: Some("+1".into()),
            phone: Some("1234567890".into()),
        }
    }

    #[test]
    fn test_check_parameters() {
        let command = RegistrarCommand::check("example.com", &credentials()).unwrap();
        let keys: Vec<_> = command.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["command", "SLD", "TLD", "UID", "PW", "ResponseType"]);
        assert_eq!(command.get("command"), Some("Check"));
        assert_eq!(command.get("SLD"), Some("example"));
        assert_eq!(command.get("TLD"), Some("com"));
        assert_eq!(command.get("UID"), Some("reseller"));
        assert_eq!(command.get("ResponseType"), Some("XML"));
    }

    #[test]
    fn test_check_rejects_malformed_domain() {
        for domain in ["example", "www.example.com", ".com", "example."] {
            let err = RegistrarCommand::check(domain, &credentials()).unwrap_err();
            assert!(matches!(err, DomainShopError::MalformedDomain { .. }), "{domain}");
        }
    }

    #[test]
    fn test_purchase_sends_all_contact_fields() {
        let command =
            RegistrarCommand::purchase("example.com", Some(&contact()), 2, &credentials())
                .unwrap();
        assert_eq!(command.get("command"), Some("Purchase"));
        assert_eq!(command.get("NumYears"), Some("2"));
        assert_eq!(command.get("RegistrantFirstName"), Some(""));
        assert_eq!(command.get("RegistrantOrganizationName"), Some(""));
        assert_eq!(command.get("RegistrantAddress2"), Some(""));
        assert_eq!(command.get("RegistrantStateProvince"), Some(""));
        assert_eq!(command.get("RegistrantLastName"), Some("Doe"));
        assert_eq!(command.get("RegistrantCountry"), Some("US"));
        assert_eq!(command.get("RegistrantPhone"), Some("+1.1234567890"));
        assert_eq!(command.get("RegistrantEmailAddress"), Some("john@example.com"));
        let registrant = command
            .params()
            .iter()
            .filter(|(k, _)| k.starts_with("Registrant"))
            .count();
        assert_eq!(registrant, 11);
    }

    #[test]
    fn test_purchase_requires_contact() {
        let err = RegistrarCommand::purchase("example.com", None, 1, &credentials()).unwrap_err();
        assert!(matches!(err, DomainShopError::MissingContactInfo));
    }

    #[test]
    fn test_purchase_rejects_out_of_range_period() {
        for years in [0, 11] {
            let err = RegistrarCommand::purchase("example.com", Some(&contact()), years, &credentials())
                .unwrap_err();
            assert!(matches!(err, DomainShopError::Validation { .. }), "{years}");
        }
        for years in [1, 10] {
            assert!(
                RegistrarCommand::purchase("example.com", Some(&contact()), years, &credentials())
                    .is_ok()
            );
        }
    }

    #[test]
    fn test_account_commands() {
        let domains = RegistrarCommand::get_domains(&credentials());
        assert_eq!(domains.get("Tab"), Some("Sub_IOwn"));
        assert_eq!(domains.get("UID"), Some("reseller"));

        let subs = RegistrarCommand::get_sub_accounts(&credentials());
        assert_eq!(subs.get("uid"), Some("reseller"));
        assert_eq!(subs.get("pw"), Some("s3cret"));
        assert_eq!(subs.get("UID"), None);
    }

    #[test]
    fn test_create_sub_account_parameters() {
        let request = SubAccountRequest::new("newuser", "hunter2", "new@example.com");
        let command = RegistrarCommand::create_sub_account(&request, &credentials());
        assert_eq!(command.get("NewUID"), Some("newuser"));
        assert_eq!(command.get("NewPW"), Some("hunter2"));
        assert_eq!(command.get("ConfirmPW"), Some("hunter2"));
        assert_eq!(command.get("RegistrantPhone"), Some(DEFAULT_SUB_ACCOUNT_PHONE));
        assert_eq!(command.get("RegistrantFirstName"), None);

        let named = RegistrarCommand::create_sub_account(
            &request.with_name("Jane", "Roe"),
            &credentials(),
        );
        assert_eq!(named.get("RegistrantFirstName"), Some("Jane"));
        assert_eq!(named.get("RegistrantLastName"), Some("Roe"));
    }

    #[test]
    fn test_to_url_encodes_query() {
        let mut info = contact();
        info.address1 = "1 Main St & Co".into();
        let command =
            RegistrarCommand::purchase("example.com", Some(&info), 1, &credentials()).unwrap();
        let url = command.to_url(credentials().base_url()).unwrap();
        assert_eq!(url.host_str(), Some("resellertest.enom.com"));
        assert_eq!(url.path(), "/interface.asp");
        let address = url
            .query_pairs()
            .find(|(k, _)| k == "RegistrantAddress1")
            .map(|(_, v)| v.into_owned());
        assert_eq!(address.as_deref(), Some("1 Main St & Co"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let request = SubAccountRequest::new("newuser", "hunter2", "new@example.com");
        let command = RegistrarCommand::create_sub_account(&request, &credentials());
        let printed = format!("{:?}", command);
        assert!(!printed.contains("s3cret"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("newuser"));
    }
}
