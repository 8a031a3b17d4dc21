// domain-shop-lib/tests/integration.rs

//! Integration tests for domain-shop-lib exports and the registration flow

use async_trait::async_trait;
use domain_shop_lib::{
    normalize_registration, split_domain, validate_registration_request, ContactInfoInput,
    DomainShopError, RegistrarClient, RegistrarCommand, RegistrarCredentials,
    RegistrarEnvironment, RegistrarReply, RegistrationOutcome, Transport,
};
use reqwest::Url;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

/// Hands out queued reply bodies in order and remembers every request URL.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<&'static str>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    fn with_replies(replies: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().copied().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn commands(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "command")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: Url) -> Result<Vec<u8>, DomainShopError> {
        self.requests.lock().unwrap().push(url);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| DomainShopError::transport("no scripted reply left"))
    }
}

fn credentials() -> RegistrarCredentials {
    RegistrarCredentials::new("reseller", "s3cret", RegistrarEnvironment::Test)
}

fn contact_input() -> ContactInfoInput {
    ContactInfoInput {
        first_name: Some("John".into()),
        last_name: "Doe".into(),
        address1: "123 Main St".into(),
        city: "Anytown".into(),
        state: Some("CA".into()),
        postal_code: "12345".into(),
        country: "us".into(),
        phone_country_code: Some("1".into()),
        phone: Some("(555) 123-4567".into()),
        email: "john@example.com".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_validated_purchase_round_trip() {
    let transport = ScriptedTransport::with_replies(&[
        r#"<?xml version="1.0" encoding="utf-8"?>
        <interface-response>
            <OrderID>157352357</OrderID>
            <RRPCode>200</RRPCode>
            <RRPText>Command completed successfully</RRPText>
            <OrderStatus>Completed</OrderStatus>
            <OrderDescription>Domain registered successfully</OrderDescription>
            <ErrCount>0</ErrCount>
        </interface-response>"#,
    ]);
    let client = RegistrarClient::with_transport(credentials(), transport.clone());

    let request = assert_ok!(validate_registration_request(
        "Example.COM",
        Some(&contact_input()),
        Some(2)
    ));
    assert_eq!(request.domain_name, "example.com");
    assert_eq!(request.contact_info.country(), "US");
    assert_eq!(request.contact_info.phone(), Some("5551234567"));

    let result = assert_ok!(
        client
            .register_domain_normalized(
                &request.domain_name,
                Some(&request.contact_info),
                request.registration_period,
            )
            .await
    );
    assert_eq!(result.outcome, RegistrationOutcome::Registered);
    assert_eq!(result.order_status.as_deref(), Some("Completed"));
    assert_eq!(result.detail, "Domain registered successfully");

    let url = transport.requests.lock().unwrap()[0].clone();
    let phone = url
        .query_pairs()
        .find(|(k, _)| k == "RegistrantPhone")
        .map(|(_, v)| v.into_owned());
    assert_eq!(phone.as_deref(), Some("+1.5551234567"));
    assert_eq!(url.host_str(), Some("resellertest.enom.com"));
}

#[tokio::test]
async fn test_invalid_contact_never_reaches_registrar() {
    let transport = ScriptedTransport::with_replies(&[]);
    let client = RegistrarClient::with_transport(credentials(), transport.clone());

    let mut bad = contact_input();
    bad.country = "USA".into();
    let err = assert_err!(validate_registration_request("example.com", Some(&bad), None));
    assert!(err.is_client_error());

    let err = assert_err!(client.register_domain("example.com", None, 1).await);
    assert!(matches!(err, DomainShopError::MissingContactInfo));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_one_client_serves_every_operation() {
    let transport = ScriptedTransport::with_replies(&[
        "<interface-response><RRPCode>210</RRPCode></interface-response>",
        "<interface-response><GetDomains><domain-list>\
         <domain>a.com</domain><expiration>2026-01-01</expiration>\
         <domain>b.com</domain><expiration>2027-01-01</expiration>\
         </domain-list></GetDomains><ErrCount>0</ErrCount></interface-response>",
        "<interface-response><ErrCount>0</ErrCount><Done>true</Done></interface-response>",
    ]);
    let client = RegistrarClient::with_transport(credentials(), transport.clone());

    assert!(assert_ok!(client.check_availability("example.com").await));
    let domains = assert_ok!(client.list_domains_for_account("acct-1").await);
    assert_eq!(domains.len(), 2);
    assert_eq!(domains[1].domain_name, "b.com");
    assert_eq!(domains[1].expiration.as_deref(), Some("2027-01-01"));
    assert!(assert_ok!(client.list_sub_accounts().await));

    assert_eq!(transport.commands(), ["Check", "GetDomains", "GetSubAccounts"]);

    // Exhausted script surfaces as a transport failure, not a false outcome
    let err = assert_err!(client.check_availability("example.com").await);
    assert!(err.is_upstream_failure());
}

#[test]
fn test_check_command_splits_domain() {
    assert_eq!(assert_ok!(split_domain("example.com")), ("example", "com"));
    let command = assert_ok!(RegistrarCommand::check("example.com", &credentials()));
    assert_eq!(command.get("SLD"), Some("example"));
    assert_eq!(command.get("TLD"), Some("com"));

    let err = assert_err!(RegistrarCommand::check("localhost", &credentials()));
    assert!(matches!(err, DomainShopError::MalformedDomain { .. }));
}

#[test]
fn test_normalizer_on_registrar_rejection() {
    let reply = assert_ok!(RegistrarReply::from_xml(
        "<interface-response><RRPCode>400</RRPCode><RRPText>Domain registration failed</RRPText>\
         <ErrCount>1</ErrCount><errors>Invalid contact information</errors></interface-response>"
    ));
    let result = normalize_registration(&reply);
    assert_eq!(result.outcome, RegistrationOutcome::NotRegistered);
    assert!(result.detail.contains("Domain registration failed"));
    assert!(result.detail.contains("Invalid contact information"));

    let missing = assert_ok!(RegistrarReply::from_xml("<html><body>Gateway</body></html>"));
    assert_eq!(
        normalize_registration(&missing).detail,
        "Failed to get interface response"
    );
}
