//! Reduction of a registration reply to a [`NormalizedRegistrationResult`].
//!
//! Rules are evaluated in order and the first one that applies wins:
//!
//! 1. no `interface-response` envelope → not registered
//! 2. envelope without a usable `RRPCode` → not registered
//! 3. `RRPCode` other than `200` → not registered, with the registrar's text,
//!    error count and errors
//! 4. otherwise → registered, carrying `OrderStatus` and `OrderDescription`
//!
//! A business failure is an ordinary result here, never an error.

use super::reply::{RegistrarReply, ReplyValue};
use crate::types::NormalizedRegistrationResult;
use tracing::{info, warn};

/// RRP code the registrar uses for a completed command.
pub const RRP_SUCCESS: &str = "200";

pub const MISSING_INTERFACE_RESPONSE: &str = "Failed to get interface response";
pub const MISSING_RRP_CODE: &str = "Failed to get RRP Code";
pub const MISSING_RRP_TEXT: &str = "Failed to get RRPText";
pub const MISSING_ORDER_STATUS: &str = "Failed to get OrderStatus";
pub const MISSING_ORDER_DESCRIPTION: &str = "Failed to get OrderDescription";

/// Apply the four normalization rules to a parsed registration reply.
///
/// # Examples
///
/// ```
/// use domain_shop_lib::{normalize_registration, RegistrarReply};
///
/// let reply = RegistrarReply::from_xml("<other/>").unwrap();
/// let result = normalize_registration(&reply);
/// assert!(!result.is_registered());
/// assert_eq!(result.detail, "Failed to get interface response");
/// ```
pub fn normalize_registration(reply: &RegistrarReply) -> NormalizedRegistrationResult {
    let Some(envelope) = reply.interface_response() else {
        warn!("registration reply has no interface-response envelope");
        return NormalizedRegistrationResult::not_registered(MISSING_INTERFACE_RESPONSE);
    };

    let code = envelope
        .get("RRPCode")
        .and_then(ReplyValue::as_text)
        .map(str::trim)
        .filter(|code| !code.is_empty());
    let Some(code) = code else {
        warn!("registration reply has no RRPCode");
        return NormalizedRegistrationResult::not_registered(MISSING_RRP_CODE);
    };

    if code != RRP_SUCCESS {
        let text = envelope
            .get("RRPText")
            .and_then(ReplyValue::as_text)
            .unwrap_or(MISSING_RRP_TEXT);
        let detail = format!(
            "{}, error_count: {}, errors: {}",
            text,
            display_or_none(envelope.get("ErrCount")),
            display_or_none(envelope.get("errors")),
        );
        warn!(rrp_code = code, %detail, "registrar rejected registration");
        return NormalizedRegistrationResult::not_registered(detail);
    }

    let status = envelope
        .get("OrderStatus")
        .and_then(ReplyValue::as_text)
        .unwrap_or(MISSING_ORDER_STATUS);
    let description = envelope
        .get("OrderDescription")
        .and_then(ReplyValue::as_text)
        .unwrap_or(MISSING_ORDER_DESCRIPTION);

    info!(
        order_id = reply.order_id().unwrap_or("unknown"),
        order_status = status,
        "domain registered"
    );
    NormalizedRegistrationResult::registered(status, description)
}

fn display_or_none(value: Option<&ReplyValue>) -> String {
    value.map_or_else(|| "none".to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::reply::{ReplyMap, INTERFACE_RESPONSE};
    use crate::types::RegistrationOutcome;

    fn reply_with(envelope: ReplyMap) -> RegistrarReply {
        RegistrarReply::from_map(ReplyMap::new().with(INTERFACE_RESPONSE, ReplyValue::Map(envelope)))
    }

    #[test]
    fn test_success_carries_status_and_description() {
        let reply = reply_with(
            ReplyMap::new()
                .with_text("RRPCode", "200")
                .with_text("OrderStatus", "Completed")
                .with_text("OrderDescription", "Domain registered successfully"),
        );
        let result = normalize_registration(&reply);
        assert_eq!(result.outcome, RegistrationOutcome::Registered);
        assert_eq!(result.order_status.as_deref(), Some("Completed"));
        assert_eq!(result.detail, "Domain registered successfully");
    }

    #[test]
    fn test_success_with_missing_order_fields_uses_fallbacks() {
        let result = normalize_registration(&reply_with(ReplyMap::new().with_text("RRPCode", "200")));
        assert!(result.is_registered());
        assert_eq!(result.order_status.as_deref(), Some(MISSING_ORDER_STATUS));
        assert_eq!(result.detail, MISSING_ORDER_DESCRIPTION);
    }

    #[test]
    fn test_business_failure_reports_text_count_and_errors() {
        let reply = reply_with(
            ReplyMap::new()
                .with_text("RRPCode", "400")
                .with_text("RRPText", "Domain registration failed")
                .with_text("ErrCount", "1")
                .with_text("errors", "Invalid contact information"),
        );
        let result = normalize_registration(&reply);
        assert_eq!(result.outcome, RegistrationOutcome::NotRegistered);
        assert_eq!(result.order_status, None);
        assert_eq!(
            result.detail,
            "Domain registration failed, error_count: 1, errors: Invalid contact information"
        );
    }

    #[test]
    fn test_business_failure_fallbacks() {
        let reply = reply_with(
            ReplyMap::new().with_text("RRPCode", "540").with(
                "errors",
                ReplyValue::Map(ReplyMap::new().with_text("Err1", "Domain not available")),
            ),
        );
        let result = normalize_registration(&reply);
        assert!(!result.is_registered());
        assert_eq!(
            result.detail,
            "Failed to get RRPText, error_count: none, errors: {Err1: Domain not available}"
        );
    }

    #[test]
    fn test_missing_envelope() {
        let reply = RegistrarReply::from_map(
            ReplyMap::new().with_text("RRPCode", "200"),
        );
        let result = normalize_registration(&reply);
        assert_eq!(result.outcome, RegistrationOutcome::NotRegistered);
        assert_eq!(result.detail, MISSING_INTERFACE_RESPONSE);

        let empty = RegistrarReply::from_map(ReplyMap::new().with(INTERFACE_RESPONSE, ReplyValue::Null));
        assert_eq!(normalize_registration(&empty).detail, MISSING_INTERFACE_RESPONSE);
    }

    #[test]
    fn test_missing_rrp_code_wins_over_everything_else() {
        let reply = reply_with(
            ReplyMap::new()
                .with_text("RRPText", "Domain registration failed")
                .with_text("OrderStatus", "Completed"),
        );
        assert_eq!(normalize_registration(&reply).detail, MISSING_RRP_CODE);

        let blank = reply_with(ReplyMap::new().with_text("RRPCode", "  "));
        assert_eq!(normalize_registration(&blank).detail, MISSING_RRP_CODE);

        let text_only = RegistrarReply::from_xml(
            "<interface-response>unexpected</interface-response>",
        )
        .unwrap();
        assert_eq!(normalize_registration(&text_only).detail, MISSING_RRP_CODE);
    }

    #[test]
    fn test_normalizes_parsed_xml() {
        let reply = RegistrarReply::from_xml(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <interface-response>
                <OrderID>157352357</OrderID>
                <RRPCode>200</RRPCode>
                <RRPText>Command completed successfully</RRPText>
                <OrderStatus>Completed</OrderStatus>
                <OrderDescription>Domain registered successfully</OrderDescription>
                <ErrCount>0</ErrCount>
            </interface-response>"#,
        )
        .unwrap();
        let result = normalize_registration(&reply);
        assert_eq!(
            result,
            NormalizedRegistrationResult::registered("Completed", "Domain registered successfully")
        );
    }
}
