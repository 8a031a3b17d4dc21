//! HTTP request handlers
//!
//! Each handler extracts the request, validates it with domain-shop-lib and
//! calls the client held in [`AppState`].

use axum::{
    extract::{Query, State},
    Json,
};
use domain_shop_lib::{
    validate_domain_name, validate_generation_request, validate_registration_request,
    ContactInfoInput, GeneratedDomain, GenerationRequest, NormalizedRegistrationResult,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckDomainQuery {
    /// Absent parameter deserializes as empty and fails domain validation
    #[serde(default)]
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckDomainResponse {
    pub domain: String,
    pub is_available: bool,
    pub price: u32,
}

/// Body of `POST /domains/purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub domain_name: String,
    pub contact_info: Option<ContactInfoInput>,
    /// Years, 1-10; defaults to one
    #[serde(default)]
    pub registration_period: Option<u32>,
}

/// GET /check-domain?domain=example.com
///
/// Availability and price are quoted without contacting the registrar.
#[instrument(skip_all, fields(domain = %query.domain))]
pub async fn check_domain(
    Query(query): Query<CheckDomainQuery>,
) -> ApiResult<Json<CheckDomainResponse>> {
    let domain = validate_domain_name(&query.domain)?;
    let (is_available, price) = {
        let mut rng = rand::thread_rng();
        (rng.gen_bool(0.5), rng.gen_range(1..=100))
    };

    Ok(Json(CheckDomainResponse {
        domain,
        is_available,
        price,
    }))
}

/// POST /domains/generate
#[instrument(skip_all, fields(name = %request.name, count = request.count))]
pub async fn generate_domains(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> ApiResult<Json<Vec<GeneratedDomain>>> {
    validate_generation_request(&request)?;
    let domains = state.generator.generate(&request).await?;
    info!(generated = domains.len(), "domains generated");
    Ok(Json(domains))
}

/// POST /domains/purchase
///
/// A registrar rejection is still a 200 with a `not_registered` outcome.
#[instrument(skip_all, fields(domain = %request.domain_name))]
pub async fn purchase_domain(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> ApiResult<Json<NormalizedRegistrationResult>> {
    let registration = validate_registration_request(
        &request.domain_name,
        request.contact_info.as_ref(),
        request.registration_period,
    )?;

    let result = state
        .registrar
        .register_domain_normalized(
            &registration.domain_name,
            Some(&registration.contact_info),
            registration.registration_period,
        )
        .await?;
    info!(outcome = %result.outcome, "purchase finished");
    Ok(Json(result))
}
