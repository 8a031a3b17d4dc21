//! Domain-name generation through an external workflow service.
//!
//! The workflow is given a business name, description and keywords and
//! answers with candidate domains and prices. Its output arrives at
//! `data.outputs.output`, either as a JSON array or as a string holding one.

use crate::config::GenerationSettings;
use crate::error::DomainShopError;
use crate::types::{GeneratedDomain, GenerationRequest};
use crate::validate::validate_generation_request;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Anything that can propose domain names for a business.
#[async_trait]
pub trait DomainGenerator: Send + Sync {
    /// # Errors
    ///
    /// - `Validation` when the request is out of range
    /// - `Transport` when the service cannot be reached
    /// - `Generation` when it answers with an error status or an unusable body
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedDomain>>;
}

#[derive(Debug, Serialize)]
struct WorkflowRun<'a> {
    inputs: &'a GenerationRequest,
    response_mode: &'static str,
    user: &'a str,
}

/// Client for the blocking workflow-run endpoint.
#[derive(Clone)]
pub struct GenerationClient {
    http_client: reqwest::Client,
    workflow_url: String,
    api_key: String,
    user: String,
}

impl GenerationClient {
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                DomainShopError::transport_with_source(
                    "Failed to create generation HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            workflow_url: settings.workflow_url.clone(),
            api_key: settings.api_key.clone(),
            user: settings.user.clone(),
        })
    }

    fn run_body<'a>(&'a self, request: &'a GenerationRequest) -> WorkflowRun<'a> {
        WorkflowRun {
            inputs: request,
            response_mode: "blocking",
            user: &self.user,
        }
    }
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("workflow_url", &self.workflow_url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DomainGenerator for GenerationClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedDomain>> {
        validate_generation_request(request)?;
        debug!(name = %request.name, count = request.count, "running generation workflow");

        let response = self
            .http_client
            .post(&self.workflow_url)
            .bearer_auth(&self.api_key)
            .json(&self.run_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainShopError::generation(format!(
                "workflow answered with HTTP {}",
                status
            )));
        }

        let body: Value = response.json().await?;
        extract_generated_domains(&body)
    }
}

/// Pull the generated domains out of a workflow-run response body.
///
/// # Examples
///
/// ```
/// use domain_shop_lib::generate::extract_generated_domains;
/// use serde_json::json;
///
/// let body = json!({"data": {"outputs": {"output": [{"name": "acme.io", "price": 12.5}]}}});
/// let domains = extract_generated_domains(&body).unwrap();
/// assert_eq!(domains[0].name, "acme.io");
/// ```
pub fn extract_generated_domains(body: &Value) -> Result<Vec<GeneratedDomain>> {
    let output = body
        .pointer("/data/outputs/output")
        .filter(|output| !output.is_null());

    let domains: std::result::Result<Option<Vec<GeneratedDomain>>, serde_json::Error> =
        match output {
            Some(Value::Array(_)) => output.cloned().map(serde_json::from_value).transpose(),
            Some(Value::String(text)) => serde_json::from_str(text).map(Some),
            _ => Ok(None),
        };

    match domains {
        Ok(Some(domains)) => Ok(domains),
        Ok(None) | Err(_) => {
            warn!(body = %body, "workflow returned unexpected response structure");
            Err(DomainShopError::generation("unexpected response structure"))
        }
    }
}
