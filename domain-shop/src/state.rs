//! Application state shared by every handler.

use std::sync::Arc;

use domain_shop_lib::{
    DomainGenerator, DomainShopError, GenerationClient, RegistrarClient, Settings,
};

/// Clients built once at startup and handed to handlers.
///
/// Both clients are immutable, so cloning the state only bumps reference
/// counts.
#[derive(Clone)]
pub struct AppState {
    /// Reseller interface client
    pub registrar: Arc<RegistrarClient>,

    /// Domain-name generation workflow
    pub generator: Arc<dyn DomainGenerator>,
}

impl AppState {
    pub fn new(registrar: RegistrarClient, generator: Arc<dyn DomainGenerator>) -> Self {
        Self {
            registrar: Arc::new(registrar),
            generator,
        }
    }

    /// Build the production clients from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, DomainShopError> {
        let registrar = RegistrarClient::new(
            settings.registrar.credentials.clone(),
            settings.registrar.timeout,
        )?;
        let generator = GenerationClient::new(&settings.generation)?;
        Ok(Self::new(registrar, Arc::new(generator)))
    }
}
