//! Resource clients and the transports they ride on.

mod gateway;
mod http;
mod judges;
mod organization;
mod routers;

#[cfg(test)]
pub(crate) mod mock;

pub use gateway::*;
pub use http::*;
pub use judges::*;
pub use organization::*;
pub use routers::*;

use std::sync::Arc;

use crate::models::{ClientConfig, Result};

/// The main entry point for the Meridian SDK.
///
/// Wires a shared HTTP transport and completion gateway into the three
/// resource clients. Construction is the only point of configuration;
/// everything afterwards is stateless request/response.
pub struct MeridianClient {
    judges: JudgesClient,
    routers: RoutersClient,
    organization: OrganizationClient,
}

impl MeridianClient {
    /// Build a client over reqwest-backed transports.
    ///
    /// B_i(api key resolvable) → Result
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config)?);
        let gateway: Arc<dyn CompletionGateway> = Arc::new(HttpGateway::new(&config)?);
        Ok(Self::with_transports(config, transport, gateway))
    }

    /// Build a client over caller-supplied transports.
    pub fn with_transports(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        gateway: Arc<dyn CompletionGateway>,
    ) -> Self {
        Self {
            judges: JudgesClient::new(Arc::clone(&transport), config.clone()),
            routers: RoutersClient::new(Arc::clone(&transport), gateway, config.clone()),
            organization: OrganizationClient::new(transport, config),
        }
    }

    /// The judges resource client.
    pub fn judges(&self) -> &JudgesClient {
        &self.judges
    }

    /// The routers resource client.
    pub fn routers(&self) -> &RoutersClient {
        &self.routers
    }

    /// The organization resource client.
    pub fn organization(&self) -> &OrganizationClient {
        &self.organization
    }
}
